//! Static opcode catalogue.
//!
//! Columns: name, byte code, immediate width, stack in, stack out, base cost.

use super::OpcodeDescriptor;

const fn op(
    name: &'static str,
    code: u8,
    immediate_width: usize,
    stack_in: u8,
    stack_out: u8,
    cost: u32,
) -> OpcodeDescriptor {
    OpcodeDescriptor {
        name,
        code,
        immediate_width,
        stack_in,
        stack_out,
        cost,
    }
}

pub(super) static OPCODES: [OpcodeDescriptor; 144] = [
    op("STOP", 0x00, 0, 0, 0, 0),
    op("ADD", 0x01, 0, 2, 1, 3),
    op("MUL", 0x02, 0, 2, 1, 5),
    op("SUB", 0x03, 0, 2, 1, 3),
    op("DIV", 0x04, 0, 2, 1, 5),
    op("SDIV", 0x05, 0, 2, 1, 5),
    op("MOD", 0x06, 0, 2, 1, 5),
    op("SMOD", 0x07, 0, 2, 1, 5),
    op("ADDMOD", 0x08, 0, 3, 1, 8),
    op("MULMOD", 0x09, 0, 3, 1, 8),
    op("EXP", 0x0a, 0, 2, 1, 10),
    op("SIGNEXTEND", 0x0b, 0, 2, 1, 5),

    op("LT", 0x10, 0, 2, 1, 3),
    op("GT", 0x11, 0, 2, 1, 3),
    op("SLT", 0x12, 0, 2, 1, 3),
    op("SGT", 0x13, 0, 2, 1, 3),
    op("EQ", 0x14, 0, 2, 1, 3),
    op("ISZERO", 0x15, 0, 1, 1, 3),
    op("AND", 0x16, 0, 2, 1, 3),
    op("OR", 0x17, 0, 2, 1, 3),
    op("XOR", 0x18, 0, 2, 1, 3),
    op("NOT", 0x19, 0, 1, 1, 3),
    op("BYTE", 0x1a, 0, 2, 1, 3),
    op("SHL", 0x1b, 0, 2, 1, 3),
    op("SHR", 0x1c, 0, 2, 1, 3),
    op("SAR", 0x1d, 0, 2, 1, 3),

    op("SHA3", 0x20, 0, 2, 1, 30),
    // Wide-integer modular extension. The three-operand forms carry packed slot indices.
    op("SETMODX", 0x21, 0, 2, 0, 1),
    op("ADDMODX", 0x22, 3, 0, 0, 1),
    op("SUBMODX", 0x23, 3, 0, 0, 1),
    op("MULMONTX", 0x24, 3, 0, 0, 1),
    op("TOMONTX", 0x25, 0, 0, 0, 1),

    op("ADDRESS", 0x30, 0, 0, 1, 2),
    op("BALANCE", 0x31, 0, 1, 1, 100),
    op("ORIGIN", 0x32, 0, 0, 1, 2),
    op("CALLER", 0x33, 0, 0, 1, 2),
    op("CALLVALUE", 0x34, 0, 0, 1, 2),
    op("CALLDATALOAD", 0x35, 0, 1, 1, 3),
    op("CALLDATASIZE", 0x36, 0, 0, 1, 2),
    op("CALLDATACOPY", 0x37, 0, 3, 0, 3),
    op("CODESIZE", 0x38, 0, 0, 1, 2),
    op("CODECOPY", 0x39, 0, 3, 0, 3),
    op("GASPRICE", 0x3a, 0, 0, 1, 2),
    op("EXTCODESIZE", 0x3b, 0, 1, 1, 100),
    op("EXTCODECOPY", 0x3c, 0, 4, 0, 100),
    op("RETURNDATASIZE", 0x3d, 0, 0, 1, 2),
    op("RETURNDATACOPY", 0x3e, 0, 3, 0, 3),

    op("BLOCKHASH", 0x40, 0, 1, 1, 20),
    op("COINBASE", 0x41, 0, 0, 1, 2),
    op("TIMESTAMP", 0x42, 0, 0, 1, 2),
    op("NUMBER", 0x43, 0, 0, 1, 2),
    op("DIFFICULTY", 0x44, 0, 0, 1, 2),
    op("GASLIMIT", 0x45, 0, 0, 1, 2),

    op("POP", 0x50, 0, 1, 0, 2),
    op("MLOAD", 0x51, 0, 1, 1, 3),
    op("MSTORE", 0x52, 0, 2, 0, 3),
    op("MSTORE8", 0x53, 0, 2, 0, 3),
    op("SLOAD", 0x54, 0, 1, 1, 100),
    op("SSTORE", 0x55, 0, 2, 0, 100),
    op("JUMP", 0x56, 0, 1, 0, 8),
    op("JUMPI", 0x57, 0, 2, 0, 10),
    op("PC", 0x58, 0, 0, 1, 2),
    op("MSIZE", 0x59, 0, 0, 1, 2),
    op("GAS", 0x5a, 0, 0, 1, 2),
    op("JUMPDEST", 0x5b, 0, 0, 0, 1),

    op("PUSH0", 0x5f, 0, 0, 1, 2),
    op("PUSH1", 0x60, 1, 0, 1, 3),
    op("PUSH2", 0x61, 2, 0, 1, 3),
    op("PUSH3", 0x62, 3, 0, 1, 3),
    op("PUSH4", 0x63, 4, 0, 1, 3),
    op("PUSH5", 0x64, 5, 0, 1, 3),
    op("PUSH6", 0x65, 6, 0, 1, 3),
    op("PUSH7", 0x66, 7, 0, 1, 3),
    op("PUSH8", 0x67, 8, 0, 1, 3),
    op("PUSH9", 0x68, 9, 0, 1, 3),
    op("PUSH10", 0x69, 10, 0, 1, 3),
    op("PUSH11", 0x6a, 11, 0, 1, 3),
    op("PUSH12", 0x6b, 12, 0, 1, 3),
    op("PUSH13", 0x6c, 13, 0, 1, 3),
    op("PUSH14", 0x6d, 14, 0, 1, 3),
    op("PUSH15", 0x6e, 15, 0, 1, 3),
    op("PUSH16", 0x6f, 16, 0, 1, 3),
    op("PUSH17", 0x70, 17, 0, 1, 3),
    op("PUSH18", 0x71, 18, 0, 1, 3),
    op("PUSH19", 0x72, 19, 0, 1, 3),
    op("PUSH20", 0x73, 20, 0, 1, 3),
    op("PUSH21", 0x74, 21, 0, 1, 3),
    op("PUSH22", 0x75, 22, 0, 1, 3),
    op("PUSH23", 0x76, 23, 0, 1, 3),
    op("PUSH24", 0x77, 24, 0, 1, 3),
    op("PUSH25", 0x78, 25, 0, 1, 3),
    op("PUSH26", 0x79, 26, 0, 1, 3),
    op("PUSH27", 0x7a, 27, 0, 1, 3),
    op("PUSH28", 0x7b, 28, 0, 1, 3),
    op("PUSH29", 0x7c, 29, 0, 1, 3),
    op("PUSH30", 0x7d, 30, 0, 1, 3),
    op("PUSH31", 0x7e, 31, 0, 1, 3),
    op("PUSH32", 0x7f, 32, 0, 1, 3),

    op("DUP1", 0x80, 0, 1, 2, 3),
    op("DUP2", 0x81, 0, 2, 3, 3),
    op("DUP3", 0x82, 0, 3, 4, 3),
    op("DUP4", 0x83, 0, 4, 5, 3),
    op("DUP5", 0x84, 0, 5, 6, 3),
    op("DUP6", 0x85, 0, 6, 7, 3),
    op("DUP7", 0x86, 0, 7, 8, 3),
    op("DUP8", 0x87, 0, 8, 9, 3),
    op("DUP9", 0x88, 0, 9, 10, 3),
    op("DUP10", 0x89, 0, 10, 11, 3),
    op("DUP11", 0x8a, 0, 11, 12, 3),
    op("DUP12", 0x8b, 0, 12, 13, 3),
    op("DUP13", 0x8c, 0, 13, 14, 3),
    op("DUP14", 0x8d, 0, 14, 15, 3),
    op("DUP15", 0x8e, 0, 15, 16, 3),
    op("DUP16", 0x8f, 0, 16, 17, 3),

    op("SWAP1", 0x90, 0, 2, 2, 3),
    op("SWAP2", 0x91, 0, 3, 3, 3),
    op("SWAP3", 0x92, 0, 4, 4, 3),
    op("SWAP4", 0x93, 0, 5, 5, 3),
    op("SWAP5", 0x94, 0, 6, 6, 3),
    op("SWAP6", 0x95, 0, 7, 7, 3),
    op("SWAP7", 0x96, 0, 8, 8, 3),
    op("SWAP8", 0x97, 0, 9, 9, 3),
    op("SWAP9", 0x98, 0, 10, 10, 3),
    op("SWAP10", 0x99, 0, 11, 11, 3),
    op("SWAP11", 0x9a, 0, 12, 12, 3),
    op("SWAP12", 0x9b, 0, 13, 13, 3),
    op("SWAP13", 0x9c, 0, 14, 14, 3),
    op("SWAP14", 0x9d, 0, 15, 15, 3),
    op("SWAP15", 0x9e, 0, 16, 16, 3),
    op("SWAP16", 0x9f, 0, 17, 17, 3),

    op("LOG0", 0xa0, 0, 2, 0, 375),
    op("LOG1", 0xa1, 0, 3, 0, 750),
    op("LOG2", 0xa2, 0, 4, 0, 1125),
    op("LOG3", 0xa3, 0, 5, 0, 1500),
    op("LOG4", 0xa4, 0, 6, 0, 1875),

    op("CREATE", 0xf0, 0, 3, 1, 32000),
    op("CALL", 0xf1, 0, 7, 1, 100),
    op("CALLCODE", 0xf2, 0, 7, 1, 100),
    op("RETURN", 0xf3, 0, 2, 0, 0),
    op("DELEGATECALL", 0xf4, 0, 6, 1, 100),
    op("STATICCALL", 0xfa, 0, 6, 1, 100),
    op("REVERT", 0xfd, 0, 2, 0, 0),
    op("INVALID", 0xfe, 0, 0, 0, 0),
    op("SELFDESTRUCT", 0xff, 0, 1, 0, 5000),
];
