//! Instruction codec.
//!
//! The binary form is the machine's native bytecode: one opcode byte followed
//! by exactly `immediate_width` big-endian immediate bytes, zero-padded on the
//! left. There is no header, length prefix or trailer.

mod hex;
mod listing;

pub use hex::{decode_hex, encode_hex, from_hex, to_hex};
pub use listing::listing;

use tracing::trace;

use crate::error::{AsmError, AsmResult};
use crate::isa::{self, OpcodeDescriptor};
use crate::word::Word;

const TRACE_TARGET: &str = "stackasm::codec";

/// One resolved instruction: an opcode plus its immediate value.
///
/// The immediate is not checked against the opcode width until encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    op: &'static OpcodeDescriptor,
    immediate: Word,
}

impl Instruction {
    pub fn new(op: &'static OpcodeDescriptor) -> Self {
        Self {
            op,
            immediate: Word::zero(),
        }
    }

    pub fn with_immediate(op: &'static OpcodeDescriptor, immediate: Word) -> Self {
        Self { op, immediate }
    }

    pub fn by_name(name: &str) -> AsmResult<Self> {
        Ok(Self::new(isa::lookup_by_name(name)?))
    }

    #[inline]
    pub fn opcode(&self) -> &'static OpcodeDescriptor {
        self.op
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.op.name
    }

    #[inline]
    pub fn immediate(&self) -> &Word {
        &self.immediate
    }

    /// Encoded size, which depends only on the opcode.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.op.encoded_len()
    }
}

/// Append the encoding of `instr` to `out`.
pub fn encode_into(instr: &Instruction, out: &mut Vec<u8>) -> AsmResult<()> {
    let width = instr.op.immediate_width;
    let len = instr.immediate.byte_len();
    if len > width {
        return Err(AsmError::ImmediateTooLarge {
            opcode: instr.op.name,
            width,
            len,
        });
    }
    write_u8(out, instr.op.code);
    out.resize(out.len() + (width - len), 0);
    out.extend_from_slice(instr.immediate.as_bytes());
    Ok(())
}

pub fn encode(instructions: &[Instruction]) -> AsmResult<Vec<u8>> {
    let mut out = Vec::with_capacity(instructions.iter().map(Instruction::encoded_len).sum());
    for instr in instructions {
        encode_into(instr, &mut out)?;
    }
    Ok(out)
}

pub fn decode(bytes: &[u8]) -> AsmResult<Vec<Instruction>> {
    let mut cursor = 0usize;
    let mut out = Vec::new();
    while cursor < bytes.len() {
        let code = read_u8(bytes, &mut cursor)?;
        let op = isa::lookup_by_code(code)?;
        let immediate = read_bytes(bytes, &mut cursor, op.immediate_width)?;
        out.push(Instruction {
            op,
            immediate: Word::from_be_bytes(immediate),
        });
    }
    trace!(
        target: TRACE_TARGET,
        bytes = bytes.len(),
        instructions = out.len(),
        "codec.decode"
    );
    Ok(out)
}

#[inline]
fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

fn read_u8(bytes: &[u8], cursor: &mut usize) -> AsmResult<u8> {
    let value = *bytes.get(*cursor).ok_or(AsmError::TruncatedInput {
        offset: *cursor,
        needed: 1,
        available: 0,
    })?;
    *cursor += 1;
    Ok(value)
}

fn read_bytes<'a>(bytes: &'a [u8], cursor: &mut usize, len: usize) -> AsmResult<&'a [u8]> {
    let available = bytes.len() - *cursor;
    if available < len {
        return Err(AsmError::TruncatedInput {
            offset: *cursor,
            needed: len,
            available,
        });
    }
    let slice = &bytes[*cursor..*cursor + len];
    *cursor += len;
    Ok(slice)
}
