use tracing::debug;

use crate::codec::Instruction;
use crate::error::{AsmError, AsmResult};
use crate::isa::{self, OpcodeDescriptor};
use crate::memory::{Operand, RegisterFile, Values, Variable};
use crate::word::Word;

use super::TRACE_TARGET;
use super::layout::{self, push_len};

/// A named run of instructions placed at one offset of the final program.
///
/// Emission methods take their operands as options. Supplied operands are
/// pushed right to left before the opcode. Omitted ones are expected on the
/// stack already, so they may only trail the supplied ones.
#[derive(Debug, Clone)]
pub struct Segment {
    name: String,
    code: Vec<Instruction>,
    offset: Option<u64>,
    registers: RegisterFile,
}

macro_rules! stack_ops {
    (@method 1 $method:ident $name:literal) => {
        pub fn $method(&mut self, x: Option<Word>) -> AsmResult<()> {
            self.push_operands(&[x])?;
            self.op($name)
        }
    };
    (@method 2 $method:ident $name:literal) => {
        pub fn $method(&mut self, x: Option<Word>, y: Option<Word>) -> AsmResult<()> {
            self.push_operands(&[x, y])?;
            self.op($name)
        }
    };
    (@method 3 $method:ident $name:literal) => {
        pub fn $method(&mut self, x: Option<Word>, y: Option<Word>, n: Option<Word>) -> AsmResult<()> {
            self.push_operands(&[x, y, n])?;
            self.op($name)
        }
    };
    ($arity:tt: $($method:ident => $name:literal),* $(,)?) => {
        impl Segment {
            $(stack_ops!(@method $arity $method $name);)*
        }
    };
}

stack_ops!(1: iszero => "ISZERO", not => "NOT");

stack_ops!(2:
    add => "ADD",
    mul => "MUL",
    sub => "SUB",
    div => "DIV",
    sdiv => "SDIV",
    mod_ => "MOD",
    smod => "SMOD",
    exp => "EXP",
    signextend => "SIGNEXTEND",
    lt => "LT",
    gt => "GT",
    slt => "SLT",
    sgt => "SGT",
    eq => "EQ",
    and => "AND",
    or => "OR",
    xor => "XOR",
    byte => "BYTE",
    shl => "SHL",
    shr => "SHR",
    sar => "SAR",
);

stack_ops!(3: addmod => "ADDMOD", mulmod => "MULMOD");

impl Segment {
    pub(crate) fn new(name: &str, registers: RegisterFile) -> Self {
        Self {
            name: name.to_string(),
            code: Vec::new(),
            offset: None,
            registers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.code.iter().map(Instruction::encoded_len).sum()
    }

    /// Net stack change of the segment run straight through.
    pub fn stack_effect(&self) -> i64 {
        self.code.iter().map(|i| i.opcode().stack_delta()).sum()
    }

    pub fn cost(&self) -> u64 {
        self.code.iter().map(|i| u64::from(i.opcode().cost)).sum()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Fix the absolute byte offset of the segment.
    pub fn place_at(&mut self, offset: u64) {
        self.offset = Some(offset);
    }

    pub fn registers(&self) -> RegisterFile {
        self.registers
    }

    fn emit(&mut self, op: &'static OpcodeDescriptor) {
        self.code.push(Instruction::new(op));
    }

    /// Append an opcode by mnemonic with a zero immediate. The mnemonic is
    /// case-insensitive.
    pub fn op(&mut self, name: &str) -> AsmResult<()> {
        let op = isa::lookup_by_name(&name.to_ascii_uppercase())?;
        self.emit(op);
        Ok(())
    }

    /// Append an already built instruction.
    pub fn append(&mut self, instr: Instruction) {
        self.code.push(instr);
    }

    /// Push the supplied operands, rightmost first.
    pub fn push_operands(&mut self, operands: &[Option<Word>]) -> AsmResult<()> {
        let mut supplied = false;
        for (position, operand) in operands.iter().enumerate().rev() {
            match operand {
                Some(value) => {
                    supplied = true;
                    self.push(value.clone())?;
                }
                None if supplied => return Err(AsmError::InvalidOperandOrdering { position }),
                None => {}
            }
        }
        Ok(())
    }

    /// Push with the narrowest form: `PUSH0` for zero, else `PUSHn` with
    /// `n` the value's byte length.
    pub fn push(&mut self, value: impl Into<Word>) -> AsmResult<()> {
        let value = value.into();
        let op = isa::push_for_width(value.byte_len())?;
        self.code.push(Instruction::with_immediate(op, value));
        Ok(())
    }

    pub fn pop(&mut self) -> AsmResult<()> {
        self.op("POP")
    }

    pub fn dup(&mut self, n: usize) -> AsmResult<()> {
        self.stack_indexed("DUP", n)
    }

    pub fn swap(&mut self, n: usize) -> AsmResult<()> {
        self.stack_indexed("SWAP", n)
    }

    fn stack_indexed(&mut self, family: &'static str, n: usize) -> AsmResult<()> {
        if !(1..=16).contains(&n) {
            return Err(AsmError::StackIndexOutOfRange { op: family, index: n });
        }
        self.op(&format!("{}{}", family, n))
    }

    pub fn stop(&mut self) -> AsmResult<()> {
        self.op("STOP")
    }

    pub fn jumpdest(&mut self) -> AsmResult<()> {
        self.op("JUMPDEST")
    }

    /// Load a word. Variables and arrays load from their (first) address.
    pub fn mload(&mut self, orig: Option<Operand>) -> AsmResult<()> {
        match orig {
            Some(Operand::Scalar(var)) => self.push(var.addr())?,
            Some(Operand::Array(arr)) => self.push(arr.addr())?,
            Some(Operand::Value(addr)) => self.push(addr)?,
            None => {}
        }
        self.op("MLOAD")
    }

    /// Store a word, or every element of an array when `dest` is one.
    ///
    /// An array destination takes a value tree of exactly its shape and
    /// emits one store per element in row-major order.
    pub fn mstore(&mut self, dest: Option<Operand>, value: Option<Values>) -> AsmResult<()> {
        match dest {
            Some(Operand::Array(arr)) => {
                let value = value.ok_or_else(|| AsmError::ShapeMismatch {
                    name: arr.name().to_string(),
                    expected: arr.shape().to_vec(),
                })?;
                for (elem, word) in arr.zip(&value)? {
                    self.push(word)?;
                    self.push(elem.addr())?;
                    self.op("MSTORE")?;
                }
                Ok(())
            }
            Some(Operand::Scalar(var)) => {
                let value = scalar_value(var.name(), value)?;
                self.push_operands(&[value])?;
                self.push(var.addr())?;
                self.op("MSTORE")
            }
            Some(Operand::Value(addr)) => {
                let value = scalar_value(&addr.to_string(), value)?;
                self.push_operands(&[Some(addr), value])?;
                self.op("MSTORE")
            }
            None => {
                let value = scalar_value("stack", value)?;
                self.push_operands(&[None, value])?;
                self.op("MSTORE")
            }
        }
    }

    /// Copy call data into memory. A variable or array destination supplies
    /// its own address and, unless `size` is given, its footprint as size;
    /// the source offset must then be supplied.
    pub fn calldatacopy(&mut self, dest: Option<Operand>, offset: Option<Word>, size: Option<Word>) -> AsmResult<()> {
        match dest {
            Some(Operand::Scalar(var)) => self.push_region(var.addr(), var.footprint(), offset, size)?,
            Some(Operand::Array(arr)) => self.push_region(arr.addr(), arr.footprint(), offset, size)?,
            Some(Operand::Value(addr)) => self.push_operands(&[Some(addr), offset, size])?,
            None => self.push_operands(&[None, offset, size])?,
        }
        self.op("CALLDATACOPY")
    }

    fn push_region(&mut self, addr: u64, footprint: u64, offset: Option<Word>, size: Option<Word>) -> AsmResult<()> {
        let offset = offset.ok_or(AsmError::InvalidOperandOrdering { position: 1 })?;
        self.push(size.unwrap_or_else(|| Word::from(footprint)))?;
        self.push(offset)?;
        self.push(addr)
    }

    /// Halt returning a memory region. Variables return their footprint.
    pub fn return_(&mut self, orig: Option<Operand>, size: Option<Word>) -> AsmResult<()> {
        match orig {
            Some(Operand::Scalar(var)) => {
                self.push(size.unwrap_or_else(|| Word::from(var.footprint())))?;
                self.push(var.addr())?;
            }
            Some(Operand::Array(arr)) => {
                self.push(size.unwrap_or_else(|| Word::from(arr.footprint())))?;
                self.push(arr.addr())?;
            }
            Some(Operand::Value(addr)) => self.push_operands(&[Some(addr), size])?,
            None => self.push_operands(&[None, size])?,
        }
        self.op("RETURN")
    }

    /// Push a jump target. Variables hold the target, so they are loaded
    /// first and the jump becomes indirect.
    fn push_target(&mut self, dest: Operand) -> AsmResult<()> {
        match dest {
            Operand::Value(target) => self.push(target),
            var => self.mload(Some(var)),
        }
    }

    pub fn jump(&mut self, dest: Option<Operand>) -> AsmResult<()> {
        if let Some(dest) = dest {
            self.push_target(dest)?;
        }
        self.op("JUMP")
    }

    /// Jump to `dest` when `cond` is non-zero.
    pub fn jumpi(&mut self, dest: Option<Operand>, cond: Option<Word>) -> AsmResult<()> {
        match dest {
            Some(dest) => {
                self.push_operands(&[cond])?;
                self.push_target(dest)?;
            }
            None if cond.is_some() => return Err(AsmError::InvalidOperandOrdering { position: 0 }),
            None => {}
        }
        self.op("JUMPI")
    }

    /// Emit a call to `target` that returns right behind itself.
    ///
    /// The return address is stored at `return_slot` and a `JUMPDEST` is
    /// emitted where the callee lands when it jumps back through that slot.
    /// One slot serves every call, so calls must not nest. The segment must
    /// be placed first because the return address is absolute.
    pub fn call(&mut self, return_slot: &Variable, target: impl Into<Operand>) -> AsmResult<u64> {
        let target = target.into();
        let offset = self
            .offset
            .ok_or_else(|| AsmError::UnresolvedOffset(self.name.clone()))?;

        // ret literal opcode, slot push, MSTORE, then the jump sequence
        let slot_addr = return_slot.addr_word();
        let fixed = offset + self.byte_len() as u64 + 1 + push_len(&slot_addr) + 1 + jump_len(&target);
        let ret = layout::resolve_self_width(fixed);
        debug!(
            target: TRACE_TARGET,
            segment = %self.name,
            fixed,
            ret = ret.value,
            width = ret.width,
            "segment.call"
        );

        self.push(ret.word())?;
        self.push(slot_addr)?;
        self.op("MSTORE")?;
        self.jump(Some(target))?;
        debug_assert_eq!(offset + self.byte_len() as u64, ret.value);
        self.jumpdest()?;
        Ok(ret.value)
    }

    /// Callee side of [`Segment::call`]: jump back through `return_slot`.
    pub fn return_via(&mut self, return_slot: &Variable) -> AsmResult<()> {
        self.jump(Some(Operand::Scalar(return_slot.clone())))
    }

    /// Bind the modulus register: pushes the register width in limbs and the
    /// modulus address.
    pub fn setmodx(&mut self, modulus: &Variable) -> AsmResult<()> {
        self.push(self.registers.limbs)?;
        self.push(modulus.addr())?;
        self.op("SETMODX")
    }

    pub fn addmodx(&mut self, dest: &Variable, x: &Variable, y: &Variable) -> AsmResult<()> {
        self.modx("ADDMODX", dest, x, y)
    }

    pub fn submodx(&mut self, dest: &Variable, x: &Variable, y: &Variable) -> AsmResult<()> {
        self.modx("SUBMODX", dest, x, y)
    }

    pub fn mulmontx(&mut self, dest: &Variable, x: &Variable, y: &Variable) -> AsmResult<()> {
        self.modx("MULMONTX", dest, x, y)
    }

    fn modx(&mut self, name: &str, dest: &Variable, x: &Variable, y: &Variable) -> AsmResult<()> {
        let slots = [
            self.registers.slot(dest)?,
            self.registers.slot(x)?,
            self.registers.slot(y)?,
        ];
        let op = isa::lookup_by_name(name)?;
        self.code.push(Instruction::with_immediate(op, isa::pack_slots(&slots)));
        Ok(())
    }
}

/// Encoded size of the sequence [`Segment::jump`] emits for `target`.
fn jump_len(target: &Operand) -> u64 {
    let push = match target {
        Operand::Value(value) => push_len(value),
        // push address, MLOAD
        Operand::Scalar(var) => push_len(&var.addr_word()) + 1,
        Operand::Array(arr) => push_len(&arr.addr_word()) + 1,
    };
    push + 1
}

fn scalar_value(name: &str, value: Option<Values>) -> AsmResult<Option<Word>> {
    match value {
        None => Ok(None),
        Some(Values::Word(word)) => Ok(Some(word)),
        Some(Values::List(_)) => Err(AsmError::ShapeMismatch {
            name: name.to_string(),
            expected: Vec::new(),
        }),
    }
}
