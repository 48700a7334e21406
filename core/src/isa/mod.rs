//! Instruction set table
//!
//! One static catalogue of [`OpcodeDescriptor`]s with constant-time lookup by
//! byte code and by mnemonic. The lookup tables are built once on first use
//! and never mutated afterwards.

mod table;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::codec::Instruction;
use crate::error::{AsmError, AsmResult};
use crate::word::{MAX_WORD_BYTES, Word};

/// Static metadata for one instruction kind.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct OpcodeDescriptor {
    pub name: &'static str,
    pub code: u8,
    /// Number of immediate bytes following the opcode byte.
    pub immediate_width: usize,
    pub stack_in: u8,
    pub stack_out: u8,
    pub cost: u32,
}

impl OpcodeDescriptor {
    #[inline]
    pub fn encoded_len(&self) -> usize {
        1 + self.immediate_width
    }

    #[inline]
    pub fn stack_delta(&self) -> i64 {
        i64::from(self.stack_out) - i64::from(self.stack_in)
    }

    /// Mnemonic with digits removed, so every push size shares one family.
    pub fn family(&self) -> String {
        self.name.chars().filter(|c| !c.is_ascii_digit()).collect()
    }
}

static BY_CODE: Lazy<[Option<&'static OpcodeDescriptor>; 256]> = Lazy::new(|| {
    let mut by_code = [None; 256];
    for desc in table::OPCODES.iter() {
        by_code[desc.code as usize] = Some(desc);
    }
    by_code
});

static BY_NAME: Lazy<FxHashMap<&'static str, &'static OpcodeDescriptor>> = Lazy::new(|| {
    let mut by_name = FxHashMap::with_capacity_and_hasher(table::OPCODES.len(), Default::default());
    for desc in table::OPCODES.iter() {
        by_name.insert(desc.name, desc);
    }
    by_name
});

pub fn table() -> &'static [OpcodeDescriptor] {
    &table::OPCODES
}

pub fn lookup_by_code(code: u8) -> AsmResult<&'static OpcodeDescriptor> {
    BY_CODE[code as usize].ok_or_else(|| AsmError::UnknownOpcode(format!("{:#04x}", code)))
}

/// Mnemonics are matched exactly, in upper case.
pub fn lookup_by_name(name: &str) -> AsmResult<&'static OpcodeDescriptor> {
    BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| AsmError::UnknownOpcode(name.to_string()))
}

/// Push form carrying exactly `width` immediate bytes (`PUSH0` for zero).
pub fn push_for_width(width: usize) -> AsmResult<&'static OpcodeDescriptor> {
    if width > MAX_WORD_BYTES {
        return Err(AsmError::ValueTooLarge {
            len: width,
            max: MAX_WORD_BYTES,
        });
    }
    // PUSH0 sits at 0x5f and PUSHn at 0x5f + n.
    lookup_by_code(0x5f + width as u8)
}

/// Occurrences per opcode family, used for diagnostics.
pub fn counts(instructions: &[Instruction]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for instr in instructions {
        *out.entry(instr.opcode().family()).or_insert(0) += 1;
    }
    out
}

/// Pack register-file slot indices into one wide-integer immediate.
///
/// Each slot is rendered as its own minimal hex string (at least one byte,
/// `00` for zero) and the renderings are concatenated digit-wise. A slot of
/// 256 or more therefore takes two bytes and pushes the packed argument past
/// the three-byte immediate of the modular opcodes, which surfaces as
/// `ImmediateTooLarge` when the instruction is encoded.
pub fn pack_slots(slots: &[u64]) -> Word {
    let mut bytes: Vec<u8> = Vec::with_capacity(slots.len());
    for slot in slots {
        let word = Word::from(*slot);
        if word.is_zero() {
            bytes.push(0);
        } else {
            bytes.extend_from_slice(word.as_bytes());
        }
    }
    Word::from_be_bytes(&bytes)
}
