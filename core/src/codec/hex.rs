//! Lowercase hex text form of the bytecode.

use crate::error::{AsmError, AsmResult};
use crate::word::{HEX_DIGITS, nibble};

use super::{Instruction, decode, encode};

pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Parse hex text with no separators and an even digit count.
pub fn from_hex(text: &str) -> AsmResult<Vec<u8>> {
    let raw = text.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(AsmError::InvalidHex(format!("odd number of digits ({})", raw.len())));
    }
    let mut out = Vec::with_capacity(raw.len() / 2);
    for (idx, pair) in raw.chunks_exact(2).enumerate() {
        match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
            _ => {
                return Err(AsmError::InvalidHex(format!(
                    "invalid digit pair {:?} at byte {}",
                    String::from_utf8_lossy(pair),
                    idx
                )));
            }
        }
    }
    Ok(out)
}

pub fn encode_hex(instructions: &[Instruction]) -> AsmResult<String> {
    Ok(to_hex(&encode(instructions)?))
}

pub fn decode_hex(text: &str) -> AsmResult<Vec<Instruction>> {
    decode(&from_hex(text)?)
}
