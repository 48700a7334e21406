//! Wide unsigned integers as carried by push immediates.
//!
//! A [`Word`] keeps its value as the minimal big-endian byte string, so the
//! byte length needed to encode it is always `as_bytes().len()`. Zero is the
//! empty string.

use std::{fmt, str::FromStr};

use smallvec::SmallVec;

use crate::error::{AsmError, AsmResult};

/// Widest immediate the machine can push.
pub const MAX_WORD_BYTES: usize = 32;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Word(SmallVec<[u8; MAX_WORD_BYTES]>);

impl Word {
    pub fn zero() -> Self {
        Self(SmallVec::new())
    }

    /// Build from big-endian bytes, dropping leading zeros.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self(SmallVec::from_slice(&bytes[start..]))
    }

    /// Parse a hex literal. A `0x` prefix and an odd digit count are accepted.
    pub fn from_hex(text: &str) -> AsmResult<Self> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if digits.is_empty() {
            return Err(AsmError::InvalidHex(format!("empty literal {:?}", text)));
        }
        let raw = digits.as_bytes();
        let mut bytes: SmallVec<[u8; MAX_WORD_BYTES]> = SmallVec::with_capacity(raw.len().div_ceil(2));
        let (head, rest) = if raw.len() % 2 == 1 { raw.split_at(1) } else { raw.split_at(0) };
        if let Some(&c) = head.first() {
            bytes.push(nibble(c).ok_or_else(|| bad_digit(text, c))?);
        }
        for pair in rest.chunks_exact(2) {
            let hi = nibble(pair[0]).ok_or_else(|| bad_digit(text, pair[0]))?;
            let lo = nibble(pair[1]).ok_or_else(|| bad_digit(text, pair[1]))?;
            bytes.push((hi << 4) | lo);
        }
        Ok(Self::from_be_bytes(&bytes))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Minimal number of bytes needed to encode the value (0 for zero).
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_u64(&self) -> Option<u64> {
        if self.byte_len() > 8 {
            return None;
        }
        Some(self.0.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    /// Byte-swap the value after zero-padding it to `width` bytes.
    pub fn to_le(&self, width: usize) -> AsmResult<Word> {
        if self.byte_len() > width {
            return Err(AsmError::ValueTooLarge {
                len: self.byte_len(),
                max: width,
            });
        }
        let mut padded = vec![0u8; width - self.byte_len()];
        padded.extend_from_slice(&self.0);
        padded.reverse();
        Ok(Word::from_be_bytes(&padded))
    }

    /// Lowercase hex, two digits per byte, zero-padded to `width` bytes.
    pub fn to_hex_padded(&self, width: usize) -> String {
        let mut out = String::with_capacity(width.max(self.byte_len()) * 2);
        for _ in self.byte_len()..width {
            out.push_str("00");
        }
        for b in self.0.iter() {
            out.push(HEX_DIGITS[(b >> 4) as usize] as char);
            out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
        }
        out
    }
}

pub(crate) const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

#[inline]
pub(crate) fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn bad_digit(text: &str, c: u8) -> AsmError {
    AsmError::InvalidHex(format!("invalid digit {:?} in {:?}", c as char, text))
}

macro_rules! word_from_uint {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Word {
                fn from(value: $t) -> Self {
                    Word::from_be_bytes(&value.to_be_bytes())
                }
            }
        )*
    };
}

word_from_uint!(u8, u16, u32, u64, u128, usize);

impl FromStr for Word {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::from_hex(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_padded(1))
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{})", self)
    }
}
