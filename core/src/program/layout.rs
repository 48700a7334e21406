//! Self-referential immediate widths.
//!
//! A jump or return-address literal that sits in front of its own target
//! shifts that target by its own encoded width, and the width depends on the
//! value. [`resolve_self_width`] settles both in a bounded fixed point.

use tracing::debug;

use crate::word::Word;

const TRACE_TARGET: &str = "stackasm::layout";

/// A literal whose width is already accounted for in its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedImmediate {
    pub value: u64,
    /// Immediate bytes of the push carrying `value`.
    pub width: usize,
}

impl ResolvedImmediate {
    pub fn word(&self) -> Word {
        Word::from(self.value)
    }
}

#[inline]
fn byte_len(value: u64) -> usize {
    Word::from(value).byte_len()
}

/// Solve `value = fixed + width` with `width = byte_len(value)`.
///
/// `fixed` is the distance to the target without the literal's own
/// immediate bytes. The first guess is `byte_len(fixed)`. If the sum no
/// longer fits, the width grows by one byte, which moves the target by
/// exactly one more and cannot reach the next byte boundary, so there is
/// at most one retry.
pub fn resolve_self_width(fixed: u64) -> ResolvedImmediate {
    let guess = byte_len(fixed);
    let value = fixed + guess as u64;
    if byte_len(value) <= guess {
        return ResolvedImmediate { value, width: guess };
    }

    let width = guess + 1;
    let value = fixed + width as u64;
    debug_assert_eq!(byte_len(value), width, "width grew twice for {}", fixed);
    debug!(
        target: TRACE_TARGET,
        fixed,
        value,
        width,
        "layout.width_grew"
    );
    ResolvedImmediate { value, width }
}

/// Encoded size of the push that carries `value`.
#[inline]
pub(crate) fn push_len(value: &Word) -> u64 {
    1 + value.byte_len() as u64
}
