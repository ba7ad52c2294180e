//! Two machine words updated as one.

use serde::{Deserialize, Serialize};

#[cfg(any(not(loom), target_pointer_width = "32"))]
use super::AtomicRepresentable;

/// A pair of `usize`s stored in a single double-width atomic.
///
/// The usual use is a pointer or index alongside a version counter, so that a
/// compare-exchange on the pair detects ABA reuse of the first word.
///
/// On 64-bit targets the representation is `u128` and lock-freedom depends on
/// a 16-byte CAS instruction; see [`Atomic::is_lock_free`](crate::Atomic::is_lock_free).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    /// The low word.
    pub first: usize,
    /// The high word.
    pub second: usize,
}

impl WordPair {
    /// Creates a pair.
    #[inline]
    pub const fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }
}

#[cfg(all(target_pointer_width = "64", not(loom)))]
type DoubleWord = u128;

#[cfg(target_pointer_width = "32")]
type DoubleWord = u64;

#[cfg(any(not(loom), target_pointer_width = "32"))]
impl AtomicRepresentable for WordPair {
    type AtomicRepresentation = DoubleWord;

    #[inline(always)]
    fn encode(value: Self) -> DoubleWord {
        (value.first as DoubleWord) | ((value.second as DoubleWord) << usize::BITS)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn decode(representation: DoubleWord) -> Self {
        Self {
            first: representation as usize,
            second: (representation >> usize::BITS) as usize,
        }
    }
}
