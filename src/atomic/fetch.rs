//! Fetch-and-modify operations for integer and boolean cells.

use num_traits::{CheckedAdd, CheckedSub};

use super::Atomic;
use crate::ordering::UpdateOrdering;
use crate::representable::{AtomicInteger, AtomicIntegerStorage};

impl<V: AtomicInteger> Atomic<V> {
    /// Adds to the current value, wrapping on overflow. Returns the previous
    /// value.
    #[inline(always)]
    pub fn fetch_add(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_add(&self.storage, value, ordering.into())
    }

    /// Subtracts from the current value, wrapping on overflow. Returns the
    /// previous value.
    #[inline(always)]
    pub fn fetch_sub(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_sub(&self.storage, value, ordering.into())
    }

    /// Bitwise AND with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_and(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_and(&self.storage, value, ordering.into())
    }

    /// Bitwise OR with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_or(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_or(&self.storage, value, ordering.into())
    }

    /// Bitwise XOR with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_xor(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_xor(&self.storage, value, ordering.into())
    }

    /// Stores the maximum of the current value and `value`, returning the
    /// previous value.
    #[inline(always)]
    pub fn fetch_max(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_max(&self.storage, value, ordering.into())
    }

    /// Stores the minimum of the current value and `value`, returning the
    /// previous value.
    #[inline(always)]
    pub fn fetch_min(&self, value: V, ordering: UpdateOrdering) -> V {
        <V as AtomicIntegerStorage>::atomic_fetch_min(&self.storage, value, ordering.into())
    }

    /// Adds `value` unless that would overflow.
    ///
    /// Returns `Ok(previous)` if the sum was stored and `Err(current)` if it
    /// would have overflowed, leaving the cell unchanged.
    #[inline]
    pub fn checked_fetch_add(&self, value: V, ordering: UpdateOrdering) -> Result<V, V> {
        self.fetch_update(ordering, ordering.failure_ordering(), |current| {
            CheckedAdd::checked_add(&current, &value)
        })
    }

    /// Subtracts `value` unless that would overflow.
    ///
    /// Returns `Ok(previous)` if the difference was stored and `Err(current)`
    /// otherwise.
    #[inline]
    pub fn checked_fetch_sub(&self, value: V, ordering: UpdateOrdering) -> Result<V, V> {
        self.fetch_update(ordering, ordering.failure_ordering(), |current| {
            CheckedSub::checked_sub(&current, &value)
        })
    }
}

impl Atomic<bool> {
    /// Logical AND with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_and(&self, value: bool, ordering: UpdateOrdering) -> bool {
        self.storage.fetch_and(value, ordering.into())
    }

    /// Logical OR with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_or(&self, value: bool, ordering: UpdateOrdering) -> bool {
        self.storage.fetch_or(value, ordering.into())
    }

    /// Logical XOR with the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_xor(&self, value: bool, ordering: UpdateOrdering) -> bool {
        self.storage.fetch_xor(value, ordering.into())
    }

    /// Negates the current value, returning the previous value.
    #[inline(always)]
    pub fn fetch_not(&self, ordering: UpdateOrdering) -> bool {
        self.fetch_xor(true, ordering)
    }
}
