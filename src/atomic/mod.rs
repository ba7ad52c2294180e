//! The atomic cell.
//!
//! `Atomic<V>` is `#[repr(transparent)]` over the hardware atomic of
//! `V::AtomicRepresentation`. The atomic instructions therefore target the
//! cell's own address: no box, no indirection, and the cell moves with its
//! owner like any other field.
//!
//! Ownership rules:
//! - the cell owns exactly one encoded `V` at every instant;
//! - `swap` and `into_inner` hand the owned value out, never a copy of it;
//! - `load` and compare-exchange duplicate the stored value, so they are only
//!   offered when `V: Copy`;
//! - `Drop` decodes the final value and drops it, exactly once.

mod fetch;
mod lazy_reference;
mod ops;

pub use lazy_reference::AtomicLazyReference;

use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ordering::LoadOrdering;
use crate::representable::{AtomicRepresentable, AtomicStorage};

/// The representation type of `V`.
pub(crate) type Repr<V> = <V as AtomicRepresentable>::AtomicRepresentation;

/// The hardware atomic holding a `Repr<V>`.
pub(crate) type Storage<V> = <Repr<V> as AtomicStorage>::Atomic;

/// A lock-free, single-owner atomic cell holding one `V`.
///
/// `Atomic` is neither `Clone` nor `Copy`. Share it by reference (or inside an
/// `Arc`); moving it moves the storage itself.
///
/// # Example
///
/// ```rust
/// use halo_atomic::{Atomic, LoadOrdering, UpdateOrdering};
///
/// let cell = Atomic::new(0u64);
/// assert_eq!(cell.swap(5, UpdateOrdering::SequentiallyConsistent), 0);
/// assert_eq!(cell.load(LoadOrdering::SequentiallyConsistent), 5);
/// ```
#[repr(transparent)]
pub struct Atomic<V: AtomicRepresentable> {
    storage: Storage<V>,
    _value: PhantomData<V>,
}

impl<V: AtomicRepresentable> Atomic<V> {
    /// Creates a cell holding `value`.
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            storage: Repr::<V>::atomic_new(V::encode(value)),
            _value: PhantomData,
        }
    }

    /// Consumes the cell and returns the value it held.
    ///
    /// The value is handed out instead of dropped.
    #[inline]
    pub fn into_inner(self) -> V {
        let mut this = ManuallyDrop::new(self);
        let repr = Repr::<V>::atomic_get(&mut this.storage);
        // SAFETY: `this` is never used again and its destructor is suppressed,
        // so the storage is released here and `repr` is decoded exactly once.
        unsafe {
            ptr::drop_in_place(&mut this.storage);
            V::decode(repr)
        }
    }

    /// Lends the value out for mutation through exclusive access.
    ///
    /// No atomic instruction is involved: `&mut self` already rules out every
    /// other observer. The value is re-encoded when `f` returns or unwinds.
    pub fn with_mut<R>(&mut self, f: impl FnOnce(&mut V) -> R) -> R {
        struct Reencode<'a, V: AtomicRepresentable> {
            storage: &'a mut Storage<V>,
            value: ManuallyDrop<V>,
        }

        impl<V: AtomicRepresentable> Drop for Reencode<'_, V> {
            fn drop(&mut self) {
                // SAFETY: `value` is taken once, here, and never touched again.
                let value = unsafe { ManuallyDrop::take(&mut self.value) };
                Repr::<V>::atomic_set(self.storage, V::encode(value));
            }
        }

        let repr = Repr::<V>::atomic_get(&mut self.storage);
        // SAFETY: the guard re-encodes the value over `repr` before anything
        // else can observe the storage, so ownership is never duplicated.
        let value = unsafe { V::decode(repr) };
        let mut guard = Reencode::<V> {
            storage: &mut self.storage,
            value: ManuallyDrop::new(value),
        };
        f(&mut *guard.value)
    }

    /// Returns `true` if every operation on this cell compiles to a lock-free
    /// instruction on the running machine.
    ///
    /// Always `true` up to pointer width. 16-byte representations depend on
    /// the CPU offering a double-width compare-exchange.
    #[inline]
    pub fn is_lock_free() -> bool {
        Repr::<V>::atomic_is_lock_free()
    }
}

impl<V: AtomicRepresentable> Drop for Atomic<V> {
    #[inline]
    fn drop(&mut self) {
        let repr = Repr::<V>::atomic_get(&mut self.storage);
        // SAFETY: the cell owns the value encoded in `repr`, and this is the
        // last access to the storage.
        drop(unsafe { V::decode(repr) });
    }
}

// SAFETY: the cell owns a `V`; sending the cell sends the value.
unsafe impl<V: AtomicRepresentable + Send> Send for Atomic<V> {}

// SAFETY: through `&Atomic<V>` a thread can only move whole values in and out
// with single atomic instructions, which is exactly the power of sending a `V`.
unsafe impl<V: AtomicRepresentable + Send> Sync for Atomic<V> {}

impl<V: AtomicRepresentable> From<V> for Atomic<V> {
    #[inline]
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

impl<V: AtomicRepresentable + Default> Default for Atomic<V> {
    #[inline]
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: AtomicRepresentable + Copy + fmt::Debug> fmt::Debug for Atomic<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Atomic")
            .field(&self.load(LoadOrdering::Relaxed))
            .finish()
    }
}

impl<V: AtomicRepresentable + Copy + Serialize> Serialize for Atomic<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.load(LoadOrdering::SequentiallyConsistent)
            .serialize(serializer)
    }
}

impl<'de, V: AtomicRepresentable + Deserialize<'de>> Deserialize<'de> for Atomic<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        V::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use crate::ordering::{StoreOrdering, UpdateOrdering};
    use std::sync::Arc;

    #[test]
    fn cell_is_exactly_as_wide_as_its_representation() {
        use core::mem::size_of;
        assert_eq!(size_of::<Atomic<u8>>(), 1);
        assert_eq!(size_of::<Atomic<u64>>(), 8);
        assert_eq!(size_of::<Atomic<f32>>(), 4);
        assert_eq!(size_of::<Atomic<Box<String>>>(), size_of::<*mut String>());
        assert_eq!(size_of::<Atomic<Option<Arc<u8>>>>(), size_of::<usize>());
    }

    #[test]
    fn into_inner_hands_out_instead_of_dropping() {
        let shared = Arc::new(());
        let cell = Atomic::new(Arc::clone(&shared));
        let back = cell.into_inner();
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(back);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn with_mut_reencodes_the_edited_value() {
        let mut cell = Atomic::new(Box::new(vec![1, 2]));
        let len = cell.with_mut(|v| {
            v.push(3);
            v.len()
        });
        assert_eq!(len, 3);
        assert_eq!(*cell.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn with_mut_restores_the_value_on_unwind() {
        let shared = Arc::new(7);
        let mut cell = Atomic::new(Arc::clone(&shared));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cell.with_mut(|_| panic!("boom"));
        }));
        assert!(result.is_err());
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(cell);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn debug_shows_the_current_value() {
        let cell = Atomic::new(3i32);
        cell.store(-9, StoreOrdering::Relaxed);
        assert_eq!(format!("{cell:?}"), "Atomic(-9)");
    }

    #[test]
    fn default_and_from_construct_like_new() {
        let cell: Atomic<u16> = Atomic::default();
        assert_eq!(cell.swap(1, UpdateOrdering::Relaxed), 0);
        let cell = Atomic::from('x');
        assert_eq!(cell.load(LoadOrdering::Relaxed), 'x');
    }
}
