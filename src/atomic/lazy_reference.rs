//! `AtomicLazyReference`: a set-once slot for an `Arc<T>`.

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
use std::sync::Arc;

use super::Atomic;
use crate::macros::trace_event;
use crate::ordering::{LoadOrdering, UpdateOrdering};

/// A slot that starts empty and is set at most once to an `Arc<T>`.
///
/// Racing initializers agree on a single winner; losers get the winner back
/// and their own value is dropped. Once set, the reference is never replaced,
/// so readers can take strong counts without any reclamation scheme.
///
/// # Example
///
/// ```rust
/// use halo_atomic::AtomicLazyReference;
/// use std::sync::Arc;
///
/// let slot = AtomicLazyReference::new();
/// assert!(slot.load().is_none());
/// let first = slot.store_if_none(Arc::new("first"));
/// let second = slot.store_if_none(Arc::new("second"));
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct AtomicLazyReference<T> {
    slot: Atomic<*mut T>,
    _owns: PhantomData<Arc<T>>,
}

impl<T> AtomicLazyReference<T> {
    /// Creates an empty slot.
    #[inline]
    pub fn new() -> Self {
        Self {
            slot: Atomic::new(ptr::null_mut()),
            _owns: PhantomData,
        }
    }

    /// Returns the stored reference, if set.
    #[inline]
    pub fn load(&self) -> Option<Arc<T>> {
        let raw = self.slot.load(LoadOrdering::Acquiring);
        if raw.is_null() {
            None
        } else {
            // SAFETY: a non-null slot holds a strong count that is only
            // released by `drop`, which cannot overlap `&self`.
            Some(unsafe { clone_raw(raw) })
        }
    }

    /// Installs `value` if the slot is empty.
    ///
    /// Returns whichever reference ended up in the slot: `value` itself, or
    /// the reference another thread installed first.
    pub fn store_if_none(&self, value: Arc<T>) -> Arc<T> {
        let desired = Arc::into_raw(value).cast_mut();
        match self.slot.compare_exchange(
            ptr::null_mut(),
            desired,
            UpdateOrdering::AcquiringAndReleasing,
            LoadOrdering::Acquiring,
        ) {
            // SAFETY: the slot now owns the count `desired` carried; hand out
            // a fresh one.
            Ok(_) => unsafe { clone_raw(desired) },
            Err(winner) => {
                trace_event!("lazy reference already initialized; dropping candidate");
                // SAFETY: `desired` was not installed, so its count is still
                // ours to release; `winner` is owned by the slot.
                unsafe {
                    drop(Arc::from_raw(desired.cast_const()));
                    clone_raw(winner)
                }
            }
        }
    }

    /// Returns the stored reference, initializing it with `init` if empty.
    ///
    /// `init` may run on several threads at once; only one result is kept.
    pub fn get_or_init(&self, init: impl FnOnce() -> Arc<T>) -> Arc<T> {
        match self.load() {
            Some(value) => value,
            None => self.store_if_none(init()),
        }
    }
}

/// Takes a new strong count on the `Arc` behind `raw`.
///
/// # Safety
/// `raw` must come from `Arc::into_raw` and its count must still be held.
#[inline]
unsafe fn clone_raw<T>(raw: *mut T) -> Arc<T> {
    let raw = raw.cast_const();
    unsafe {
        Arc::increment_strong_count(raw);
        Arc::from_raw(raw)
    }
}

impl<T> Drop for AtomicLazyReference<T> {
    fn drop(&mut self) {
        let raw = self.slot.load(LoadOrdering::Relaxed);
        if !raw.is_null() {
            // SAFETY: exclusive access; this releases the slot's count.
            drop(unsafe { Arc::from_raw(raw.cast_const()) });
        }
    }
}

impl<T> Default for AtomicLazyReference<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AtomicLazyReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLazyReference")
            .field(&self.load())
            .finish()
    }
}

// SAFETY: same requirements as sharing or sending the `Arc<T>` it holds.
unsafe impl<T: Send + Sync> Send for AtomicLazyReference<T> {}
unsafe impl<T: Send + Sync> Sync for AtomicLazyReference<T> {}
