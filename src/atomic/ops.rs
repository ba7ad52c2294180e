use core::mem;

use super::{Atomic, Repr};
use crate::macros::trace_event;
use crate::ordering::{LoadOrdering, StoreOrdering, UpdateOrdering};
use crate::representable::{AtomicRepresentable, AtomicStorage};
use crate::sync::Backoff;

impl<V: AtomicRepresentable> Atomic<V> {
    /// Replaces the stored value with `value`.
    ///
    /// # Leaking
    /// The previous value is overwritten without being decoded, so its
    /// destructor never runs. For `Box`, `Arc` and other owning types the
    /// previous value is leaked. Use [`swap`](Self::swap) to get it back.
    ///
    /// With the `tracing` feature, a store into a cell whose type has drop
    /// glue emits a trace event. It is decided by the type alone, so it also
    /// fires when the previous value owned nothing, e.g. a `None`.
    #[inline]
    pub fn store(&self, value: V, ordering: StoreOrdering) {
        if mem::needs_drop::<V>() {
            trace_event!(
                value_type = core::any::type_name::<V>(),
                "store overwrites a value with drop glue"
            );
        }
        Repr::<V>::atomic_store(&self.storage, V::encode(value), ordering.into());
    }

    /// Stores `value` and returns the previous value, whose ownership passes
    /// to the caller.
    #[inline]
    pub fn swap(&self, value: V, ordering: UpdateOrdering) -> V {
        let previous = Repr::<V>::atomic_swap(&self.storage, V::encode(value), ordering.into());
        // SAFETY: the swap removed `previous` from the cell, so we are now its
        // only owner.
        unsafe { V::decode(previous) }
    }
}

impl<V: AtomicRepresentable + Copy> Atomic<V> {
    /// Loads the current value.
    #[inline]
    pub fn load(&self, ordering: LoadOrdering) -> V {
        let repr = Repr::<V>::atomic_load(&self.storage, ordering.into());
        // SAFETY: `V: Copy`, so a second decoded copy owns nothing.
        unsafe { V::decode(repr) }
    }

    /// Stores `desired` if the current value is `expected`.
    ///
    /// Values are compared by representation. Returns `Ok(previous)` on
    /// success, where `previous` is bitwise equal to `expected`, and
    /// `Err(actual)` with the value that was observed otherwise.
    ///
    /// # Panics
    /// Panics if `failure` is stronger than `success`; see
    /// [`UpdateOrdering::failure_ordering`].
    #[inline]
    pub fn compare_exchange(
        &self,
        expected: V,
        desired: V,
        success: UpdateOrdering,
        failure: LoadOrdering,
    ) -> Result<V, V> {
        self.compare_exchange_impl(expected, desired, success, failure, false)
    }

    /// Like [`compare_exchange`](Self::compare_exchange), but may fail
    /// spuriously even when the current value is `expected`.
    ///
    /// On load-link/store-conditional architectures this avoids an inner
    /// retry loop; call it from a loop.
    ///
    /// # Panics
    /// Panics if `failure` is stronger than `success`.
    #[inline]
    pub fn compare_exchange_weak(
        &self,
        expected: V,
        desired: V,
        success: UpdateOrdering,
        failure: LoadOrdering,
    ) -> Result<V, V> {
        self.compare_exchange_impl(expected, desired, success, failure, true)
    }

    /// Performs a compare-exchange operation with automatic ordering selection.
    ///
    /// Uses `AcquiringAndReleasing` for success and `Acquiring` for failure,
    /// which is appropriate for most lock-free algorithms.
    #[inline(always)]
    pub fn compare_exchange_cas(&self, expected: V, desired: V) -> Result<V, V> {
        self.compare_exchange(
            expected,
            desired,
            UpdateOrdering::AcquiringAndReleasing,
            LoadOrdering::Acquiring,
        )
    }

    /// Performs a weak compare-exchange operation with automatic ordering
    /// selection. Weak operations may spuriously fail.
    #[inline(always)]
    pub fn compare_exchange_weak_cas(&self, expected: V, desired: V) -> Result<V, V> {
        self.compare_exchange_weak(
            expected,
            desired,
            UpdateOrdering::AcquiringAndReleasing,
            LoadOrdering::Acquiring,
        )
    }

    /// Atomically loads the current value and applies a function to it.
    ///
    /// `f` receives the current value and returns the replacement, or `None`
    /// to stop. It may run several times under contention. Returns
    /// `Ok(previous)` once a replacement is installed and `Err(current)` if
    /// `f` declined.
    ///
    /// # Panics
    /// Panics if `fetch_ordering` is stronger than `set_ordering`.
    pub fn fetch_update<F>(
        &self,
        set_ordering: UpdateOrdering,
        fetch_ordering: LoadOrdering,
        mut f: F,
    ) -> Result<V, V>
    where
        F: FnMut(V) -> Option<V>,
    {
        let backoff = Backoff::new();
        let mut current = self.load(fetch_ordering);
        while let Some(next) = f(current) {
            match self.compare_exchange_weak(current, next, set_ordering, fetch_ordering) {
                Ok(previous) => return Ok(previous),
                Err(actual) => {
                    current = actual;
                    backoff.spin();
                }
            }
        }
        Err(current)
    }

    #[inline(always)]
    fn compare_exchange_impl(
        &self,
        expected: V,
        desired: V,
        success: UpdateOrdering,
        failure: LoadOrdering,
        weak: bool,
    ) -> Result<V, V> {
        assert!(
            failure.is_valid_failure_for(success),
            "failure ordering {failure:?} is stronger than success ordering {success:?}"
        );
        let expected = V::encode(expected);
        let desired = V::encode(desired);
        let result = if weak {
            Repr::<V>::atomic_compare_exchange_weak(
                &self.storage,
                expected,
                desired,
                success.into(),
                failure.into(),
            )
        } else {
            Repr::<V>::atomic_compare_exchange(
                &self.storage,
                expected,
                desired,
                success.into(),
                failure.into(),
            )
        };
        // SAFETY: `V: Copy`; neither decoded copy owns anything.
        match result {
            Ok(previous) => Ok(unsafe { V::decode(previous) }),
            Err(actual) => Err(unsafe { V::decode(actual) }),
        }
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use crate::{Atomic, LoadOrdering, StoreOrdering, UpdateOrdering};
    use std::sync::Arc;

    #[test]
    fn store_overwrites_and_swap_returns_ownership() {
        let cell = Atomic::new(Box::new(1));
        let old = cell.swap(Box::new(2), UpdateOrdering::AcquiringAndReleasing);
        assert_eq!(*old, 1);
        assert_eq!(*cell.into_inner(), 2);
    }

    #[test]
    fn store_does_not_run_the_previous_destructor() {
        let shared = Arc::new(0u8);
        let cell = Atomic::new(Arc::clone(&shared));
        cell.store(Arc::new(1), StoreOrdering::Releasing);
        // The overwritten clone is leaked, so its count is never released.
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(cell);
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[test]
    #[should_panic(expected = "stronger than success")]
    fn compare_exchange_rejects_a_stronger_failure_ordering() {
        let cell = Atomic::new(0u32);
        let _ = cell.compare_exchange(
            0,
            1,
            UpdateOrdering::Releasing,
            LoadOrdering::Acquiring,
        );
    }

    #[test]
    fn float_compare_exchange_is_bitwise() {
        let cell = Atomic::new(-0.0f64);
        assert!(cell.compare_exchange_cas(0.0, 1.0).is_err());
        assert_eq!(cell.compare_exchange_cas(-0.0, 1.0), Ok(-0.0));
        assert_eq!(cell.load(LoadOrdering::Acquiring), 1.0);
    }

    #[test]
    fn fetch_update_reports_a_declined_update() {
        let cell = Atomic::new(10u8);
        assert_eq!(
            cell.fetch_update(
                UpdateOrdering::SequentiallyConsistent,
                LoadOrdering::SequentiallyConsistent,
                |v| v.checked_mul(2),
            ),
            Ok(10)
        );
        assert_eq!(
            cell.fetch_update(UpdateOrdering::Relaxed, LoadOrdering::Relaxed, |_| None),
            Err(20)
        );
    }

    #[cfg(feature = "tracing")]
    mod trace {
        use super::*;
        use core::fmt;
        use std::sync::Mutex;
        use tracing::field::{Field, Visit};
        use tracing::span::{Attributes, Id, Record};
        use tracing::{Event, Metadata, Subscriber};

        struct Collector(Arc<Mutex<Vec<String>>>);

        struct MessageVisitor<'a>(&'a mut Vec<String>);

        impl Visit for MessageVisitor<'_> {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                if field.name() == "message" {
                    self.0.push(format!("{value:?}"));
                }
            }
        }

        impl Subscriber for Collector {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }
            fn new_span(&self, _: &Attributes<'_>) -> Id {
                Id::from_u64(1)
            }
            fn record(&self, _: &Id, _: &Record<'_>) {}
            fn record_follows_from(&self, _: &Id, _: &Id) {}
            fn event(&self, event: &Event<'_>) {
                let mut messages = self.0.lock().unwrap();
                event.record(&mut MessageVisitor(&mut messages));
            }
            fn enter(&self, _: &Id) {}
            fn exit(&self, _: &Id) {}
        }

        #[test]
        fn store_event_depends_on_the_type_not_the_previous_value() {
            let messages = Arc::new(Mutex::new(Vec::new()));
            tracing::subscriber::with_default(Collector(Arc::clone(&messages)), || {
                let plain = Atomic::new(1u32);
                plain.store(2, StoreOrdering::Relaxed);

                // The previous value is `None`, so nothing leaks here.
                let slot: Atomic<Option<Box<u8>>> = Atomic::new(None);
                slot.store(Some(Box::new(1)), StoreOrdering::Relaxed);
                drop(slot.swap(None, UpdateOrdering::Relaxed));
            });
            assert_eq!(*messages.lock().unwrap(), ["store overwrites a value with drop glue"]);
        }
    }
}
