//! Atomic backend shim.
//!
//! Under `cfg(loom)` every hardware atomic comes from loom's model checker so
//! the cell can be exercised by `tests/loom_atomic.rs` without code changes.
//! Otherwise the types come from `core::sync::atomic`, with `portable_atomic`
//! supplying the 16-byte widths that `core` does not expose on stable.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicPtr, AtomicU16,
    AtomicU32, AtomicU64, AtomicU8, AtomicUsize,
};

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicPtr, AtomicU16,
    AtomicU32, AtomicU64, AtomicU8, AtomicUsize,
};

#[cfg(not(loom))]
pub(crate) use portable_atomic::{AtomicI128, AtomicU128};

pub(crate) use core::sync::atomic::Ordering;

#[cfg(not(loom))]
pub(crate) use crossbeam_utils::Backoff;

/// Loom cannot make progress through a busy spin, so retry loops yield to the
/// model scheduler instead.
#[cfg(loom)]
pub(crate) struct Backoff;

#[cfg(loom)]
impl Backoff {
    #[inline]
    pub(crate) fn new() -> Self {
        Backoff
    }

    #[inline]
    pub(crate) fn spin(&self) {
        loom::thread::yield_now();
    }
}
