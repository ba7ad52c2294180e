//! # `halo-atomic` - Generic Atomic Cell
//!
//! A single-slot, lock-free atomic container for any type that can be bridged
//! to a hardware-atomic bit pattern. The cell is written once, generically;
//! each value type opts in through [`AtomicRepresentable`].
//!
//! ## Safety Guarantees
//!
//! ### Ownership
//! - **Move-only cells**: [`Atomic`] is neither `Clone` nor `Copy`, so exactly
//!   one cell owns a given storage location and moved-from cells are statically
//!   unusable.
//! - **No duplication**: operations that would copy the stored value (`load`,
//!   compare-exchange) require `V: Copy`. Owning values such as `Box<T>` or
//!   `Arc<T>` only move in and out through `swap`, `store` and `into_inner`.
//! - **Exactly-once teardown**: dropping a cell decodes and drops the final
//!   value once.
//!
//! ### Concurrency Safety
//! - **Single instructions**: every operation is one hardware atomic access
//!   (or a compare-exchange retry loop, for `fetch_update`), never a lock.
//! - **Typed orderings**: [`LoadOrdering`], [`StoreOrdering`] and
//!   [`UpdateOrdering`] only offer orderings that make sense for the
//!   operation.
//! - **Conditional sharing**: `Atomic<V>` is `Send` and `Sync` exactly when
//!   `V: Send`.
//!
//! ## Architecture
//!
//! 1. **Storage** ([`AtomicStorage`]): the sealed set of physical
//!    representations (`u8`..`u128`, `i8`..`i128`, `bool`, `*mut T`), each
//!    bound to its hardware atomic.
//! 2. **Bridging** ([`AtomicRepresentable`]): `encode`/`decode` between a
//!    logical value and its representation.
//! 3. **Cell** ([`Atomic`]): `#[repr(transparent)]` over the hardware atomic;
//!    the instruction operand is the cell's own address.
//!
//! ## Example
//!
//! ```rust
//! use halo_atomic::{Atomic, LoadOrdering, UpdateOrdering};
//! use std::thread;
//!
//! let hits = Atomic::new(0usize);
//! thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for _ in 0..100 {
//!                 hits.fetch_add(1, UpdateOrdering::Relaxed);
//!             }
//!         });
//!     }
//! });
//! assert_eq!(hits.load(LoadOrdering::Relaxed), 400);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod macros;
mod sync;

pub mod atomic;
pub mod ordering;
pub mod representable;

pub use atomic::{Atomic, AtomicLazyReference};
pub use ordering::{InvalidOrdering, LoadOrdering, StoreOrdering, UpdateOrdering};
pub use representable::{
    AtomicInteger, AtomicIntegerStorage, AtomicRepresentable, AtomicStorage, WordPair,
};

// Compile-time layout assertions. Loom's atomics carry model state, so the
// widths only hold for the hardware backend.
#[cfg(not(loom))]
const _: () = {
    use core::mem;

    // The cell adds nothing on top of the hardware atomic.
    assert!(mem::size_of::<Atomic<u8>>() == mem::size_of::<u8>());
    assert!(mem::size_of::<Atomic<u32>>() == mem::size_of::<u32>());
    assert!(mem::size_of::<Atomic<usize>>() == mem::size_of::<usize>());
    assert!(mem::size_of::<Atomic<bool>>() == mem::size_of::<bool>());
    assert!(mem::size_of::<Atomic<*mut u8>>() == mem::size_of::<*mut u8>());

    // Bridged values take the width of their representation, not their own.
    assert!(mem::size_of::<Atomic<f64>>() == mem::size_of::<u64>());
    assert!(mem::size_of::<Atomic<Box<[u8; 64]>>>() == mem::size_of::<usize>());

    // Alignment is the hardware atomic's, never less than the representation's.
    assert!(mem::align_of::<Atomic<u64>>() >= mem::align_of::<u64>());
    assert!(mem::align_of::<Atomic<u64>>() == mem::size_of::<u64>());
};
