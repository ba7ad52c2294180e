//! Physical representations the hardware can operate on directly.
//!
//! Each storage type is bound to exactly one hardware atomic of identical size
//! and bit validity. The trait is sealed: the layout contract between a
//! representation and its atomic is only checked here, once per width.

use crate::sync::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicPtr, AtomicU16,
    AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering,
};
#[cfg(not(loom))]
use crate::sync::{AtomicI128, AtomicU128};

mod sealed {
    pub trait Sealed {}
}

/// A bit pattern with a native atomic width (1, 2, 4, 8 or 16 bytes).
///
/// The associated functions are the raw hardware operations. They are public
/// only because the trait appears in [`AtomicRepresentable`]'s signature;
/// [`Atomic`] is the intended interface.
///
/// [`AtomicRepresentable`]: crate::AtomicRepresentable
/// [`Atomic`]: crate::Atomic
pub trait AtomicStorage: Copy + Eq + sealed::Sealed {
    /// The hardware atomic cell holding a `Self`.
    #[doc(hidden)]
    type Atomic;

    #[doc(hidden)]
    fn atomic_new(value: Self) -> Self::Atomic;

    #[doc(hidden)]
    fn atomic_load(atomic: &Self::Atomic, order: Ordering) -> Self;

    #[doc(hidden)]
    fn atomic_store(atomic: &Self::Atomic, value: Self, order: Ordering);

    #[doc(hidden)]
    fn atomic_swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;

    #[doc(hidden)]
    fn atomic_compare_exchange(
        atomic: &Self::Atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    #[doc(hidden)]
    fn atomic_compare_exchange_weak(
        atomic: &Self::Atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self, Self>;

    /// Reads through exclusive access, without an atomic instruction.
    #[doc(hidden)]
    fn atomic_get(atomic: &mut Self::Atomic) -> Self;

    /// Writes through exclusive access, without an atomic instruction.
    #[doc(hidden)]
    fn atomic_set(atomic: &mut Self::Atomic, value: Self);

    /// Whether operations on this width compile to lock-free instructions on
    /// the running machine.
    #[doc(hidden)]
    fn atomic_is_lock_free() -> bool;
}

/// Integer storage with hardware fetch-and-modify instructions.
///
/// Arithmetic wraps on overflow, matching the instructions themselves.
pub trait AtomicIntegerStorage: AtomicStorage {
    #[doc(hidden)]
    fn atomic_fetch_add(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_sub(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_and(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_or(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_xor(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_max(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
    #[doc(hidden)]
    fn atomic_fetch_min(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
}

#[cfg(not(loom))]
macro_rules! exclusive_access {
    (get $atomic:ident) => {
        *$atomic.get_mut()
    };
    (set $atomic:ident, $value:ident) => {
        *$atomic.get_mut() = $value
    };
}

// Loom's `AtomicBool` has no `with_mut`, so every width uses the same path. A
// relaxed access is enough here: `&mut` already excludes every other thread.
#[cfg(loom)]
macro_rules! exclusive_access {
    (get $atomic:ident) => {
        $atomic.load(Ordering::Relaxed)
    };
    (set $atomic:ident, $value:ident) => {
        $atomic.store($value, Ordering::Relaxed)
    };
}

macro_rules! storage_ops {
    ($atomic_ty:ty, $lock_free:expr) => {
        #[inline(always)]
        fn atomic_new(value: Self) -> Self::Atomic {
            <$atomic_ty>::new(value)
        }

        #[inline(always)]
        fn atomic_load(atomic: &Self::Atomic, order: Ordering) -> Self {
            atomic.load(order)
        }

        #[inline(always)]
        fn atomic_store(atomic: &Self::Atomic, value: Self, order: Ordering) {
            atomic.store(value, order);
        }

        #[inline(always)]
        fn atomic_swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
            atomic.swap(value, order)
        }

        #[inline(always)]
        fn atomic_compare_exchange(
            atomic: &Self::Atomic,
            current: Self,
            new: Self,
            success: Ordering,
            failure: Ordering,
        ) -> Result<Self, Self> {
            atomic.compare_exchange(current, new, success, failure)
        }

        #[inline(always)]
        fn atomic_compare_exchange_weak(
            atomic: &Self::Atomic,
            current: Self,
            new: Self,
            success: Ordering,
            failure: Ordering,
        ) -> Result<Self, Self> {
            atomic.compare_exchange_weak(current, new, success, failure)
        }

        #[inline(always)]
        fn atomic_get(atomic: &mut Self::Atomic) -> Self {
            exclusive_access!(get atomic)
        }

        #[inline(always)]
        fn atomic_set(atomic: &mut Self::Atomic, value: Self) {
            exclusive_access!(set atomic, value)
        }

        #[inline(always)]
        fn atomic_is_lock_free() -> bool {
            $lock_free
        }
    };
}

macro_rules! integer_storage {
    ($($int:ty => $atomic_ty:ty, $lock_free:expr;)*) => {$(
        impl sealed::Sealed for $int {}

        impl AtomicStorage for $int {
            type Atomic = $atomic_ty;
            storage_ops!($atomic_ty, $lock_free);
        }

        impl AtomicIntegerStorage for $int {
            #[inline(always)]
            fn atomic_fetch_add(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_add(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_sub(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_sub(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_and(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_and(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_or(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_or(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_xor(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_xor(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_max(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_max(value, order)
            }

            #[inline(always)]
            fn atomic_fetch_min(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                atomic.fetch_min(value, order)
            }
        }
    )*};
}

integer_storage! {
    u8 => AtomicU8, true;
    u16 => AtomicU16, true;
    u32 => AtomicU32, true;
    u64 => AtomicU64, true;
    usize => AtomicUsize, true;
    i8 => AtomicI8, true;
    i16 => AtomicI16, true;
    i32 => AtomicI32, true;
    i64 => AtomicI64, true;
    isize => AtomicIsize, true;
}

// 16-byte CAS is detected at runtime on x86_64; elsewhere portable_atomic
// may fall back to a global lock table.
#[cfg(not(loom))]
integer_storage! {
    u128 => AtomicU128, AtomicU128::is_lock_free();
    i128 => AtomicI128, AtomicI128::is_lock_free();
}

impl sealed::Sealed for bool {}

impl AtomicStorage for bool {
    type Atomic = AtomicBool;
    storage_ops!(AtomicBool, true);
}

impl<T> sealed::Sealed for *mut T {}

impl<T> AtomicStorage for *mut T {
    type Atomic = AtomicPtr<T>;
    storage_ops!(AtomicPtr<T>, true);
}
