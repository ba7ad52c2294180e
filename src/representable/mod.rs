//! The representation-bridging capability.
//!
//! [`Atomic<V>`](crate::Atomic) is written once against [`AtomicRepresentable`].
//! A logical type names the physical bit pattern the hardware operates on and
//! converts to and from it; everything else is shared.
//!
//! Built-in conformances:
//!
//! | Logical type | Representation |
//! |---|---|
//! | `u8`..`u64`, `usize`, `i8`..`i64`, `isize`, `bool` | itself |
//! | `u128`, `i128` | itself (not under loom) |
//! | `f32`, `f64` | `u32`, `u64` (bitwise) |
//! | `char`, `NonZero*`, `Option<NonZero*>` | matching integer |
//! | `core::cmp::Ordering` | `i8` |
//! | `Duration` | `u128` nanoseconds (not under loom) |
//! | [`WordPair`] | double-word integer |
//! | `*mut T`, `*const T`, `NonNull<T>`, `Option<NonNull<T>>`, `&'static T` | `*mut T` |
//! | `Box<T>`, `Option<Box<T>>`, `Arc<T>`, `Option<Arc<T>>` | `*mut T` |

mod pointer;
mod primitive;
mod storage;
mod word_pair;

pub use storage::{AtomicIntegerStorage, AtomicStorage};
pub use word_pair::WordPair;

use num_traits::PrimInt;

/// A type that can be held by an [`Atomic`](crate::Atomic).
///
/// `encode` moves the value, including any ownership it carries, into its
/// representation. `decode` moves it back out.
///
/// Encoding must be injective over every value the program can produce, so
/// that `decode(encode(v)) == v` and compare-exchange can compare
/// representations in place of values.
///
/// # Example
///
/// ```rust
/// use halo_atomic::{Atomic, AtomicRepresentable, LoadOrdering, StoreOrdering};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Celsius(i16);
///
/// impl AtomicRepresentable for Celsius {
///     type AtomicRepresentation = i16;
///
///     fn encode(value: Self) -> i16 {
///         value.0
///     }
///
///     unsafe fn decode(representation: i16) -> Self {
///         Celsius(representation)
///     }
/// }
///
/// let reading = Atomic::new(Celsius(21));
/// reading.store(Celsius(-4), StoreOrdering::Releasing);
/// assert_eq!(reading.load(LoadOrdering::Acquiring), Celsius(-4));
/// ```
pub trait AtomicRepresentable: Sized {
    /// The bit pattern the hardware atomic instructions operate on.
    type AtomicRepresentation: AtomicStorage;

    /// Converts a value into its representation, transferring ownership.
    fn encode(value: Self) -> Self::AtomicRepresentation;

    /// Converts a representation back into a value.
    ///
    /// # Safety
    /// `representation` must have been returned by [`encode`](Self::encode).
    /// Unless `Self: Copy`, each encoded representation may be decoded at most
    /// once; decoding it twice would produce two owners of one resource.
    unsafe fn decode(representation: Self::AtomicRepresentation) -> Self;
}

/// Integers whose atomic cell supports the fetch-and-modify family.
///
/// Blanket-implemented for every primitive integer that is its own
/// representation.
pub trait AtomicInteger:
    AtomicRepresentable<AtomicRepresentation = Self> + AtomicIntegerStorage + PrimInt
{
}

impl<T> AtomicInteger for T where
    T: AtomicRepresentable<AtomicRepresentation = T> + AtomicIntegerStorage + PrimInt
{
}

/// Declares [`AtomicRepresentable`] for a fieldless enum, encoded as its
/// discriminant.
///
/// Every variant must be listed, and `$repr` must be exactly as wide as the
/// enum. Both are checked at compile time.
///
/// # Example
///
/// ```rust
/// use halo_atomic::{atomic_representable_enum, Atomic, LoadOrdering, UpdateOrdering};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// #[repr(u8)]
/// enum Phase {
///     Idle,
///     Running,
///     Done,
/// }
///
/// atomic_representable_enum!(Phase: u8 { Idle, Running, Done });
///
/// let phase = Atomic::new(Phase::Idle);
/// assert_eq!(
///     phase.compare_exchange(
///         Phase::Idle,
///         Phase::Running,
///         UpdateOrdering::AcquiringAndReleasing,
///         LoadOrdering::Acquiring,
///     ),
///     Ok(Phase::Idle)
/// );
/// assert_eq!(phase.load(LoadOrdering::Acquiring), Phase::Running);
/// ```
///
/// Leaving a variant out does not compile:
///
/// ```compile_fail,E0004
/// use halo_atomic::atomic_representable_enum;
///
/// #[derive(Clone, Copy)]
/// #[repr(u8)]
/// enum Light {
///     Red,
///     Amber,
///     Green,
/// }
///
/// atomic_representable_enum!(Light: u8 { Red, Amber });
///
/// fn main() {}
/// ```
///
/// Neither does a representation narrower than the enum:
///
/// ```compile_fail
/// use halo_atomic::atomic_representable_enum;
///
/// #[derive(Clone, Copy)]
/// #[repr(u16)]
/// enum Wide {
///     Low = 1,
///     High = 257,
/// }
///
/// atomic_representable_enum!(Wide: u8 { Low, High });
///
/// fn main() {}
/// ```
#[macro_export]
macro_rules! atomic_representable_enum {
    ($ty:ident : $repr:ty { $($variant:ident),+ $(,)? }) => {
        // Same width means `as` maps distinct discriminants to distinct
        // representations.
        const _: () = ::core::assert!(
            ::core::mem::size_of::<$ty>() == ::core::mem::size_of::<$repr>(),
            "atomic_representable_enum!: representation width differs from the enum's",
        );

        impl $crate::AtomicRepresentable for $ty {
            type AtomicRepresentation = $repr;

            #[inline]
            fn encode(value: Self) -> $repr {
                match value {
                    $($ty::$variant => $ty::$variant as $repr,)+
                }
            }

            #[inline]
            unsafe fn decode(representation: $repr) -> Self {
                $(
                    if representation == $ty::$variant as $repr {
                        return $ty::$variant;
                    }
                )+
                // SAFETY: `encode` matches every variant and the width check
                // keeps its results distinct, so a representation that came
                // from `encode` equals one of the arms above.
                unsafe { ::core::hint::unreachable_unchecked() }
            }
        }
    };
}
