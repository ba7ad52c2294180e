//! Scalar conformances.

use core::cmp;
use core::num::{
    NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroIsize, NonZeroU16, NonZeroU32,
    NonZeroU64, NonZeroU8, NonZeroUsize,
};
#[cfg(not(loom))]
use core::time::Duration;

use super::AtomicRepresentable;

macro_rules! identity_representable {
    ($($ty:ty),* $(,)?) => {$(
        impl AtomicRepresentable for $ty {
            type AtomicRepresentation = $ty;

            #[inline(always)]
            fn encode(value: Self) -> Self {
                value
            }

            #[inline(always)]
            unsafe fn decode(representation: Self) -> Self {
                representation
            }
        }
    )*};
}

identity_representable!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool);

#[cfg(not(loom))]
identity_representable!(u128, i128);

macro_rules! float_representable {
    ($($float:ty => $bits:ty),* $(,)?) => {$(
        /// Stored bitwise: `0.0` and `-0.0` are different values to
        /// compare-exchange, and a NaN matches only the same NaN payload.
        impl AtomicRepresentable for $float {
            type AtomicRepresentation = $bits;

            #[inline(always)]
            fn encode(value: Self) -> $bits {
                value.to_bits()
            }

            #[inline(always)]
            unsafe fn decode(representation: $bits) -> Self {
                <$float>::from_bits(representation)
            }
        }
    )*};
}

float_representable!(f32 => u32, f64 => u64);

impl AtomicRepresentable for char {
    type AtomicRepresentation = u32;

    #[inline(always)]
    fn encode(value: Self) -> u32 {
        u32::from(value)
    }

    #[inline(always)]
    unsafe fn decode(representation: u32) -> Self {
        // SAFETY: `encode` only produces valid scalar values.
        unsafe { char::from_u32_unchecked(representation) }
    }
}

macro_rules! non_zero_representable {
    ($($non_zero:ty => $int:ty),* $(,)?) => {$(
        impl AtomicRepresentable for $non_zero {
            type AtomicRepresentation = $int;

            #[inline(always)]
            fn encode(value: Self) -> $int {
                value.get()
            }

            #[inline(always)]
            unsafe fn decode(representation: $int) -> Self {
                // SAFETY: `encode` never produces zero.
                unsafe { <$non_zero>::new_unchecked(representation) }
            }
        }

        /// Zero is `None`.
        impl AtomicRepresentable for Option<$non_zero> {
            type AtomicRepresentation = $int;

            #[inline(always)]
            fn encode(value: Self) -> $int {
                value.map_or(0, <$non_zero>::get)
            }

            #[inline(always)]
            unsafe fn decode(representation: $int) -> Self {
                <$non_zero>::new(representation)
            }
        }
    )*};
}

non_zero_representable! {
    NonZeroU8 => u8,
    NonZeroU16 => u16,
    NonZeroU32 => u32,
    NonZeroU64 => u64,
    NonZeroUsize => usize,
    NonZeroI8 => i8,
    NonZeroI16 => i16,
    NonZeroI32 => i32,
    NonZeroI64 => i64,
    NonZeroIsize => isize,
}

/// `Less`, `Equal` and `Greater` are `-1`, `0` and `1`.
impl AtomicRepresentable for cmp::Ordering {
    type AtomicRepresentation = i8;

    #[inline(always)]
    fn encode(value: Self) -> i8 {
        value as i8
    }

    #[inline(always)]
    unsafe fn decode(representation: i8) -> Self {
        representation.cmp(&0)
    }
}

#[cfg(not(loom))]
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Stored as whole nanoseconds.
#[cfg(not(loom))]
impl AtomicRepresentable for Duration {
    type AtomicRepresentation = u128;

    #[inline]
    fn encode(value: Self) -> u128 {
        value.as_nanos()
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    unsafe fn decode(representation: u128) -> Self {
        // Both casts are lossless for anything `as_nanos` returned.
        let secs = (representation / NANOS_PER_SEC) as u64;
        let nanos = (representation % NANOS_PER_SEC) as u32;
        Duration::new(secs, nanos)
    }
}
