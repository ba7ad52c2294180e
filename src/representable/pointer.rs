//! Pointer conformances.
//!
//! Every pointer-like type is stored as `*mut T` in an `AtomicPtr<T>`, which
//! keeps provenance intact. Owning pointers (`Box`, `Arc`) carry their
//! ownership through the raw pointer: `encode` leaks, `decode` reclaims.

use core::ptr::{self, NonNull};
use std::sync::Arc;

use super::AtomicRepresentable;

impl<T> AtomicRepresentable for *mut T {
    type AtomicRepresentation = *mut T;

    #[inline(always)]
    fn encode(value: Self) -> *mut T {
        value
    }

    #[inline(always)]
    unsafe fn decode(representation: *mut T) -> Self {
        representation
    }
}

impl<T> AtomicRepresentable for *const T {
    type AtomicRepresentation = *mut T;

    #[inline(always)]
    fn encode(value: Self) -> *mut T {
        value.cast_mut()
    }

    #[inline(always)]
    unsafe fn decode(representation: *mut T) -> Self {
        representation.cast_const()
    }
}

impl<T> AtomicRepresentable for NonNull<T> {
    type AtomicRepresentation = *mut T;

    #[inline(always)]
    fn encode(value: Self) -> *mut T {
        value.as_ptr()
    }

    #[inline(always)]
    unsafe fn decode(representation: *mut T) -> Self {
        // SAFETY: produced by `encode` from a `NonNull`.
        unsafe { NonNull::new_unchecked(representation) }
    }
}

impl<T> AtomicRepresentable for Option<NonNull<T>> {
    type AtomicRepresentation = *mut T;

    #[inline(always)]
    fn encode(value: Self) -> *mut T {
        value.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    #[inline(always)]
    unsafe fn decode(representation: *mut T) -> Self {
        NonNull::new(representation)
    }
}

impl<T: 'static> AtomicRepresentable for &'static T {
    type AtomicRepresentation = *mut T;

    #[inline(always)]
    fn encode(value: Self) -> *mut T {
        ptr::from_ref(value).cast_mut()
    }

    #[inline(always)]
    unsafe fn decode(representation: *mut T) -> Self {
        // SAFETY: produced by `encode` from a `'static` shared reference;
        // nothing writes through it.
        unsafe { &*representation }
    }
}

impl<T> AtomicRepresentable for Box<T> {
    type AtomicRepresentation = *mut T;

    #[inline]
    fn encode(value: Self) -> *mut T {
        Box::into_raw(value)
    }

    #[inline]
    unsafe fn decode(representation: *mut T) -> Self {
        // SAFETY: produced by `Box::into_raw` and reclaimed at most once.
        unsafe { Box::from_raw(representation) }
    }
}

impl<T> AtomicRepresentable for Option<Box<T>> {
    type AtomicRepresentation = *mut T;

    #[inline]
    fn encode(value: Self) -> *mut T {
        value.map_or(ptr::null_mut(), Box::into_raw)
    }

    #[inline]
    unsafe fn decode(representation: *mut T) -> Self {
        if representation.is_null() {
            None
        } else {
            // SAFETY: non-null values were produced by `Box::into_raw`.
            Some(unsafe { Box::from_raw(representation) })
        }
    }
}

impl<T> AtomicRepresentable for Arc<T> {
    type AtomicRepresentation = *mut T;

    #[inline]
    fn encode(value: Self) -> *mut T {
        Arc::into_raw(value).cast_mut()
    }

    #[inline]
    unsafe fn decode(representation: *mut T) -> Self {
        // SAFETY: produced by `Arc::into_raw`; the strong count it carried is
        // reclaimed at most once.
        unsafe { Arc::from_raw(representation.cast_const()) }
    }
}

impl<T> AtomicRepresentable for Option<Arc<T>> {
    type AtomicRepresentation = *mut T;

    #[inline]
    fn encode(value: Self) -> *mut T {
        value.map_or(ptr::null_mut(), |arc| Arc::into_raw(arc).cast_mut())
    }

    #[inline]
    unsafe fn decode(representation: *mut T) -> Self {
        if representation.is_null() {
            None
        } else {
            // SAFETY: non-null values were produced by `Arc::into_raw`.
            Some(unsafe { Arc::from_raw(representation.cast_const()) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_pointers_map_none_to_null() {
        assert!(Option::<NonNull<u64>>::encode(None).is_null());
        assert!(Option::<Box<u64>>::encode(None).is_null());
        assert!(unsafe { Option::<Arc<u64>>::decode(ptr::null_mut()) }.is_none());
    }

    #[test]
    fn static_reference_keeps_its_address() {
        static ANSWER: u32 = 42;
        let repr = <&u32>::encode(&ANSWER);
        assert_eq!(repr.cast_const(), ptr::addr_of!(ANSWER));
        assert_eq!(unsafe { <&u32>::decode(repr) }, &42);
    }

    #[test]
    fn box_ownership_moves_through_the_pointer() {
        let repr = Box::<String>::encode(Box::new("owned".to_owned()));
        let back = unsafe { Box::<String>::decode(repr) };
        assert_eq!(*back, "owned");
    }

    #[test]
    fn arc_encoding_carries_exactly_one_strong_count() {
        let shared = Arc::new(5u8);
        let repr = Arc::encode(Arc::clone(&shared));
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(unsafe { Arc::<u8>::decode(repr) });
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
