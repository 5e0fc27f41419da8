//! Vtable for type-erased value operations.
//!
//! This module contains the [`ValueVtable`] which enables dropping, cloning
//! and comparing values when their concrete type `T` and handler type `H` have
//! been erased.
//!
//! This module encapsulates the fields of [`ValueVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual type of the
//! value it travels with**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ValueVtable::new`], which pairs the function pointers with
//! specific types `T` and `H` at compile time.

use core::{any::TypeId, ptr::NonNull};

use super::{
    raw::RawValue,
    storage::{Storage, fits_inline},
};
use crate::{handlers::ValueHandler, type_info::TypeInfo};

/// Vtable for type-erased value operations.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone` and `eq` are guaranteed to point to the
/// functions defined below instantiated with the value type `T` and handler
/// type `H` that were used to create this [`ValueVtable`], and `inline` is
/// [`fits_inline::<T>()`].
pub(crate) struct ValueVtable {
    /// Gets the [`TypeId`] of the value type.
    type_id: fn() -> TypeId,
    /// Gets the type information supplied by the handler.
    type_info: fn() -> &'static TypeInfo,
    /// Whether values of this type are stored inline.
    inline: bool,
    /// Drops a [`Storage`] holding a value of this type.
    drop: unsafe fn(&mut Storage),
    /// Clones the value behind the pointer into a new owned value.
    clone: unsafe fn(NonNull<()>) -> Option<RawValue>,
    /// Compares the values behind two pointers.
    eq: unsafe fn(NonNull<()>, NonNull<()>) -> Option<bool>,
}

impl ValueVtable {
    /// Creates a new [`ValueVtable`] for the value type `T` and the handler
    /// type `H`.
    pub(super) const fn new<T: 'static, H: ValueHandler<T>>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_info: H::type_info,
                inline: fits_inline::<T>(),
                drop: drop::<T>,
                clone: clone::<T, H>,
                eq: eq::<T, H>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ValueVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the type information supplied by the handler.
    #[inline]
    pub(super) fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    /// Whether values of this type are stored inline.
    #[inline]
    pub(super) fn inline(&self) -> bool {
        self.inline
    }

    /// Drops the value held by `storage`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] is the vtable of the value held by `storage`.
    /// 2. The held value has not been dropped or moved out before, and the
    ///    storage is not used after this call.
    #[inline]
    pub(super) unsafe fn drop(&self, storage: &mut Storage) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.drop)(storage);
        }
    }

    /// Clones the value behind `ptr` using the [`H::clone`] function used when
    /// creating this [`ValueVtable`].
    ///
    /// [`H::clone`]: ValueHandler::clone
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized value of the type of this vtable,
    ///    valid for reads for the duration of the call.
    #[inline]
    pub(super) unsafe fn clone(&self, ptr: NonNull<()>) -> Option<RawValue> {
        // SAFETY: We know that `self.clone` points to the function `clone::<T, H>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone)(ptr) }
    }

    /// Compares the values behind two pointers using the [`H::eq`] function
    /// used when creating this [`ValueVtable`].
    ///
    /// [`H::eq`]: ValueHandler::eq
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. Both pointers point to initialized values of the type of this
    ///    vtable, valid for reads for the duration of the call.
    #[inline]
    pub(super) unsafe fn eq(&self, lhs: NonNull<()>, rhs: NonNull<()>) -> Option<bool> {
        // SAFETY: We know that `self.eq` points to the function `eq::<T, H>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.eq)(lhs, rhs) }
    }
}

/// Drops the `T` held by `storage`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `storage` was created with a value of type `T`.
/// 2. The value has not been dropped or moved out before, and the storage is
///    not used after this call.
unsafe fn drop<T: 'static>(storage: &mut Storage) {
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe { storage.drop_in_place::<T>() }
}

/// Clones the `T` behind `ptr` through the handler.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `T`, valid for reads for the duration of
///    the call.
unsafe fn clone<T: 'static, H: ValueHandler<T>>(ptr: NonNull<()>) -> Option<RawValue> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { ptr.cast::<T>().as_ref() };
    H::clone(value).map(RawValue::new::<T, H>)
}

/// Compares the `T`s behind two pointers through the handler.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. Both pointers point to initialized `T`s, valid for reads for the
///    duration of the call.
unsafe fn eq<T: 'static, H: ValueHandler<T>>(lhs: NonNull<()>, rhs: NonNull<()>) -> Option<bool> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let lhs: &T = unsafe { lhs.cast::<T>().as_ref() };
    // SAFETY:
    // 1. Guaranteed by the caller
    let rhs: &T = unsafe { rhs.cast::<T>().as_ref() };
    H::eq(lhs, rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_info::TypeTraits;

    static I32: TypeInfo = TypeInfo::new::<i32>(TypeTraits::INTEGRAL, 0, || &I32);

    struct HandlerI32;
    impl ValueHandler<i32> for HandlerI32 {
        fn type_info() -> &'static TypeInfo {
            &I32
        }

        fn clone(value: &i32) -> Option<i32> {
            Some(*value)
        }

        fn eq(lhs: &i32, rhs: &i32) -> Option<bool> {
            Some(lhs == rhs)
        }
    }

    #[test]
    fn test_value_vtable_eq() {
        let vtable1 = ValueVtable::new::<i32, HandlerI32>();
        let vtable2 = ValueVtable::new::<i32, HandlerI32>();

        // Both should be the exact same static instance
        assert!(core::ptr::eq(vtable1, vtable2));
    }

    #[test]
    fn test_value_vtable_type() {
        let vtable = ValueVtable::new::<i32, HandlerI32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert!(core::ptr::eq(vtable.type_info(), &I32));
        assert!(vtable.inline());
    }
}
