//! Glue between [`Reflect`] types and the erased value storage.
//!
//! Every erased value created by this crate uses the [`Reflected`] handler,
//! which forwards the strategies of the value handler to the [`Reflect`]
//! implementation of the stored type.

use metagraph_internals::{
    RawValue, RawValueMut, RawValueRef, RawValueSync, TypeInfo, handlers::ValueHandler,
};

use crate::{Reflect, type_info};

/// Handler used for all values stored by this crate.
pub(crate) struct Reflected;

impl<T: Reflect> ValueHandler<T> for Reflected {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        type_info::<T>()
    }

    #[inline]
    fn clone(value: &T) -> Option<T> {
        value.reflect_clone()
    }

    #[inline]
    fn eq(lhs: &T, rhs: &T) -> Option<bool> {
        lhs.reflect_eq(rhs)
    }
}

#[inline]
pub(crate) fn raw<T: Reflect>(value: T) -> RawValue {
    RawValue::new::<T, Reflected>(value)
}

#[inline]
pub(crate) fn raw_ref<T: Reflect>(value: &T) -> RawValueRef<'_> {
    RawValueRef::new::<T, Reflected>(value)
}

#[inline]
pub(crate) fn raw_mut<T: Reflect>(value: &mut T) -> RawValueMut<'_> {
    RawValueMut::new::<T, Reflected>(value)
}

#[inline]
pub(crate) fn raw_sync<T: Reflect + Send + Sync>(value: T) -> RawValueSync {
    RawValueSync::new::<T, Reflected>(value)
}
