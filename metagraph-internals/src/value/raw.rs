//! Type-erased value types.
//!
//! This module encapsulates the `storage`, `ptr` and `vtable` fields of
//! [`RawValue`], [`RawValueRef`] and [`RawValueMut`], ensuring they are only
//! visible within this module. This visibility restriction guarantees the
//! safety invariant: **the vtable always describes the type of the value the
//! storage or pointer refers to**.
//!
//! # Safety Invariant
//!
//! A [`RawValue`] can only be built by [`RawValue::new`], which creates the
//! storage and the vtable from the same type `T`. A [`RawValueRef`] or
//! [`RawValueMut`] can only be built from a typed reference (through
//! [`RawValueRef::new`] and [`RawValueMut::new`]) or by borrowing a
//! [`RawValue`], so the pointer and the vtable always agree as well.
//!
//! # Type Erasure
//!
//! The concrete type parameter `T` is forgotten once the value is stored. Every
//! downcast compares the requested [`TypeId`] with the one recorded in the
//! vtable before handing out a typed reference.

use core::{any::TypeId, marker::PhantomData, ptr::NonNull};

use super::{storage::Storage, vtable::ValueVtable};
use crate::{handlers::ValueHandler, type_info::TypeInfo};

/// An owned value of some type `T`, though we do not know which actual `T` it
/// is.
///
/// Values whose size and alignment fit a machine word are stored inline, any
/// other value is boxed. Moving a [`RawValue`] never invalidates anything, so
/// swapping two of them with [`core::mem::swap`] is always correct, whatever
/// the storage class of either side.
pub struct RawValue {
    /// Storage of the value.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The storage was created with a value of the type described by
    ///    `vtable`.
    /// 2. The value is initialized for the entire lifetime of this object,
    ///    except during the execution of the `Drop` implementation.
    storage: Storage,

    /// Vtable of the stored value.
    vtable: &'static ValueVtable,
}

impl RawValue {
    /// Creates a new [`RawValue`] holding `value`.
    ///
    /// The returned value will use the specified handler for cloning and
    /// comparing.
    #[inline]
    pub fn new<T, H>(value: T) -> Self
    where
        T: 'static,
        H: ValueHandler<T>,
    {
        Self {
            storage: Storage::new(value),
            vtable: ValueVtable::new::<T, H>(),
        }
    }

    /// Returns a shared view of the value.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        // SAFETY: The vtable describes the stored type, so `inline` matches the type
        // the storage was created with.
        let ptr = unsafe { self.storage.as_ptr(self.vtable.inline()) };
        RawValueRef {
            ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Returns a mutable view of the value.
    #[inline]
    pub fn as_mut(&mut self) -> RawValueMut<'_> {
        // SAFETY: The vtable describes the stored type, so `inline` matches the type
        // the storage was created with.
        let ptr = unsafe { self.storage.as_mut_ptr(self.vtable.inline()) };
        RawValueMut {
            ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the value.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the type information of the value.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.vtable.type_info()
    }

    /// Returns `true` if the value is stored inline rather than boxed.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.vtable.inline()
    }

    /// Clones the value through its handler, or returns `None` if the type
    /// cannot be cloned.
    #[inline]
    pub fn try_clone(&self) -> Option<RawValue> {
        self.as_ref().try_clone()
    }

    /// Moves the value out if it is a `T`, and gives the value back otherwise.
    #[inline]
    pub fn into_inner<T: 'static>(self) -> Result<T, Self> {
        if self.type_id() != TypeId::of::<T>() {
            return Err(self);
        }
        let this = core::mem::ManuallyDrop::new(self);
        // SAFETY: The storage holds a `T`, as just checked against the vtable. The
        // value is moved out exactly once: `this` is never dropped.
        Ok(unsafe { this.storage.read::<T>() })
    }
}

impl core::ops::Drop for RawValue {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.vtable;
        // SAFETY:
        // 1. The vtable is the one created with the stored type.
        // 2. The value is initialized and has not been dropped before as guaranteed
        //    by the invariants on this type, and it is not used afterwards, as we
        //    are in the drop function.
        unsafe {
            vtable.drop(&mut self.storage);
        }
    }
}

impl core::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawValue")
            .field("type", &self.type_info().type_name())
            .field("inline", &self.is_inline())
            .finish()
    }
}

/// A lifetime-bound shared view of a value of some type `T`, though we do not
/// know which actual `T` it is.
///
/// The value may live anywhere: in a [`RawValue`], in a local variable, or in
/// a field of a larger value.
#[derive(Clone, Copy)]
pub struct RawValueRef<'a> {
    /// Pointer to the value.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized value of the type described by
    ///    `vtable`, valid for reads for the lifetime `'a`.
    ptr: NonNull<()>,

    /// Vtable of the value.
    vtable: &'static ValueVtable,

    /// Marker to tell the compiler that we should behave the same as a `&'a T`.
    _marker: PhantomData<&'a ()>,
}

impl<'a> RawValueRef<'a> {
    /// Creates a view of `value`, using the specified handler for cloning and
    /// comparing.
    #[inline]
    pub fn new<T, H>(value: &'a T) -> Self
    where
        T: 'static,
        H: ValueHandler<T>,
    {
        Self {
            ptr: NonNull::from(value).cast(),
            vtable: ValueVtable::new::<T, H>(),
            _marker: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the value.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the type information of the value.
    #[inline]
    pub fn type_info(self) -> &'static TypeInfo {
        self.vtable.type_info()
    }

    /// Returns the address of the value.
    #[inline]
    pub fn as_ptr(self) -> *const () {
        self.ptr.as_ptr()
    }

    /// Returns a typed reference to the value if it is a `T`.
    #[inline]
    pub fn downcast<T: 'static>(self) -> Option<&'a T> {
        if self.type_id() != TypeId::of::<T>() {
            return None;
        }
        let ptr = self.ptr.cast::<T>();
        // SAFETY: Converting the pointer to a reference is sound because:
        // - The pointee is an initialized `T`, as just checked against the vtable
        // - The pointer is valid for reads for `'a` (guaranteed by the invariants on
        //   this type)
        // - Shared access is allowed
        Some(unsafe { ptr.as_ref() })
    }

    /// Clones the value through its handler, or returns `None` if the type
    /// cannot be cloned.
    #[inline]
    pub fn try_clone(self) -> Option<RawValue> {
        // SAFETY:
        // 1. The pointer points to a value of the vtable's type, valid for reads for
        //    `'a`, which covers the call.
        unsafe { self.vtable.clone(self.ptr) }
    }

    /// Compares two values.
    ///
    /// Values of different types are never equal. Values of a type without
    /// equality are equal only if they are the same instance.
    #[inline]
    pub fn equals(self, other: RawValueRef<'_>) -> bool {
        if self.type_id() != other.type_id() {
            return false;
        }
        // SAFETY:
        // 1. Both pointers point to values of the vtable's type, as the type ids
        //    match, and both are valid for reads for the duration of the call.
        match unsafe { self.vtable.eq(self.ptr, other.ptr) } {
            Some(equal) => equal,
            None => self.ptr == other.ptr,
        }
    }
}

impl core::fmt::Debug for RawValueRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawValueRef")
            .field("type", &self.type_info().type_name())
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// A lifetime-bound mutable view of a value of some type `T`, though we do
/// not know which actual `T` it is.
pub struct RawValueMut<'a> {
    /// Pointer to the value.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer points to an initialized value of the type described by
    ///    `vtable`, valid for reads and writes for the lifetime `'a`.
    /// 2. No other reference to the value is used for the lifetime `'a`.
    ptr: NonNull<()>,

    /// Vtable of the value.
    vtable: &'static ValueVtable,

    /// Marker to tell the compiler that we should behave the same as a
    /// `&'a mut T`.
    _marker: PhantomData<&'a mut ()>,
}

impl<'a> RawValueMut<'a> {
    /// Creates a mutable view of `value`, using the specified handler for
    /// cloning and comparing.
    #[inline]
    pub fn new<T, H>(value: &'a mut T) -> Self
    where
        T: 'static,
        H: ValueHandler<T>,
    {
        Self {
            ptr: NonNull::from(value).cast(),
            vtable: ValueVtable::new::<T, H>(),
            _marker: PhantomData,
        }
    }

    /// Reborrows the view for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> RawValueMut<'_> {
        RawValueMut {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Returns a shared view of the value for a shorter lifetime.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Turns the view into a shared view for the whole lifetime.
    #[inline]
    pub fn into_ref(self) -> RawValueRef<'a> {
        RawValueRef {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Returns the [`TypeId`] of the value.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the type information of the value.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.vtable.type_info()
    }

    /// Returns the address of the value.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut () {
        self.ptr.as_ptr()
    }

    /// Returns a typed mutable reference to the value if it is a `T`.
    #[inline]
    pub fn downcast_mut<T: 'static>(self) -> Result<&'a mut T, Self> {
        if self.type_id() != TypeId::of::<T>() {
            return Err(self);
        }
        let mut ptr = self.ptr.cast::<T>();
        // SAFETY: Converting the pointer to a reference is sound because:
        // - The pointee is an initialized `T`, as just checked against the vtable
        // - The pointer is valid for reads and writes for `'a` and no other
        //   reference is used for `'a` (guaranteed by the invariants on this type,
        //   and `self` is consumed)
        Ok(unsafe { ptr.as_mut() })
    }
}

impl core::fmt::Debug for RawValueMut<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawValueMut")
            .field("type", &self.type_info().type_name())
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// An owned value that is known to be `Send + Sync`.
///
/// Metadata shared between threads, such as the key and value of a property,
/// is stored this way.
pub struct RawValueSync {
    /// The value.
    ///
    /// # Safety
    ///
    /// The value was created from a `T: Send + Sync`.
    inner: RawValue,
}

impl RawValueSync {
    /// Creates a new [`RawValueSync`] holding `value`.
    #[inline]
    pub fn new<T, H>(value: T) -> Self
    where
        T: Send + Sync + 'static,
        H: ValueHandler<T>,
    {
        Self {
            inner: RawValue::new::<T, H>(value),
        }
    }

    /// Returns a shared view of the value.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        self.inner.as_ref()
    }
}

// SAFETY: The value is a `T: Send`, and the vtable is a `&'static` reference
// to function pointers and plain data.
unsafe impl Send for RawValueSync {}

// SAFETY: The value is a `T: Sync`, and shared access to a `RawValueSync` only
// ever hands out shared references to it.
unsafe impl Sync for RawValueSync {}

impl core::fmt::Debug for RawValueSync {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("RawValueSync").field(&self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::String, vec::Vec};
    use core::cell::Cell;

    use super::*;
    use crate::type_info::TypeTraits;

    static I32: TypeInfo = TypeInfo::new::<i32>(TypeTraits::INTEGRAL, 0, || &I32);
    static STRING: TypeInfo = TypeInfo::new::<String>(TypeTraits::CLASS, 0, || &STRING);

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

    struct HandlerString;
    impl ValueHandler<String> for HandlerString {
        fn type_info() -> &'static TypeInfo {
            &STRING
        }

        fn clone(value: &String) -> Option<String> {
            Some(value.clone())
        }

        fn eq(_lhs: &String, _rhs: &String) -> Option<bool> {
            None
        }
    }

    #[test]
    fn test_raw_value_size() {
        assert_eq!(
            core::mem::size_of::<RawValue>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValue>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<RawValueRef<'_>>(),
            2 * core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValueMut<'_>>>(),
            2 * core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_value_downcast() {
        let int_value = RawValue::new::<i32, HandlerI32>(42);
        let string_value = RawValue::new::<String, HandlerString>(String::from("test"));

        assert_eq!(int_value.type_id(), TypeId::of::<i32>());
        assert_eq!(string_value.type_id(), TypeId::of::<String>());
        assert!(int_value.is_inline());
        assert!(!string_value.is_inline());

        assert_eq!(int_value.as_ref().downcast::<i32>(), Some(&42));
        assert_eq!(int_value.as_ref().downcast::<u32>(), None);
        assert_eq!(
            string_value.as_ref().downcast::<String>().map(String::as_str),
            Some("test")
        );
    }

    #[test]
    fn test_raw_value_mutation() {
        let mut value = RawValue::new::<i32, HandlerI32>(1);
        *value.as_mut().downcast_mut::<i32>().unwrap() += 41;
        assert_eq!(value.as_ref().downcast::<i32>(), Some(&42));
        assert!(value.as_mut().downcast_mut::<u8>().is_err());
    }

    #[test]
    fn test_raw_value_swap_inline_and_boxed() {
        let mut small = RawValue::new::<i32, HandlerI32>(7);
        let mut large = RawValue::new::<String, HandlerString>(String::from("large"));

        core::mem::swap(&mut small, &mut large);

        assert!(!small.is_inline());
        assert!(large.is_inline());
        assert_eq!(
            small.as_ref().downcast::<String>().map(String::as_str),
            Some("large")
        );
        assert_eq!(large.as_ref().downcast::<i32>(), Some(&7));

        // The inline address follows the container
        let ptr = large.as_ref().as_ptr() as usize;
        let start = core::ptr::from_ref(&large) as usize;
        assert!((start..start + size_of::<RawValue>()).contains(&ptr));
    }

    #[test]
    fn test_raw_value_clone_and_equality() {
        let value = RawValue::new::<i32, HandlerI32>(3);
        let copy = value.try_clone().unwrap();
        assert!(value.as_ref().equals(copy.as_ref()));
        assert_ne!(value.as_ref().as_ptr(), copy.as_ref().as_ptr());

        // No equality: only the same instance compares equal
        let text = RawValue::new::<String, HandlerString>(String::from("a"));
        let text_copy = text.try_clone().unwrap();
        assert!(text.as_ref().equals(text.as_ref()));
        assert!(!text.as_ref().equals(text_copy.as_ref()));

        // Different types never compare equal
        assert!(!value.as_ref().equals(text.as_ref()));
    }

    #[test]
    fn test_raw_value_into_inner() {
        let value = RawValue::new::<String, HandlerString>(String::from("owned"));
        let value = value.into_inner::<i32>().unwrap_err();
        assert_eq!(value.into_inner::<String>().unwrap(), "owned");
    }

    #[test]
    fn test_raw_value_drops_exactly_once() {
        struct Tracked<'a>(&'a Cell<usize>);
        impl Drop for Tracked<'_> {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        // Only `'static` payloads can be erased, so leak the counters
        let inline_drops: &'static Cell<usize> = Box::leak(Box::new(Cell::new(0)));
        let boxed_drops: &'static Cell<usize> = Box::leak(Box::new(Cell::new(0)));

        static TRACKED: TypeInfo =
            TypeInfo::new::<Tracked<'static>>(TypeTraits::CLASS, 0, || &TRACKED);
        static TRACKED_PAIR: TypeInfo =
            TypeInfo::new::<(Tracked<'static>, u64)>(TypeTraits::CLASS, 0, || &TRACKED_PAIR);

        struct HandlerTracked;
        impl ValueHandler<Tracked<'static>> for HandlerTracked {
            fn type_info() -> &'static TypeInfo {
                &TRACKED
            }

            fn clone(_value: &Tracked<'static>) -> Option<Tracked<'static>> {
                None
            }

            fn eq(_lhs: &Tracked<'static>, _rhs: &Tracked<'static>) -> Option<bool> {
                None
            }
        }
        impl ValueHandler<(Tracked<'static>, u64)> for HandlerTracked {
            fn type_info() -> &'static TypeInfo {
                &TRACKED_PAIR
            }

            fn clone(_value: &(Tracked<'static>, u64)) -> Option<(Tracked<'static>, u64)> {
                None
            }

            fn eq(_lhs: &(Tracked<'static>, u64), _rhs: &(Tracked<'static>, u64)) -> Option<bool> {
                None
            }
        }

        let values: Vec<RawValue> = alloc::vec![
            RawValue::new::<Tracked<'static>, HandlerTracked>(Tracked(inline_drops)),
            RawValue::new::<(Tracked<'static>, u64), HandlerTracked>((Tracked(boxed_drops), 0)),
        ];
        assert!(values[0].is_inline());
        assert!(!values[1].is_inline());
        assert!(values[0].try_clone().is_none());
        drop(values);

        assert_eq!(inline_drops.get(), 1);
        assert_eq!(boxed_drops.get(), 1);
    }
}
