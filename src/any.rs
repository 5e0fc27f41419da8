//! The type-erased value container.

use core::any::TypeId;

use metagraph_internals::{RawValue, RawValueMut, RawValueRef, TypeInfo};

use crate::{Handle, Reflect, Registry, Type, handlers};

/// A type-erased value of any reflected type.
///
/// An [`Any`] is always tied to a [`Registry`]: casts follow the base
/// relationships registered there, conversions use the conversions
/// registered there, and dropping an owned value runs the destructor hook
/// registered there.
///
/// # Storage
///
/// An [`Any`] is in one of four states:
///
/// - **Empty**: holds nothing. This is how every failed operation reports
///   failure.
/// - **Owned**: owns a value. Values whose size and alignment fit a machine
///   word are stored inline, other values are boxed. Both kinds behave the
///   same in every respect, swapping included.
/// - **Alias** (mutable or const): refers to a value owned by someone else,
///   created with [`Any::from_mut`] or [`Any::from_ref`], or returned by a
///   getter or function registered with [`Policy::Alias`]. Dropping an alias
///   does not drop the value.
///
/// Cloning an [`Any`] always produces an owned copy, aliases included. Types
/// that cannot be cloned (see [`Reflect::reflect_clone`]) clone to an empty
/// container.
///
/// # Lifetimes
///
/// `'r` is the borrow of the registry and `'a` the borrow of an aliased
/// value. Owned values do not borrow anything but the registry, and the
/// operations that always produce one ([`try_clone`](Any::try_clone),
/// [`into_owned`](Any::into_owned), [`convert`](Any::convert)) return an
/// `Any<'r, 'static>` that outlives the alias it was made from.
///
/// [`Policy::Alias`]: crate::Policy::Alias
///
/// # Examples
///
/// ```
/// use metagraph::{Any, Registry};
///
/// let registry = Registry::new();
///
/// let mut value = Any::new(&registry, 42i32);
/// assert_eq!(value.try_cast::<i32>(), Some(&42));
/// assert_eq!(value.try_cast::<u8>(), None);
///
/// *value.cast_mut::<i32>() += 1;
/// assert_eq!(value, Any::new(&registry, 43i32));
///
/// let mut external = 1u8;
/// let mut alias = Any::from_mut(&registry, &mut external);
/// *alias.cast_mut::<u8>() = 2;
/// drop(alias);
/// assert_eq!(external, 2);
/// ```
pub struct Any<'r, 'a> {
    /// The registry the value is interpreted against.
    registry: &'r Registry,
    /// The value.
    content: Content<'a>,
}

/// What an [`Any`] holds.
enum Content<'a> {
    /// Nothing.
    Empty,
    /// An owned value.
    Owned(RawValue),
    /// A value owned elsewhere that may only be read.
    Shared(RawValueRef<'a>),
    /// A value owned elsewhere that may be read and written.
    Exclusive(RawValueMut<'a>),
}

impl<'r, 'a> Any<'r, 'a> {
    /// Creates a container owning `value`.
    #[inline]
    pub fn new<T: Reflect>(registry: &'r Registry, value: T) -> Self {
        Self {
            registry,
            content: Content::Owned(handlers::raw(value)),
        }
    }

    /// Creates an empty container.
    #[inline]
    pub fn empty(registry: &'r Registry) -> Self {
        Self {
            registry,
            content: Content::Empty,
        }
    }

    /// Creates a container holding the unit value.
    ///
    /// This is a populated container standing for "no value", as returned by
    /// functions without a result.
    #[inline]
    pub fn void(registry: &'r Registry) -> Self {
        Self::new(registry, ())
    }

    /// Creates a mutable alias of `value`.
    #[inline]
    pub fn from_mut<T: Reflect>(registry: &'r Registry, value: &'a mut T) -> Self {
        Self {
            registry,
            content: Content::Exclusive(handlers::raw_mut(value)),
        }
    }

    /// Creates a const alias of `value`.
    #[inline]
    pub fn from_ref<T: Reflect>(registry: &'r Registry, value: &'a T) -> Self {
        Self::from_raw_ref(registry, handlers::raw_ref(value))
    }

    /// Creates an alias of the value referred to by `handle`.
    ///
    /// The alias is mutable if the handle is. An empty handle gives an empty
    /// container.
    #[inline]
    pub fn from_handle(registry: &'r Registry, handle: Handle<'a>) -> Self {
        let content = if handle.is_mutable() {
            handle.into_mut().map_or(Content::Empty, Content::Exclusive)
        } else {
            handle.into_ref().map_or(Content::Empty, Content::Shared)
        };
        Self { registry, content }
    }

    #[inline]
    pub(crate) fn from_raw(registry: &'r Registry, value: RawValue) -> Self {
        Self {
            registry,
            content: Content::Owned(value),
        }
    }

    #[inline]
    pub(crate) fn from_raw_ref(registry: &'r Registry, value: RawValueRef<'a>) -> Self {
        Self {
            registry,
            content: Content::Shared(value),
        }
    }

    /// Returns the registry the value is interpreted against.
    #[inline]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Returns `true` if the container holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.content, Content::Empty)
    }

    /// Returns `true` if the container refers to a value it does not own.
    #[inline]
    pub fn is_alias(&self) -> bool {
        matches!(self.content, Content::Shared(_) | Content::Exclusive(_))
    }

    /// Returns `true` if the container owns a value stored inline.
    #[inline]
    pub fn is_inline(&self) -> bool {
        match &self.content {
            Content::Owned(value) => value.is_inline(),
            _ => false,
        }
    }

    /// Returns `true` if the container owns a value of type `T`.
    #[inline]
    pub(crate) fn owns<T: Reflect>(&self) -> bool {
        matches!(&self.content, Content::Owned(value) if value.type_id() == TypeId::of::<T>())
    }

    /// Returns the type information of the held value.
    #[inline]
    pub fn type_info(&self) -> Option<&'static TypeInfo> {
        self.raw().map(RawValueRef::type_info)
    }

    /// Returns the [`TypeId`] of the held value.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.raw().map(RawValueRef::type_id)
    }

    /// Returns the reflected type of the held value, or `None` if the
    /// container is empty.
    #[inline]
    pub fn ty(&self) -> Option<Type<'r>> {
        self.type_info()
            .map(|info| self.registry.resolve_info(info))
    }

    /// Returns the address of the held value, or null if the container is
    /// empty.
    #[inline]
    pub fn data(&self) -> *const () {
        self.raw().map_or(core::ptr::null(), RawValueRef::as_ptr)
    }

    /// Returns the address of the held value, or null if the container is
    /// empty or a const alias.
    #[inline]
    pub fn data_mut(&mut self) -> *mut () {
        self.raw_mut()
            .map_or(core::ptr::null_mut(), |mut value| value.as_mut_ptr())
    }

    /// Returns a shared handle to the held value.
    #[inline]
    pub fn handle(&self) -> Handle<'_> {
        self.raw().map_or(Handle::empty(), Handle::from_raw_ref)
    }

    /// Returns a handle to the held value, exclusive unless the container is
    /// a const alias.
    #[inline]
    pub fn handle_mut(&mut self) -> Handle<'_> {
        match &mut self.content {
            Content::Empty => Handle::empty(),
            Content::Owned(value) => Handle::from_raw_mut(value.as_mut()),
            Content::Shared(value) => Handle::from_raw_ref(*value),
            Content::Exclusive(value) => Handle::from_raw_mut(value.reborrow()),
        }
    }

    #[inline]
    pub(crate) fn raw(&self) -> Option<RawValueRef<'_>> {
        match &self.content {
            Content::Empty => None,
            Content::Owned(value) => Some(value.as_ref()),
            Content::Shared(value) => Some(*value),
            Content::Exclusive(value) => Some(value.as_ref()),
        }
    }

    #[inline]
    pub(crate) fn raw_mut(&mut self) -> Option<RawValueMut<'_>> {
        match &mut self.content {
            Content::Owned(value) => Some(value.as_mut()),
            Content::Exclusive(value) => Some(value.reborrow()),
            Content::Empty | Content::Shared(_) => None,
        }
    }

    /// Returns a reference to the held value as a `T`, following registered
    /// bases if the held type is not `T` itself.
    pub fn try_cast<T: Reflect>(&self) -> Option<&T> {
        let value = self.raw()?;
        self.registry
            .upcast(value, TypeId::of::<T>())?
            .downcast::<T>()
    }

    /// Returns a mutable reference to the held value as a `T`, following
    /// registered bases if the held type is not `T` itself.
    ///
    /// Const aliases never give out mutable references.
    pub fn try_cast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        let registry = self.registry;
        let value = self.raw_mut()?;
        registry
            .upcast_mut(value, TypeId::of::<T>())?
            .downcast_mut::<T>()
            .ok()
    }

    /// Like [`try_cast`](Any::try_cast), for call sites that already know the
    /// cast succeeds.
    ///
    /// # Panics
    ///
    /// Panics if the held value cannot be cast to `T`.
    #[track_caller]
    pub fn cast<T: Reflect>(&self) -> &T {
        match self.try_cast::<T>() {
            Some(value) => value,
            None => cast_failed::<T>(self.type_name()),
        }
    }

    /// Like [`try_cast_mut`](Any::try_cast_mut), for call sites that already
    /// know the cast succeeds.
    ///
    /// # Panics
    ///
    /// Panics if the held value cannot be cast to `T` or if the container is
    /// a const alias.
    #[track_caller]
    pub fn cast_mut<T: Reflect>(&mut self) -> &mut T {
        let type_name = self.type_name();
        match self.try_cast_mut::<T>() {
            Some(value) => value,
            None => cast_failed::<T>(type_name),
        }
    }

    /// Returns `true` if [`try_cast`](Any::try_cast) to `T` would succeed.
    pub fn can_cast<T: Reflect>(&self) -> bool {
        self.type_id()
            .is_some_and(|from| self.registry.can_cast(from, TypeId::of::<T>()))
    }

    /// Returns `true` if the held value can be cast or converted to `T`.
    pub fn can_convert<T: Reflect>(&self) -> bool {
        self.type_id()
            .is_some_and(|from| self.registry.accepts(from, TypeId::of::<T>()))
    }

    /// Converts the held value to a `T`.
    ///
    /// A value that can be cast to `T` is copied without involving any
    /// conversion. Otherwise the first conversion to `T` found on the held
    /// type or its bases is applied. The result is empty if there is none.
    pub fn convert<T: Reflect>(&self) -> Any<'r, 'static> {
        self.convert_to(TypeId::of::<T>())
    }

    /// Converts the held value to a `T` in place.
    ///
    /// Returns `true` if the container can be cast to `T` afterwards. A value
    /// that already can is left as is. On failure the container is left
    /// untouched.
    pub fn coerce<T: Reflect>(&mut self) -> bool {
        self.coerce_to(TypeId::of::<T>())
    }

    pub(crate) fn convert_to(&self, target: TypeId) -> Any<'r, 'static> {
        let Some(value) = self.raw() else {
            return Any::empty(self.registry);
        };
        match self.registry.upcast(value, target) {
            Some(value) => value
                .try_clone()
                .map_or_else(|| Any::empty(self.registry), |value| {
                    Any::from_raw(self.registry, value)
                }),
            None => self.registry.convert(value, target),
        }
    }

    pub(crate) fn coerce_to(&mut self, target: TypeId) -> bool {
        let Some(current) = self.type_id() else {
            return false;
        };
        if self.registry.can_cast(current, target) {
            return true;
        }
        let converted = self.convert_to(target);
        if converted.is_empty() {
            return false;
        }
        *self = converted;
        true
    }

    /// Replaces the content of the container with an owned `value`.
    pub fn emplace<T: Reflect>(&mut self, value: T) {
        *self = Any::new(self.registry, value);
    }

    /// Moves the held value out if the container owns a `T`, and gives the
    /// container back otherwise.
    ///
    /// Moving the value out does not run the destructor hook.
    pub fn take<T: Reflect>(mut self) -> Result<T, Self> {
        match core::mem::replace(&mut self.content, Content::Empty) {
            Content::Owned(value) => value.into_inner::<T>().map_err(|value| {
                self.content = Content::Owned(value);
                self
            }),
            content => {
                self.content = content;
                Err(self)
            }
        }
    }

    /// Moves the owned value of type `T` out, leaving the container empty.
    pub(crate) fn take_owned<T: Reflect>(&mut self) -> Option<T> {
        let registry = self.registry;
        core::mem::replace(self, Any::empty(registry))
            .take::<T>()
            .map_err(|value| *self = value)
            .ok()
    }

    /// Returns `true` if an argument of type `target` can be obtained from
    /// the container, by moving its owned value, by cloning it, or by a
    /// conversion.
    pub(crate) fn can_pass_as(&self, target: TypeId) -> bool {
        let Some(value) = self.raw() else {
            return false;
        };
        if matches!(&self.content, Content::Owned(owned) if owned.type_id() == target) {
            return true;
        }
        match self.registry.upcast(value, target) {
            Some(value) => value.try_clone().is_some(),
            None => self.registry.can_convert(value.type_id(), target),
        }
    }

    /// Clones the held value into an owned container, or returns `None` if
    /// the container is empty or the type cannot be cloned.
    ///
    /// Unlike [`clone`](Clone::clone), the result does not borrow what an
    /// alias refers to.
    pub fn try_clone(&self) -> Option<Any<'r, 'static>> {
        let value = self.raw()?.try_clone()?;
        Some(Any::from_raw(self.registry, value))
    }

    /// Turns the container into one that owns its value.
    ///
    /// An owned value is moved without being copied or dropped. An alias is
    /// cloned, and gives an empty container if its type cannot be cloned.
    pub fn into_owned(mut self) -> Any<'r, 'static> {
        let registry = self.registry;
        if !matches!(self.content, Content::Owned(_)) {
            return self.try_clone().unwrap_or_else(|| Any::empty(registry));
        }
        match core::mem::replace(&mut self.content, Content::Empty) {
            Content::Owned(value) => Any::from_raw(registry, value),
            _ => Any::empty(registry),
        }
    }

    /// Swaps the content of two containers.
    #[inline]
    pub fn swap(&mut self, other: &mut Any<'r, 'a>) {
        core::mem::swap(self, other);
    }

    /// Name of the held type, for diagnostics.
    fn type_name(&self) -> &'static str {
        self.type_info().map_or("<empty>", TypeInfo::type_name)
    }
}

#[cold]
#[track_caller]
fn cast_failed<T: Reflect>(held: &'static str) -> ! {
    panic!(
        "cannot cast a value of type `{held}` to `{}`",
        core::any::type_name::<T>()
    )
}

impl Drop for Any<'_, '_> {
    fn drop(&mut self) {
        if let Content::Owned(value) = &mut self.content {
            self.registry.run_dtor(value.as_mut());
        }
    }
}

impl Clone for Any<'_, '_> {
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|| Any::empty(self.registry))
    }
}

impl<'s, 'b> PartialEq<Any<'s, 'b>> for Any<'_, '_> {
    fn eq(&self, other: &Any<'s, 'b>) -> bool {
        match (self.raw(), other.raw()) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => lhs.equals(rhs),
            _ => false,
        }
    }
}

impl core::fmt::Debug for Any<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let storage = match &self.content {
            Content::Empty => "empty",
            Content::Owned(value) if value.is_inline() => "inline",
            Content::Owned(_) => "boxed",
            Content::Shared(_) => "const alias",
            Content::Exclusive(_) => "alias",
        };
        f.debug_struct("Any")
            .field("type", &self.type_name())
            .field("storage", &storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_empty_and_void() {
        let registry = Registry::new();
        let empty = Any::empty(&registry);
        let void = Any::void(&registry);

        assert!(empty.is_empty());
        assert!(empty.ty().is_none());
        assert!(empty.data().is_null());
        assert!(!void.is_empty());
        assert!(void.ty().is_some_and(|ty| ty.is_void()));
        assert_eq!(empty, Any::empty(&registry));
        assert_ne!(empty, void);
    }

    #[test]
    fn test_storage_classes() {
        let registry = Registry::new();
        let small = Any::new(&registry, 'c');
        let large = Any::new(&registry, String::from("large"));

        assert!(small.is_inline());
        assert!(!large.is_inline());
        assert!(!small.is_alias());

        let mut external = 3u64;
        let alias = Any::from_mut(&registry, &mut external);
        assert!(alias.is_alias());
        assert!(!alias.is_inline());
    }

    #[test]
    fn test_swap_mixed_storage() {
        let registry = Registry::new();
        let mut small = Any::new(&registry, 'c');
        let mut large = Any::new(&registry, String::from("large"));

        small.swap(&mut large);

        assert_eq!(small.try_cast::<String>().map(String::as_str), Some("large"));
        assert_eq!(large.try_cast::<char>(), Some(&'c'));
        assert!(!small.is_inline());
        assert!(large.is_inline());
        let inline = large.try_cast::<char>().map(|c| core::ptr::from_ref(c).cast::<()>());
        assert_eq!(Some(large.data()), inline);
    }

    #[test]
    fn test_const_alias_refuses_mutation() {
        let registry = Registry::new();
        let value = 5i64;
        let mut alias = Any::from_ref(&registry, &value);

        assert_eq!(alias.try_cast::<i64>(), Some(&5));
        assert!(alias.try_cast_mut::<i64>().is_none());
        assert!(alias.data_mut().is_null());
        assert!(!alias.handle_mut().is_mutable());
    }

    #[test]
    fn test_clone_copies_aliases() {
        let registry = Registry::new();
        let mut external = String::from("shared");
        let alias = Any::from_mut(&registry, &mut external);
        assert!(!alias.clone().is_alias());
        let mut copy = alias.try_clone().unwrap();
        drop(alias);

        assert!(!copy.is_alias());
        copy.cast_mut::<String>().push_str(" copy");
        assert_eq!(external, "shared");
        assert_eq!(copy.cast::<String>(), "shared copy");
    }

    #[test]
    fn test_into_owned() {
        let registry = Registry::new();
        let mut external = String::from("aliased");
        let owned = Any::from_mut(&registry, &mut external).into_owned();
        external.push('!');
        assert_eq!(owned.cast::<String>(), "aliased");
        assert_eq!(external, "aliased!");

        let boxed = Any::new(&registry, String::from("moved"));
        let address = boxed.data();
        let moved = boxed.into_owned();
        assert_eq!(moved.data(), address);
        assert!(Any::empty(&registry).into_owned().is_empty());
    }

    #[test]
    fn test_take_owned_only_moves_owned_values() {
        let registry = Registry::new();
        let mut value = Any::new(&registry, String::from("moved"));
        assert_eq!(value.take_owned::<u8>(), None);
        assert_eq!(value.take_owned::<String>().as_deref(), Some("moved"));
        assert!(value.is_empty());

        let text = String::from("aliased");
        let mut alias = Any::from_ref(&registry, &text);
        assert!(alias.take_owned::<String>().is_none());
        assert!(!alias.is_empty());
    }

    #[test]
    fn test_convert_same_type_and_take() {
        let registry = Registry::new();
        let value = Any::new(&registry, 12u16);

        let converted = value.convert::<u16>();
        assert_eq!(converted, value);
        assert!(value.convert::<u32>().is_empty());
        assert!(value.can_cast::<u16>());
        assert!(!value.can_convert::<u32>());

        let value = value.take::<u32>().unwrap_err();
        assert_eq!(value.take::<u16>().ok(), Some(12));
    }

    #[test]
    fn test_emplace() {
        let registry = Registry::new();
        let mut value = Any::new(&registry, 1u8);
        value.emplace(String::from("replaced"));
        assert_eq!(value.try_cast::<String>().map(String::as_str), Some("replaced"));
        assert!(value.try_cast::<u8>().is_none());
    }

    #[test]
    #[should_panic(expected = "cannot cast a value of type `u8` to `i8`")]
    fn test_cast_panics_on_mismatch() {
        let registry = Registry::new();
        let value = Any::new(&registry, 1u8);
        let _ = value.cast::<i8>();
    }
}
