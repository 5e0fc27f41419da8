//! Non-owning references to reflected values.

use metagraph_internals::{RawValueMut, RawValueRef, TypeInfo};

use crate::{Any, Reflect, handlers};

/// A non-owning reference to a value of some reflected type.
///
/// A handle is the receiver of reflected operations: the instance a data
/// member is read from or a function is invoked on. It never takes part in
/// the lifetime of the value it refers to.
///
/// Handles come in three flavors:
///
/// - **Empty**: refers to nothing. Passing it where a receiver is required
///   makes the operation fail. Static members ignore the receiver, so an empty
///   handle is what they are usually given.
/// - **Shared**: built from a `&T` or a `&Any`. Allows reading only.
/// - **Exclusive**: built from a `&mut T` or a `&mut Any`. Allows reading,
///   writing and calling mutating functions.
///
/// # Examples
///
/// ```
/// use metagraph::Handle;
///
/// let mut value = 42u32;
/// let handle = Handle::from(&mut value);
/// assert!(handle.is_mutable());
/// assert!(handle.type_info().is_some_and(|info| info.is::<u32>()));
///
/// assert!(Handle::empty().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Handle<'a> {
    /// The referenced value.
    inner: Inner<'a>,
}

/// What a [`Handle`] refers to.
#[derive(Debug, Default)]
enum Inner<'a> {
    /// Nothing.
    #[default]
    Empty,
    /// A value that may only be read.
    Shared(RawValueRef<'a>),
    /// A value that may be read and written.
    Exclusive(RawValueMut<'a>),
}

impl<'a> Handle<'a> {
    /// Creates an exclusive handle to `value`.
    #[inline]
    pub fn new<T: Reflect>(value: &'a mut T) -> Self {
        Self::from_raw_mut(handlers::raw_mut(value))
    }

    /// Creates a shared handle to `value`.
    #[inline]
    pub fn new_ref<T: Reflect>(value: &'a T) -> Self {
        Self::from_raw_ref(handlers::raw_ref(value))
    }

    /// Creates a handle that refers to nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            inner: Inner::Empty,
        }
    }

    #[inline]
    pub(crate) fn from_raw_ref(value: RawValueRef<'a>) -> Self {
        Self {
            inner: Inner::Shared(value),
        }
    }

    #[inline]
    pub(crate) fn from_raw_mut(value: RawValueMut<'a>) -> Self {
        Self {
            inner: Inner::Exclusive(value),
        }
    }

    /// Returns `true` if the handle refers to nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.inner, Inner::Empty)
    }

    /// Returns `true` if the handle allows writing to the value.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        matches!(self.inner, Inner::Exclusive(_))
    }

    /// Returns the type information of the referenced value.
    #[inline]
    pub fn type_info(&self) -> Option<&'static TypeInfo> {
        match &self.inner {
            Inner::Empty => None,
            Inner::Shared(value) => Some(value.type_info()),
            Inner::Exclusive(value) => Some(value.type_info()),
        }
    }

    /// Returns the address of the referenced value, or null if the handle is
    /// empty.
    #[inline]
    pub fn data(&self) -> *const () {
        match &self.inner {
            Inner::Empty => core::ptr::null(),
            Inner::Shared(value) => value.as_ptr(),
            Inner::Exclusive(value) => value.as_ref().as_ptr(),
        }
    }

    /// Reborrows the handle for a shorter lifetime.
    #[inline]
    pub fn reborrow(&mut self) -> Handle<'_> {
        match &mut self.inner {
            Inner::Empty => Handle::empty(),
            Inner::Shared(value) => Handle::from_raw_ref(*value),
            Inner::Exclusive(value) => Handle::from_raw_mut(value.reborrow()),
        }
    }

    /// Returns a shared view of the value, whatever the flavor of the handle.
    #[inline]
    pub(crate) fn into_ref(self) -> Option<RawValueRef<'a>> {
        match self.inner {
            Inner::Empty => None,
            Inner::Shared(value) => Some(value),
            Inner::Exclusive(value) => Some(value.into_ref()),
        }
    }

    /// Returns a mutable view of the value if the handle is exclusive.
    #[inline]
    pub(crate) fn into_mut(self) -> Option<RawValueMut<'a>> {
        match self.inner {
            Inner::Exclusive(value) => Some(value),
            Inner::Empty | Inner::Shared(_) => None,
        }
    }
}

impl<'a, T: Reflect> From<&'a mut T> for Handle<'a> {
    #[inline]
    fn from(value: &'a mut T) -> Self {
        Self::new(value)
    }
}

impl<'a, T: Reflect> From<&'a T> for Handle<'a> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::new_ref(value)
    }
}

impl<'a> From<&'a mut Any<'_, '_>> for Handle<'a> {
    #[inline]
    fn from(value: &'a mut Any<'_, '_>) -> Self {
        value.handle_mut()
    }
}

impl<'a> From<&'a Any<'_, '_>> for Handle<'a> {
    #[inline]
    fn from(value: &'a Any<'_, '_>) -> Self {
        value.handle()
    }
}
