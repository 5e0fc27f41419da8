//! Static per-type information.
//!
//! A [`TypeInfo`] is created once per type as a `&'static` constant and is
//! shared by every erased value, vtable and metadata node that refers to the
//! type. It is what a reflection layer can say about a type without any
//! registration: its identity, its classification and its shape.

use core::any::TypeId;

bitflags::bitflags! {
    /// Classification of a type.
    ///
    /// Several flags may be set at once: a function pointer is also a
    /// pointer, for instance.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeTraits: u16 {
        /// The unit type, standing for "no value".
        const VOID = 1 << 0;
        /// Integer types, `bool` and `char`.
        const INTEGRAL = 1 << 1;
        /// `f32` and `f64`.
        const FLOATING_POINT = 1 << 2;
        /// Fixed-size arrays.
        const ARRAY = 1 << 3;
        /// Enumerations.
        const ENUM = 1 << 4;
        /// Untagged unions.
        const UNION = 1 << 5;
        /// Structs and other aggregate types.
        const CLASS = 1 << 6;
        /// Raw pointers.
        const POINTER = 1 << 7;
        /// Function pointers.
        const FUNCTION_POINTER = 1 << 8;
        /// Projections from a type to one of its fields.
        const MEMBER_OBJECT_POINTER = 1 << 9;
        /// Projections from a type to one of its methods.
        const MEMBER_FUNCTION_POINTER = 1 << 10;
    }
}

/// Static information about a single type.
///
/// Equality is type identity: two [`TypeInfo`]s are equal exactly when they
/// describe the same type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    /// Gets the [`TypeId`] of the described type.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the described type.
    type_name: fn() -> &'static str,
    /// Classification flags.
    traits: TypeTraits,
    /// Number of elements if the type is an array, zero otherwise.
    extent: usize,
    /// Size of the type in bytes.
    size: usize,
    /// Gets the information of the pointee if the type is a pointer, or of
    /// the type itself otherwise.
    remove_pointer: fn() -> &'static TypeInfo,
}

impl TypeInfo {
    /// Creates the information record of `T`.
    ///
    /// This is meant to be evaluated in a constant context, so the record can
    /// be promoted to a `&'static` reference.
    pub const fn new<T: 'static>(
        traits: TypeTraits,
        extent: usize,
        remove_pointer: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: core::any::type_name::<T>,
            traits,
            extent,
            size: size_of::<T>(),
            remove_pointer,
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns the name of the described type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns `true` if this record describes `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// Returns the classification flags.
    #[inline]
    pub fn traits(&self) -> TypeTraits {
        self.traits
    }

    /// Returns the number of elements of an array type, zero otherwise.
    #[inline]
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Returns the size of the described type in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Strips one level of pointer.
    #[inline]
    pub fn remove_pointer(&self) -> &'static TypeInfo {
        (self.remove_pointer)()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeInfo {}

impl core::hash::Hash for TypeInfo {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

impl core::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.type_name())
            .field("traits", &self.traits)
            .field("extent", &self.extent)
            .finish()
    }
}
