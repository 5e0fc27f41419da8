//! The [`Reflect`] trait and its implementations for standard types.

use alloc::{string::String, vec::Vec};

pub use metagraph_internals::{TypeInfo, TypeTraits};

/// Trait for types that can be stored in an [`Any`](crate::Any) and described
/// by a [`Registry`](crate::Registry).
///
/// Implementing the trait does not register anything: it only gives the type
/// a static [`TypeInfo`] and, optionally, clone and equality strategies. Use
/// [`impl_reflect!`](crate::impl_reflect) for the common cases.
///
/// # Strategies
///
/// - [`reflect_clone`](Reflect::reflect_clone) is used to copy erased values.
///   Without it, cloning an [`Any`](crate::Any) of this type yields an empty
///   container, and arguments of this type can only be moved out of owned
///   containers, not copied out of aliases.
/// - [`reflect_eq`](Reflect::reflect_eq) is used to compare erased values.
///   Without it, two values compare equal only if they are the same instance.
///
/// # Examples
///
/// ```
/// use metagraph::{Reflect, TypeTraits, type_info};
///
/// #[derive(Clone, PartialEq)]
/// struct Meters(f64);
///
/// impl Reflect for Meters {
///     fn reflect_clone(&self) -> Option<Self> {
///         Some(self.clone())
///     }
///
///     fn reflect_eq(&self, other: &Self) -> Option<bool> {
///         Some(self == other)
///     }
/// }
///
/// assert!(type_info::<Meters>().traits().contains(TypeTraits::CLASS));
/// ```
pub trait Reflect: Sized + 'static {
    /// Classification of the type.
    const TRAITS: TypeTraits = TypeTraits::CLASS;

    /// Number of elements if the type is an array.
    const EXTENT: usize = 0;

    /// Returns the information of the pointee if the type is a pointer, or of
    /// the type itself otherwise.
    fn remove_pointer() -> &'static TypeInfo {
        type_info::<Self>()
    }

    /// Duplicates the value, or returns `None` if the type cannot be
    /// duplicated.
    fn reflect_clone(&self) -> Option<Self> {
        None
    }

    /// Compares two values, or returns `None` if the type has no equality.
    fn reflect_eq(&self, _other: &Self) -> Option<bool> {
        None
    }
}

/// Returns the static type information of `T`.
#[inline]
pub fn type_info<T: Reflect>() -> &'static TypeInfo {
    const { &TypeInfo::new::<T>(T::TRAITS, T::EXTENT, T::remove_pointer) }
}

macro_rules! reflect_primitive {
    ($traits:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                const TRAITS: TypeTraits = $traits;

                fn reflect_clone(&self) -> Option<Self> {
                    Some(*self)
                }

                #[allow(clippy::float_cmp)]
                fn reflect_eq(&self, other: &Self) -> Option<bool> {
                    Some(self == other)
                }
            }
        )+
    };
}

reflect_primitive!(
    TypeTraits::INTEGRAL =>
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);
reflect_primitive!(TypeTraits::FLOATING_POINT => f32, f64);
reflect_primitive!(TypeTraits::VOID => ());
reflect_primitive!(TypeTraits::empty() => &'static str);

impl Reflect for String {
    fn reflect_clone(&self) -> Option<Self> {
        Some(self.clone())
    }

    fn reflect_eq(&self, other: &Self) -> Option<bool> {
        Some(self == other)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    const TRAITS: TypeTraits = TypeTraits::ARRAY;
    const EXTENT: usize = N;

    fn reflect_clone(&self) -> Option<Self> {
        let items: Option<Vec<T>> = self.iter().map(T::reflect_clone).collect();
        items?.try_into().ok()
    }

    fn reflect_eq(&self, other: &Self) -> Option<bool> {
        elements_eq(self, other)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_clone(&self) -> Option<Self> {
        self.iter().map(T::reflect_clone).collect()
    }

    fn reflect_eq(&self, other: &Self) -> Option<bool> {
        if self.len() != other.len() {
            return Some(false);
        }
        elements_eq(self, other)
    }
}

impl<T: Reflect> Reflect for Option<T> {
    const TRAITS: TypeTraits = TypeTraits::ENUM;

    fn reflect_clone(&self) -> Option<Self> {
        match self {
            Some(value) => Some(Some(value.reflect_clone()?)),
            None => Some(None),
        }
    }

    fn reflect_eq(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Some(lhs), Some(rhs)) => lhs.reflect_eq(rhs),
            (None, None) => Some(true),
            _ => Some(false),
        }
    }
}

/// Compares two slices of the same length element by element.
fn elements_eq<T: Reflect>(lhs: &[T], rhs: &[T]) -> Option<bool> {
    lhs.iter()
        .zip(rhs)
        .try_fold(true, |equal, (lhs, rhs)| Some(equal && lhs.reflect_eq(rhs)?))
}

macro_rules! reflect_raw_pointer {
    ($($ptr:ty),+) => {
        $(
            impl<T: Reflect> Reflect for $ptr {
                const TRAITS: TypeTraits = TypeTraits::POINTER;

                fn remove_pointer() -> &'static TypeInfo {
                    type_info::<T>()
                }

                fn reflect_clone(&self) -> Option<Self> {
                    Some(*self)
                }

                fn reflect_eq(&self, other: &Self) -> Option<bool> {
                    Some(core::ptr::eq(*self, *other))
                }
            }
        )+
    };
}

reflect_raw_pointer!(*const T, *mut T);

macro_rules! reflect_fn_pointer {
    ($($arg:ident),*) => {
        impl<R: 'static, $($arg: 'static),*> Reflect for fn($($arg),*) -> R {
            const TRAITS: TypeTraits = TypeTraits::POINTER.union(TypeTraits::FUNCTION_POINTER);

            fn reflect_clone(&self) -> Option<Self> {
                Some(*self)
            }

            fn reflect_eq(&self, other: &Self) -> Option<bool> {
                Some(core::ptr::fn_addr_eq(*self, *other))
            }
        }
    };
}

reflect_fn_pointer!();
reflect_fn_pointer!(A);
reflect_fn_pointer!(A, B);
reflect_fn_pointer!(A, B, C);
