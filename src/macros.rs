/// Implements [`Reflect`] for a struct, enum or union.
///
/// The type is classified from the keyword in front of it: no keyword for a
/// struct, `enum` or `union` otherwise. The optional list after the colon
/// selects the strategies derived from the standard traits of the type:
///
/// - `Clone` makes values of the type copyable when erased, which is needed to
///   pass them as arguments, read them from data members and clone an
///   [`Any`] holding them.
/// - `PartialEq` makes erased values compare by value instead of by identity.
///
/// [`Reflect`]: crate::Reflect
/// [`Any`]: crate::Any
///
/// # Examples
///
/// ```
/// use metagraph::{Registry, impl_reflect};
///
/// #[derive(Clone, PartialEq)]
/// struct Vec2 {
///     x: f32,
///     y: f32,
/// }
///
/// #[derive(Clone, Copy, PartialEq)]
/// enum Axis {
///     X,
///     Y,
/// }
///
/// struct Opaque;
///
/// impl_reflect!(Vec2: Clone, PartialEq);
/// impl_reflect!(enum Axis: Clone, PartialEq);
/// impl_reflect!(Opaque);
///
/// let registry = Registry::new();
/// assert!(registry.resolve::<Axis>().is_enum());
///
/// let a = registry.any(Vec2 { x: 1.0, y: 2.0 });
/// assert_eq!(a, a.clone());
///
/// let b = registry.any(Opaque);
/// assert!(b.clone().is_empty());
/// assert_eq!(b, b);
/// assert_ne!(b, registry.any(Opaque));
/// ```
#[macro_export]
macro_rules! impl_reflect {
    (enum $ty:ty $(: $($capability:ident),+ $(,)?)?) => {
        $crate::__impl_reflect!($ty, $crate::TypeTraits::ENUM $($(, $capability)+)?);
    };
    (union $ty:ty $(: $($capability:ident),+ $(,)?)?) => {
        $crate::__impl_reflect!($ty, $crate::TypeTraits::UNION $($(, $capability)+)?);
    };
    ($ty:ty $(: $($capability:ident),+ $(,)?)?) => {
        $crate::__impl_reflect!($ty, $crate::TypeTraits::CLASS $($(, $capability)+)?);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect {
    ($ty:ty, $traits:expr $(, $capability:ident)*) => {
        impl $crate::Reflect for $ty {
            const TRAITS: $crate::TypeTraits = $traits;

            $($crate::__reflect_capability!($capability);)*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_capability {
    (Clone) => {
        fn reflect_clone(&self) -> ::core::option::Option<Self> {
            ::core::option::Option::Some(::core::clone::Clone::clone(self))
        }
    };
    (PartialEq) => {
        fn reflect_eq(&self, other: &Self) -> ::core::option::Option<bool> {
            ::core::option::Option::Some(::core::cmp::PartialEq::eq(self, other))
        }
    };
}
