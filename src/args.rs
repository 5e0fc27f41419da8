//! Argument lists for constructors and functions.
//!
//! Two sides meet here. On the registration side, [`ArgList`] describes the
//! static argument types of a constructor or function and extracts typed
//! arguments out of erased ones. On the calling side, [`IntoArgs`] turns
//! whatever the caller passes into erased arguments.

use alloc::vec::Vec;

use metagraph_internals::TypeInfo;

use crate::{Any, Reflect, Registry, type_info};

/// A tuple of argument types, of arity 0 to 6.
///
/// Arguments are passed by value. An erased argument is accepted for a
/// position if it can be cast to the argument type, or converted to it
/// through a registered conversion. An owned argument of exactly the
/// argument type is moved out of its container. Aliases and values of derived
/// types are cloned instead, which requires the argument type to provide
/// [`Reflect::reflect_clone`].
pub trait ArgList: Sized + 'static {
    /// Number of arguments.
    const ARITY: usize;

    /// Returns the type of the argument at `index`.
    fn arg(index: usize) -> Option<&'static TypeInfo>;

    /// Extracts typed arguments from erased ones.
    ///
    /// Arguments that need a conversion are converted in place, and owned
    /// arguments are moved out. Returns `None`, moving nothing, if the number
    /// of arguments is wrong or one of them is not accepted.
    fn extract(args: &mut [Any<'_, '_>]) -> Option<Self>;
}

/// How an accepted argument reaches the callee.
enum Slot<A> {
    /// Moved out of its container once every argument is ready.
    Move,
    /// Cloned out of an alias or out of a derived value.
    Cloned(A),
}

/// Converts `arg` in place so that it can be cast to `A`, if possible.
fn accept<A: Reflect>(arg: &mut Any<'_, '_>) -> bool {
    arg.can_cast::<A>() || arg.coerce::<A>()
}

fn prepare<A: Reflect>(arg: &Any<'_, '_>) -> Option<Slot<A>> {
    if arg.owns::<A>() {
        return Some(Slot::Move);
    }
    arg.try_cast::<A>()?.reflect_clone().map(Slot::Cloned)
}

fn finish<A: Reflect>(slot: Slot<A>, arg: &mut Any<'_, '_>) -> Option<A> {
    match slot {
        Slot::Move => arg.take_owned::<A>(),
        Slot::Cloned(value) => Some(value),
    }
}

/// Obtains a single `A` from `arg`, converting, moving or cloning it.
pub(crate) fn pass<A: Reflect>(arg: &mut Any<'_, '_>) -> Option<A> {
    if !accept::<A>(arg) {
        return None;
    }
    let slot = prepare::<A>(arg)?;
    finish(slot, arg)
}

macro_rules! arg_list {
    ($arity:literal; $($name:ident: $index:tt),*) => {
        impl<$($name: Reflect),*> ArgList for ($($name,)*) {
            const ARITY: usize = $arity;

            fn arg(index: usize) -> Option<&'static TypeInfo> {
                match index {
                    $($index => Some(type_info::<$name>()),)*
                    _ => None,
                }
            }

            #[allow(non_snake_case)]
            fn extract(args: &mut [Any<'_, '_>]) -> Option<Self> {
                let [$($name),*] = args else {
                    return None;
                };
                if !(true $(&& accept::<$name>($name))*) {
                    return None;
                }
                let ($($name,)*) = ($((prepare::<$name>($name)?, $name),)*);
                Some(($(finish::<$name>($name.0, $name.1)?,)*))
            }
        }
    };
}

arg_list!(0;);
arg_list!(1; A: 0);
arg_list!(2; A: 0, B: 1);
arg_list!(3; A: 0, B: 1, C: 2);
arg_list!(4; A: 0, B: 1, C: 2, D: 3);
arg_list!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
arg_list!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// A single argument passed to a reflected call.
///
/// Implemented for every [`Reflect`] type, which is moved into an owned
/// [`Any`], and for [`Any`] itself, which is passed along unchanged.
pub trait IntoArg<'r, 'a> {
    /// Converts `self` into an erased argument.
    fn into_arg(self, registry: &'r Registry) -> Any<'r, 'a>;
}

impl<'r, 'a> IntoArg<'r, 'a> for Any<'r, 'a> {
    #[inline]
    fn into_arg(self, _registry: &'r Registry) -> Any<'r, 'a> {
        self
    }
}

impl<'r, 'a, T: Reflect> IntoArg<'r, 'a> for T {
    #[inline]
    fn into_arg(self, registry: &'r Registry) -> Any<'r, 'a> {
        Any::new(registry, self)
    }
}

/// The arguments of a reflected call.
///
/// Implemented for tuples of up to six [`IntoArg`] values, and for vectors
/// and arrays of [`Any`].
///
/// # Examples
///
/// ```
/// use metagraph::{Any, IntoArgs, Registry};
///
/// let registry = Registry::new();
/// let args = (1u8, Any::new(&registry, 2.0f32)).into_args(&registry);
/// assert_eq!(args.len(), 2);
/// assert_eq!(args[0].try_cast::<u8>(), Some(&1));
/// ```
pub trait IntoArgs<'r, 'a> {
    /// Converts `self` into erased arguments.
    fn into_args(self, registry: &'r Registry) -> Vec<Any<'r, 'a>>;
}

impl<'r, 'a> IntoArgs<'r, 'a> for Vec<Any<'r, 'a>> {
    #[inline]
    fn into_args(self, _registry: &'r Registry) -> Vec<Any<'r, 'a>> {
        self
    }
}

impl<'r, 'a, const N: usize> IntoArgs<'r, 'a> for [Any<'r, 'a>; N] {
    #[inline]
    fn into_args(self, _registry: &'r Registry) -> Vec<Any<'r, 'a>> {
        self.into()
    }
}

macro_rules! into_args {
    ($($name:ident),*) => {
        impl<'r, 'a, $($name: IntoArg<'r, 'a>),*> IntoArgs<'r, 'a> for ($($name,)*) {
            #[allow(non_snake_case, unused_variables)]
            fn into_args(self, registry: &'r Registry) -> Vec<Any<'r, 'a>> {
                let ($($name,)*) = self;
                alloc::vec![$($name.into_arg(registry)),*]
            }
        }
    };
}

into_args!();
into_args!(A);
into_args!(A, B);
into_args!(A, B, C);
into_args!(A, B, C, D);
into_args!(A, B, C, D, E);
into_args!(A, B, C, D, E, F);
