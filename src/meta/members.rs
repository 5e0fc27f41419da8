use super::{all_props, find_prop};
use crate::{
    Any, Handle, IntoArgs, Reflect, Registry, Type, handlers,
    registry::node::{BaseNode, ConvNode, CtorNode, DtorNode, PropNode, TypeNode},
};

/// Implements the parts shared by every view of an element owned by a type.
macro_rules! member_view {
    ($name:ident, $node:ty) => {
        impl<'r> $name<'r> {
            pub(crate) fn new(
                registry: &'r Registry,
                parent: &'r TypeNode,
                node: &'r $node,
            ) -> Self {
                Self {
                    registry,
                    parent,
                    node,
                }
            }

            /// Returns the type that declared the element.
            #[inline]
            pub fn parent(self) -> Type<'r> {
                self.registry.resolve_info(self.parent.info)
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                core::ptr::eq(self.node, other.node)
            }
        }

        impl Eq for $name<'_> {}
    };
}

/// A base of a reflected type.
#[derive(Clone, Copy)]
pub struct Base<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r BaseNode,
}

member_view!(Base, BaseNode);

impl<'r> Base<'r> {
    /// Returns the base type.
    #[inline]
    pub fn ty(self) -> Type<'r> {
        self.registry.resolve_info(self.node.target)
    }

    /// Returns a handle to the base part of the value behind `handle`.
    ///
    /// The value may be of the declaring type or of a type deriving from it.
    /// The result keeps the flavor of `handle`, and is empty if the value is
    /// of an unrelated type.
    pub fn cast<'h>(self, handle: impl Into<Handle<'h>>) -> Handle<'h> {
        let handle = handle.into();
        let parent = self.parent.info.type_id();
        if handle.is_mutable() {
            handle
                .into_mut()
                .and_then(|value| self.registry.upcast_mut(value, parent))
                .and_then(self.node.upcast_mut)
                .map_or_else(Handle::empty, Handle::from_raw_mut)
        } else {
            handle
                .into_ref()
                .and_then(|value| self.registry.upcast(value, parent))
                .and_then(self.node.upcast)
                .map_or_else(Handle::empty, Handle::from_raw_ref)
        }
    }
}

impl core::fmt::Debug for Base<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Base")
            .field("parent", &self.parent.info.type_name())
            .field("base", &self.node.target.type_name())
            .finish()
    }
}

/// A conversion of a reflected type to another type.
#[derive(Clone, Copy)]
pub struct Conv<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r ConvNode,
}

member_view!(Conv, ConvNode);

impl<'r> Conv<'r> {
    /// Returns the target type.
    #[inline]
    pub fn ty(self) -> Type<'r> {
        self.registry.resolve_info(self.node.target)
    }

    /// Converts the value behind `handle`.
    ///
    /// The result is empty if the value cannot be cast to the declaring type.
    pub fn convert<'h>(self, handle: impl Into<Handle<'h>>) -> Any<'r, 'static> {
        let value = handle
            .into()
            .into_ref()
            .and_then(|value| self.registry.upcast(value, self.parent.info.type_id()));
        match value {
            Some(value) => (self.node.convert)(self.registry, value),
            None => Any::empty(self.registry),
        }
    }
}

impl core::fmt::Debug for Conv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Conv")
            .field("from", &self.parent.info.type_name())
            .field("to", &self.node.target.type_name())
            .finish()
    }
}

/// A constructor of a reflected type.
#[derive(Clone, Copy)]
pub struct Ctor<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r CtorNode,
}

member_view!(Ctor, CtorNode);

impl<'r> Ctor<'r> {
    /// Returns the number of arguments.
    #[inline]
    pub fn arity(self) -> usize {
        self.node.signature.arity
    }

    /// Returns the type of the argument at `index`.
    pub fn arg(self, index: usize) -> Option<Type<'r>> {
        (self.node.signature.arg)(index).map(|info| self.registry.resolve_info(info))
    }

    /// Builds a value from `args`.
    ///
    /// Arguments of other types than expected are converted in place when a
    /// conversion exists. The result is empty if the arguments are not
    /// accepted.
    pub fn invoke<'a>(self, args: impl IntoArgs<'r, 'a>) -> Any<'r, 'static> {
        let mut args = args.into_args(self.registry);
        (self.node.construct)(self.registry, &mut args)
    }

    /// Returns the properties of the constructor.
    pub fn props(self) -> impl ExactSizeIterator<Item = Prop<'r>> + 'r {
        all_props(self.registry, &self.node.props)
    }

    /// Returns the property with a key equal to `key`.
    pub fn prop<K: Reflect>(self, key: K) -> Option<Prop<'r>> {
        find_prop(self.registry, &self.node.props, handlers::raw_ref(&key))
    }
}

impl core::fmt::Debug for Ctor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ctor")
            .field("parent", &self.parent.info.type_name())
            .field("arity", &self.arity())
            .finish()
    }
}

/// The destructor hook of a reflected type.
#[derive(Clone, Copy)]
pub struct Dtor<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r DtorNode,
}

member_view!(Dtor, DtorNode);

impl Dtor<'_> {
    /// Runs the hook on the value behind `handle`.
    ///
    /// Returns `false` if the handle is not exclusive or the value is not
    /// exactly of the declaring type.
    pub fn invoke<'h>(self, handle: impl Into<Handle<'h>>) -> bool {
        (self.node.destroy)(handle.into())
    }
}

impl core::fmt::Debug for Dtor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dtor")
            .field("parent", &self.parent.info.type_name())
            .finish()
    }
}

/// A key/value property attached to a type or a member.
#[derive(Clone, Copy)]
pub struct Prop<'r> {
    registry: &'r Registry,
    node: &'r PropNode,
}

impl<'r> Prop<'r> {
    pub(crate) fn new(registry: &'r Registry, node: &'r PropNode) -> Self {
        Self { registry, node }
    }

    /// Returns a const alias of the key.
    pub fn key(self) -> Any<'r, 'r> {
        Any::from_raw_ref(self.registry, self.node.key.as_ref())
    }

    /// Returns a const alias of the value.
    pub fn value(self) -> Any<'r, 'r> {
        Any::from_raw_ref(self.registry, self.node.value.as_ref())
    }
}

impl PartialEq for Prop<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.node, other.node)
    }
}

impl Eq for Prop<'_> {}

impl core::fmt::Debug for Prop<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Prop")
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .finish()
    }
}
