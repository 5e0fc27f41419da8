use super::{all_props, find_prop};
use crate::{
    Any, Handle, Id, IntoArgs, Policy, Prop, Reflect, Registry, Type, handlers,
    registry::node::{FuncNode, TypeNode},
};

/// A function of a reflected type.
///
/// Functions are invoked through a handle to an instance of the declaring
/// type, or of a type deriving from it. Static functions ignore the handle.
#[derive(Clone, Copy)]
pub struct Func<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r FuncNode,
}

impl<'r> Func<'r> {
    pub(crate) fn new(registry: &'r Registry, parent: &'r TypeNode, node: &'r FuncNode) -> Self {
        Self {
            registry,
            parent,
            node,
        }
    }

    /// Returns the identifier of the function.
    #[inline]
    pub fn id(self) -> Id {
        self.node.id
    }

    /// Returns the type that declared the function.
    #[inline]
    pub fn parent(self) -> Type<'r> {
        self.registry.resolve_info(self.parent.info)
    }

    /// Returns the number of arguments, the receiver excluded.
    #[inline]
    pub fn arity(self) -> usize {
        self.node.signature.arity
    }

    /// Returns `true` if the function takes the receiver by shared
    /// reference.
    #[inline]
    pub fn is_const(self) -> bool {
        self.node.is_const
    }

    /// Returns `true` if the function takes no receiver.
    #[inline]
    pub fn is_static(self) -> bool {
        self.node.is_static
    }

    /// Returns the type of the result.
    ///
    /// This is `()` for functions registered with [`Policy::Void`].
    #[inline]
    pub fn ret(self) -> Type<'r> {
        self.registry.resolve_info(self.node.ret)
    }

    /// Returns the type of the argument at `index`.
    pub fn arg(self, index: usize) -> Option<Type<'r>> {
        (self.node.signature.arg)(index).map(|info| self.registry.resolve_info(info))
    }

    /// Returns the policy applied to the result.
    #[inline]
    pub fn policy(self) -> Policy {
        self.node.policy
    }

    /// Invokes the function on the value behind `handle`.
    ///
    /// Arguments of other types than expected are converted in place when a
    /// conversion exists. The result is empty if the handle does not refer to
    /// an instance of the declaring type, or if the arguments are not
    /// accepted. Like [`Data::get`](crate::Data::get), the result keeps the
    /// borrow of `handle`.
    pub fn invoke<'h, 'a>(
        self,
        handle: impl Into<Handle<'h>>,
        args: impl IntoArgs<'r, 'a>,
    ) -> Any<'r, 'h> {
        let mut args = args.into_args(self.registry);
        self.invoke_with(handle.into(), &mut args)
    }

    pub(crate) fn invoke_with<'h>(
        self,
        handle: Handle<'h>,
        args: &mut [Any<'r, '_>],
    ) -> Any<'r, 'h> {
        let result = (self.node.invoke)(self.registry, handle, args);
        if self.node.policy == Policy::Void && !result.is_empty() {
            return Any::void(self.registry);
        }
        result
    }

    /// Returns the properties of the function.
    pub fn props(self) -> impl ExactSizeIterator<Item = Prop<'r>> + 'r {
        all_props(self.registry, &self.node.props)
    }

    /// Returns the property with a key equal to `key`.
    pub fn prop<K: Reflect>(self, key: K) -> Option<Prop<'r>> {
        find_prop(self.registry, &self.node.props, handlers::raw_ref(&key))
    }
}

impl PartialEq for Func<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.node, other.node)
    }
}

impl Eq for Func<'_> {}

impl core::fmt::Debug for Func<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Func")
            .field("id", &self.node.id)
            .field("parent", &self.parent.info.type_name())
            .field("arity", &self.node.signature.arity)
            .field("policy", &self.node.policy)
            .finish()
    }
}
