use super::{all_props, find_prop};
use crate::{
    Any, Handle, Id, IntoArg, Policy, Prop, Reflect, Registry, Type, handlers,
    registry::node::{DataNode, TypeNode},
};

/// A data member of a reflected type.
///
/// Data members are read with [`get`](Data::get) and written with
/// [`set`](Data::set) through a handle to an instance of the declaring type,
/// or of a type deriving from it. Static data and constants ignore the
/// handle. Array fields are accessed element-wise with
/// [`get_at`](Data::get_at) and [`set_at`](Data::set_at).
///
/// What [`get`](Data::get) gives back depends on the [`Policy`] of the
/// member: a copy of the data, an alias of it, or the void value.
#[derive(Clone, Copy)]
pub struct Data<'r> {
    registry: &'r Registry,
    parent: &'r TypeNode,
    node: &'r DataNode,
}

impl<'r> Data<'r> {
    pub(crate) fn new(registry: &'r Registry, parent: &'r TypeNode, node: &'r DataNode) -> Self {
        Self {
            registry,
            parent,
            node,
        }
    }

    /// Returns the identifier of the member.
    #[inline]
    pub fn id(self) -> Id {
        self.node.id
    }

    /// Returns the type that declared the member.
    #[inline]
    pub fn parent(self) -> Type<'r> {
        self.registry.resolve_info(self.parent.info)
    }

    /// Returns `true` if the member cannot be set.
    #[inline]
    pub fn is_const(self) -> bool {
        self.node.is_const
    }

    /// Returns `true` if the member does not belong to an instance.
    #[inline]
    pub fn is_static(self) -> bool {
        self.node.is_static
    }

    /// Returns the type of the member.
    #[inline]
    pub fn ty(self) -> Type<'r> {
        self.registry.resolve_info(self.node.ty)
    }

    /// Returns the policy applied to the values read from the member.
    #[inline]
    pub fn policy(self) -> Policy {
        self.node.policy
    }

    /// Reads the member of the value behind `handle`.
    ///
    /// The result is empty if the handle does not refer to an instance of the
    /// declaring type, or if the member is an array field. It keeps the
    /// borrow of `handle`, which an alias needs. A copy can be detached from
    /// it with [`Any::into_owned`].
    pub fn get<'h>(self, handle: impl Into<Handle<'h>>) -> Any<'r, 'h> {
        (self.node.get)(self.registry, handle.into(), None, self.node.policy)
    }

    /// Reads the element at `index` of an array field.
    ///
    /// The result is empty if the index is out of range. Members that are not
    /// array fields ignore the index.
    pub fn get_at<'h>(self, handle: impl Into<Handle<'h>>, index: usize) -> Any<'r, 'h> {
        (self.node.get)(self.registry, handle.into(), Some(index), self.node.policy)
    }

    /// Writes `value` to the member of the value behind `handle`.
    ///
    /// The value is converted in place if it is not of the member type and a
    /// conversion exists. Returns `false`, leaving the member untouched, if
    /// the member is const, the handle is not exclusive or not of the
    /// declaring type, or the value is not accepted.
    pub fn set<'h, 'a>(self, handle: impl Into<Handle<'h>>, value: impl IntoArg<'r, 'a>) -> bool {
        let mut value = value.into_arg(self.registry);
        (self.node.set)(self.registry, handle.into(), None, &mut value)
    }

    /// Writes `value` to the element at `index` of an array field.
    ///
    /// Fails like [`set`](Data::set), and also if the index is out of range.
    pub fn set_at<'h, 'a>(
        self,
        handle: impl Into<Handle<'h>>,
        index: usize,
        value: impl IntoArg<'r, 'a>,
    ) -> bool {
        let mut value = value.into_arg(self.registry);
        (self.node.set)(self.registry, handle.into(), Some(index), &mut value)
    }

    /// Returns the properties of the member.
    pub fn props(self) -> impl ExactSizeIterator<Item = Prop<'r>> + 'r {
        all_props(self.registry, &self.node.props)
    }

    /// Returns the property with a key equal to `key`.
    pub fn prop<K: Reflect>(self, key: K) -> Option<Prop<'r>> {
        find_prop(self.registry, &self.node.props, handlers::raw_ref(&key))
    }
}

impl PartialEq for Data<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.node, other.node)
    }
}

impl Eq for Data<'_> {}

impl core::fmt::Debug for Data<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Data")
            .field("id", &self.node.id)
            .field("parent", &self.parent.info.type_name())
            .field("type", &self.node.ty.type_name())
            .field("policy", &self.node.policy)
            .finish()
    }
}
