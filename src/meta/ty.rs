use alloc::vec::Vec;
use core::any::TypeId;

use metagraph_internals::{TypeInfo, TypeTraits};
use tracing::trace;

use super::{Base, Conv, Ctor, Data, Dtor, Func, Prop};
use crate::{
    Any, ArgList, Handle, Id, IntoArg, IntoArgs, Reflect, Registry, handlers,
    registry::node::{self, List, Signature, TypeNode},
};

/// A reflected type.
///
/// Every Rust type implementing [`Reflect`] has a [`Type`], registered or
/// not. An unregistered type only answers trait queries: it has no
/// identifier and no members.
///
/// Lookups of members by identifier search the type itself first, then its
/// bases depth-first in declaration order, so members of a type shadow
/// members of its bases. Enumerations list the own members first, followed
/// by those of the bases in the same order.
#[derive(Clone, Copy)]
pub struct Type<'r> {
    registry: &'r Registry,
    info: &'static TypeInfo,
}

impl<'r> Type<'r> {
    pub(crate) fn new(registry: &'r Registry, info: &'static TypeInfo) -> Self {
        Self { registry, info }
    }

    fn node(self) -> Option<&'r TypeNode> {
        self.registry.node(self.info.type_id())
    }

    /// Collects the elements of `list` on this type and its bases.
    fn collect<N: 'r, W>(
        self,
        list: List<N>,
        wrap: impl Fn(&'r TypeNode, &'r N) -> W,
    ) -> Vec<W> {
        let mut found = Vec::new();
        self.registry
            .visit(self.type_id(), list, &mut |parent, element| {
                found.push(wrap(parent, element));
            });
        found
    }

    /// Returns the static information of the type.
    #[inline]
    pub fn info(self) -> &'static TypeInfo {
        self.info
    }

    /// Returns the [`TypeId`] of the type.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.info.type_id()
    }

    /// Returns the Rust name of the type.
    #[inline]
    pub fn name(self) -> &'static str {
        self.info.type_name()
    }

    /// Returns the identifier the type is registered under.
    pub fn id(self) -> Option<Id> {
        self.node()?.id
    }

    /// Returns `true` if the type is registered, with or without an
    /// identifier.
    pub fn is_registered(self) -> bool {
        self.node().is_some()
    }

    /// Returns `true` if this is the type `T`.
    #[inline]
    pub fn is<T: 'static>(self) -> bool {
        self.info.is::<T>()
    }

    /// Returns the classification of the type.
    #[inline]
    pub fn traits(self) -> TypeTraits {
        self.info.traits()
    }

    /// Returns `true` for `()`.
    pub fn is_void(self) -> bool {
        self.traits().contains(TypeTraits::VOID)
    }

    /// Returns `true` for integers, `bool` and `char`.
    pub fn is_integral(self) -> bool {
        self.traits().contains(TypeTraits::INTEGRAL)
    }

    /// Returns `true` for `f32` and `f64`.
    pub fn is_floating_point(self) -> bool {
        self.traits().contains(TypeTraits::FLOATING_POINT)
    }

    /// Returns `true` for arrays.
    pub fn is_array(self) -> bool {
        self.traits().contains(TypeTraits::ARRAY)
    }

    /// Returns `true` for enums.
    pub fn is_enum(self) -> bool {
        self.traits().contains(TypeTraits::ENUM)
    }

    /// Returns `true` for unions.
    pub fn is_union(self) -> bool {
        self.traits().contains(TypeTraits::UNION)
    }

    /// Returns `true` for structs.
    pub fn is_class(self) -> bool {
        self.traits().contains(TypeTraits::CLASS)
    }

    /// Returns `true` for raw and function pointers.
    pub fn is_pointer(self) -> bool {
        self.traits().contains(TypeTraits::POINTER)
    }

    /// Returns `true` for function pointers.
    pub fn is_function_pointer(self) -> bool {
        self.traits().contains(TypeTraits::FUNCTION_POINTER)
    }

    /// Returns `true` for types declared as pointers to data members.
    pub fn is_member_object_pointer(self) -> bool {
        self.traits().contains(TypeTraits::MEMBER_OBJECT_POINTER)
    }

    /// Returns `true` for types declared as pointers to member functions.
    pub fn is_member_function_pointer(self) -> bool {
        self.traits().contains(TypeTraits::MEMBER_FUNCTION_POINTER)
    }

    /// Returns the number of elements of an array type, or 0.
    #[inline]
    pub fn extent(self) -> usize {
        self.info.extent()
    }

    /// Returns the size of the type in bytes.
    #[inline]
    pub fn size(self) -> usize {
        self.info.size()
    }

    /// Returns the pointee of a pointer type, or the type itself.
    pub fn remove_pointer(self) -> Type<'r> {
        Type::new(self.registry, self.info.remove_pointer())
    }

    /// Returns the bases of the type, direct and indirect.
    pub fn bases(self) -> impl Iterator<Item = Base<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::bases, move |parent, base| Base::new(registry, parent, base))
            .into_iter()
    }

    /// Returns the base registered under `id`.
    pub fn base(self, id: Id) -> Option<Base<'r>> {
        let registry = self.registry;
        registry
            .find(self.type_id(), node::bases, &mut |base| {
                registry
                    .node(base.target.type_id())
                    .is_some_and(|node| node.id == Some(id))
            })
            .map(|(parent, base)| Base::new(registry, parent, base))
    }

    /// Returns the conversions of the type and its bases.
    pub fn convs(self) -> impl Iterator<Item = Conv<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::convs, move |parent, conv| Conv::new(registry, parent, conv))
            .into_iter()
    }

    /// Returns the conversion to `U`.
    pub fn conv<U: Reflect>(self) -> Option<Conv<'r>> {
        let registry = self.registry;
        registry
            .find(self.type_id(), node::convs, &mut |conv| {
                conv.target.type_id() == TypeId::of::<U>()
            })
            .map(|(parent, conv)| Conv::new(registry, parent, conv))
    }

    /// Returns the constructors of the type and its bases.
    pub fn ctors(self) -> impl Iterator<Item = Ctor<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::ctors, move |parent, ctor| Ctor::new(registry, parent, ctor))
            .into_iter()
    }

    /// Returns the first constructor accepting arguments of the types `Args`.
    pub fn ctor<Args: ArgList>(self) -> Option<Ctor<'r>> {
        let registry = self.registry;
        let args = Signature::of::<Args>();
        registry
            .find(self.type_id(), node::ctors, &mut |ctor| {
                registry.matches_types(ctor.signature, args)
            })
            .map(|(parent, ctor)| Ctor::new(registry, parent, ctor))
    }

    /// Returns the destructor hook of the type.
    pub fn dtor(self) -> Option<Dtor<'r>> {
        let node = self.node()?;
        let dtor = node.dtor.as_ref()?;
        Some(Dtor::new(self.registry, node, dtor))
    }

    /// Returns the data members of the type and its bases.
    pub fn data_members(self) -> impl Iterator<Item = Data<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::data, move |parent, data| Data::new(registry, parent, data))
            .into_iter()
    }

    /// Returns the data member `id`.
    pub fn data(self, id: Id) -> Option<Data<'r>> {
        let registry = self.registry;
        registry
            .find(self.type_id(), node::data, &mut |data| data.id == id)
            .map(|(parent, data)| Data::new(registry, parent, data))
    }

    /// Returns the functions of the type and its bases.
    pub fn funcs(self) -> impl Iterator<Item = Func<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::funcs, move |parent, func| Func::new(registry, parent, func))
            .into_iter()
    }

    /// Returns the function `id`.
    pub fn func(self, id: Id) -> Option<Func<'r>> {
        let registry = self.registry;
        registry
            .find(self.type_id(), node::funcs, &mut |func| func.id == id)
            .map(|(parent, func)| Func::new(registry, parent, func))
    }

    /// Returns the properties of the type and its bases.
    pub fn props(self) -> impl Iterator<Item = Prop<'r>> + 'r {
        let registry = self.registry;
        self.collect(node::props, move |_, prop| Prop::new(registry, prop))
            .into_iter()
    }

    /// Returns the property with a key equal to `key`.
    pub fn prop<K: Reflect>(self, key: K) -> Option<Prop<'r>> {
        let key = handlers::raw_ref(&key);
        self.registry
            .find(self.type_id(), node::props, &mut |prop| {
                prop.key.as_ref().equals(key)
            })
            .map(|(_, prop)| Prop::new(self.registry, prop))
    }

    /// Builds a value with the first constructor accepting `args`.
    ///
    /// Arguments of other types than expected are converted in place when a
    /// conversion exists. The result is empty if no constructor accepts the
    /// arguments.
    pub fn construct<'a>(self, args: impl IntoArgs<'r, 'a>) -> Any<'r, 'static> {
        let registry = self.registry;
        let mut args = args.into_args(registry);
        let ctor = registry.find(self.type_id(), node::ctors, &mut |ctor| {
            registry.matches(ctor.signature, &args)
        });
        match ctor {
            Some((_, ctor)) => (ctor.construct)(registry, &mut args),
            None => {
                trace!(type_name = self.name(), arity = args.len(), "no matching constructor");
                Any::empty(registry)
            }
        }
    }

    /// Runs the destructor hook of the type on the value behind `handle`.
    ///
    /// The value must be exactly of this type. Without a hook, this succeeds
    /// for every type but `()`. The value itself is not dropped.
    pub fn destroy<'h>(self, handle: impl Into<Handle<'h>>) -> bool {
        let handle = handle.into();
        if self.is_void() || handle.type_info() != Some(self.info) {
            return false;
        }
        match self.node().and_then(|node| node.dtor.as_ref()) {
            Some(dtor) => (dtor.destroy)(handle),
            None => true,
        }
    }

    /// Reads the data member `id` of the value behind `handle`.
    ///
    /// The result is empty if there is no such member.
    pub fn get<'h>(self, id: Id, handle: impl Into<Handle<'h>>) -> Any<'r, 'h> {
        match self.data(id) {
            Some(data) => data.get(handle),
            None => Any::empty(self.registry),
        }
    }

    /// Writes the data member `id` of the value behind `handle`.
    ///
    /// Returns `false` if there is no such member or it cannot be written.
    pub fn set<'h, 'a>(
        self,
        id: Id,
        handle: impl Into<Handle<'h>>,
        value: impl IntoArg<'r, 'a>,
    ) -> bool {
        self.data(id).is_some_and(|data| data.set(handle, value))
    }

    /// Invokes the first function `id` accepting `args`.
    ///
    /// Functions of the type itself are considered before those of its
    /// bases. The result is empty if no function accepts the arguments.
    pub fn invoke<'h, 'a>(
        self,
        id: Id,
        handle: impl Into<Handle<'h>>,
        args: impl IntoArgs<'r, 'a>,
    ) -> Any<'r, 'h> {
        let registry = self.registry;
        let mut args = args.into_args(registry);
        let func = registry.find(self.type_id(), node::funcs, &mut |func| {
            func.id == id && registry.matches(func.signature, &args)
        });
        match func {
            Some((parent, func)) => {
                Func::new(registry, parent, func).invoke_with(handle.into(), &mut args)
            }
            None => Any::empty(registry),
        }
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.registry, other.registry) && self.info == other.info
    }
}

impl Eq for Type<'_> {}

impl core::fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish()
    }
}
