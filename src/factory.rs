//! Declaration of the members of a type.

use alloc::vec::Vec;
use core::{any::TypeId, marker::PhantomData};

use tracing::debug;
use triomphe::Arc;

use crate::{
    Any, ArgList, ConstMethodFn, Id, MethodFn, Policy, Reflect, Registry, RegistrationError,
    StaticFn, args, handlers,
    registry::node::{
        BaseNode, ConstructFn, ConvNode, ConvertFn, CtorNode, DataNode, DestroyFn, DtorNode,
        FuncNode, GetFn, InvokeFn, PropNode, SetFn, Signature, TypeNode,
    },
    type_info,
};

/// Declares the members of a type `T` in a [`Registry`].
///
/// A factory is obtained from [`Registry::reflect`] or [`Registry::extend`].
/// Every method consumes the factory and gives it back on success, so
/// declarations chain with `?`. A failed declaration leaves the registry as
/// it was before that declaration.
///
/// [`prop`](Factory::prop), [`alias`](Factory::alias) and
/// [`discard`](Factory::discard) apply to the most recently declared
/// element: the type itself right after [`Registry::reflect`] or
/// [`base`](Factory::base), or the last constructor, data member or function.
///
/// # Examples
///
/// ```
/// use metagraph::{Id, Registry, impl_reflect};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl_reflect!(Point: Clone, PartialEq);
///
/// let mut registry = Registry::new();
/// registry
///     .reflect::<Point>(Id::from("point"))?
///     .ctor_with(|x: i32, y: i32| Point { x, y })?
///     .field(Id::from("x"), |p: &Point| &p.x, |p: &mut Point| &mut p.x)?
///     .prop("unit", "px")?
///     .func_const(Id::from("norm1"), |p: &Point| p.x.abs() + p.y.abs())?;
///
/// let ty = registry.resolve::<Point>();
/// let mut point = ty.construct((3, -4));
/// assert_eq!(point.try_cast::<Point>(), Some(&Point { x: 3, y: -4 }));
///
/// let norm = ty.func(Id::from("norm1")).unwrap();
/// assert_eq!(norm.invoke(&point, ()).try_cast::<i32>(), Some(&7));
///
/// let x = ty.data(Id::from("x")).unwrap();
/// assert!(x.set(&mut point, 10));
/// assert_eq!(point.cast::<Point>().x, 10);
/// # Ok::<(), metagraph::RegistrationError>(())
/// ```
pub struct Factory<'a, T> {
    /// The registry being populated.
    registry: &'a mut Registry,
    /// The element `prop`, `alias` and `discard` apply to.
    cursor: Cursor,
    /// Ties the factory to the declared type.
    marker: PhantomData<fn() -> T>,
}

/// The most recently declared element of a [`Factory`].
#[derive(Clone, Copy, Debug)]
enum Cursor {
    Type,
    Ctor(usize),
    Data(usize),
    Func(usize),
}

impl<'a, T: Reflect> Factory<'a, T> {
    pub(crate) fn new(registry: &'a mut Registry) -> Self {
        Self {
            registry,
            cursor: Cursor::Type,
            marker: PhantomData,
        }
    }

    fn type_name() -> &'static str {
        type_info::<T>().type_name()
    }

    fn node(&mut self) -> &mut TypeNode {
        self.registry.activate(type_info::<T>())
    }

    /// Attaches a property to the most recently declared element.
    ///
    /// # Errors
    ///
    /// Fails if the element already has a property with an equal key.
    pub fn prop<K, V>(mut self, key: K, value: V) -> Result<Self, RegistrationError>
    where
        K: Reflect + Send + Sync,
        V: Reflect + Send + Sync,
    {
        let key = handlers::raw_sync(key);
        let cursor = self.cursor;
        let node = self.node();
        let props = match cursor {
            Cursor::Type => &mut node.props,
            Cursor::Ctor(index) => &mut node.ctors[index].props,
            Cursor::Data(index) => &mut node.data[index].props,
            Cursor::Func(index) => &mut node.funcs[index].props,
        };
        if props
            .iter()
            .any(|prop| prop.key.as_ref().equals(key.as_ref()))
        {
            return Err(RegistrationError::DuplicateProp {
                type_name: Self::type_name(),
            });
        }
        props.push(PropNode {
            key,
            value: handlers::raw_sync(value),
        });
        debug!(type_name = Self::type_name(), ?cursor, "attached property");
        Ok(self)
    }

    /// Declares `B` as a base of `T`.
    ///
    /// Casts from `T` to `B` go through the [`AsRef`] and [`AsMut`]
    /// implementations of `T`.
    ///
    /// # Errors
    ///
    /// Fails if `B` already is a base of `T`, or if `T` is reachable from `B`
    /// through registered bases.
    pub fn base<B: Reflect>(mut self) -> Result<Self, RegistrationError>
    where
        T: AsRef<B> + AsMut<B>,
    {
        let target = type_info::<B>();
        if TypeId::of::<B>() == TypeId::of::<T>()
            || self.registry.can_cast(TypeId::of::<B>(), TypeId::of::<T>())
        {
            return Err(RegistrationError::CyclicBase {
                type_name: Self::type_name(),
                base: target.type_name(),
            });
        }
        let node = self.node();
        if node.bases.iter().any(|base| base.target == target) {
            return Err(RegistrationError::DuplicateBase {
                type_name: Self::type_name(),
                base: target.type_name(),
            });
        }
        node.bases.push(BaseNode {
            target,
            upcast: |value| {
                value
                    .downcast::<T>()
                    .map(|value| handlers::raw_ref(AsRef::<B>::as_ref(value)))
            },
            upcast_mut: |value| {
                value
                    .downcast_mut::<T>()
                    .ok()
                    .map(|value| handlers::raw_mut(AsMut::<B>::as_mut(value)))
            },
        });
        self.cursor = Cursor::Type;
        debug!(type_name = Self::type_name(), base = target.type_name(), "declared base");
        Ok(self)
    }

    /// Declares a conversion from `T` to `U` through [`From`].
    ///
    /// # Errors
    ///
    /// Fails if `T` already converts to `U`.
    pub fn conv<U>(self) -> Result<Self, RegistrationError>
    where
        U: Reflect + From<T>,
        T: Clone,
    {
        self.conv_with(|value: &T| U::from(value.clone()))
    }

    /// Declares a conversion from `T` to `U` through `f`.
    ///
    /// # Errors
    ///
    /// Fails if `T` already converts to `U`.
    pub fn conv_with<U, F>(mut self, f: F) -> Result<Self, RegistrationError>
    where
        U: Reflect,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let target = type_info::<U>();
        let node = self.node();
        if node.convs.iter().any(|conv| conv.target == target) {
            return Err(RegistrationError::DuplicateConv {
                type_name: Self::type_name(),
                target: target.type_name(),
            });
        }
        node.convs.push(ConvNode {
            target,
            convert: ConvertFn::new(move |registry, value| match value.downcast::<T>() {
                Some(value) => Any::new(registry, f(value)),
                None => Any::empty(registry),
            }),
        });
        self.cursor = Cursor::Type;
        debug!(type_name = Self::type_name(), target = target.type_name(), "declared conversion");
        Ok(self)
    }

    /// Declares a constructor taking `Args` and building `T` through
    /// [`From`].
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a constructor taking the same arguments.
    pub fn ctor<Args>(self) -> Result<Self, RegistrationError>
    where
        Args: ArgList,
        T: From<Args>,
    {
        self.push_ctor(
            Signature::of::<Args>(),
            ConstructFn::new(|registry, args| match Args::extract(args) {
                Some(args) => Any::new(registry, T::from(args)),
                None => Any::empty(registry),
            }),
        )
    }

    /// Declares a constructor calling `f`.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a constructor taking the same arguments.
    pub fn ctor_with<Args, F>(self, f: F) -> Result<Self, RegistrationError>
    where
        Args: ArgList,
        F: StaticFn<Args, Output = T>,
    {
        self.push_ctor(
            Signature::of::<Args>(),
            ConstructFn::new(move |registry, args| match Args::extract(args) {
                Some(args) => Any::new(registry, f.call(args)),
                None => Any::empty(registry),
            }),
        )
    }

    fn push_ctor(
        mut self,
        signature: Signature,
        construct: ConstructFn,
    ) -> Result<Self, RegistrationError> {
        let node = self.node();
        if node
            .ctors
            .iter()
            .any(|ctor| ctor.signature.same_as(signature))
        {
            return Err(RegistrationError::DuplicateCtor {
                type_name: Self::type_name(),
            });
        }
        node.ctors.push(CtorNode {
            signature,
            construct,
            props: Vec::new(),
        });
        let index = node.ctors.len() - 1;
        self.cursor = Cursor::Ctor(index);
        debug!(type_name = Self::type_name(), arity = signature.arity, "declared constructor");
        Ok(self)
    }

    /// Declares a hook run on values of `T` before they are dropped by an
    /// [`Any`], and by [`Type::destroy`](crate::Type::destroy).
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a destructor hook.
    pub fn dtor<F>(mut self, f: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let node = self.node();
        if node.dtor.is_some() {
            return Err(RegistrationError::DuplicateDtor {
                type_name: Self::type_name(),
            });
        }
        node.dtor = Some(DtorNode {
            destroy: DestroyFn::new(move |handle| {
                match handle
                    .into_mut()
                    .and_then(|value| value.downcast_mut::<T>().ok())
                {
                    Some(value) => {
                        f(value);
                        true
                    }
                    None => false,
                }
            }),
        });
        self.cursor = Cursor::Type;
        debug!(type_name = Self::type_name(), "declared destructor");
        Ok(self)
    }

    /// Declares a field, reached through a pair of projections.
    ///
    /// Getting the field copies it. With [`alias`](Factory::alias), getting
    /// the field through an exclusive handle gives a mutable alias instead,
    /// and through a shared handle a const alias.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn field<R, G, M>(self, id: Id, get: G, get_mut: M) -> Result<Self, RegistrationError>
    where
        R: Reflect,
        G: Fn(&T) -> &R + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut R + Send + Sync + 'static,
    {
        let get_mut = Arc::new(get_mut);
        let alias_mut = Arc::clone(&get_mut);
        let getter = GetFn::new(move |registry, handle, _index, policy| {
            if policy == Policy::Alias && handle.is_mutable() {
                return registry
                    .receiver_mut::<T>(handle)
                    .map_or_else(|| Any::empty(registry), |receiver| {
                        Any::from_mut(registry, (*alias_mut)(receiver))
                    });
            }
            match registry.receiver::<T>(handle) {
                Some(receiver) if policy == Policy::Alias => {
                    Any::from_ref(registry, get(receiver))
                }
                Some(receiver) => emit(registry, get(receiver), policy),
                None => Any::empty(registry),
            }
        });
        let setter = SetFn::new(move |registry, handle, _index, value| {
            assign(
                registry
                    .receiver_mut::<T>(handle)
                    .map(|receiver| (*get_mut)(receiver)),
                value,
            )
        });
        self.push_data(DataNode {
            id,
            is_const: false,
            is_static: false,
            ty: type_info::<R>(),
            policy: Policy::AsIs,
            aliasable: true,
            get: getter,
            set: setter,
            props: Vec::new(),
        })
    }

    /// Declares a field that cannot be set through the registry.
    ///
    /// With [`alias`](Factory::alias), getting the field gives a const alias.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn field_const<R, G>(self, id: Id, get: G) -> Result<Self, RegistrationError>
    where
        R: Reflect,
        G: Fn(&T) -> &R + Send + Sync + 'static,
    {
        self.push_data(DataNode {
            id,
            is_const: true,
            is_static: false,
            ty: type_info::<R>(),
            policy: Policy::AsIs,
            aliasable: true,
            get: GetFn::new(move |registry, handle, _index, policy| {
                match registry.receiver::<T>(handle) {
                    Some(receiver) if policy == Policy::Alias => {
                        Any::from_ref(registry, get(receiver))
                    }
                    Some(receiver) => emit(registry, get(receiver), policy),
                    None => Any::empty(registry),
                }
            }),
            set: SetFn::new(|_, _, _, _| false),
            props: Vec::new(),
        })
    }

    /// Declares an array field whose elements are read and written one at a
    /// time, with [`Data::get_at`](crate::Data::get_at) and
    /// [`Data::set_at`](crate::Data::set_at).
    ///
    /// Accesses without an index, or with an index out of range, fail.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn array_field<E, const N: usize, G, M>(
        self,
        id: Id,
        get: G,
        get_mut: M,
    ) -> Result<Self, RegistrationError>
    where
        E: Reflect,
        G: Fn(&T) -> &[E; N] + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut [E; N] + Send + Sync + 'static,
    {
        let get_mut = Arc::new(get_mut);
        let alias_mut = Arc::clone(&get_mut);
        let getter = GetFn::new(move |registry, handle, index, policy| {
            let Some(index) = index else {
                return Any::empty(registry);
            };
            if policy == Policy::Alias && handle.is_mutable() {
                return registry
                    .receiver_mut::<T>(handle)
                    .and_then(|receiver| (*alias_mut)(receiver).get_mut(index))
                    .map_or_else(|| Any::empty(registry), |element| {
                        Any::from_mut(registry, element)
                    });
            }
            match registry
                .receiver::<T>(handle)
                .and_then(|receiver| get(receiver).get(index))
            {
                Some(element) if policy == Policy::Alias => Any::from_ref(registry, element),
                Some(element) => emit(registry, element, policy),
                None => Any::empty(registry),
            }
        });
        let setter = SetFn::new(move |registry, handle, index, value| {
            let Some(index) = index else {
                return false;
            };
            assign(
                registry
                    .receiver_mut::<T>(handle)
                    .and_then(|receiver| (*get_mut)(receiver).get_mut(index)),
                value,
            )
        });
        self.push_data(DataNode {
            id,
            is_const: false,
            is_static: false,
            ty: type_info::<[E; N]>(),
            policy: Policy::AsIs,
            aliasable: true,
            get: getter,
            set: setter,
            props: Vec::new(),
        })
    }

    /// Declares data that does not belong to an instance, read and written
    /// through a pair of functions. The handle passed to get or set it is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn static_data<R, G, S>(self, id: Id, get: G, set: S) -> Result<Self, RegistrationError>
    where
        R: Reflect,
        G: Fn() -> R + Send + Sync + 'static,
        S: Fn(R) + Send + Sync + 'static,
    {
        self.push_data(DataNode {
            id,
            is_const: false,
            is_static: true,
            ty: type_info::<R>(),
            policy: Policy::AsIs,
            aliasable: false,
            get: GetFn::new(move |registry, _handle, _index, policy| match policy {
                Policy::Void => Any::void(registry),
                Policy::AsIs | Policy::Alias => Any::new(registry, get()),
            }),
            set: SetFn::new(move |_registry, _handle, _index, value| {
                match args::pass::<R>(value) {
                    Some(value) => {
                        set(value);
                        true
                    }
                    None => false,
                }
            }),
            props: Vec::new(),
        })
    }

    /// Declares an array that does not belong to an instance, read and
    /// written one element at a time through a pair of functions.
    ///
    /// `get` and `set` are only called with indices below `N`. Accesses
    /// without an index, or with an index out of range, fail.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn static_array<E, const N: usize, G, S>(
        self,
        id: Id,
        get: G,
        set: S,
    ) -> Result<Self, RegistrationError>
    where
        E: Reflect,
        G: Fn(usize) -> E + Send + Sync + 'static,
        S: Fn(usize, E) + Send + Sync + 'static,
    {
        self.push_data(DataNode {
            id,
            is_const: false,
            is_static: true,
            ty: type_info::<[E; N]>(),
            policy: Policy::AsIs,
            aliasable: false,
            get: GetFn::new(move |registry, _handle, index, policy| {
                match index.filter(|&index| index < N) {
                    Some(_) if policy == Policy::Void => Any::void(registry),
                    Some(index) => Any::new(registry, get(index)),
                    None => Any::empty(registry),
                }
            }),
            set: SetFn::new(move |_registry, _handle, index, value| {
                let Some(index) = index.filter(|&index| index < N) else {
                    return false;
                };
                match args::pass::<E>(value) {
                    Some(value) => {
                        set(index, value);
                        true
                    }
                    None => false,
                }
            }),
            props: Vec::new(),
        })
    }

    /// Declares a named constant. Setting it always fails.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn constant<R>(self, id: Id, value: R) -> Result<Self, RegistrationError>
    where
        R: Reflect + Send + Sync,
    {
        self.push_data(DataNode {
            id,
            is_const: true,
            is_static: true,
            ty: type_info::<R>(),
            policy: Policy::AsIs,
            aliasable: false,
            get: GetFn::new(move |registry, _handle, _index, policy| {
                emit(registry, &value, policy)
            }),
            set: SetFn::new(|_, _, _, _| false),
            props: Vec::new(),
        })
    }

    /// Declares data computed from an instance by `get` and stored by `set`.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a data member `id`.
    pub fn property<R, G, S>(self, id: Id, get: G, set: S) -> Result<Self, RegistrationError>
    where
        R: Reflect,
        G: Fn(&T) -> R + Send + Sync + 'static,
        S: Fn(&mut T, R) + Send + Sync + 'static,
    {
        self.push_data(DataNode {
            id,
            is_const: false,
            is_static: false,
            ty: type_info::<R>(),
            policy: Policy::AsIs,
            aliasable: false,
            get: GetFn::new(move |registry, handle, _index, policy| {
                match registry.receiver::<T>(handle) {
                    Some(_) if policy == Policy::Void => Any::void(registry),
                    Some(receiver) => Any::new(registry, get(receiver)),
                    None => Any::empty(registry),
                }
            }),
            set: SetFn::new(move |registry, handle, _index, value| {
                let Some(receiver) = registry.receiver_mut::<T>(handle) else {
                    return false;
                };
                match args::pass::<R>(value) {
                    Some(value) => {
                        set(receiver, value);
                        true
                    }
                    None => false,
                }
            }),
            props: Vec::new(),
        })
    }

    fn push_data(mut self, data: DataNode) -> Result<Self, RegistrationError> {
        let node = self.node();
        if node.data.iter().any(|existing| existing.id == data.id) {
            return Err(RegistrationError::DuplicateData {
                type_name: Self::type_name(),
                id: data.id,
            });
        }
        let id = data.id;
        node.data.push(data);
        let index = node.data.len() - 1;
        self.cursor = Cursor::Data(index);
        debug!(type_name = Self::type_name(), %id, "declared data member");
        Ok(self)
    }

    /// Declares a function taking `T` by mutable reference.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a function `id`.
    pub fn func<Args, F>(self, id: Id, f: F) -> Result<Self, RegistrationError>
    where
        Args: ArgList,
        F: MethodFn<T, Args>,
        F::Output: Reflect,
    {
        self.push_func(FuncNode {
            id,
            is_const: false,
            is_static: false,
            ret: type_info::<F::Output>(),
            signature: Signature::of::<Args>(),
            policy: Policy::AsIs,
            aliasable: false,
            invoke: InvokeFn::new(move |registry, handle, args| {
                let Some(receiver) = registry.receiver_mut::<T>(handle) else {
                    return Any::empty(registry);
                };
                match Args::extract(args) {
                    Some(args) => Any::new(registry, f.call(receiver, args)),
                    None => Any::empty(registry),
                }
            }),
            props: Vec::new(),
        })
    }

    /// Declares a function taking `T` by shared reference.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a function `id`.
    pub fn func_const<Args, F>(self, id: Id, f: F) -> Result<Self, RegistrationError>
    where
        Args: ArgList,
        F: ConstMethodFn<T, Args>,
        F::Output: Reflect,
    {
        self.push_func(FuncNode {
            id,
            is_const: true,
            is_static: false,
            ret: type_info::<F::Output>(),
            signature: Signature::of::<Args>(),
            policy: Policy::AsIs,
            aliasable: false,
            invoke: InvokeFn::new(move |registry, handle, args| {
                let Some(receiver) = registry.receiver::<T>(handle) else {
                    return Any::empty(registry);
                };
                match Args::extract(args) {
                    Some(args) => Any::new(registry, f.call(receiver, args)),
                    None => Any::empty(registry),
                }
            }),
            props: Vec::new(),
        })
    }

    /// Declares a function that takes no instance. The handle passed to
    /// invoke it is ignored.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a function `id`.
    pub fn func_static<Args, F>(self, id: Id, f: F) -> Result<Self, RegistrationError>
    where
        Args: ArgList,
        F: StaticFn<Args>,
        F::Output: Reflect,
    {
        self.push_func(FuncNode {
            id,
            is_const: false,
            is_static: true,
            ret: type_info::<F::Output>(),
            signature: Signature::of::<Args>(),
            policy: Policy::AsIs,
            aliasable: false,
            invoke: InvokeFn::new(move |registry, _handle, args| match Args::extract(args) {
                Some(args) => Any::new(registry, f.call(args)),
                None => Any::empty(registry),
            }),
            props: Vec::new(),
        })
    }

    /// Declares a function returning a mutable reference into `T`.
    ///
    /// Invoking it gives a mutable alias of the returned place, so the
    /// function is registered with [`Policy::Alias`].
    ///
    /// # Errors
    ///
    /// Fails if `T` already has a function `id`.
    pub fn func_alias<R, F>(self, id: Id, f: F) -> Result<Self, RegistrationError>
    where
        R: Reflect,
        F: Fn(&mut T) -> &mut R + Send + Sync + 'static,
    {
        self.push_func(FuncNode {
            id,
            is_const: false,
            is_static: false,
            ret: type_info::<R>(),
            signature: Signature::of::<()>(),
            policy: Policy::Alias,
            aliasable: true,
            invoke: InvokeFn::new(move |registry, handle, args| {
                if !args.is_empty() {
                    return Any::empty(registry);
                }
                registry
                    .receiver_mut::<T>(handle)
                    .map_or_else(|| Any::empty(registry), |receiver| {
                        Any::from_mut(registry, f(receiver))
                    })
            }),
            props: Vec::new(),
        })
    }

    fn push_func(mut self, func: FuncNode) -> Result<Self, RegistrationError> {
        let node = self.node();
        if node.funcs.iter().any(|existing| existing.id == func.id) {
            return Err(RegistrationError::DuplicateFunc {
                type_name: Self::type_name(),
                id: func.id,
            });
        }
        let (id, arity) = (func.id, func.signature.arity);
        node.funcs.push(func);
        let index = node.funcs.len() - 1;
        self.cursor = Cursor::Func(index);
        debug!(type_name = Self::type_name(), %id, arity, "declared function");
        Ok(self)
    }

    /// Makes the most recently declared data member or function hand out
    /// aliases instead of copies.
    ///
    /// # Errors
    ///
    /// Fails if the element cannot give out references: static data,
    /// constants, properties and functions returning by value.
    pub fn alias(self) -> Result<Self, RegistrationError> {
        self.set_policy(Policy::Alias)
    }

    /// Makes the most recently declared data member or function give the
    /// void value instead of its result.
    ///
    /// # Errors
    ///
    /// Fails if the most recent element is the type or a constructor.
    pub fn discard(self) -> Result<Self, RegistrationError> {
        self.set_policy(Policy::Void)
    }

    fn set_policy(mut self, policy: Policy) -> Result<Self, RegistrationError> {
        let cursor = self.cursor;
        let node = self.node();
        let applied = match cursor {
            Cursor::Data(index) => {
                let data = &mut node.data[index];
                let applies = policy != Policy::Alias || data.aliasable;
                if applies {
                    data.policy = policy;
                }
                applies
            }
            Cursor::Func(index) => {
                let func = &mut node.funcs[index];
                let applies = policy != Policy::Alias || func.aliasable;
                if applies {
                    func.policy = policy;
                    if policy == Policy::Void {
                        func.ret = type_info::<()>();
                    }
                }
                applies
            }
            Cursor::Type | Cursor::Ctor(_) => false,
        };
        if !applied {
            return Err(RegistrationError::UnsupportedPolicy {
                type_name: Self::type_name(),
                policy,
            });
        }
        debug!(type_name = Self::type_name(), ?cursor, ?policy, "applied policy");
        Ok(self)
    }
}

impl<T> core::fmt::Debug for Factory<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Factory")
            .field("type", &core::any::type_name::<T>())
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Wraps a value read from data according to `policy`.
fn emit<'r, R: Reflect>(registry: &'r Registry, value: &R, policy: Policy) -> Any<'r, 'static> {
    if policy == Policy::Void {
        return Any::void(registry);
    }
    value
        .reflect_clone()
        .map_or_else(|| Any::empty(registry), |value| Any::new(registry, value))
}

/// Stores `value` in `slot` if both exist and the value is accepted as an
/// `R`.
fn assign<R: Reflect>(slot: Option<&mut R>, value: &mut Any<'_, '_>) -> bool {
    let Some(slot) = slot else {
        return false;
    };
    match args::pass::<R>(value) {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}
