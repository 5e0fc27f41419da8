//! The registry of reflected types.

pub(crate) mod node;
mod search;

use core::any::TypeId;

use hashbrown::HashMap;
use indexmap::IndexMap;
use metagraph_internals::TypeInfo;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use self::node::TypeNode;
use crate::{Any, Factory, Id, Reflect, RegistrationError, Type, type_info};

/// A set of reflected types and their members.
///
/// Every type starts out unknown to the registry. [`Registry::reflect`]
/// registers a type under an identifier and returns a [`Factory`] to declare
/// its members; [`Registry::extend`] does the same without assigning an
/// identifier. [`Registry::unregister`] forgets everything about a type again.
///
/// Registration needs exclusive access, everything else works through shared
/// references: values, handles and member wrappers borrow the registry, so it
/// cannot change while any of them is alive.
///
/// # Examples
///
/// ```
/// use metagraph::{Handle, Id, Registry};
///
/// let mut registry = Registry::new();
/// registry
///     .reflect::<u32>(Id::from("u32"))?
///     .constant(Id::from("max"), u32::MAX)?;
///
/// let ty = registry.resolve_id(Id::from("u32")).unwrap();
/// let max = ty.data(Id::from("max")).unwrap();
/// assert_eq!(max.get(Handle::empty()).try_cast::<u32>(), Some(&u32::MAX));
///
/// assert!(registry.unregister::<u32>());
/// assert!(registry.resolve_id(Id::from("u32")).is_none());
/// # Ok::<(), metagraph::RegistrationError>(())
/// ```
pub struct Registry {
    /// Registered types, in registration order.
    types: IndexMap<TypeId, TypeNode, FxBuildHasher>,
    /// Identifiers of the registered types.
    ids: HashMap<Id, TypeId, FxBuildHasher>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty registry with room for `capacity` types.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            types: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            ids: HashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    /// Registers `T` under `id` and returns a factory to declare its members.
    ///
    /// # Errors
    ///
    /// Fails if `T` already has an identifier, or if another type is
    /// registered under `id`.
    pub fn reflect<T: Reflect>(&mut self, id: Id) -> Result<Factory<'_, T>, RegistrationError> {
        let info = type_info::<T>();
        if let Some(existing) = self.node(info.type_id()).and_then(|node| node.id) {
            return Err(RegistrationError::AlreadyRegistered {
                type_name: info.type_name(),
                id: existing,
            });
        }
        if let Some(existing) = self.ids.get(&id) {
            return Err(RegistrationError::DuplicateTypeId {
                id,
                existing: self
                    .node(*existing)
                    .map_or("<unknown>", |node| node.info.type_name()),
            });
        }

        self.ids.insert(id, info.type_id());
        self.activate(info).id = Some(id);
        debug!(type_name = info.type_name(), %id, "registered type");
        Ok(Factory::new(self))
    }

    /// Returns a factory to declare members of `T`, registering `T` without an
    /// identifier if needed.
    pub fn extend<T: Reflect>(&mut self) -> Factory<'_, T> {
        let info = type_info::<T>();
        if !self.types.contains_key(&info.type_id()) {
            self.activate(info);
            debug!(type_name = info.type_name(), "registered anonymous type");
        }
        Factory::new(self)
    }

    /// Forgets everything registered about `T`.
    ///
    /// Returns `false` if `T` was not registered. Bases and conversions of
    /// other types that refer to `T` are left in place.
    pub fn unregister<T: Reflect>(&mut self) -> bool {
        let Some(node) = self.types.shift_remove(&TypeId::of::<T>()) else {
            return false;
        };
        if let Some(id) = node.id {
            self.ids.remove(&id);
        }
        debug!(type_name = node.info.type_name(), "unregistered type");
        true
    }

    /// Returns the reflected view of `T`.
    ///
    /// This always succeeds: a type that was never registered still has
    /// traits and can be compared, it just has no identifier and no members.
    #[inline]
    pub fn resolve<T: Reflect>(&self) -> Type<'_> {
        self.resolve_info(type_info::<T>())
    }

    /// Returns the type registered under `id`.
    pub fn resolve_id(&self, id: Id) -> Option<Type<'_>> {
        let type_id = self.ids.get(&id)?;
        let node = self.node(*type_id)?;
        Some(self.resolve_info(node.info))
    }

    /// Returns the reflected view of the type described by `info`.
    #[inline]
    pub fn resolve_info(&self, info: &'static TypeInfo) -> Type<'_> {
        Type::new(self, info)
    }

    /// Returns the registered types, in registration order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = Type<'_>> + '_ {
        self.types.values().map(move |node| self.resolve_info(node.info))
    }

    /// Returns `true` if `T` is registered, with or without an identifier.
    #[inline]
    pub fn contains<T: Reflect>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no type is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Wraps `value` in an [`Any`] bound to this registry.
    #[inline]
    pub fn any<T: Reflect>(&self, value: T) -> Any<'_, 'static> {
        Any::new(self, value)
    }

    #[inline]
    pub(crate) fn node(&self, type_id: TypeId) -> Option<&TypeNode> {
        self.types.get(&type_id)
    }

    /// Returns the node of the type described by `info`, creating it if
    /// needed.
    pub(crate) fn activate(&mut self, info: &'static TypeInfo) -> &mut TypeNode {
        self.types
            .entry(info.type_id())
            .or_insert_with(|| TypeNode::new(info))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.types.values().map(|node| node.info.type_name()))
            .finish()
    }
}
