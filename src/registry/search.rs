//! Queries that follow the base graph.
//!
//! Searches visit the own members of a type first, then the bases of the
//! type depth-first in declaration order. The base graph is acyclic, which
//! registration guarantees, so every search terminates.

use core::any::TypeId;

use metagraph_internals::{RawValueMut, RawValueRef};
use tracing::trace;

use super::node::{List, Signature, TypeNode};
use crate::{Any, Handle, Reflect, Registry};

impl Registry {
    /// Finds the first element of `list` matching `pred` on the type `ty` or
    /// its bases.
    pub(crate) fn find<'r, N: 'r>(
        &'r self,
        ty: TypeId,
        list: List<N>,
        pred: &mut impl FnMut(&N) -> bool,
    ) -> Option<(&'r TypeNode, &'r N)> {
        let node = self.node(ty)?;
        if let Some(found) = list(node).iter().find(|&element| pred(element)) {
            return Some((node, found));
        }
        node.bases
            .iter()
            .find_map(|base| self.find(base.target.type_id(), list, &mut *pred))
    }

    /// Calls `visit` on every element of `list` on the type `ty` and its
    /// bases, own elements first.
    pub(crate) fn visit<'r, N: 'r>(
        &'r self,
        ty: TypeId,
        list: List<N>,
        visit: &mut impl FnMut(&'r TypeNode, &'r N),
    ) {
        let Some(node) = self.node(ty) else {
            return;
        };
        for element in list(node) {
            visit(node, element);
        }
        for base in &node.bases {
            self.visit(base.target.type_id(), list, &mut *visit);
        }
    }

    /// Returns `true` if `from` is `to` or has `to` among its bases.
    pub(crate) fn can_cast(&self, from: TypeId, to: TypeId) -> bool {
        from == to
            || self.node(from).is_some_and(|node| {
                node.bases
                    .iter()
                    .any(|base| self.can_cast(base.target.type_id(), to))
            })
    }

    /// Returns `true` if `from` or one of its bases has a conversion to `to`.
    pub(crate) fn can_convert(&self, from: TypeId, to: TypeId) -> bool {
        self.node(from).is_some_and(|node| {
            node.convs.iter().any(|conv| conv.target.type_id() == to)
                || node
                    .bases
                    .iter()
                    .any(|base| self.can_convert(base.target.type_id(), to))
        })
    }

    /// Returns `true` if a value of type `from` is accepted where a `to` is
    /// expected.
    pub(crate) fn accepts(&self, from: TypeId, to: TypeId) -> bool {
        self.can_cast(from, to) || self.can_convert(from, to)
    }

    /// Returns `true` if `args` can be passed to `signature`.
    ///
    /// Besides the types, this checks that every argument can be obtained by
    /// value: an alias of a type that cannot be cloned only matches through a
    /// conversion.
    pub(crate) fn matches(&self, signature: Signature, args: &[Any<'_, '_>]) -> bool {
        signature.arity == args.len()
            && signature.args().zip(args).all(|(expected, arg)| {
                expected.is_some_and(|expected| arg.can_pass_as(expected.type_id()))
            })
    }

    /// Returns `true` if arguments of the types of `args` are accepted by
    /// `signature`.
    pub(crate) fn matches_types(&self, signature: Signature, args: Signature) -> bool {
        signature.arity == args.arity
            && signature.args().zip(args.args()).all(|types| match types {
                (Some(expected), Some(actual)) => {
                    self.accepts(actual.type_id(), expected.type_id())
                }
                _ => false,
            })
    }

    /// Projects `value` to its base `target`.
    ///
    /// Direct bases are tried before indirect ones.
    pub(crate) fn upcast<'a>(
        &self,
        value: RawValueRef<'a>,
        target: TypeId,
    ) -> Option<RawValueRef<'a>> {
        if value.type_id() == target {
            return Some(value);
        }
        let node = self.node(value.type_id())?;
        let base = node
            .bases
            .iter()
            .find(|base| base.target.type_id() == target)
            .or_else(|| {
                node.bases
                    .iter()
                    .find(|base| self.can_cast(base.target.type_id(), target))
            })?;
        self.upcast((base.upcast)(value)?, target)
    }

    /// Mutable counterpart of [`upcast`](Registry::upcast).
    pub(crate) fn upcast_mut<'a>(
        &self,
        value: RawValueMut<'a>,
        target: TypeId,
    ) -> Option<RawValueMut<'a>> {
        if value.type_id() == target {
            return Some(value);
        }
        let node = self.node(value.type_id())?;
        let base = node
            .bases
            .iter()
            .find(|base| base.target.type_id() == target)
            .or_else(|| {
                node.bases
                    .iter()
                    .find(|base| self.can_cast(base.target.type_id(), target))
            })?;
        self.upcast_mut((base.upcast_mut)(value)?, target)
    }

    /// Applies the first conversion to `target` found on the type of `value`
    /// or its bases.
    pub(crate) fn convert<'r>(
        &'r self,
        value: RawValueRef<'_>,
        target: TypeId,
    ) -> Any<'r, 'static> {
        let Some(node) = self.node(value.type_id()) else {
            return Any::empty(self);
        };
        if let Some(conv) = node.convs.iter().find(|conv| conv.target.type_id() == target) {
            return (conv.convert)(self, value);
        }
        for base in &node.bases {
            if !self.can_convert(base.target.type_id(), target) {
                continue;
            }
            if let Some(value) = (base.upcast)(value) {
                return self.convert(value, target);
            }
        }
        Any::empty(self)
    }

    /// Returns the receiver behind `handle` as a `T`.
    pub(crate) fn receiver<'h, T: Reflect>(&self, handle: Handle<'h>) -> Option<&'h T> {
        let value = handle.into_ref()?;
        let receiver = self
            .upcast(value, TypeId::of::<T>())
            .and_then(RawValueRef::downcast::<T>);
        if receiver.is_none() {
            trace!(
                expected = core::any::type_name::<T>(),
                actual = value.type_info().type_name(),
                "receiver does not match"
            );
        }
        receiver
    }

    /// Returns the receiver behind `handle` as a mutable `T`.
    ///
    /// Fails for shared handles.
    pub(crate) fn receiver_mut<'h, T: Reflect>(&self, handle: Handle<'h>) -> Option<&'h mut T> {
        let value = handle.into_mut()?;
        let actual = value.type_info().type_name();
        let receiver = self
            .upcast_mut(value, TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>().ok());
        if receiver.is_none() {
            trace!(
                expected = core::any::type_name::<T>(),
                actual,
                "receiver does not match"
            );
        }
        receiver
    }

    /// Runs the destructor hook registered for the type of `value`, if any.
    pub(crate) fn run_dtor(&self, value: RawValueMut<'_>) {
        if let Some(dtor) = self.node(value.type_id()).and_then(|node| node.dtor.as_ref()) {
            (dtor.destroy)(Handle::from_raw_mut(value));
        }
    }
}
