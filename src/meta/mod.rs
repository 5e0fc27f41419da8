//! Read-only views over the registry.
//!
//! Every view is a small `Copy` value borrowing the [`Registry`]. Views of
//! the same element compare equal.

mod data;
mod func;
mod members;
mod ty;

use metagraph_internals::RawValueRef;

pub use self::{
    data::Data,
    func::Func,
    members::{Base, Conv, Ctor, Dtor, Prop},
    ty::Type,
};
use crate::{Registry, registry::node::PropNode};

/// Finds the property with a key equal to `key` in `props`.
fn find_prop<'r>(
    registry: &'r Registry,
    props: &'r [PropNode],
    key: RawValueRef<'_>,
) -> Option<Prop<'r>> {
    props
        .iter()
        .find(|prop| prop.key.as_ref().equals(key))
        .map(|prop| Prop::new(registry, prop))
}

/// Views of all properties in `props`.
fn all_props<'r>(
    registry: &'r Registry,
    props: &'r [PropNode],
) -> impl ExactSizeIterator<Item = Prop<'r>> + 'r {
    props.iter().map(move |prop| Prop::new(registry, prop))
}
