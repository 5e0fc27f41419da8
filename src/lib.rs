#![cfg_attr(not(doc), no_std)]
#![forbid(unsafe_code)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Runtime reflection for Rust types.
//!
//! ## Overview
//!
//! This crate lets a program describe its types at runtime and then work with
//! values of those types without knowing them statically. The description is
//! a graph held by a [`Registry`]: each registered type is a node, and its
//! bases, conversions, constructors, destructor hook, data members, functions
//! and properties hang off it.
//!
//! Values travel through the graph inside an [`Any`], an opaque container
//! that either owns its value or aliases one that lives elsewhere. Operations
//! that need an instance take a [`Handle`], a non-owning reference that never
//! affects the lifetime of what it points to.
//!
//! ## Quick Example
//!
//! ```
//! use metagraph::{Id, Registry, impl_reflect};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Shape {
//!     sides: u32,
//! }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Square {
//!     shape: Shape,
//!     side: f64,
//! }
//!
//! impl AsRef<Shape> for Square {
//!     fn as_ref(&self) -> &Shape {
//!         &self.shape
//!     }
//! }
//!
//! impl AsMut<Shape> for Square {
//!     fn as_mut(&mut self) -> &mut Shape {
//!         &mut self.shape
//!     }
//! }
//!
//! impl_reflect!(Shape: Clone, PartialEq);
//! impl_reflect!(Square: Clone, PartialEq);
//!
//! let mut registry = Registry::new();
//! registry
//!     .reflect::<Shape>(Id::from("shape"))?
//!     .field(Id::from("sides"), |s: &Shape| &s.sides, |s: &mut Shape| &mut s.sides)?;
//! registry
//!     .reflect::<Square>(Id::from("square"))?
//!     .base::<Shape>()?
//!     .ctor_with(|side: f64| Square { shape: Shape { sides: 4 }, side })?
//!     .func_const(Id::from("area"), |s: &Square| s.side * s.side)?;
//!
//! let square = registry.resolve_id(Id::from("square")).unwrap();
//! let value = square.construct((3.0,));
//!
//! // Members of the base are found from the derived type.
//! assert_eq!(square.get(Id::from("sides"), &value).try_cast::<u32>(), Some(&4));
//! assert_eq!(square.invoke(Id::from("area"), &value, ()).try_cast::<f64>(), Some(&9.0));
//!
//! // A derived value can be viewed as its base.
//! assert_eq!(value.try_cast::<Shape>(), Some(&Shape { sides: 4 }));
//! # Ok::<(), metagraph::RegistrationError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - A type takes part in reflection by implementing [`Reflect`], usually
//!   through [`impl_reflect!`]. That only gives it static [`TypeInfo`]; the
//!   members are declared on a [`Registry`] with a [`Factory`].
//! - Lookups go through [`Type`] and the member views ([`Base`], [`Conv`],
//!   [`Ctor`], [`Dtor`], [`Data`], [`Func`], [`Prop`]). Views borrow the
//!   registry, so the graph cannot change while any of them is alive.
//! - Searches are depth-first: the members of a type come first, then those
//!   of its bases in declaration order. The first match wins.
//! - Failures of queries and invocations are reported with empty values and
//!   `false`, never with panics. Only registration returns errors, as
//!   [`RegistrationError`].
//!
//! ## Logging
//!
//! Registration and unregistration are logged at the `debug` level through
//! [`tracing`]. Failed constructions and receiver mismatches are logged at the
//! `trace` level. Nothing is logged on the successful lookup paths.

extern crate alloc;

mod any;
mod args;
mod error;
mod factory;
mod function;
mod handle;
mod handlers;
mod id;
mod macros;
mod meta;
mod policy;
pub mod prelude;
mod reflect;
pub(crate) mod registry;

pub use self::{
    any::Any,
    args::{ArgList, IntoArg, IntoArgs},
    error::RegistrationError,
    factory::Factory,
    function::{ConstMethodFn, MethodFn, StaticFn},
    handle::Handle,
    id::Id,
    meta::{Base, Conv, Ctor, Data, Dtor, Func, Prop, Type},
    policy::Policy,
    reflect::{Reflect, TypeInfo, TypeTraits, type_info},
    registry::Registry,
};
