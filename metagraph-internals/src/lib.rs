#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations
)]
#![deny(unused_doc_comments)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`metagraph`].
//!
//! # Overview
//!
//! This crate contains the type-erased value storage and the unsafe
//! operations that power the [`metagraph`] reflection library. Every `unsafe`
//! block of the project lives here, so the public crate can forbid unsafe code
//! entirely.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`metagraph`] crate, not
//! this one.
//!
//! # Architecture
//!
//! - **[`value`]**: Type-erased value storage
//!   - [`RawValue`]: Owned value, stored inline when it fits in a machine word
//!     and boxed otherwise
//!   - [`RawValueRef`]/[`RawValueMut`]: Borrowed views (shared/mutable) of a
//!     value living anywhere, owned by a [`RawValue`] or not
//!   - [`RawValueSync`]: A [`RawValue`] restricted to `Send + Sync` payloads
//!   - `ValueVtable`: Function pointers for type-erased dispatch
//!
//! - **[`type_info`]**: The static per-type record ([`TypeInfo`]) and its
//!   classification flags ([`TypeTraits`])
//!
//! - **[`handlers`]**: The [`ValueHandler`] trait that supplies the type
//!   information and the clone and compare strategies of a value
//!
//! # Safety Strategy
//!
//! A value is erased by forgetting its type and keeping a `&'static` vtable
//! created for exactly that type. Every operation that needs the concrete type
//! goes through the vtable, and every downcast checks the [`TypeId`] recorded
//! in it first.
//!
//! - **Module-based encapsulation**: Storage and pointer fields are private to
//!   the module that establishes their invariants
//! - **Derived pointers**: The address of an inline value is recomputed from
//!   the container on every access, so moving or swapping containers never
//!   leaves a dangling self-pointer behind
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`metagraph`]: https://docs.rs/metagraph/latest/metagraph/
//! [`TypeId`]: core::any::TypeId
//! [`ValueHandler`]: handlers::ValueHandler
//! [`TypeInfo`]: type_info::TypeInfo
//! [`TypeTraits`]: type_info::TypeTraits

extern crate alloc;

pub mod handlers;
pub mod type_info;
pub mod value;

pub use type_info::{TypeInfo, TypeTraits};
pub use value::{RawValue, RawValueMut, RawValueRef, RawValueSync};
