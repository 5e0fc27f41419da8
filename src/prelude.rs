//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use metagraph::prelude::*;
//!
//! #[derive(Clone, PartialEq)]
//! struct Counter(u32);
//!
//! impl_reflect!(Counter: Clone, PartialEq);
//!
//! let mut registry = Registry::new();
//! registry
//!     .reflect::<Counter>(Id::from("counter"))?
//!     .func(Id::from("bump"), |c: &mut Counter| c.0 += 1)?;
//!
//! let mut counter = Counter(0);
//! let bump = registry.resolve::<Counter>().func(Id::from("bump")).unwrap();
//! assert!(!bump.invoke(Handle::new(&mut counter), ()).is_empty());
//! assert_eq!(counter.0, 1);
//! # Ok::<(), RegistrationError>(())
//! ```
//!
//! # What's Included
//!
//! - **[`Registry`]** and **[`Factory`]**: the graph and its builder
//! - **[`Any`]** and **[`Handle`]**: owning and non-owning erased values
//! - **[`Type`]**, **[`Data`]** and **[`Func`]**: the views used most often
//! - **[`Reflect`]** and **[`impl_reflect!`]**: opting a type into reflection

pub use crate::{
    Any, Data, Factory, Func, Handle, Id, Policy, Reflect, Registry, RegistrationError, Type,
    impl_reflect,
};
