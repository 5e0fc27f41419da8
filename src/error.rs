//! Registration errors.

use crate::{Id, Policy};

/// Error returned when a registration would break an invariant of the
/// [`Registry`](crate::Registry).
///
/// Queries and invocations never produce this error: they report failure
/// through empty values and `false`. Only the [`Factory`](crate::Factory)
/// methods and [`Registry::reflect`](crate::Registry::reflect) do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The type already has an identifier.
    #[error("type `{type_name}` is already registered as {id}")]
    AlreadyRegistered {
        /// Name of the type.
        type_name: &'static str,
        /// Identifier the type is registered under.
        id: Id,
    },
    /// Another type is registered under the same identifier.
    #[error("identifier {id} is already used by type `{existing}`")]
    DuplicateTypeId {
        /// The identifier.
        id: Id,
        /// Name of the type owning the identifier.
        existing: &'static str,
    },
    /// The base is already declared.
    #[error("`{base}` is already a base of `{type_name}`")]
    DuplicateBase {
        /// Name of the derived type.
        type_name: &'static str,
        /// Name of the base type.
        base: &'static str,
    },
    /// Declaring the base would make the base graph cyclic.
    #[error("declaring `{base}` as a base of `{type_name}` would create a cycle")]
    CyclicBase {
        /// Name of the derived type.
        type_name: &'static str,
        /// Name of the base type.
        base: &'static str,
    },
    /// A conversion to the same target type is already declared.
    #[error("`{type_name}` already converts to `{target}`")]
    DuplicateConv {
        /// Name of the source type.
        type_name: &'static str,
        /// Name of the target type.
        target: &'static str,
    },
    /// A constructor with the same argument types is already declared.
    #[error("`{type_name}` already has a constructor taking these arguments")]
    DuplicateCtor {
        /// Name of the constructed type.
        type_name: &'static str,
    },
    /// The destructor is already declared.
    #[error("`{type_name}` already has a destructor")]
    DuplicateDtor {
        /// Name of the type.
        type_name: &'static str,
    },
    /// A data member with the same identifier is already declared.
    #[error("`{type_name}` already has a data member {id}")]
    DuplicateData {
        /// Name of the owning type.
        type_name: &'static str,
        /// Identifier of the data member.
        id: Id,
    },
    /// A function with the same identifier is already declared.
    #[error("`{type_name}` already has a function {id}")]
    DuplicateFunc {
        /// Name of the owning type.
        type_name: &'static str,
        /// Identifier of the function.
        id: Id,
    },
    /// A property with an equal key is already attached to the same element.
    #[error("duplicate property key on `{type_name}`")]
    DuplicateProp {
        /// Name of the type the element belongs to.
        type_name: &'static str,
    },
    /// The policy cannot apply to the most recently declared element.
    #[error("policy {policy:?} does not apply to the last element declared on `{type_name}`")]
    UnsupportedPolicy {
        /// Name of the type the element belongs to.
        type_name: &'static str,
        /// The rejected policy.
        policy: Policy,
    },
}
