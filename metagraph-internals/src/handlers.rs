//! Handlers that define the per-type strategies of erased values.
//!
//! A [`RawValue`] only knows its payload through the vtable created for a
//! payload type `T` and a handler `H`. The handler decides what the type
//! information of `T` is, whether `T` can be duplicated, and whether two
//! instances of `T` can be compared structurally.
//!
//! [`RawValue`]: crate::RawValue

use crate::type_info::TypeInfo;

/// Trait supplying the type information and the clone and compare strategies
/// of an erased value.
///
/// The handler is a zero-sized marker type. All methods are associated
/// functions, so a vtable can store them as plain function pointers.
///
/// # Fallbacks
///
/// Both strategies are optional per type:
///
/// - [`clone`](ValueHandler::clone) returns `None` when the type cannot be
///   duplicated. Cloning an erased value of such a type fails.
/// - [`eq`](ValueHandler::eq) returns `None` when the type has no equality.
///   Erased comparisons then fall back to comparing addresses, so two distinct
///   instances never compare equal.
///
/// # Examples
///
/// ```
/// use metagraph_internals::{
///     RawValue, TypeInfo, TypeTraits,
///     handlers::ValueHandler,
/// };
///
/// struct Celsius(f32);
///
/// struct CelsiusHandler;
///
/// static CELSIUS: TypeInfo =
///     TypeInfo::new::<Celsius>(TypeTraits::CLASS, 0, || &CELSIUS);
///
/// impl ValueHandler<Celsius> for CelsiusHandler {
///     fn type_info() -> &'static TypeInfo {
///         &CELSIUS
///     }
///
///     fn clone(value: &Celsius) -> Option<Celsius> {
///         Some(Celsius(value.0))
///     }
///
///     fn eq(lhs: &Celsius, rhs: &Celsius) -> Option<bool> {
///         Some(lhs.0 == rhs.0)
///     }
/// }
///
/// let value = RawValue::new::<Celsius, CelsiusHandler>(Celsius(21.5));
/// let copy = value.try_clone().unwrap();
/// assert!(value.as_ref().equals(copy.as_ref()));
/// ```
pub trait ValueHandler<T>: 'static {
    /// Returns the static type information of `T`.
    fn type_info() -> &'static TypeInfo;

    /// Duplicates a value, or returns `None` if `T` cannot be duplicated.
    fn clone(value: &T) -> Option<T>;

    /// Compares two values, or returns `None` if `T` has no equality.
    fn eq(lhs: &T, rhs: &T) -> Option<bool>;
}
