/// Policy applied to the result of a getter or a function.
///
/// The policy is chosen at registration time with [`Factory::alias`] and
/// [`Factory::discard`]. It never changes how the underlying Rust code runs,
/// only what the caller gets back.
///
/// [`Factory::alias`]: crate::Factory::alias
/// [`Factory::discard`]: crate::Factory::discard
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    /// The result is copied into a fresh owned [`Any`](crate::Any).
    #[default]
    AsIs,
    /// The result is a borrowed [`Any`](crate::Any) aliasing the storage of
    /// the receiver. It cannot outlive the receiver.
    Alias,
    /// The result is always the void [`Any`](crate::Any), whatever the
    /// underlying code returned.
    Void,
}
