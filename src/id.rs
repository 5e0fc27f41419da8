//! Identifiers of types and members.

use core::hash::Hasher;

use rustc_hash::FxHasher;

/// Identifier of a registered type or member.
///
/// Identifiers are opaque integers that are only ever compared for equality.
/// They are usually derived from a name, either with [`Id::hashed`] or through
/// the `From<&str>` conversion, but any integer source works as long as it is
/// unique where uniqueness is required: among registered types, and among the
/// data members or functions of a single type.
///
/// # Examples
///
/// ```
/// use metagraph::Id;
///
/// assert_eq!(Id::from("position"), Id::hashed("position"));
/// assert_ne!(Id::from("position"), Id::from("velocity"));
/// assert_eq!(Id::from(7).get(), 7);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(u64);

impl Id {
    /// Creates an identifier from a raw integer.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer of the identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Derives an identifier from a name.
    ///
    /// The hash is stable for the lifetime of the process, which is all the
    /// registry needs. It is not meant to be persisted.
    pub fn hashed(name: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(name.as_bytes());
        Self(hasher.finish())
    }
}

impl From<u64> for Id {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    #[inline]
    fn from(name: &str) -> Self {
        Self::hashed(name)
    }
}

impl core::fmt::Display for Id {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn test_hashed_is_deterministic() {
        assert_eq!(Id::hashed("min"), Id::hashed("min"));
        assert_ne!(Id::hashed("min"), Id::hashed("max"));
        assert_ne!(Id::hashed(""), Id::hashed("\0"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Id::new(0xff)), "#00000000000000ff");
    }
}
