//! Module containing the type-erased value storage.

mod raw;
mod storage;
mod vtable;

pub use self::raw::{RawValue, RawValueMut, RawValueRef, RawValueSync};
pub use self::storage::fits_inline;
