//! Opaque handle and status types of the engine ABI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status code returned by every engine entry point.
///
/// Zero is success, negative values are errors, positive values are
/// warnings. The marshaling layer passes these through unchanged; they
/// are the engine's vocabulary, not ours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Status(pub i32);

impl Status {
    /// The success status.
    pub const OK: Status = Status(0);

    /// Returns true for success or a warning.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.0 >= 0
    }

    /// Returns true for an error.
    #[must_use]
    pub const fn is_err(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status:{}", self.0)
    }
}

/// An opaque engine instance handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RawInstance(pub usize);

/// An opaque session handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RawSession(pub usize);

/// An opaque table handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RawTable(pub usize);
