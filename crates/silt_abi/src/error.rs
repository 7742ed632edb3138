//! Error types for ABI-level conversions.

use thiserror::Error;

/// Result type for ABI operations.
pub type AbiResult<T> = Result<T, AbiError>;

/// Errors that can occur when reading or writing raw layouts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// A reported size exceeds the representable positive range.
    #[error("reported size {value:#x} exceeds the representable range")]
    Overflow {
        /// The size value as reported by the caller or the engine.
        value: u32,
    },

    /// A buffer is too short for the layout being read.
    #[error("{what} needs {needed} bytes, got {actual}")]
    OutOfRange {
        /// The layout being read.
        what: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        actual: usize,
    },
}
