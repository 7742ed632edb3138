//! Error taxonomy of the marshaling layer.
//!
//! Every validation failure is raised here, eagerly, before any engine
//! call. Status codes coming back from the engine itself are not errors
//! of this layer; they pass through unchanged as [`silt_abi::Status`].

use silt_abi::AbiError;
use thiserror::Error;

/// Result type for marshaling operations.
pub type InteropResult<T> = Result<T, InteropError>;

/// Errors raised by validation and conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteropError {
    /// A mandatory string, array, or key is absent.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// The absent field.
        field: &'static str,
    },

    /// A count, length, or tunable is negative or exceeds its bound.
    #[error("{field} out of range: {message}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// What the bound was.
        message: String,
    },

    /// A reported size exceeds the representable positive range.
    #[error("reported size {value:#x} exceeds the representable range")]
    Overflow {
        /// The size value as reported.
        value: u32,
    },

    /// Two mutually exclusive encoding choices were both supplied.
    #[error("incompatible options: {message}")]
    IncompatibleOptions {
        /// Which choices collided.
        message: String,
    },

    /// An operation was attempted on a resource after disposal.
    #[error("{resource} used after dispose")]
    UseAfterDispose {
        /// The guarded resource.
        resource: &'static str,
    },
}

impl InteropError {
    /// Creates a missing-required-field error.
    pub fn missing(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            message: message.into(),
        }
    }

    /// Creates an incompatible-options error.
    pub fn incompatible(message: impl Into<String>) -> Self {
        Self::IncompatibleOptions {
            message: message.into(),
        }
    }

    /// Creates a use-after-dispose error.
    pub fn disposed(resource: &'static str) -> Self {
        Self::UseAfterDispose { resource }
    }
}

impl From<AbiError> for InteropError {
    fn from(err: AbiError) -> Self {
        match err {
            AbiError::Overflow { value } => InteropError::Overflow { value },
            AbiError::OutOfRange {
                what,
                needed,
                actual,
            } => InteropError::OutOfRange {
                field: what,
                message: format!("needs {needed} bytes, got {actual}"),
            },
        }
    }
}

/// Checks that a signed counter is non-negative before it is encoded
/// into an unsigned raw member.
pub(crate) fn non_negative(field: &'static str, value: i32) -> InteropResult<u32> {
    u32::try_from(value).map_err(|_| InteropError::out_of_range(field, "must not be negative"))
}

/// Checks that an unsigned raw counter fits the signed logical range
/// before it is decoded.
pub(crate) fn into_signed(field: &'static str, value: u32) -> InteropResult<i32> {
    i32::try_from(value)
        .map_err(|_| InteropError::out_of_range(field, format!("{value} exceeds i32::MAX")))
}
