//! # Silt ABI
//!
//! Raw structure layouts for the Silt storage engine's C ABI.
//!
//! This crate provides:
//! - `#[repr(C)]` definitions matching the engine's call-data formats exactly
//! - Size/version negotiation for size-prefixed structures
//! - Narrow/wide text transcoding
//! - The zero-pattern nullable protocol
//!
//! Everything here is pure and stateless. The validated logical types and
//! the marshaling machinery live in `silt_interop`.

#![warn(missing_docs)]

mod error;
mod nullable;
mod size;
mod structs;
mod text;
mod types;

pub use error::{AbiError, AbiResult};
pub use nullable::Nullable;
pub use size::{negotiated_size, DEBUG_FILL};
pub use structs::{
    LogPosition, LogTime, RawCollation, RawCollationNamed, RawColumnDef, RawColumnInfoNarrow,
    RawColumnInfoWide, RawCommitId, RawConditionalColumn, RawErrorInfo, RawIndexCreate,
    RawIndexCreate2, RawOperationContext, RawProgress, RawRecordPosition, RawSetColumn,
    RawSignature, RawThreadStats, RawThreadStats2, COMPUTER_NAME_UNITS, SIGNATURE_SIZE,
    SOURCE_FILE_UNITS,
};
pub use text::{
    decode, decode_terminated, decode_wide, decode_wide_terminated, encode, encode_into_narrow,
    encode_into_wide, TextVariant,
};
pub use types::{RawInstance, RawSession, RawTable, Status};
