//! # Silt Interop
//!
//! Typed marshaling layer for the Silt storage engine's C API.
//!
//! This crate provides:
//! - Logical, validated counterparts of the engine's raw call structures
//! - A scoped pinning arena for call-stable buffer addresses
//! - A string decode/reuse cache for native character buffers
//! - A resource-lifecycle guard for opaque engine handles
//! - The call bridge composing encode, pin, call, decode, unpin
//!
//! One engine call always runs the same sequence: build logical values,
//! validate and encode them, pin variable-length payloads, invoke the
//! entry point, decode results, release the pins. The phases are strictly
//! sequential; the raw layouts live in [`silt_abi`].

#![warn(missing_docs)]

pub mod arena;
pub mod collation;
pub mod column;
pub mod commit;
pub mod context;
pub mod engine;
pub mod errinfo;
pub mod error;
pub mod index;
pub mod options;
pub mod position;
pub mod progress;
pub mod resource;
pub mod setcolumn;
pub mod signature;
pub mod stats;
pub mod strings;

pub use arena::PinningArena;
pub use collation::Collation;
pub use column::{
    ColumnDefinition, ColumnId, ColumnInfo, ColumnKind, ColumnOptions, CodePage,
};
pub use commit::CommitId;
pub use context::OperationContext;
pub use engine::{
    create_indexes, get_record_position, get_thread_stats, open_table, set_columns, EngineApi,
    Table,
};
pub use errinfo::{ErrorCategory, ErrorInfo};
pub use error::{InteropError, InteropResult};
pub use index::{ConditionalColumn, ConditionalOptions, IndexDefinition, IndexOptions};
pub use options::InteropOptions;
pub use position::RecordPosition;
pub use progress::Progress;
pub use resource::{ResourceGuard, ResourceState};
pub use setcolumn::{SetColumnOptions, SetColumnRequest};
pub use signature::Signature;
pub use stats::{decode_thread_stats, ThreadStats, ThreadStats2, ThreadStatsReading};
pub use strings::StringCache;

// The raw side of the boundary, re-exported for callers that compose
// their own engine calls.
pub use silt_abi::{
    negotiated_size, LogPosition, LogTime, Nullable, RawInstance, RawSession, RawTable, Status,
    TextVariant,
};
