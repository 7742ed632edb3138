//! Raw `#[repr(C)]` layouts of the engine's call-data structures.
//!
//! Field order and widths here are the compatibility contract with the
//! engine; do not reorder or resize anything. Structures whose layout has
//! grown across engine releases carry a leading `struct_size` member and
//! are modeled as a base layout embedded in the grown one.
//!
//! Pointer members always hold addresses pinned by the caller for the
//! duration of one engine call; the layouts themselves never own memory.

use std::ffi::c_void;
use std::ptr;

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::error::{AbiError, AbiResult};

/// Units in the fixed computer-name field of [`RawSignature`].
pub const COMPUTER_NAME_UNITS: usize = 16;

/// Serialized size of [`RawSignature`] in bytes.
pub const SIGNATURE_SIZE: usize = 28;

/// Units in the fixed source-file field of [`RawErrorInfo`].
pub const SOURCE_FILE_UNITS: usize = 64;

/// Units in the fixed name fields of the column-info layouts.
const NAME_UNITS: usize = 256;

/// A timestamp in the engine's on-disk byte layout.
///
/// The zero pattern is the designated "no value" sentinel; see
/// [`crate::Nullable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct LogTime {
    /// Seconds, 0-59.
    pub seconds: u8,
    /// Minutes, 0-59.
    pub minutes: u8,
    /// Hours, 0-23.
    pub hours: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Month, 1-12.
    pub month: u8,
    /// Years since 1900.
    pub year: u8,
    /// Flag bits; bit 0 marks a UTC timestamp.
    pub flags: u8,
    /// Reserved.
    pub reserved: u8,
}

/// A coordinate in the engine's transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct LogPosition {
    /// Byte offset within the sector.
    pub offset: u16,
    /// Sector within the generation.
    pub sector: u16,
    /// Log generation number.
    pub generation: i32,
}

/// Identity stamp of a database or log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct RawSignature {
    /// Random value chosen at creation.
    pub random: u32,
    /// Creation timestamp.
    pub creation: LogTime,
    /// Zero-terminated narrow computer name; the final byte is always zero.
    pub computer_name: [u8; COMPUTER_NAME_UNITS],
}

impl RawSignature {
    /// Serializes to the fixed 28-byte wire form.
    ///
    /// The final byte is always zero.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        let mut out = [0u8; SIGNATURE_SIZE];
        let mut buf = &mut out[..];
        buf.put_u32_le(self.random);
        buf.put_u8(self.creation.seconds);
        buf.put_u8(self.creation.minutes);
        buf.put_u8(self.creation.hours);
        buf.put_u8(self.creation.day);
        buf.put_u8(self.creation.month);
        buf.put_u8(self.creation.year);
        buf.put_u8(self.creation.flags);
        buf.put_u8(self.creation.reserved);
        buf.put_slice(&self.computer_name);
        out[SIGNATURE_SIZE - 1] = 0;
        out
    }

    /// Reads the fixed 28-byte wire form.
    ///
    /// Input shorter than 28 bytes fails with [`AbiError::OutOfRange`];
    /// extra bytes beyond the 28th are ignored.
    pub fn from_bytes(bytes: &[u8]) -> AbiResult<Self> {
        if bytes.len() < SIGNATURE_SIZE {
            return Err(AbiError::OutOfRange {
                what: "signature",
                needed: SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }
        let mut buf = &bytes[..SIGNATURE_SIZE];
        let random = buf.get_u32_le();
        let creation = LogTime {
            seconds: buf.get_u8(),
            minutes: buf.get_u8(),
            hours: buf.get_u8(),
            day: buf.get_u8(),
            month: buf.get_u8(),
            year: buf.get_u8(),
            flags: buf.get_u8(),
            reserved: buf.get_u8(),
        };
        let mut computer_name = [0u8; COMPUTER_NAME_UNITS];
        buf.copy_to_slice(&mut computer_name);
        computer_name[COMPUTER_NAME_UNITS - 1] = 0;
        Ok(RawSignature {
            random,
            creation,
            computer_name,
        })
    }
}

/// Durable-commit identifier: a log signature plus a sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawCommitId {
    /// Signature of the log stream the commit belongs to.
    pub signature: RawSignature,
    /// Commit sequence number within that log stream.
    pub sequence: i64,
}

/// Definition of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawColumnDef {
    /// Size of this structure.
    pub struct_size: u32,
    /// Column identifier (output of column creation, input elsewhere).
    pub column_id: u32,
    /// Column type discriminant.
    pub kind: u32,
    /// Legacy locale member, always zero.
    pub country: u16,
    /// Legacy locale member, always zero.
    pub lang_id: u16,
    /// Code page for text columns.
    pub code_page: u16,
    /// Legacy collation member, always zero.
    pub collate: u16,
    /// Maximum value length in bytes.
    pub max_length: u32,
    /// Option bits.
    pub options: u32,
}

impl RawColumnDef {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Column metadata with its owning table, narrow text form.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct RawColumnInfoNarrow {
    /// Size of this structure.
    pub struct_size: u32,
    /// Column identifier.
    pub column_id: u32,
    /// Column type discriminant.
    pub kind: u32,
    /// Legacy locale member, always zero.
    pub country: u16,
    /// Legacy locale member, always zero.
    pub lang_id: u16,
    /// Code page for text columns.
    pub code_page: u16,
    /// Padding, always zero.
    pub filler: u16,
    /// Maximum value length in bytes.
    pub max_length: u32,
    /// Option bits.
    pub options: u32,
    /// Zero-terminated name of the owning table.
    pub table_name: [u8; NAME_UNITS],
    /// Zero-terminated name of the column.
    pub column_name: [u8; NAME_UNITS],
}

impl RawColumnInfoNarrow {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

impl Default for RawColumnInfoNarrow {
    fn default() -> Self {
        RawColumnInfoNarrow {
            struct_size: 0,
            column_id: 0,
            kind: 0,
            country: 0,
            lang_id: 0,
            code_page: 0,
            filler: 0,
            max_length: 0,
            options: 0,
            table_name: [0; NAME_UNITS],
            column_name: [0; NAME_UNITS],
        }
    }
}

impl std::fmt::Debug for RawColumnInfoNarrow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawColumnInfoNarrow")
            .field("column_id", &self.column_id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Column metadata with its owning table, wide text form.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct RawColumnInfoWide {
    /// Size of this structure.
    pub struct_size: u32,
    /// Column identifier.
    pub column_id: u32,
    /// Column type discriminant.
    pub kind: u32,
    /// Legacy locale member, always zero.
    pub country: u16,
    /// Legacy locale member, always zero.
    pub lang_id: u16,
    /// Code page for text columns.
    pub code_page: u16,
    /// Padding, always zero.
    pub filler: u16,
    /// Maximum value length in bytes.
    pub max_length: u32,
    /// Option bits.
    pub options: u32,
    /// Zero-terminated name of the owning table.
    pub table_name: [u16; NAME_UNITS],
    /// Zero-terminated name of the column.
    pub column_name: [u16; NAME_UNITS],
}

impl RawColumnInfoWide {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

impl Default for RawColumnInfoWide {
    fn default() -> Self {
        RawColumnInfoWide {
            struct_size: 0,
            column_id: 0,
            kind: 0,
            country: 0,
            lang_id: 0,
            code_page: 0,
            filler: 0,
            max_length: 0,
            options: 0,
            table_name: [0; NAME_UNITS],
            column_name: [0; NAME_UNITS],
        }
    }
}

impl std::fmt::Debug for RawColumnInfoWide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawColumnInfoWide")
            .field("column_id", &self.column_id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A column condition restricting which rows an index covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawConditionalColumn {
    /// Size of this structure.
    pub struct_size: u32,
    /// Pinned address of the zero-terminated column name.
    pub column_name: *const c_void,
    /// Option bits.
    pub options: u32,
}

impl RawConditionalColumn {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

impl Default for RawConditionalColumn {
    fn default() -> Self {
        RawConditionalColumn {
            struct_size: 0,
            column_name: ptr::null(),
            options: 0,
        }
    }
}

/// Index-creation descriptor, base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawIndexCreate {
    /// Size of this structure (or of the grown layout embedding it).
    pub struct_size: u32,
    /// Pinned address of the zero-terminated index name.
    pub name: *const c_void,
    /// Pinned address of the double-zero-terminated key description.
    pub key: *const c_void,
    /// Length of the key description in characters, terminators included.
    pub key_length: u32,
    /// Option bits.
    pub options: u32,
    /// Page density, percent.
    pub density: u32,
    /// Pinned address of the collation descriptor, or null.
    pub collation: *const c_void,
    /// Maximum bytes of each column stored in the index; pointer-sized
    /// by layout, integral by use.
    pub max_segment_length: usize,
    /// Pinned address of the conditional-column array, or null.
    pub conditional_columns: *const RawConditionalColumn,
    /// Number of entries at `conditional_columns`.
    pub conditional_count: u32,
    /// Engine-reported creation status for this index.
    pub error: i32,
}

impl RawIndexCreate {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

impl Default for RawIndexCreate {
    fn default() -> Self {
        RawIndexCreate {
            struct_size: 0,
            name: ptr::null(),
            key: ptr::null(),
            key_length: 0,
            options: 0,
            density: 0,
            collation: ptr::null(),
            max_segment_length: 0,
            conditional_columns: ptr::null(),
            conditional_count: 0,
            error: 0,
        }
    }
}

/// Index-creation descriptor, grown layout adding a maximum key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawIndexCreate2 {
    /// The base layout.
    pub base: RawIndexCreate,
    /// Maximum key length in bytes.
    pub max_key_length: u32,
}

impl RawIndexCreate2 {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// One column-value assignment in a set-columns call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawSetColumn {
    /// Column identifier.
    pub column_id: u32,
    /// Pinned address of the value bytes, or null.
    pub data: *const c_void,
    /// Length of the value in bytes.
    pub data_length: u32,
    /// Option bits.
    pub options: u32,
    /// Byte offset for writes into a long value.
    pub long_value_offset: u32,
    /// One-based value sequence in a multi-valued column; zero appends.
    pub tag_sequence: u32,
    /// Engine-reported status for this assignment.
    pub error: i32,
}

impl Default for RawSetColumn {
    fn default() -> Self {
        RawSetColumn {
            column_id: 0,
            data: ptr::null(),
            data_length: 0,
            options: 0,
            long_value_offset: 0,
            tag_sequence: 0,
            error: 0,
        }
    }
}

/// Fractional position within an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawRecordPosition {
    /// Size of this structure.
    pub struct_size: u32,
    /// Approximate entries less than the current key.
    pub entries_before: u32,
    /// Approximate entries equal to the current key.
    pub entries_in_range: u32,
    /// Approximate entries in the whole index.
    pub entries_total: u32,
}

impl RawRecordPosition {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Progress report for a long-running engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawProgress {
    /// Size of this structure.
    pub struct_size: u32,
    /// Work units completed so far.
    pub units_done: u32,
    /// Work units in total; never less than `units_done`.
    pub units_total: u32,
}

impl RawProgress {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Collation descriptor, legacy locale-identifier form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawCollation {
    /// Locale identifier.
    pub locale_id: u32,
    /// Normalization flag bits.
    pub map_flags: u32,
}

/// Collation descriptor, named-locale form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawCollationNamed {
    /// Pinned address of the zero-terminated wide locale name.
    pub locale_name: *const c_void,
    /// Normalization flag bits.
    pub map_flags: u32,
}

impl Default for RawCollationNamed {
    fn default() -> Self {
        RawCollationNamed {
            locale_name: ptr::null(),
            map_flags: 0,
        }
    }
}

/// Caller-supplied context attached to a session for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct RawOperationContext {
    /// Identifier of the acting user.
    pub user_id: u32,
    /// Identifier of the operation.
    pub operation_id: u8,
    /// Kind of the operation.
    pub operation_type: u8,
    /// Kind of the client issuing it.
    pub client_type: u8,
    /// Flag bits.
    pub flags: u8,
}

/// Basic information about the most recent engine error.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct RawErrorInfo {
    /// Size of this structure.
    pub struct_size: u32,
    /// The error code being described.
    pub error: i32,
    /// Most specific category of the error.
    pub category: u32,
    /// Category hierarchy, most general first; zero-filled tail.
    pub category_hierarchy: [u8; 8],
    /// Source line that raised the error.
    pub source_line: u32,
    /// Zero-terminated wide name of the source file.
    pub source_file: [u16; SOURCE_FILE_UNITS],
}

impl RawErrorInfo {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

impl Default for RawErrorInfo {
    fn default() -> Self {
        RawErrorInfo {
            struct_size: 0,
            error: 0,
            category: 0,
            category_hierarchy: [0; 8],
            source_line: 0,
            source_file: [0; SOURCE_FILE_UNITS],
        }
    }
}

impl std::fmt::Debug for RawErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawErrorInfo")
            .field("error", &self.error)
            .field("category", &self.category)
            .field("source_line", &self.source_line)
            .finish_non_exhaustive()
    }
}

/// Per-thread engine activity counters, first release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawThreadStats {
    /// Size of this structure (or of the grown layout embedding it).
    pub struct_size: u32,
    /// Pages referenced.
    pub pages_referenced: u32,
    /// Pages read from disk.
    pub pages_read: u32,
    /// Pages preread.
    pub pages_preread: u32,
    /// Pages dirtied.
    pub pages_dirtied: u32,
    /// Clean pages dirtied again.
    pub pages_redirtied: u32,
    /// Log records generated.
    pub log_records: u32,
    /// Bytes of log generated.
    pub log_bytes: u32,
}

impl RawThreadStats {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Per-thread engine activity counters, grown layout adding cache-miss
/// accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct RawThreadStats2 {
    /// The base counters.
    pub base: RawThreadStats,
    /// Microseconds spent waiting on page-cache misses.
    pub cache_miss_microseconds: u64,
    /// Page-cache misses.
    pub cache_misses: u32,
}

impl RawThreadStats2 {
    /// Layout size for the `struct_size` member.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}
