//! Set-column requests.

use serde::{Deserialize, Serialize};

use silt_abi::{RawSetColumn, Status};

use crate::column::ColumnId;
use crate::error::{non_negative, InteropError, InteropResult};

/// Option bits of a set-column request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct SetColumnOptions(pub u32);

impl SetColumnOptions {
    /// No options.
    pub const NONE: SetColumnOptions = SetColumnOptions(0);
    /// Append to an existing long value.
    pub const APPEND_LONG_VALUE: SetColumnOptions = SetColumnOptions(0x1);
    /// Overwrite part of an existing long value.
    pub const OVERWRITE_LONG_VALUE: SetColumnOptions = SetColumnOptions(0x4);
    /// Resize a long value.
    pub const SIZE_LONG_VALUE: SetColumnOptions = SetColumnOptions(0x8);
    /// Store an explicitly zero-length value.
    pub const ZERO_LENGTH: SetColumnOptions = SetColumnOptions(0x20);
    /// Force separated storage for a long value.
    pub const SEPARATE_LONG_VALUE: SetColumnOptions = SetColumnOptions(0x40);

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: SetColumnOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for SetColumnOptions {
    type Output = SetColumnOptions;

    fn bitor(self, rhs: SetColumnOptions) -> SetColumnOptions {
        SetColumnOptions(self.0 | rhs.0)
    }
}

/// One column-value assignment in a set-columns call.
///
/// The logical request owns its value bytes. Encoding never leaks their
/// address: the raw data pointer is always reset to null, and the call
/// bridge fills it in with an arena-pinned copy just before the engine
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetColumnRequest {
    /// Column to set.
    pub column_id: ColumnId,
    /// Value bytes; `None` sets the column to null.
    pub data: Option<Vec<u8>>,
    /// Length of the value to take from `data`, in bytes.
    pub data_length: i32,
    /// Option bits.
    pub options: SetColumnOptions,
    /// Byte offset for writes into a long value.
    pub long_value_offset: i32,
    /// One-based value sequence in a multi-valued column; zero appends.
    pub tag_sequence: i32,
    /// Engine-reported status for this assignment, filled in after the
    /// call.
    pub error: Status,
}

impl SetColumnRequest {
    /// Creates a request setting `column_id` to the given bytes.
    #[must_use]
    pub fn new(column_id: ColumnId, data: Vec<u8>) -> Self {
        let data_length = data.len() as i32;
        SetColumnRequest {
            column_id,
            data: Some(data),
            data_length,
            ..Default::default()
        }
    }

    /// Creates a request setting `column_id` to null.
    #[must_use]
    pub fn null(column_id: ColumnId) -> Self {
        SetColumnRequest {
            column_id,
            ..Default::default()
        }
    }

    /// Checks the request before encoding.
    pub fn validate(&self) -> InteropResult<()> {
        let length = non_negative("data_length", self.data_length)? as usize;
        let backing = self.data.as_ref().map_or(0, Vec::len);
        if length > backing {
            return Err(InteropError::out_of_range(
                "data_length",
                format!("{length} exceeds the {backing} byte buffer"),
            ));
        }
        non_negative("long_value_offset", self.long_value_offset)?;
        non_negative("tag_sequence", self.tag_sequence)?;
        Ok(())
    }

    /// Encodes to the raw layout.
    ///
    /// The raw data pointer is always reset to null here regardless of
    /// the logical buffer; the caller pins the buffer and stores the
    /// pinned address separately.
    pub fn to_raw(&self) -> InteropResult<RawSetColumn> {
        self.validate()?;
        Ok(RawSetColumn {
            column_id: self.column_id.0,
            data: std::ptr::null(),
            data_length: self.data_length as u32,
            options: self.options.0,
            long_value_offset: self.long_value_offset as u32,
            tag_sequence: self.tag_sequence as u32,
            error: 0,
        })
    }

    /// Copies the engine-reported status back from the raw layout.
    pub fn absorb_raw(&mut self, raw: &RawSetColumn) {
        self.error = Status(raw.error);
    }
}
