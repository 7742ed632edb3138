//! Extended information about engine errors.

use serde::{Deserialize, Serialize};

use silt_abi::{
    negotiated_size, RawErrorInfo, Status, SOURCE_FILE_UNITS,
};

use crate::error::{into_signed, non_negative, InteropError, InteropResult};

/// Category of an engine error, most specific first in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Not categorized.
    #[default]
    Unknown = 0,
    /// Generic error.
    Error = 1,
    /// The operation itself failed.
    Operation = 2,
    /// The instance is unusable.
    Fatal = 3,
    /// An I/O failure.
    Io = 4,
    /// A resource was exhausted.
    Resource = 5,
    /// Out of memory.
    Memory = 6,
    /// A quota was hit.
    Quota = 7,
    /// Out of disk.
    Disk = 8,
    /// The data is wrong for the request.
    Data = 9,
    /// Stored state is corrupt.
    Corruption = 10,
    /// Stored state is inconsistent.
    Inconsistent = 11,
    /// Space is too fragmented.
    Fragmentation = 12,
    /// The API was misused.
    Api = 13,
}

impl ErrorCategory {
    /// Raw discriminant.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self as u32
    }

    /// Reads a raw discriminant; unknown values decode as
    /// [`ErrorCategory::Unknown`] since the engine may grow new ones.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => ErrorCategory::Error,
            2 => ErrorCategory::Operation,
            3 => ErrorCategory::Fatal,
            4 => ErrorCategory::Io,
            5 => ErrorCategory::Resource,
            6 => ErrorCategory::Memory,
            7 => ErrorCategory::Quota,
            8 => ErrorCategory::Disk,
            9 => ErrorCategory::Data,
            10 => ErrorCategory::Corruption,
            11 => ErrorCategory::Inconsistent,
            12 => ErrorCategory::Fragmentation,
            13 => ErrorCategory::Api,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Basic information about the most recent engine error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// The status code being described.
    pub error: Status,
    /// Most specific category of the error.
    pub category: ErrorCategory,
    /// Category hierarchy, most general first; zero-filled tail.
    pub category_hierarchy: [u8; 8],
    /// Source line that raised the error.
    pub source_line: i32,
    /// Name of the source file that raised it.
    pub source_file: String,
}

impl ErrorInfo {
    /// Encodes to the raw layout. The source-file name is truncated to
    /// the fixed field.
    pub fn to_raw(&self) -> InteropResult<RawErrorInfo> {
        let mut source_file = [0u16; SOURCE_FILE_UNITS];
        silt_abi::encode_into_wide(&self.source_file, &mut source_file);
        Ok(RawErrorInfo {
            struct_size: RawErrorInfo::SIZE,
            error: self.error.0,
            category: self.category.to_raw(),
            category_hierarchy: self.category_hierarchy,
            source_line: non_negative("source_line", self.source_line)?,
            source_file,
        })
    }

    /// Decodes from the raw layout, validating the reported size first.
    pub fn from_raw(raw: &RawErrorInfo) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawErrorInfo::SIZE as usize {
            return Err(InteropError::out_of_range(
                "error info size",
                format!("{reported} below the {} byte layout", RawErrorInfo::SIZE),
            ));
        }
        Ok(ErrorInfo {
            error: Status(raw.error),
            category: ErrorCategory::from_raw(raw.category),
            category_hierarchy: raw.category_hierarchy,
            source_line: into_signed("source_line", raw.source_line)?,
            source_file: silt_abi::decode_wide_terminated(&raw.source_file),
        })
    }
}
