//! Column definitions and column metadata.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use silt_abi::{
    negotiated_size, RawColumnDef, RawColumnInfoNarrow, RawColumnInfoWide, TextVariant,
};

use crate::error::{into_signed, non_negative, InteropError, InteropResult};
use crate::strings::StringCache;

/// Identifier of a column within a table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ColumnId(pub u32);

impl ColumnId {
    /// Creates a column identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column:{}", self.0)
    }
}

/// Value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnKind {
    /// No type; invalid in a definition sent to the engine.
    #[default]
    Nil = 0,
    /// Single bit, never null once set.
    Bool = 1,
    /// Unsigned byte.
    UnsignedByte = 2,
    /// Signed 16-bit integer.
    Int16 = 3,
    /// Signed 32-bit integer.
    Int32 = 4,
    /// Signed 64-bit integer.
    Int64 = 5,
    /// 32-bit float.
    Float32 = 6,
    /// 64-bit float.
    Float64 = 7,
    /// Timestamp.
    DateTime = 8,
    /// Fixed-or-variable binary, up to a page in size.
    Binary = 9,
    /// Fixed-or-variable text, up to a page in size.
    Text = 10,
    /// Large binary value.
    LongBinary = 11,
    /// Large text value.
    LongText = 12,
}

impl ColumnKind {
    /// Raw discriminant.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self as u32
    }

    /// Reads a raw discriminant.
    pub fn from_raw(raw: u32) -> InteropResult<Self> {
        Ok(match raw {
            0 => ColumnKind::Nil,
            1 => ColumnKind::Bool,
            2 => ColumnKind::UnsignedByte,
            3 => ColumnKind::Int16,
            4 => ColumnKind::Int32,
            5 => ColumnKind::Int64,
            6 => ColumnKind::Float32,
            7 => ColumnKind::Float64,
            8 => ColumnKind::DateTime,
            9 => ColumnKind::Binary,
            10 => ColumnKind::Text,
            11 => ColumnKind::LongBinary,
            12 => ColumnKind::LongText,
            other => {
                return Err(InteropError::out_of_range(
                    "column kind",
                    format!("unknown discriminant {other}"),
                ))
            }
        })
    }
}

/// Code page of a text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodePage {
    /// Not a text column.
    #[default]
    None = 0,
    /// UTF-16 text.
    Unicode = 1200,
    /// Single-byte Western text.
    Ansi = 1252,
}

impl CodePage {
    /// Raw code-page number.
    #[must_use]
    pub const fn to_raw(self) -> u16 {
        self as u16
    }

    /// Reads a raw code-page number.
    pub fn from_raw(raw: u16) -> InteropResult<Self> {
        match raw {
            0 => Ok(CodePage::None),
            1200 => Ok(CodePage::Unicode),
            1252 => Ok(CodePage::Ansi),
            other => Err(InteropError::out_of_range(
                "code page",
                format!("unknown code page {other}"),
            )),
        }
    }
}

/// Option bits of a column definition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize,
)]
pub struct ColumnOptions(pub u32);

impl ColumnOptions {
    /// No options.
    pub const NONE: ColumnOptions = ColumnOptions(0);
    /// Fixed-width storage.
    pub const FIXED: ColumnOptions = ColumnOptions(0x1);
    /// Tagged storage; takes no space when unset.
    pub const TAGGED: ColumnOptions = ColumnOptions(0x2);
    /// Value must be set before a row can be stored.
    pub const NOT_NULL: ColumnOptions = ColumnOptions(0x4);
    /// Row version column.
    pub const VERSION: ColumnOptions = ColumnOptions(0x8);
    /// Automatically incremented on insert.
    pub const AUTO_INCREMENT: ColumnOptions = ColumnOptions(0x10);
    /// Column may hold multiple values.
    pub const MULTI_VALUED: ColumnOptions = ColumnOptions(0x400);
    /// Concurrent additive updates.
    pub const ESCROW_UPDATE: ColumnOptions = ColumnOptions(0x800);

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: ColumnOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ColumnOptions {
    type Output = ColumnOptions;

    fn bitor(self, rhs: ColumnOptions) -> ColumnOptions {
        ColumnOptions(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ColumnOptions {
    fn bitor_assign(&mut self, rhs: ColumnOptions) {
        self.0 |= rhs.0;
    }
}

/// Definition of a column, as handed to (or read back from) the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Value type.
    pub kind: ColumnKind,
    /// Code page; only meaningful for text kinds.
    pub code_page: CodePage,
    /// Maximum value length in bytes.
    pub max_length: i32,
    /// Option bits.
    pub options: ColumnOptions,
    /// Column identifier; output of column creation.
    pub column_id: ColumnId,
}

impl ColumnDefinition {
    /// Checks the definition before encoding.
    pub fn validate(&self) -> InteropResult<()> {
        non_negative("max_length", self.max_length)?;
        Ok(())
    }

    /// Encodes to the raw layout.
    pub fn to_raw(&self) -> InteropResult<RawColumnDef> {
        self.validate()?;
        Ok(RawColumnDef {
            struct_size: RawColumnDef::SIZE,
            column_id: self.column_id.0,
            kind: self.kind.to_raw(),
            country: 0,
            lang_id: 0,
            code_page: self.code_page.to_raw(),
            collate: 0,
            max_length: non_negative("max_length", self.max_length)?,
            options: self.options.0,
        })
    }

    /// Decodes from the raw layout.
    pub fn from_raw(raw: &RawColumnDef) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawColumnDef::SIZE as usize {
            return Err(InteropError::out_of_range(
                "column definition size",
                format!("{reported} below the {} byte layout", RawColumnDef::SIZE),
            ));
        }
        Ok(ColumnDefinition {
            kind: ColumnKind::from_raw(raw.kind)?,
            code_page: CodePage::from_raw(raw.code_page)?,
            max_length: into_signed("max_length", raw.max_length)?,
            options: ColumnOptions(raw.options),
            column_id: ColumnId(raw.column_id),
        })
    }
}

/// Column metadata including the owning table, as returned by the
/// engine's metadata calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column identifier.
    pub column_id: ColumnId,
    /// Value type.
    pub kind: ColumnKind,
    /// Code page; only meaningful for text kinds.
    pub code_page: CodePage,
    /// Maximum value length in bytes.
    pub max_length: i32,
    /// Option bits.
    pub options: ColumnOptions,
    /// Name of the owning table; shared through the string cache.
    pub table_name: Arc<str>,
    /// Name of the column; shared through the string cache.
    pub column_name: Arc<str>,
}

impl ColumnInfo {
    /// Decodes the narrow metadata layout.
    pub fn from_raw_narrow(
        raw: &RawColumnInfoNarrow,
        cache: &StringCache,
    ) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawColumnInfoNarrow::SIZE as usize {
            return Err(InteropError::out_of_range(
                "column info size",
                format!(
                    "{reported} below the {} byte layout",
                    RawColumnInfoNarrow::SIZE
                ),
            ));
        }
        Ok(ColumnInfo {
            column_id: ColumnId(raw.column_id),
            kind: ColumnKind::from_raw(raw.kind)?,
            code_page: CodePage::from_raw(raw.code_page)?,
            max_length: into_signed("max_length", raw.max_length)?,
            options: ColumnOptions(raw.options),
            table_name: cache.try_reuse(&silt_abi::decode_terminated(
                &raw.table_name,
                TextVariant::Narrow,
            )),
            column_name: cache.try_reuse(&silt_abi::decode_terminated(
                &raw.column_name,
                TextVariant::Narrow,
            )),
        })
    }

    /// Decodes the wide metadata layout.
    pub fn from_raw_wide(raw: &RawColumnInfoWide, cache: &StringCache) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawColumnInfoWide::SIZE as usize {
            return Err(InteropError::out_of_range(
                "column info size",
                format!(
                    "{reported} below the {} byte layout",
                    RawColumnInfoWide::SIZE
                ),
            ));
        }
        Ok(ColumnInfo {
            column_id: ColumnId(raw.column_id),
            kind: ColumnKind::from_raw(raw.kind)?,
            code_page: CodePage::from_raw(raw.code_page)?,
            max_length: into_signed("max_length", raw.max_length)?,
            options: ColumnOptions(raw.options),
            table_name: cache.try_reuse(&silt_abi::decode_wide_terminated(&raw.table_name)),
            column_name: cache.try_reuse(&silt_abi::decode_wide_terminated(&raw.column_name)),
        })
    }
}
