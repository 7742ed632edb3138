//! Index-creation descriptors.
//!
//! An index definition is the most pointer-dense structure the engine
//! accepts: name, key description, collation descriptor and conditional
//! columns all travel as pinned addresses. Everything is validated
//! eagerly; encoding pins each payload in the caller's arena and the
//! resulting raw structure is only valid until that arena closes.

use serde::{Deserialize, Serialize};

use silt_abi::{
    RawConditionalColumn, RawIndexCreate, RawIndexCreate2, Status, TextVariant,
};

use crate::arena::PinningArena;
use crate::collation::Collation;
use crate::error::{non_negative, InteropError, InteropResult};

/// Option bits of an index definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct IndexOptions(pub u32);

impl IndexOptions {
    /// No options.
    pub const NONE: IndexOptions = IndexOptions(0);
    /// Duplicate keys are not allowed.
    pub const UNIQUE: IndexOptions = IndexOptions(0x1);
    /// The primary (clustered) index.
    pub const PRIMARY: IndexOptions = IndexOptions(0x2);
    /// Rows with all key columns null get no entry.
    pub const IGNORE_ALL_NULL: IndexOptions = IndexOptions(0x20);
    /// Rows with any key column null get no entry.
    pub const IGNORE_ANY_NULL: IndexOptions = IndexOptions(0x8);
    /// The collation member points at a collation descriptor.
    pub const COLLATION: IndexOptions = IndexOptions(0x800);
    /// The grown layout's maximum key length is meaningful.
    pub const KEY_LENGTH: IndexOptions = IndexOptions(0x8000);

    /// True when every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: IndexOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for IndexOptions {
    type Output = IndexOptions;

    fn bitor(self, rhs: IndexOptions) -> IndexOptions {
        IndexOptions(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for IndexOptions {
    fn bitor_assign(&mut self, rhs: IndexOptions) {
        self.0 |= rhs.0;
    }
}

/// Option bits of a conditional column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct ConditionalOptions(pub u32);

impl ConditionalOptions {
    /// Index the row only when the column is null.
    pub const MUST_BE_NULL: ConditionalOptions = ConditionalOptions(0x1);
    /// Index the row only when the column is not null.
    pub const MUST_BE_NON_NULL: ConditionalOptions = ConditionalOptions(0x2);
}

/// A column condition restricting which rows an index covers.
///
/// The conditional column is not part of the index key; it only controls
/// whether a row gets an entry at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionalColumn {
    /// Name of the column the condition applies to.
    pub column_name: Option<String>,
    /// Whether the column must be null or non-null.
    pub options: ConditionalOptions,
}

impl ConditionalColumn {
    /// Creates a condition on the named column.
    #[must_use]
    pub fn new(column_name: impl Into<String>, options: ConditionalOptions) -> Self {
        ConditionalColumn {
            column_name: Some(column_name.into()),
            options,
        }
    }

    /// Checks the condition before encoding.
    pub fn validate(&self) -> InteropResult<()> {
        if self.column_name.is_none() {
            return Err(InteropError::missing("conditional column name"));
        }
        Ok(())
    }

    fn to_raw(&self, arena: &mut PinningArena, variant: TextVariant) -> RawConditionalColumn {
        RawConditionalColumn {
            struct_size: RawConditionalColumn::SIZE,
            column_name: arena.add_text(self.column_name.as_deref(), variant),
            options: self.options.0,
        }
    }
}

/// Everything needed to create one index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Name of the index.
    pub name: Option<String>,
    /// Key description: a sequence of zero-delimited tokens, each a
    /// direction specifier (`+` or `-`) followed by a column name, e.g.
    /// `"+last\0-first\0"`. The encoder appends the second terminator.
    pub key: Option<String>,
    /// Length of the key description in characters, both terminators
    /// included.
    pub key_length: i32,
    /// Option bits.
    pub options: IndexOptions,
    /// Page density, percent.
    pub density: i32,
    /// Optional collation for text key columns.
    pub collation: Option<Collation>,
    /// Maximum bytes of each column stored in the index; zero for the
    /// engine default.
    pub max_segment_length: i32,
    /// Maximum key length in bytes; zero for the engine default.
    pub max_key_length: i32,
    /// Optional conditions restricting which rows are indexed.
    pub conditional_columns: Option<Vec<ConditionalColumn>>,
    /// Number of entries of `conditional_columns` to use.
    pub conditional_count: i32,
    /// Engine-reported creation status, filled in after the call.
    pub error: Status,
}

impl IndexDefinition {
    /// Creates a definition with the mandatory members set.
    ///
    /// `key_length` is derived from `key`; both terminators are counted.
    #[must_use]
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        let key_length = key.chars().count() as i32 + 1;
        IndexDefinition {
            name: Some(name.into()),
            key: Some(key),
            key_length,
            density: 100,
            ..Default::default()
        }
    }

    /// Checks every member before encoding.
    pub fn validate(&self) -> InteropResult<()> {
        if self.name.is_none() {
            return Err(InteropError::missing("index name"));
        }
        let Some(key) = self.key.as_deref() else {
            return Err(InteropError::missing("index key"));
        };

        let key_length = non_negative("key_length", self.key_length)? as usize;
        // The raw key is the key text plus the final terminator the
        // encoder appends.
        let limit = key.chars().count() + 1;
        if key_length > limit {
            return Err(InteropError::out_of_range(
                "key_length",
                format!("{key_length} exceeds the {limit} character key"),
            ));
        }

        non_negative("density", self.density)?;
        non_negative("max_segment_length", self.max_segment_length)?;
        non_negative("max_key_length", self.max_key_length)?;

        let count = non_negative("conditional_count", self.conditional_count)? as usize;
        match &self.conditional_columns {
            None if count != 0 => {
                return Err(InteropError::out_of_range(
                    "conditional_count",
                    format!("{count} with no conditional columns"),
                ));
            }
            Some(columns) => {
                if count > columns.len() {
                    return Err(InteropError::out_of_range(
                        "conditional_count",
                        format!("{count} exceeds the {} column array", columns.len()),
                    ));
                }
                for column in &columns[..count] {
                    column.validate()?;
                }
            }
            None => {}
        }

        if let Some(collation) = &self.collation {
            collation.validate()?;
        }
        Ok(())
    }

    /// Encodes to the grown raw layout, pinning every variable-length
    /// payload in `arena`.
    ///
    /// The result is only valid until the arena closes.
    pub fn to_raw(
        &self,
        arena: &mut PinningArena,
        variant: TextVariant,
    ) -> InteropResult<RawIndexCreate2> {
        self.validate()?;

        let mut options = self.options;
        let collation = match &self.collation {
            None => std::ptr::null(),
            Some(collation) => {
                options |= IndexOptions::COLLATION;
                if collation.locale_name.is_some() {
                    let raw = collation.to_raw_named(arena)?;
                    arena.add(Some(raw)).cast()
                } else {
                    let raw = collation.to_raw_legacy()?;
                    arena.add(Some(raw)).cast()
                }
            }
        };
        if self.max_key_length != 0 {
            options |= IndexOptions::KEY_LENGTH;
        }

        let count = self.conditional_count as usize;
        let conditional_columns = match &self.conditional_columns {
            None => std::ptr::null(),
            Some(columns) => {
                let raws: Vec<RawConditionalColumn> = columns[..count]
                    .iter()
                    .map(|column| column.to_raw(arena, variant))
                    .collect();
                arena.add_slice(&raws)
            }
        };

        Ok(RawIndexCreate2 {
            base: RawIndexCreate {
                struct_size: RawIndexCreate2::SIZE,
                name: arena.add_text(self.name.as_deref(), variant),
                key: arena.add_text(self.key.as_deref(), variant),
                key_length: self.key_length as u32,
                options: options.0,
                density: self.density as u32,
                collation,
                max_segment_length: self.max_segment_length as usize,
                conditional_columns,
                conditional_count: self.conditional_count as u32,
                error: 0,
            },
            max_key_length: self.max_key_length as u32,
        })
    }

    /// Copies the engine-reported status back from the raw layout.
    pub fn absorb_raw(&mut self, raw: &RawIndexCreate2) {
        self.error = Status(raw.base.error);
    }
}
