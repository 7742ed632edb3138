//! Fractional positions within an index.

use serde::{Deserialize, Serialize};

use silt_abi::{negotiated_size, RawRecordPosition};

use crate::error::{InteropError, InteropResult};

/// An approximate position within an index, used to seek to (or report)
/// a fraction of the way through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordPosition {
    /// Approximate number of index entries before the key.
    pub entries_before: i64,
    /// Approximate number of entries in the whole index.
    pub entries_total: i64,
}

impl RecordPosition {
    /// Checks the position before encoding.
    pub fn validate(&self) -> InteropResult<()> {
        for (field, value) in [
            ("entries_before", self.entries_before),
            ("entries_total", self.entries_total),
        ] {
            if value < 0 {
                return Err(InteropError::out_of_range(field, "must not be negative"));
            }
            if value > i64::from(u32::MAX) {
                return Err(InteropError::out_of_range(
                    field,
                    format!("{value} exceeds the raw member range"),
                ));
            }
        }
        Ok(())
    }

    /// Encodes to the raw layout.
    ///
    /// The in-range member is not carried by the logical structure and
    /// encodes as zero.
    pub fn to_raw(&self) -> InteropResult<RawRecordPosition> {
        self.validate()?;
        Ok(RawRecordPosition {
            struct_size: RawRecordPosition::SIZE,
            entries_before: self.entries_before as u32,
            entries_in_range: 0,
            entries_total: self.entries_total as u32,
        })
    }

    /// Decodes from the raw layout.
    pub fn from_raw(raw: &RawRecordPosition) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawRecordPosition::SIZE as usize {
            return Err(InteropError::out_of_range(
                "record position size",
                format!(
                    "{reported} below the {} byte layout",
                    RawRecordPosition::SIZE
                ),
            ));
        }
        Ok(RecordPosition {
            entries_before: i64::from(raw.entries_before),
            entries_total: i64::from(raw.entries_total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_carried_fields() {
        let pos = RecordPosition {
            entries_before: 1000,
            entries_total: 4000,
        };
        let raw = pos.to_raw().unwrap();
        assert_eq!(raw.struct_size, RawRecordPosition::SIZE);
        assert_eq!(raw.entries_in_range, 0);
        assert_eq!(RecordPosition::from_raw(&raw).unwrap(), pos);
    }

    #[test]
    fn negative_entries_are_rejected() {
        let pos = RecordPosition {
            entries_before: -1,
            entries_total: 0,
        };
        assert!(matches!(
            pos.to_raw(),
            Err(InteropError::OutOfRange { field: "entries_before", .. })
        ));
    }

    #[test]
    fn entries_beyond_the_raw_range_are_rejected() {
        let pos = RecordPosition {
            entries_before: 0,
            entries_total: i64::from(u32::MAX) + 1,
        };
        assert!(pos.to_raw().is_err());
    }

    #[test]
    fn undersized_raw_position_is_rejected() {
        let raw = RawRecordPosition {
            struct_size: 8,
            ..Default::default()
        };
        assert!(RecordPosition::from_raw(&raw).is_err());
    }
}
