//! Progress reports from long-running engine operations.

use serde::{Deserialize, Serialize};

use silt_abi::{negotiated_size, RawProgress};

use crate::error::{into_signed, InteropError, InteropResult};

/// Progress of a long-running engine operation, as delivered to a status
/// callback. Decode-only; the engine fills the raw structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Work units completed so far.
    pub units_done: i32,
    /// Work units in total; never less than `units_done`.
    pub units_total: i32,
}

impl Progress {
    /// Decodes from the raw layout, validating the reported size first.
    pub fn from_raw(raw: &RawProgress) -> InteropResult<Self> {
        let reported = negotiated_size(raw.struct_size)?;
        if reported < RawProgress::SIZE as usize {
            return Err(InteropError::out_of_range(
                "progress size",
                format!("{reported} below the {} byte layout", RawProgress::SIZE),
            ));
        }
        Ok(Progress {
            units_done: into_signed("units_done", raw.units_done)?,
            units_total: into_signed("units_total", raw.units_total)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_filled_report() {
        let raw = RawProgress {
            struct_size: RawProgress::SIZE,
            units_done: 25,
            units_total: 100,
        };
        assert_eq!(
            Progress::from_raw(&raw).unwrap(),
            Progress {
                units_done: 25,
                units_total: 100
            }
        );
    }

    #[test]
    fn undersized_report_is_rejected() {
        let raw = RawProgress {
            struct_size: 4,
            units_done: 25,
            units_total: 100,
        };
        assert!(Progress::from_raw(&raw).is_err());
    }

    #[test]
    fn counter_overflow_is_rejected() {
        let raw = RawProgress {
            struct_size: RawProgress::SIZE,
            units_done: u32::MAX,
            units_total: u32::MAX,
        };
        assert!(Progress::from_raw(&raw).is_err());
    }
}
