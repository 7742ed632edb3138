//! Zero-pattern nullable protocol.
//!
//! Some fixed layouts are valid wire values in their zero-initialized
//! form, and that same zero pattern doubles as the designated "no value"
//! sentinel. A structure reports no value if and only if it is
//! bit-for-bit the zero pattern.

use crate::structs::{LogPosition, LogTime};

/// Implemented by layouts whose zero pattern means "absent".
pub trait Nullable {
    /// True unless the value is bit-for-bit the zero pattern.
    fn has_value(&self) -> bool;
}

impl Nullable for LogTime {
    fn has_value(&self) -> bool {
        *self != LogTime::default()
    }
}

impl Nullable for LogPosition {
    fn has_value(&self) -> bool {
        *self != LogPosition::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_time_has_no_value() {
        assert!(!LogTime::default().has_value());
    }

    #[test]
    fn any_set_field_gives_a_value() {
        let times = [
            LogTime {
                seconds: 1,
                ..Default::default()
            },
            LogTime {
                year: 70,
                ..Default::default()
            },
            LogTime {
                flags: 1,
                ..Default::default()
            },
        ];
        for t in times {
            assert!(t.has_value());
        }
    }

    #[test]
    fn default_log_position_has_no_value() {
        assert!(!LogPosition::default().has_value());
    }

    #[test]
    fn nonzero_log_position_has_a_value() {
        let pos = LogPosition {
            generation: 1,
            ..Default::default()
        };
        assert!(pos.has_value());
    }
}
