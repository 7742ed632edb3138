//! Durable-commit identifiers.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use silt_abi::RawCommitId;

use crate::signature::Signature;

/// Identifies one durable commit: the signature of the log stream it
/// belongs to plus its sequence number within that stream.
///
/// Ordering is only defined between identifiers from the same log
/// stream; comparing across different signatures yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitId {
    /// Signature of the owning log stream.
    pub signature: Signature,
    /// Commit sequence number.
    pub sequence: i64,
}

impl CommitId {
    /// Encodes to the raw layout.
    #[must_use]
    pub fn to_raw(&self) -> RawCommitId {
        RawCommitId {
            signature: self.signature.to_raw(),
            sequence: self.sequence,
        }
    }

    /// Decodes from the raw layout.
    #[must_use]
    pub fn from_raw(raw: &RawCommitId) -> Self {
        CommitId {
            signature: Signature::from_raw(&raw.signature),
            sequence: raw.sequence,
        }
    }
}

impl PartialOrd for CommitId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.signature != other.signature {
            return None;
        }
        Some(self.sequence.cmp(&other.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_abi::LogTime;

    fn commit(sequence: i64) -> CommitId {
        CommitId {
            signature: Signature::new(
                9,
                LogTime {
                    year: 99,
                    month: 12,
                    day: 31,
                    ..Default::default()
                },
                "COMPUTER",
            ),
            sequence,
        }
    }

    #[test]
    fn raw_roundtrip() {
        let id = commit(42);
        assert_eq!(CommitId::from_raw(&id.to_raw()), id);
    }

    #[test]
    fn same_stream_orders_by_sequence() {
        assert!(commit(1) < commit(2));
        assert_eq!(commit(3).partial_cmp(&commit(3)), Some(Ordering::Equal));
    }

    #[test]
    fn different_streams_do_not_order() {
        let mut other = commit(1);
        other.signature.random = 10;
        assert_eq!(commit(2).partial_cmp(&other), None);
        assert_ne!(commit(1), other);
    }
}
