//! Database/log identity signatures.

use serde::{Deserialize, Serialize};

use silt_abi::{LogTime, RawSignature, TextVariant, COMPUTER_NAME_UNITS, SIGNATURE_SIZE};

use crate::error::InteropResult;

/// Identity stamp of a database or log stream: a random value, the
/// creation time, and the name of the machine that created it.
///
/// Serializes to exactly [`SIGNATURE_SIZE`] bytes; the computer name is
/// truncated to the fixed field, whose final byte is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Signature {
    /// Random value chosen at creation.
    pub random: u32,
    /// Creation timestamp.
    pub creation: LogTime,
    /// Name of the creating machine.
    pub computer_name: String,
}

impl Signature {
    /// Creates a signature. The computer name is truncated to what the
    /// fixed raw field can carry.
    #[must_use]
    pub fn new(random: u32, creation: LogTime, computer_name: impl Into<String>) -> Self {
        let mut computer_name = computer_name.into();
        let mut limit = COMPUTER_NAME_UNITS - 1;
        while !computer_name.is_char_boundary(limit.min(computer_name.len())) {
            limit -= 1;
        }
        computer_name.truncate(limit);
        Signature {
            random,
            creation,
            computer_name,
        }
    }

    /// Encodes to the raw layout.
    #[must_use]
    pub fn to_raw(&self) -> RawSignature {
        let mut computer_name = [0u8; COMPUTER_NAME_UNITS];
        silt_abi::encode_into_narrow(&self.computer_name, &mut computer_name);
        RawSignature {
            random: self.random,
            creation: self.creation,
            computer_name,
        }
    }

    /// Decodes from the raw layout.
    #[must_use]
    pub fn from_raw(raw: &RawSignature) -> Self {
        Signature {
            random: raw.random,
            creation: raw.creation,
            computer_name: silt_abi::decode_terminated(&raw.computer_name, TextVariant::Narrow),
        }
    }

    /// Serializes to the fixed 28-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.to_raw().to_bytes()
    }

    /// Reads the fixed wire form; anything shorter than
    /// [`SIGNATURE_SIZE`] bytes is out of range.
    pub fn from_bytes(bytes: &[u8]) -> InteropResult<Self> {
        Ok(Self::from_raw(&RawSignature::from_bytes(bytes)?))
    }
}
