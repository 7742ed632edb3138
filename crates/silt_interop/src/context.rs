//! Per-session operation context for diagnostics.

use serde::{Deserialize, Serialize};

use silt_abi::RawOperationContext;

/// Caller-supplied context attached to a session so engine traces can be
/// correlated back to application activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct OperationContext {
    /// Identifier of the acting user.
    pub user_id: u32,
    /// Identifier of the operation.
    pub operation_id: u8,
    /// Kind of the operation.
    pub operation_type: u8,
    /// Kind of the client issuing it.
    pub client_type: u8,
    /// Flag bits, passed through to the engine.
    pub flags: u8,
}

impl OperationContext {
    /// Encodes to the raw layout.
    #[must_use]
    pub fn to_raw(&self) -> RawOperationContext {
        RawOperationContext {
            user_id: self.user_id,
            operation_id: self.operation_id,
            operation_type: self.operation_type,
            client_type: self.client_type,
            flags: self.flags,
        }
    }

    /// Decodes from the raw layout.
    #[must_use]
    pub fn from_raw(raw: &RawOperationContext) -> Self {
        OperationContext {
            user_id: raw.user_id,
            operation_id: raw.operation_id,
            operation_type: raw.operation_type,
            client_type: raw.client_type,
            flags: raw.flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_every_field() {
        let context = OperationContext {
            user_id: 900,
            operation_id: 5,
            operation_type: 11,
            client_type: 2,
            flags: 0x0f,
        };
        let raw = context.to_raw();
        assert_eq!(raw.user_id, 900);
        assert_eq!(OperationContext::from_raw(&raw), context);
    }

    #[test]
    fn default_is_all_zero() {
        let raw = OperationContext::default().to_raw();
        assert_eq!(raw, RawOperationContext::default());
    }
}
