//! Property tests for the pure ABI helpers.

use proptest::prelude::*;

use silt_abi::{negotiated_size, LogTime, RawSignature, DEBUG_FILL, SIGNATURE_SIZE};

proptest! {
    #[test]
    fn negotiation_is_identity_below_the_overflow_line(reported in 0u32..=i32::MAX as u32) {
        prop_assume!(reported != DEBUG_FILL);
        prop_assert_eq!(negotiated_size(reported).unwrap(), reported as usize);
    }

    #[test]
    fn negotiation_rejects_everything_above_the_line(reported in (i32::MAX as u32 + 1)..=u32::MAX) {
        prop_assume!(reported != DEBUG_FILL);
        prop_assert!(negotiated_size(reported).is_err());
    }

    #[test]
    fn signature_wire_roundtrip(
        random in any::<u32>(),
        seconds in 0u8..60,
        minutes in 0u8..60,
        hours in 0u8..24,
        day in 1u8..32,
        month in 1u8..13,
        year in any::<u8>(),
        name in "[A-Za-z0-9]{0,15}",
    ) {
        let mut computer_name = [0u8; 16];
        computer_name[..name.len()].copy_from_slice(name.as_bytes());
        let sig = RawSignature {
            random,
            creation: LogTime {
                seconds,
                minutes,
                hours,
                day,
                month,
                year,
                flags: 1,
                reserved: 0,
            },
            computer_name,
        };
        let bytes = sig.to_bytes();
        prop_assert_eq!(bytes.len(), SIGNATURE_SIZE);
        prop_assert_eq!(RawSignature::from_bytes(&bytes).unwrap(), sig);
    }
}
