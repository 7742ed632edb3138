//! Size/version negotiation for size-prefixed structures.
//!
//! Structures that have grown across engine releases carry a leading size
//! member. The engine reports how much of the structure it actually filled
//! in; conversions must never read past that size. Debug builds of the
//! engine leave unwritten output memory filled with a known pattern, so
//! that pattern counts as "nothing was written".

use crate::error::{AbiError, AbiResult};

/// Fill pattern used by debug builds of the engine for uninitialized
/// output memory.
pub const DEBUG_FILL: u32 = 0xDDDD_DDDD;

/// Interprets a reported structure size.
///
/// Returns 0 for the uninitialized debug-fill pattern, fails with
/// [`AbiError::Overflow`] for values above `i32::MAX`, and returns every
/// other value unchanged.
pub fn negotiated_size(reported: u32) -> AbiResult<usize> {
    if reported == DEBUG_FILL {
        return Ok(0);
    }
    if reported > i32::MAX as u32 {
        return Err(AbiError::Overflow { value: reported });
    }
    Ok(reported as usize)
}
