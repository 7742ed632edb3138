//! Narrow/wide text transcoding.
//!
//! The engine exposes two encodings of every text-bearing call: a narrow
//! (single byte per unit) variant and a wide (UTF-16LE) variant. Which one
//! is in effect is decided once per process by platform capability, never
//! per call; the transcoding functions still take the variant explicitly
//! so that nothing here depends on hidden state.
//!
//! Decoding a null or zero-length buffer always yields an empty string,
//! never an absent value.

/// The two text encodings of the engine ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVariant {
    /// Single byte per unit, Latin-1 repertoire.
    Narrow,
    /// UTF-16 little-endian.
    Wide,
}

impl TextVariant {
    /// Returns the variant in effect for this process.
    #[must_use]
    pub const fn active() -> Self {
        #[cfg(windows)]
        {
            TextVariant::Wide
        }
        #[cfg(not(windows))]
        {
            TextVariant::Narrow
        }
    }

    /// Size of one code unit in bytes.
    #[must_use]
    pub const fn unit_size(self) -> usize {
        match self {
            TextVariant::Narrow => 1,
            TextVariant::Wide => 2,
        }
    }
}

/// Encodes a string to a zero-terminated buffer in the given variant.
///
/// Characters outside the narrow repertoire encode as `?` in the narrow
/// variant.
#[must_use]
pub fn encode(s: &str, variant: TextVariant) -> Vec<u8> {
    match variant {
        TextVariant::Narrow => {
            let mut out: Vec<u8> = s.chars().map(narrow_unit).collect();
            out.push(0);
            out
        }
        TextVariant::Wide => {
            let mut out = Vec::with_capacity((s.len() + 1) * 2);
            for unit in s.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out.extend_from_slice(&[0, 0]);
            out
        }
    }
}

/// Decodes exactly the given byte range.
#[must_use]
pub fn decode(bytes: &[u8], variant: TextVariant) -> String {
    match variant {
        TextVariant::Narrow => bytes.iter().map(|&b| b as char).collect(),
        TextVariant::Wide => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
    }
}

/// Decodes up to (not including) the first zero unit.
#[must_use]
pub fn decode_terminated(bytes: &[u8], variant: TextVariant) -> String {
    match variant {
        TextVariant::Narrow => {
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            decode(&bytes[..end], variant)
        }
        TextVariant::Wide => {
            let mut end = bytes.len() - bytes.len() % 2;
            for (i, pair) in bytes.chunks_exact(2).enumerate() {
                if pair == [0, 0] {
                    end = i * 2;
                    break;
                }
            }
            decode(&bytes[..end], variant)
        }
    }
}

/// Decodes exactly the given wide units.
#[must_use]
pub fn decode_wide(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Decodes wide units up to (not including) the first zero unit.
#[must_use]
pub fn decode_wide_terminated(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Encodes a string into a fixed narrow array, truncating to leave room
/// for the terminator. The remainder of the array is zeroed.
pub fn encode_into_narrow(s: &str, out: &mut [u8]) {
    out.fill(0);
    let room = out.len().saturating_sub(1);
    for (slot, c) in out[..room].iter_mut().zip(s.chars()) {
        *slot = narrow_unit(c);
    }
}

/// Encodes a string into a fixed wide array, truncating to leave room
/// for the terminator. The remainder of the array is zeroed.
pub fn encode_into_wide(s: &str, out: &mut [u16]) {
    out.fill(0);
    let room = out.len().saturating_sub(1);
    for (slot, unit) in out[..room].iter_mut().zip(s.encode_utf16()) {
        *slot = unit;
    }
}

fn narrow_unit(c: char) -> u8 {
    let code = c as u32;
    if code <= 0xFF {
        code as u8
    } else {
        b'?'
    }
}
