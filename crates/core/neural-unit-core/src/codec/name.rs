//! Fixed-width identifier fields
//!
//! Names are ASCII only. Encoding always yields exactly `width` bytes:
//! shorter names are zero-padded on the right, longer names are cut to
//! `width` without any error.

use crate::{Result, UnitError};

/// Width of drive name fields
pub const DRIVE_NAME_WIDTH: usize = 16;
/// Width of trait name fields
pub const TRAIT_NAME_WIDTH: usize = 16;
/// Width of episodic event name fields
pub const EVENT_NAME_WIDTH: usize = 24;

/// How to treat non-ASCII bytes when decoding a name field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDecoding {
    /// Fail on any non-ASCII byte. Used for host-authored drive and trait names.
    Strict,
    /// Replace each non-ASCII byte with U+FFFD. Used for device-authored event names.
    Lossy,
}

/// Encode `name` into a zero-padded (or truncated) field of `width` bytes
pub fn encode_name(name: &str, width: usize) -> Result<Vec<u8>> {
    if let Some(pos) = name.bytes().position(|b| !b.is_ascii()) {
        return Err(UnitError::encoding(format!(
            "name '{}' is not ASCII (first offending byte at {})",
            name.escape_default(),
            pos
        )));
    }

    let mut field = vec![0u8; width];
    let len = name.len().min(width);
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
    Ok(field)
}

/// Decode a name field, dropping trailing zero bytes
pub fn decode_name(field: &[u8], mode: NameDecoding) -> Result<String> {
    match mode {
        NameDecoding::Strict => {
            let bytes = trim_trailing_zeros(field);
            if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(UnitError::decoding(format!(
                    "name field has non-ASCII byte 0x{:02X} at offset {}",
                    bytes[pos], pos
                )));
            }
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        NameDecoding::Lossy => Ok(decode_name_lossy(field)),
    }
}

/// Decode a name field, replacing each non-ASCII byte with U+FFFD
pub fn decode_name_lossy(field: &[u8]) -> String {
    trim_trailing_zeros(field)
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

fn trim_trailing_zeros(field: &[u8]) -> &[u8] {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &field[..end]
}
