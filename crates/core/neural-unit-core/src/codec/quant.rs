//! Quantization between bounded floats and 16-bit wire integers
//!
//! Every integer crosses the wire big-endian.

use crate::{Result, UnitError};

/// Largest quantized value; maps to 1.0 (unit) or +1.0 (bipolar)
pub const QUANT_MAX: f64 = u16::MAX as f64;

/// Reject a value outside `[0.0, 1.0]` (NaN included)
pub fn ensure_unit(field: &str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(UnitError::out_of_range(field, value, 0.0, 1.0))
    }
}

/// Reject a value outside `[-1.0, 1.0]` (NaN included)
pub fn ensure_bipolar(field: &str, value: f64) -> Result<f64> {
    if (-1.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(UnitError::out_of_range(field, value, -1.0, 1.0))
    }
}

/// `round(v * 65535)` for `v` in `[0, 1]`
pub fn encode_unit(value: f64) -> Result<u16> {
    let value = ensure_unit("unit value", value)?;
    Ok((value * QUANT_MAX).round() as u16)
}

/// `u / 65535`
pub fn decode_unit(raw: u16) -> f64 {
    f64::from(raw) / QUANT_MAX
}

/// Affine remap of `[-1, 1]` onto the unit integer domain
pub fn encode_bipolar(value: f64) -> Result<u16> {
    let value = ensure_bipolar("bipolar value", value)?;
    Ok((((value + 1.0) / 2.0) * QUANT_MAX).round() as u16)
}

/// Inverse of [`encode_bipolar`]
pub fn decode_bipolar(raw: u16) -> f64 {
    decode_unit(raw) * 2.0 - 1.0
}

/// Round to `digits` decimal places
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Big-endian u16 at `offset`
pub fn read_u16_be(buf: &[u8], offset: usize, context: &str) -> Result<u16> {
    buf.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| UnitError::short_reply(context, offset + 2, buf.len()))
}

/// Big-endian u32 at `offset`
pub fn read_u32_be(buf: &[u8], offset: usize, context: &str) -> Result<u32> {
    buf.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| UnitError::short_reply(context, offset + 4, buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_TOLERANCE: f64 = 1.0 / 65535.0;

    #[test]
    fn test_encode_unit_endpoints() {
        assert_eq!(encode_unit(0.0).unwrap(), 0);
        assert_eq!(encode_unit(1.0).unwrap(), 0xFFFF);
        assert_eq!(encode_unit(0.5).unwrap(), 32768);
    }

    #[test]
    fn test_encode_unit_rounds() {
        // 0.25 * 65535 = 16383.75
        assert_eq!(encode_unit(0.25).unwrap(), 16384);
        // 0.1 * 65535 = 6553.5 up to float error; either neighbour is within tolerance
        let raw = encode_unit(0.1).unwrap();
        assert!(raw == 6553 || raw == 6554);
    }

    #[test]
    fn test_unit_quantization_error_bound() {
        for i in 0..=1000 {
            let v = i as f64 / 1000.0;
            let back = decode_unit(encode_unit(v).unwrap());
            assert!((back - v).abs() <= UNIT_TOLERANCE, "v={} back={}", v, back);
        }
    }

    #[test]
    fn test_bipolar_quantization_error_bound() {
        for i in -1000..=1000 {
            let v = i as f64 / 1000.0;
            let back = decode_bipolar(encode_bipolar(v).unwrap());
            assert!((back - v).abs() <= 2.0 * UNIT_TOLERANCE, "v={} back={}", v, back);
        }
    }

    #[test]
    fn test_bipolar_endpoints() {
        assert_eq!(encode_bipolar(-1.0).unwrap(), 0);
        assert_eq!(encode_bipolar(1.0).unwrap(), 0xFFFF);
        assert_eq!(decode_bipolar(0), -1.0);
        assert_eq!(decode_bipolar(0xFFFF), 1.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(encode_unit(1.5).unwrap_err().is_validation());
        assert!(encode_unit(-0.01).unwrap_err().is_validation());
        assert!(encode_unit(f64::NAN).unwrap_err().is_validation());
        assert!(encode_bipolar(1.01).unwrap_err().is_validation());
        assert!(encode_bipolar(f64::NEG_INFINITY).unwrap_err().is_validation());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.600_009_155, 4), 0.6);
        assert_eq!(round_to(0.123_46, 4), 0.1235);
    }

    #[test]
    fn test_read_big_endian() {
        let buf = [0x12, 0x34, 0x56, 0x78, 0x9A];
        assert_eq!(read_u16_be(&buf, 0, "test").unwrap(), 0x1234);
        assert_eq!(read_u32_be(&buf, 1, "test").unwrap(), 0x3456_789A);

        let err = read_u16_be(&buf[..1], 0, "drive value").unwrap_err();
        assert!(err.is_decoding());
        assert!(read_u32_be(&buf, 2, "test").is_err());
    }
}
