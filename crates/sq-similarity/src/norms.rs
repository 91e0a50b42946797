//! Length norms.
//!
//! Each document stores one byte per field: `boost / sqrt(length)` squeezed into a float with
//! a 3-bit mantissa and 5-bit exponent. Decoding inverts that to a document length.

use std::{collections::HashMap, sync::LazyLock};

/// Bits of mantissa kept by the byte encoding.
const MANTISSA_BITS: u32 = 3;

/// Exponent bias, relative to the IEEE-754 bias.
const ZERO_EXPONENT: i32 = 15;

/// Offset of the smallest encodable value in shifted float bits.
const SMALLEST: i32 = (63 - ZERO_EXPONENT) << MANTISSA_BITS;

/// Decoded document length for every norm byte.
static NORM_TABLE: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (byte, slot) in (0..=u8::MAX).zip(table.iter_mut()) {
        let norm = byte_to_float(byte);
        *slot = 1.0 / (norm * norm);
    }
    table
});

/// Expands a norm byte to the float it encodes.
pub fn byte_to_float(byte: u8) -> f32 {
    if byte == 0 {
        return 0.0;
    }
    let bits = (u32::from(byte) + SMALLEST.unsigned_abs()) << (24 - MANTISSA_BITS);
    f32::from_bits(bits)
}

/// Compresses a float into a norm byte, rounding down. Values below the smallest
/// representable positive value become 1 (or 0 if not positive); values above the largest
/// become 255.
pub fn float_to_byte(value: f32) -> u8 {
    let bits = value.to_bits() as i32;
    let small = bits >> (24 - MANTISSA_BITS);
    if small <= SMALLEST {
        return u8::from(bits > 0);
    }
    u8::try_from(small - SMALLEST).unwrap_or(u8::MAX)
}

/// Decodes a norm byte to a document length.
pub fn decode_norm_value(norm: u8) -> f32 {
    NORM_TABLE[usize::from(norm)]
}

/// Encodes a field boost and length into a norm byte.
pub fn encode_norm_value(boost: f32, length: f32) -> u8 {
    float_to_byte(boost / length.sqrt())
}

/// Per-field state recorded when a document is indexed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInvertState {
    /// Number of tokens.
    pub length: u32,
    /// Number of tokens sharing a position with the previous token.
    pub num_overlap: u32,
    /// Index-time field boost.
    pub boost: f32,
}

impl FieldInvertState {
    /// State for a field of `length` tokens with no overlaps and no boost.
    pub fn new(length: u32) -> Self {
        Self {
            length,
            num_overlap: 0,
            boost: 1.0,
        }
    }
}

/// Norm bytes of one field in one segment.
pub trait NormValues: Send + Sync {
    /// The norm byte of `doc`, or `None` when the document has none.
    fn norm(&self, doc: u32) -> Option<u8>;
}

impl NormValues for [u8] {
    fn norm(&self, doc: u32) -> Option<u8> {
        self.get(usize::try_from(doc).ok()?).copied()
    }
}

impl NormValues for Vec<u8> {
    fn norm(&self, doc: u32) -> Option<u8> {
        self.as_slice().norm(doc)
    }
}

/// Norm lookup for every field of one segment.
pub trait NormSource {
    /// The norms of `field`, or `None` when norms are disabled for it.
    fn norm_values(&self, field: &str) -> Option<&dyn NormValues>;
}

impl NormSource for HashMap<String, Vec<u8>> {
    fn norm_values(&self, field: &str) -> Option<&dyn NormValues> {
        self.get(field).map(|norms| norms as &dyn NormValues)
    }
}

/// A segment without norms.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNorms;

impl NormSource for NoNorms {
    fn norm_values(&self, _field: &str) -> Option<&dyn NormValues> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_encodes_to_124() {
        assert_eq!(float_to_byte(1.0), 124);
        assert_eq!(byte_to_float(124), 1.0);
        assert_eq!(decode_norm_value(124), 1.0);
    }

    #[test]
    fn extremes() {
        assert_eq!(float_to_byte(0.0), 0);
        assert_eq!(float_to_byte(-3.0), 0);
        assert_eq!(float_to_byte(f32::MIN_POSITIVE), 1);
        assert_eq!(float_to_byte(f32::MAX), 255);
        assert!(decode_norm_value(0).is_infinite());
    }

    #[test]
    fn bytes_round_trip_through_float() {
        for byte in 1..=u8::MAX {
            assert_eq!(float_to_byte(byte_to_float(byte)), byte);
        }
    }

    #[test]
    fn encoded_length_decodes_close_to_length() {
        let norm = encode_norm_value(1.0, 4.0);
        assert_eq!(byte_to_float(norm), 0.5);
        assert_eq!(decode_norm_value(norm), 4.0);

        // Lossy: 10 tokens decode to a nearby representable length.
        let decoded = decode_norm_value(encode_norm_value(1.0, 10.0));
        assert!(decoded >= 10.0 && decoded < 14.0, "{decoded}");
    }

    #[test]
    fn norm_lookup() {
        let norms = HashMap::from([("body".to_string(), vec![124u8, 120])]);
        let values = norms.norm_values("body").unwrap();
        assert_eq!(values.norm(1), Some(120));
        assert_eq!(values.norm(9), None);
        assert!(norms.norm_values("title").is_none());
        assert!(NoNorms.norm_values("body").is_none());
    }
}
