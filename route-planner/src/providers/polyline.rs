//! Encoded-polyline decoding.
//!
//! The bike-path provider returns route geometry as a Google encoded
//! polyline (precision 5): signed lat/lon deltas, zig-zag encoded, in
//! 5-bit chunks offset by 63.

use crate::geo::{Coordinate, InvalidCoordinate};

/// Error decoding a polyline string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    /// A chunk sequence ended before its terminating byte.
    #[error("truncated polyline at byte {0}")]
    Truncated(usize),

    /// A byte outside the valid encoding range (63..=126).
    #[error("invalid polyline byte {byte} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    /// A delta's chunk sequence ran past the accumulator's width.
    #[error("oversized polyline value at offset {0}")]
    Oversized(usize),

    /// Decoded deltas accumulated to an out-of-range coordinate.
    #[error(transparent)]
    OutOfRange(#[from] InvalidCoordinate),
}

/// Decode an encoded polyline into coordinates.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut idx = 0usize;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while idx < bytes.len() {
        lat += decode_value(bytes, &mut idx)?;
        lon += decode_value(bytes, &mut idx)?;
        points.push(Coordinate::new(lat as f64 / 1e5, lon as f64 / 1e5)?);
    }

    Ok(points)
}

/// Decode one zig-zag varint starting at `*idx`, advancing it.
fn decode_value(bytes: &[u8], idx: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0i64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*idx) else {
            return Err(PolylineError::Truncated(*idx));
        };
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte { byte, offset: *idx });
        }
        if shift >= 64 {
            return Err(PolylineError::Oversized(*idx));
        }
        *idx += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk & 0x20 == 0 {
            break;
        }
    }

    // Zig-zag: LSB is the sign.
    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_decodes_to_nothing() {
        assert_eq!(decode("").unwrap(), Vec::new());
    }

    #[test]
    fn reference_vector() {
        // The canonical example from Google's encoding documentation.
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(points.len(), 3);

        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        for (p, (lat, lon)) in points.iter().zip(expected) {
            assert!((p.lat() - lat).abs() < 1e-5, "{p:?} vs {lat}");
            assert!((p.lon() - lon).abs() < 1e-5, "{p:?} vs {lon}");
        }
    }

    #[test]
    fn single_point() {
        let points = decode("_p~iF~ps|U").unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].lat() - 38.5).abs() < 1e-5);
        assert!((points[0].lon() + 120.2).abs() < 1e-5);
    }

    #[test]
    fn truncated_input_is_an_error() {
        // Drop the final byte of the longitude varint.
        let err = decode("_p~iF~ps|").unwrap_err();
        assert!(matches!(err, PolylineError::Truncated(_)));
    }

    #[test]
    fn endless_continuation_chunks_are_an_error() {
        // 14 continuation chunks push the shift past the i64 width; the
        // decoder must report the payload as bad, not overflow.
        let encoded = format!("{}A", "_".repeat(14));
        let err = decode(&encoded).unwrap_err();
        assert!(matches!(err, PolylineError::Oversized(13)));
    }

    #[test]
    fn invalid_byte_is_an_error() {
        let err = decode("_p~iF\x01ps|U").unwrap_err();
        assert!(matches!(err, PolylineError::InvalidByte { offset: 5, .. }));
    }
}
