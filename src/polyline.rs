use thiserror::Error;

use crate::geo::GeoPoint;

// Coordinates are scaled by 1e5 before delta encoding.
const PRECISION: f64 = 1e5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("polyline ends mid delta group")]
    Truncated,
    #[error("invalid polyline character {0:?} at offset {1}")]
    InvalidCharacter(char, usize),
    #[error("delta group too long at offset {0}")]
    OverlongGroup(usize),
}

/// Decodes an encoded route geometry into its ordered point sequence.
///
/// Points are reconstructed exactly as published: each group of base-64-ish
/// characters is a zig-zag encoded delta against the previous point, and the
/// running sums are divided back down by the 1e5 scale. No simplification or
/// interpolation happens here; downstream proximity math relies on the
/// original vertices.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut offset = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;
    while offset < bytes.len() {
        lat += next_delta(bytes, &mut offset)?;
        lng += next_delta(bytes, &mut offset)?;
        points.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }
    Ok(points)
}

fn next_delta(bytes: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
    let mut shift = 0u32;
    let mut value = 0i64;
    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(DecodeError::Truncated);
        };
        if !(63..=126).contains(&byte) {
            return Err(DecodeError::InvalidCharacter(byte as char, *offset));
        }
        if shift >= 60 {
            return Err(DecodeError::OverlongGroup(*offset));
        }
        let chunk = (byte - 63) as i64;
        *offset += 1;
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    // undo the zig-zag sign fold
    Ok(if value & 1 != 0 { !(value >> 1) } else { value >> 1 })
}

/// Encodes a point sequence back into the compact polyline format.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;
    for point in points {
        let lat = (point.lat * PRECISION).round() as i64;
        let lng = (point.lng * PRECISION).round() as i64;
        push_delta(lat - prev_lat, &mut out);
        push_delta(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }
    out
}

fn push_delta(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}
