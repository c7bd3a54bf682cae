//! Saturating scalar quantizer for normalized deltas.
//!
//! A delta in `[-1.0, 1.0]` is scaled onto the signed range of a `bits`
//! wide code. The positive extreme is `2^(bits-1) - 1` and the negative one
//! is a unit further out, so `dequantize` of the most negative code returns
//! slightly less than `-1.0`.

/// Largest positive code representable in `bits`.
#[inline]
pub fn max_code(bits: u8) -> i32 {
    (1i32 << (bits - 1)) - 1
}

/// Smallest (most negative) code representable in `bits`.
#[inline]
pub fn min_code(bits: u8) -> i32 {
    -max_code(bits) - 1
}

/// Maps a normalized delta to a signed `bits` wide code, rounding to the
/// nearest step and clamping instead of failing.
pub fn quantize(delta: f32, bits: u8) -> i32 {
    let max_val = max_code(bits);
    let min_val = min_code(bits);
    let scaled = (delta * max_val as f32).round();
    // `as` saturates at the i32 bounds and maps NaN to zero.
    (scaled as i32).clamp(min_val, max_val)
}

/// Inverse scaling of [`quantize`].
pub fn dequantize(code: i32, bits: u8) -> f32 {
    code as f32 / max_code(bits) as f32
}

/// Reinterprets a signed code as its `bits` wide two's complement pattern.
#[inline]
pub fn to_unsigned(code: i32, bits: u8) -> u32 {
    (code as u32) & mask(bits)
}

/// Sign-extends a `bits` wide pattern back to a signed code.
#[inline]
pub fn from_unsigned(raw: u32, bits: u8) -> i32 {
    let shift = 32 - u32::from(bits);
    ((raw << shift) as i32) >> shift
}

#[inline]
fn mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
