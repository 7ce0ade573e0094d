//! Fixed-width integer codec
//!
//! Two widths only: a 2-byte unsigned "small int" for sequence numbers and
//! string lengths, and a 4-byte two's-complement "large int".

/// Encoded size of a small int
pub const SMALL_INT_SIZE: usize = 2;

/// Encoded size of a large int
pub const LARGE_INT_SIZE: usize = 4;

/// Encode the low 16 bits of `value`, big-endian.
///
/// Anything above 65535 is truncated rather than rejected.
#[inline]
pub fn encode_small_int(value: u32) -> [u8; SMALL_INT_SIZE] {
    [((value >> 8) & 0xFF) as u8, (value & 0xFF) as u8]
}

/// Decode a big-endian small int into `[0, 65535]`.
#[inline]
pub fn decode_small_int(bytes: [u8; SMALL_INT_SIZE]) -> u32 {
    ((bytes[0] as u32) << 8) | bytes[1] as u32
}

/// Encode `value` big-endian into `out`.
#[inline]
pub fn encode_large_int(value: i32, out: &mut [u8; LARGE_INT_SIZE]) {
    let bits = value as u32;
    out[0] = (bits >> 24) as u8;
    out[1] = (bits >> 16) as u8;
    out[2] = (bits >> 8) as u8;
    out[3] = bits as u8;
}

/// Value-returning form of [`encode_large_int`].
#[inline]
pub fn large_int_bytes(value: i32) -> [u8; LARGE_INT_SIZE] {
    let mut out = [0u8; LARGE_INT_SIZE];
    encode_large_int(value, &mut out);
    out
}

/// Decode a big-endian large int. Every bit pattern maps back to the
/// `i32` it was encoded from, negatives included.
#[inline]
pub fn decode_large_int(bytes: [u8; LARGE_INT_SIZE]) -> i32 {
    (((bytes[0] as u32) << 24)
        | ((bytes[1] as u32) << 16)
        | ((bytes[2] as u32) << 8)
        | bytes[3] as u32) as i32
}
