//! String field codec
//!
//! Strings are stored as UTF-8. The byte rules live here so the writer and
//! the reader cannot drift apart; the buffers only move the bytes.
//!
//! ## Fixed-width fields
//! The content is left-aligned and right-padded with [`FIXED_WIDTH_PAD`] up to
//! the field width. Content longer than the width is rejected, never
//! truncated. Content containing the pad byte is rejected too, because the
//! reader strips trailing pad bytes.

use crate::error::{CacheIoError, Result};

use super::int::{encode_small_int, SMALL_INT_SIZE};

/// Longest string (in encoded bytes) a small-int length prefix can describe
pub const MAX_STRING_LEN: usize = 0xFFFF;

/// Pad byte for fixed-width fields
pub const FIXED_WIDTH_PAD: u8 = 0x00;

/// Length prefix for a plain string.
pub fn length_prefix(value: &str) -> Result<[u8; SMALL_INT_SIZE]> {
    let len = value.len();
    if len > MAX_STRING_LEN {
        return Err(CacheIoError::Encoding(format!(
            "String of {} bytes exceeds the maximum length of {}",
            len, MAX_STRING_LEN
        )));
    }
    Ok(encode_small_int(len as u32))
}

/// Content bytes of a fixed-width field: exactly `width` bytes.
pub fn encode_fixed_width(value: &str, width: usize) -> Result<Vec<u8>> {
    let bytes = value.as_bytes();
    if bytes.len() > width {
        return Err(CacheIoError::Encoding(format!(
            "String of {} bytes does not fit a field of width {}",
            bytes.len(),
            width
        )));
    }
    if bytes.contains(&FIXED_WIDTH_PAD) {
        return Err(CacheIoError::Encoding(
            "Fixed-width string must not contain a NUL byte".to_string(),
        ));
    }

    let mut field = Vec::with_capacity(width);
    field.extend_from_slice(bytes);
    field.resize(width, FIXED_WIDTH_PAD);
    Ok(field)
}

/// Decode string content bytes.
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| CacheIoError::Encoding(format!("Invalid UTF-8 in string field: {}", e)))
}

/// Decode a fixed-width field, dropping the padding.
pub fn decode_fixed_width(mut bytes: Vec<u8>) -> Result<String> {
    let content_len = bytes
        .iter()
        .rposition(|&b| b != FIXED_WIDTH_PAD)
        .map_or(0, |last| last + 1);
    bytes.truncate(content_len);
    decode_utf8(bytes)
}
