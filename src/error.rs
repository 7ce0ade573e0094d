//! Error types for cachebuf
//!
//! Callers need to tell a truncated file apart from a file in the wrong
//! format and from a bad seek, so each of those is its own variant.

use thiserror::Error;

/// Result type alias using CacheIoError
pub type Result<T> = std::result::Result<T, CacheIoError>;

/// Unified error type for buffered cache file I/O
#[derive(Debug, Error)]
pub enum CacheIoError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Read Errors
    // -------------------------------------------------------------------------
    /// The source has no more bytes at the requested position.
    #[error("Unexpected end of data in {path} at offset {position}")]
    Eof { path: String, position: u64 },

    /// A seek target (or destination span) falls outside the valid range.
    #[error("Offset {position} out of range [0, {length}) in {path}")]
    Range {
        path: String,
        position: i64,
        length: u64,
    },

    /// A tag byte did not match the expected field marker.
    #[error("Field tag mismatch in {path} at offset {position}: expected 0x{expected:02x}, got 0x{actual:02x}")]
    Format {
        path: String,
        position: u64,
        expected: u8,
        actual: u8,
    },

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheIoError {
    /// True when the error reports exhausted input
    pub fn is_eof(&self) -> bool {
        matches!(self, CacheIoError::Eof { .. })
    }

    /// True when the error reports an out-of-range offset
    pub fn is_range(&self) -> bool {
        matches!(self, CacheIoError::Range { .. })
    }

    /// True when the error reports a tag mismatch
    pub fn is_format(&self) -> bool {
        matches!(self, CacheIoError::Format { .. })
    }
}
