//! Field Codecs
//!
//! Stateless encode/decode rules shared by the writer and the reader.
//!
//! ## Field Layout
//! ```text
//! small int          ┌────────┬────────┐
//!                    │ hi (1) │ lo (1) │                      big-endian, [0, 65535]
//!                    └────────┴────────┘
//! large int          ┌────┬────┬────┬────┐
//!                    │ b3 │ b2 │ b1 │ b0 │                    big-endian i32
//!                    └────┴────┴────┴────┘
//! plain string       ┌──────────┬──────────────────┐
//!                    │ Len (2)  │ UTF-8 bytes      │
//!                    └──────────┴──────────────────┘
//! tagged string      ┌─────────┬──────────┬──────────────────┐
//!                    │ Tag (1) │ Len (2)  │ UTF-8 bytes      │
//!                    └─────────┴──────────┴──────────────────┘
//! fixed-width string ┌─────────┬───────────────────────────────┐
//!                    │ Tag (1) │ UTF-8 bytes + 0x00 (width)    │
//!                    └─────────┴───────────────────────────────┘
//! ```
//!
//! Integer widths never vary: callers compute record offsets from them.

pub mod int;
pub mod string;

pub use int::{
    decode_large_int, decode_small_int, encode_large_int, encode_small_int, large_int_bytes,
    LARGE_INT_SIZE, SMALL_INT_SIZE,
};
pub use string::{
    decode_fixed_width, decode_utf8, encode_fixed_width, length_prefix, FIXED_WIDTH_PAD,
    MAX_STRING_LEN,
};
