//! # cachebuf
//!
//! Buffered binary I/O for persistent cache files:
//! - Fixed-width integer codecs (2-byte small int, 4-byte large int)
//! - Plain, tagged and tagged fixed-width string fields
//! - A sequential buffered writer
//! - A windowed, seekable buffered reader with hard EOF and range errors
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Cache layer (caller)                        │
//! │          decides field order, tags, widths, paths            │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌─────────────────────┐        ┌─────────────────────────┐
//!   │     WriteBuffer     │        │    ReadBufferPartial    │
//!   │ (flush when full)   │        │ (lazy window refill)    │
//!   └──────────┬──────────┘        └────────────┬────────────┘
//!              │                                │
//!              └───────────────┬────────────────┘
//!                              ▼
//!                 ┌─────────────────────────┐
//!                 │  codec: string ── int   │
//!                 └─────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod buffer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CacheIoError, Result};
pub use config::BufferConfig;
pub use buffer::{checksum_file, ReadBufferPartial, WriteBuffer};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cachebuf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
