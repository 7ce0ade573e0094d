//! Buffer Module
//!
//! Buffered byte movement between the codecs and a file.
//!
//! ## Responsibilities
//! - `WriteBuffer`: sequential writes, flushed to the sink whenever full
//! - `ReadBufferPartial`: random-access reads through a lazily refilled window
//!
//! ## Read Window
//! ```text
//!   source:  ┌───────────────────────────────────────────────────────┐
//!            │                                                       │
//!            └───────────────────────────────────────────────────────┘
//!            0          base          position   base+valid        len
//!                        ├──────────────────┼─────────┤
//!                        │     window (valid bytes)   │
//! ```
//! A read at `position` is served from the window when
//! `base <= position < base + valid`; otherwise the window is refilled
//! starting at `position`. `seek` only moves `position`.

mod read;
mod write;

pub use read::{checksum_file, ReadBufferPartial};
pub use write::WriteBuffer;
