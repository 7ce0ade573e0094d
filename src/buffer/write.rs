//! Write Buffer
//!
//! Sequential buffered writer. Bytes accumulate in a fixed-capacity buffer
//! and are pushed to the sink each time the buffer fills, and on close.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use bytes::{BufMut, BytesMut};

use crate::codec::{encode_small_int, large_int_bytes, string};
use crate::config::{check_capacity, BufferConfig};
use crate::error::Result;

/// Buffered sequential writer over a byte sink
pub struct WriteBuffer<W: Write> {
    /// Diagnostic label (usually the file path)
    label: String,
    /// Destination of flushed bytes
    sink: W,
    /// Pending bytes; `len()` is the fill cursor
    buffer: BytesMut,
    /// Flush threshold
    capacity: usize,
    /// Bytes accepted so far (pending included)
    bytes_written: u64,
    /// Running CRC over every accepted byte
    hasher: crc32fast::Hasher,
}

impl WriteBuffer<File> {
    /// Create (or truncate) the file at `path`.
    ///
    /// The parent directory must already exist.
    pub fn create(path: &Path, capacity: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Self::new(file, path.display().to_string(), capacity)
    }

    /// Create the file at `path` using the configured write buffer size
    pub fn create_with(path: &Path, config: &BufferConfig) -> Result<Self> {
        config.validate()?;
        Self::create(path, config.write_buffer_size)
    }
}

impl<W: Write> WriteBuffer<W> {
    /// Wrap a sink with a buffer of `capacity` bytes
    pub fn new(sink: W, label: impl Into<String>, capacity: usize) -> Result<Self> {
        check_capacity("write buffer capacity", capacity)?;
        let label = label.into();

        tracing::debug!("Opened write buffer for {} (capacity {})", label, capacity);

        Ok(Self {
            label,
            sink,
            buffer: BytesMut::with_capacity(capacity),
            capacity,
            bytes_written: 0,
            hasher: crc32fast::Hasher::new(),
        })
    }

    // =========================================================================
    // Raw Bytes
    // =========================================================================

    /// Append a single byte
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.make_room()?;
        self.buffer.put_u8(byte);
        self.hasher.update(&[byte]);
        self.bytes_written += 1;

        if self.buffer.len() >= self.capacity {
            self.flush_pending()?;
        }
        Ok(())
    }

    /// Append a byte slice of any length, flushing as often as needed
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut rest = bytes;
        while !rest.is_empty() {
            self.make_room()?;
            let room = self.capacity.saturating_sub(self.buffer.len());
            let (chunk, tail) = rest.split_at(room.min(rest.len()));

            self.buffer.extend_from_slice(chunk);
            self.hasher.update(chunk);
            self.bytes_written += chunk.len() as u64;
            rest = tail;

            if self.buffer.len() >= self.capacity {
                self.flush_pending()?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Write a 2-byte small int (truncated to 16 bits)
    pub fn write_small_int(&mut self, value: u32) -> Result<()> {
        self.write_bytes(&encode_small_int(value))
    }

    /// Write a 4-byte large int
    pub fn write_large_int(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&large_int_bytes(value))
    }

    /// Write a length-prefixed string
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let prefix = string::length_prefix(value)?;
        self.write_bytes(&prefix)?;
        self.write_bytes(value.as_bytes())
    }

    /// Write a tag byte followed by a length-prefixed string
    pub fn write_tagged_string(&mut self, tag: u8, value: &str) -> Result<()> {
        // Validate before the tag goes out so a rejected string writes nothing
        let prefix = string::length_prefix(value)?;
        self.write_byte(tag)?;
        self.write_bytes(&prefix)?;
        self.write_bytes(value.as_bytes())
    }

    /// Write a tag byte followed by exactly `width` bytes of padded content
    pub fn write_fixed_string(&mut self, tag: u8, value: &str, width: usize) -> Result<()> {
        let field = string::encode_fixed_width(value, width)?;
        self.write_byte(tag)?;
        self.write_bytes(&field)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Flush pending bytes and release the sink
    pub fn close(mut self) -> Result<()> {
        if let Err(e) = self.flush_pending() {
            tracing::warn!(
                "Close of {} failed; {} pending bytes discarded",
                self.label,
                self.buffer.len()
            );
            self.buffer.clear();
            return Err(e);
        }
        self.sink.flush()?;

        tracing::debug!(
            "Closed write buffer for {} ({} bytes, crc32 {:08x})",
            self.label,
            self.bytes_written,
            self.checksum()
        );
        Ok(())
    }

    /// Retry a flush that failed earlier, so the cursor never passes capacity
    fn make_room(&mut self) -> Result<()> {
        if self.buffer.len() >= self.capacity {
            self.flush_pending()?;
        }
        Ok(())
    }

    /// Push pending bytes to the sink and reset the cursor
    fn flush_pending(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.sink.write_all(&self.buffer)?;
        tracing::trace!("Flushed {} bytes to {}", self.buffer.len(), self.label);
        self.buffer.clear();
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Total bytes accepted, flushed or not
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// CRC32 of every byte accepted so far
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Bytes waiting for the next flush
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<W: Write> Drop for WriteBuffer<W> {
    fn drop(&mut self) {
        if !self.buffer.is_empty() {
            tracing::warn!(
                "Write buffer for {} dropped without close; {} pending bytes discarded",
                self.label,
                self.buffer.len()
            );
        }
    }
}
