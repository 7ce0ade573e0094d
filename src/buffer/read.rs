//! Partial Read Buffer
//!
//! Random-access reader that keeps only a window of the source in memory.
//! `seek` moves the logical position; the window is refilled lazily by the
//! next read that falls outside it.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::codec::{decode_large_int, decode_small_int, string, LARGE_INT_SIZE, SMALL_INT_SIZE};
use crate::config::{check_capacity, BufferConfig};
use crate::error::{CacheIoError, Result};

/// Windowed buffered reader over a seekable source
pub struct ReadBufferPartial<R: Read + Seek> {
    /// Diagnostic label (usually the file path)
    label: String,
    source: R,
    /// Window storage; only `[0, valid)` holds source bytes
    window: Box<[u8]>,
    /// Source offset of `window[0]`
    base: u64,
    /// Number of valid bytes in the window
    valid: usize,
    /// Logical read position
    position: u64,
    /// Source length discovered at open time
    length: u64,
}

impl ReadBufferPartial<File> {
    /// Open the file at `path` for reading
    pub fn open(path: &Path, capacity: usize) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file, path.display().to_string(), capacity)
    }

    /// Open the file at `path` using the configured read buffer size
    pub fn open_with(path: &Path, config: &BufferConfig) -> Result<Self> {
        config.validate()?;
        Self::open(path, config.read_buffer_size)
    }
}

impl<R: Read + Seek> ReadBufferPartial<R> {
    /// Wrap a source with a window of `capacity` bytes
    ///
    /// The source length is measured once, here.
    pub fn new(mut source: R, label: impl Into<String>, capacity: usize) -> Result<Self> {
        check_capacity("read buffer capacity", capacity)?;
        let label = label.into();
        let length = source.seek(SeekFrom::End(0))?;

        tracing::debug!(
            "Opened read buffer for {} ({} bytes, window {})",
            label,
            length,
            capacity
        );

        Ok(Self {
            label,
            source,
            window: vec![0u8; capacity].into_boxed_slice(),
            base: 0,
            valid: 0,
            position: 0,
            length,
        })
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Move the read position to `position`, which must lie in `[0, len)`
    pub fn seek(&mut self, position: i64) -> Result<()> {
        if position < 0 || position as u64 >= self.length {
            return Err(CacheIoError::Range {
                path: self.label.clone(),
                position,
                length: self.length,
            });
        }
        self.position = position as u64;
        Ok(())
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Source length discovered at open time
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes between the read position and the end of the source
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }

    pub fn capacity(&self) -> usize {
        self.window.len()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // =========================================================================
    // Raw Bytes
    // =========================================================================

    /// Read one byte and advance by one
    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure_covered(1)?;
        let byte = self.window[self.window_offset()];
        self.position += 1;
        Ok(byte)
    }

    /// Fill all of `dst`, or fail with `Eof` without consuming anything
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.check_remaining(dst.len())?;
        self.fill(dst)
    }

    /// Fill `dst[offset..offset + length]`
    ///
    /// Exhaustion is checked before the span is validated against `dst`.
    pub fn read_bytes_into(&mut self, dst: &mut [u8], offset: usize, length: usize) -> Result<()> {
        self.check_remaining(length)?;

        let end = match offset.checked_add(length) {
            Some(end) if end <= dst.len() => end,
            _ => {
                return Err(CacheIoError::Range {
                    path: self.label.clone(),
                    position: i64::try_from(offset).unwrap_or(i64::MAX),
                    length: dst.len() as u64,
                })
            }
        };
        self.fill(&mut dst[offset..end])
    }

    /// Read `length` bytes into a new vector
    pub fn read_vec(&mut self, length: usize) -> Result<Vec<u8>> {
        // Check first: a corrupt length must not drive a huge allocation
        self.check_remaining(length)?;
        let mut bytes = vec![0u8; length];
        self.fill(&mut bytes)?;
        Ok(bytes)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Read a 2-byte small int
    pub fn read_small_int(&mut self) -> Result<u32> {
        let mut bytes = [0u8; SMALL_INT_SIZE];
        self.read_bytes(&mut bytes)?;
        Ok(decode_small_int(bytes))
    }

    /// Read a 4-byte large int
    pub fn read_large_int(&mut self) -> Result<i32> {
        let mut bytes = [0u8; LARGE_INT_SIZE];
        self.read_bytes(&mut bytes)?;
        Ok(decode_large_int(bytes))
    }

    /// Read a length-prefixed string
    pub fn read_string(&mut self) -> Result<String> {
        self.restoring_position(|reader| reader.read_plain_string())
    }

    /// Read a tag byte that must equal `tag`, then a length-prefixed string
    pub fn require_field(&mut self, tag: u8) -> Result<String> {
        self.restoring_position(|reader| {
            reader.require_tag(tag)?;
            reader.read_plain_string()
        })
    }

    /// Read a tag byte that must equal `tag`, then a `width`-byte padded string
    pub fn require_fixed_field(&mut self, tag: u8, width: usize) -> Result<String> {
        self.restoring_position(|reader| {
            reader.require_tag(tag)?;
            let field = reader.read_vec(width)?;
            string::decode_fixed_width(field)
        })
    }

    fn read_plain_string(&mut self) -> Result<String> {
        let length = self.read_small_int()? as usize;
        let bytes = self.read_vec(length)?;
        string::decode_utf8(bytes)
    }

    fn require_tag(&mut self, tag: u8) -> Result<()> {
        let position = self.position;
        let actual = self.read_byte()?;
        if actual != tag {
            return Err(CacheIoError::Format {
                path: self.label.clone(),
                position,
                expected: tag,
                actual,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the source
    pub fn close(self) {
        tracing::debug!("Closed read buffer for {}", self.label);
    }

    // =========================================================================
    // Window Management
    // =========================================================================

    /// Make sure the window holds the byte at `position`.
    ///
    /// Returns how many of the next `count` bytes can be served from the
    /// window without another refill (at least one).
    fn ensure_covered(&mut self, count: usize) -> Result<usize> {
        if self.position >= self.length {
            return Err(self.eof());
        }

        let window_end = self.base + self.valid as u64;
        if self.position < self.base || self.position >= window_end {
            self.refill()?;
        }

        let available = self.valid - self.window_offset();
        Ok(available.min(count))
    }

    /// Load the window starting at the current position
    fn refill(&mut self) -> Result<()> {
        // Invalidate first so a failed refill never leaves stale bytes addressable
        self.valid = 0;
        self.base = self.position;
        self.source.seek(SeekFrom::Start(self.position))?;

        let mut filled = 0;
        while filled < self.window.len() {
            match self.source.read(&mut self.window[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.valid = filled;

        tracing::trace!(
            "Refilled window for {} at offset {} ({} bytes)",
            self.label,
            self.base,
            filled
        );

        if filled == 0 {
            return Err(self.eof());
        }
        Ok(())
    }

    /// Copy into `dst` window by window. On failure the position is rewound.
    fn fill(&mut self, dst: &mut [u8]) -> Result<()> {
        self.restoring_position(|reader| {
            let mut filled = 0;
            while filled < dst.len() {
                let n = reader.ensure_covered(dst.len() - filled)?;
                let start = reader.window_offset();
                dst[filled..filled + n].copy_from_slice(&reader.window[start..start + n]);
                reader.position += n as u64;
                filled += n;
            }
            Ok(())
        })
    }

    fn check_remaining(&self, length: usize) -> Result<()> {
        if (length as u64) > self.remaining() {
            return Err(self.eof());
        }
        Ok(())
    }

    fn restoring_position<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.position;
        let result = op(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    #[inline]
    fn window_offset(&self) -> usize {
        (self.position - self.base) as usize
    }

    fn eof(&self) -> CacheIoError {
        CacheIoError::Eof {
            path: self.label.clone(),
            position: self.position,
        }
    }
}

/// CRC32 of the whole file at `path`, streamed through a read window
pub fn checksum_file(path: &Path, capacity: usize) -> Result<u32> {
    let mut reader = ReadBufferPartial::open(path, capacity)?;
    let mut hasher = crc32fast::Hasher::new();

    while reader.remaining() > 0 {
        let want = usize::try_from(reader.remaining()).unwrap_or(usize::MAX);
        let n = reader.ensure_covered(want)?;
        let start = reader.window_offset();
        hasher.update(&reader.window[start..start + n]);
        reader.position += n as u64;
    }

    reader.close();
    Ok(hasher.finalize())
}
