//! Configuration for cachebuf
//!
//! Buffer sizing with sensible defaults.

use crate::error::{CacheIoError, Result};

/// Default capacity of the pending write buffer (16 KB)
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 16 * 1024;

/// Default capacity of the read window (16 KB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 16 * 1024;

/// Buffer sizing for writers and readers
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Bytes held by a WriteBuffer before it pushes them to the sink
    pub write_buffer_size: usize,

    /// Bytes fetched from the source on each ReadBufferPartial refill
    pub read_buffer_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl BufferConfig {
    /// Create a new config builder
    pub fn builder() -> BufferConfigBuilder {
        BufferConfigBuilder::default()
    }

    /// Reject sizes no buffer can work with
    pub fn validate(&self) -> Result<()> {
        check_capacity("write_buffer_size", self.write_buffer_size)?;
        check_capacity("read_buffer_size", self.read_buffer_size)
    }
}

/// Builder for BufferConfig
#[derive(Default)]
pub struct BufferConfigBuilder {
    config: BufferConfig,
}

impl BufferConfigBuilder {
    /// Set the write buffer capacity (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// Set the read window capacity (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> BufferConfig {
        self.config
    }
}

pub(crate) fn check_capacity(name: &str, capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(CacheIoError::Config(format!("{} must be greater than zero", name)));
    }
    Ok(())
}
