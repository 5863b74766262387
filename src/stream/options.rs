use crate::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::types::StreamError;

/// Tunables for a streaming encryption writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    pub(crate) compress: bool,
    pub(crate) chunk_size: usize,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable gzip compression before encryption.
    pub fn with_compression(mut self) -> Self {
        self.compress = true;
        self
    }

    /// Set the plaintext chunk size. Zero selects the 64 KiB default.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub(crate) fn resolved_chunk_size(&self) -> Result<usize, StreamError> {
        if self.chunk_size == 0 {
            return Ok(DEFAULT_CHUNK_SIZE);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StreamError::Validation(format!(
                "chunk size {} exceeds maximum {}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        Ok(self.chunk_size)
    }
}
