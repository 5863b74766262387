//! Chunked AEAD stream codec over `std::io` sinks and sources.
//!
//! Wire layout after the header: repeated frames of
//! `length(u32 BE) ‖ nonce(12) ‖ ciphertext ‖ tag(16)`, closed by a length
//! field of zero. `length` counts everything after itself, so a data frame
//! is always at least 28 bytes long.

use std::fmt;

use crate::constants::MAX_CHUNK_SIZE;
use crate::crypto::{NONCE_LEN, TAG_LEN};

pub mod options;
pub mod reader;
pub mod writer;

pub use options::StreamOptions;
pub use reader::Reader;
pub use writer::Writer;

/// Smallest legal non-terminator frame length: nonce plus tag.
pub(crate) const MIN_CHUNK_WIRE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Largest frame the reader will buffer, from the chunk-size sanity bound.
pub(crate) const MAX_CHUNK_WIRE_LEN: usize = MAX_CHUNK_SIZE + NONCE_LEN + TAG_LEN;

#[derive(Debug)]
pub enum FrameError {
    /// Stream ended before the terminator frame.
    UnexpectedEof,

    /// Frame body was shorter than its declared length.
    TruncatedChunk { need: usize },

    /// Declared length cannot hold a nonce and a tag.
    ChunkTooSmall { have: usize },

    /// Declared length exceeds the sanity bound.
    ChunkTooLarge { have: usize },

    /// Embedded nonce does not match the expected counter position.
    NonceMismatch { chunk: u64 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FrameError::*;
        match self {
            UnexpectedEof => write!(f, "unexpected end of stream reading chunk length"),
            TruncatedChunk { need } => write!(f, "truncated chunk: expected {} bytes", need),
            ChunkTooSmall { have } => write!(
                f,
                "chunk too small to contain nonce and tag: {} < {}",
                have, MIN_CHUNK_WIRE_LEN
            ),
            ChunkTooLarge { have } => write!(
                f,
                "chunk too large: {} > {}",
                have, MAX_CHUNK_WIRE_LEN
            ),
            NonceMismatch { chunk } => write!(f, "nonce counter mismatch at chunk {}", chunk),
        }
    }
}

impl std::error::Error for FrameError {}
