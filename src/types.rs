use std::io;

use crate::{
    crypto::CryptoError, headers::HeaderError, keys::KeyError, stream::FrameError,
};

/// Unified stream error covering I/O, header, frame, crypto, and key-provider
/// failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Messages are stable so callers and logs can rely on them.
#[derive(Debug)]
pub enum StreamError {
    /// I/O error from the underlying sink or source, wrapped with context.
    Io(io::Error),

    /// Header-level error (parse or validation).
    Header(HeaderError),

    /// Chunk-frame-level error (framing, ordering, truncation).
    Frame(FrameError),

    /// Cryptographic error (AEAD, key length, counter policy).
    Crypto(CryptoError),

    /// Key-provider error (generation, unwrap, KMS transport).
    Key(KeyError),

    /// Operation on an already-closed `Writer` or `Reader`.
    Closed,

    /// Generic high-level validation with a descriptive message.
    Validation(String),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::Io(e) => write!(f, "I/O error: {}", e),
            StreamError::Header(e) => write!(f, "header error: {}", e),
            StreamError::Frame(e) => write!(f, "frame error: {}", e),
            StreamError::Crypto(e) => write!(f, "crypto error: {}", e),
            StreamError::Key(e) => write!(f, "key provider error: {}", e),
            StreamError::Closed => write!(f, "stream: use of closed Writer or Reader"),
            StreamError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            StreamError::Header(e) => Some(e),
            StreamError::Frame(e) => Some(e),
            StreamError::Crypto(e) => Some(e),
            StreamError::Key(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

impl From<HeaderError> for StreamError {
    fn from(e: HeaderError) -> Self {
        StreamError::Header(e)
    }
}

impl From<FrameError> for StreamError {
    fn from(e: FrameError) -> Self {
        StreamError::Frame(e)
    }
}

impl From<CryptoError> for StreamError {
    fn from(e: CryptoError) -> Self {
        StreamError::Crypto(e)
    }
}

impl From<KeyError> for StreamError {
    fn from(e: KeyError) -> Self {
        StreamError::Key(e)
    }
}

/// Snapshot of a terminal stream failure.
///
/// `io::Error` is not `Clone`, so the sticky state keeps the kind and the
/// rendered message and reproduces an equal error on every later call.
#[derive(Debug, Clone)]
pub(crate) struct StickyError {
    kind: io::ErrorKind,
    message: String,
}

impl StickyError {
    pub(crate) fn record(e: &io::Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }

    pub(crate) fn replay(&self) -> io::Error {
        io::Error::new(self.kind, self.message.clone())
    }
}
