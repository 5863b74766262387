use std::fmt;

/// Standard 12-byte nonce length for AES-GCM.
pub const NONCE_LEN: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

#[derive(Debug)]
pub enum CryptoError {
    /// Key is not a valid AES length (16, 24, or 32 bytes).
    InvalidKeyLen { have: usize },

    /// AEAD open failed: tag mismatch, wrong key, or AAD mismatch.
    /// The three causes are indistinguishable by design.
    AuthenticationFailed { chunk: u64 },

    /// Chunk counter reached the 2^40 stream limit; sealing another chunk
    /// would reuse a nonce.
    NonceExhausted,

    /// General runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            InvalidKeyLen { have } => {
                write!(f, "invalid AES key length: {} bytes (want 16, 24, or 32)", have)
            }
            AuthenticationFailed { chunk } => {
                write!(f, "authentication failed decrypting chunk {}", chunk)
            }
            NonceExhausted => write!(f, "chunk counter exhausted: stream limit is 2^40 chunks"),
            Failure(msg) => write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
