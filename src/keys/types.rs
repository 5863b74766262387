//! keys/types.rs
//! Per-stream data keys and the provider capability.

use std::fmt;

use zeroize::Zeroizing;

/// A plaintext AES data key and its wrapped (provider-encrypted) form.
///
/// The plaintext is 16, 24, or 32 bytes and is wiped from memory when the
/// key is dropped. The wrapped form is opaque ciphertext meaningful only to
/// the issuing provider; it is empty for direct keys and flows into the
/// stream header otherwise.
pub struct DataKey {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub wrapped: Vec<u8>,
}

impl DataKey {
    /// Key used directly, with no wrapped form carried in the header.
    pub fn direct(plaintext: Zeroizing<Vec<u8>>) -> Self {
        Self {
            plaintext,
            wrapped: Vec::new(),
        }
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material never reaches logs.
        f.debug_struct("DataKey")
            .field("plaintext", &format_args!("[{} bytes]", self.plaintext.len()))
            .field("wrapped", &format_args!("[{} bytes]", self.wrapped.len()))
            .finish()
    }
}

/// Generates and unwraps per-stream data encryption keys.
///
/// A provider may be shared across streams; implementations must be safe for
/// concurrent invocation or the caller wraps them. Each stream borrows the
/// provider only during construction.
pub trait KeyProvider {
    /// Produce a fresh data key for a new stream.
    fn generate_key(&self) -> Result<DataKey, KeyError>;

    /// Recover a plaintext key from its wrapped form read out of a header.
    fn unwrap_key(&self, wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeyError>;
}

#[derive(Debug)]
pub enum KeyError {
    /// Supplied key is not a valid AES length.
    InvalidKeyLen { have: usize },

    /// Provider could not be reached or refused to serve keys.
    Unavailable(String),

    /// Provider rejected the unwrap request.
    Denied(String),

    /// Transport or protocol failure talking to the provider.
    Provider(String),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use KeyError::*;
        match self {
            InvalidKeyLen { have } => {
                write!(f, "invalid key length: {} bytes (want 16, 24, or 32)", have)
            }
            Unavailable(msg) => write!(f, "key provider unavailable: {}", msg),
            Denied(msg) => write!(f, "key unwrap denied: {}", msg),
            Provider(msg) => write!(f, "key provider I/O: {}", msg),
        }
    }
}

impl std::error::Error for KeyError {}
