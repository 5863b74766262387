//! Static key provider: every stream uses the same caller-supplied AES key.

use std::fmt;

use zeroize::Zeroizing;

use crate::keys::types::{DataKey, KeyError, KeyProvider};

/// Provider that always returns a fixed AES key.
///
/// Streams written under a static provider carry no wrapped key in their
/// header, so the reader falls through to `generate_key` and receives the
/// same key back.
pub struct StaticKeyProvider {
    key: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material never reaches logs.
        f.debug_struct("StaticKeyProvider")
            .field("key", &format_args!("[{} bytes]", self.key.len()))
            .finish()
    }
}

impl StaticKeyProvider {
    /// Copy `key` into the provider.
    ///
    /// The copy is defensive: mutating the caller's buffer afterwards does
    /// not change what the provider hands out.
    pub fn new(key: &[u8]) -> Result<Self, KeyError> {
        match key.len() {
            16 | 24 | 32 => Ok(Self {
                key: Zeroizing::new(key.to_vec()),
            }),
            have => Err(KeyError::InvalidKeyLen { have }),
        }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn generate_key(&self) -> Result<DataKey, KeyError> {
        Ok(DataKey::direct(self.key.clone()))
    }

    /// The wrapped input is ignored; the stored key is the answer.
    fn unwrap_key(&self, _wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeyError> {
        Ok(self.key.clone())
    }
}
