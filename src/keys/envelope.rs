//! Envelope key provider: per-stream data keys wrapped by a remote KMS.
//!
//! The provider owns the key-management policy (key name, key size,
//! re-authentication) while the network transport stays behind the
//! [`KmsClient`] adapter. Plaintext data keys exist only in memory and are
//! wiped on drop; the wrapped ciphertext is what travels in stream headers.

use std::fmt;
use std::time::Duration;

use tracing::debug;
use zeroize::Zeroizing;

use crate::keys::types::{DataKey, KeyError, KeyProvider};

/// Data keys are 256-bit unless the caller narrows them.
pub const DEFAULT_KEY_BITS: u32 = 256;

/// Reference per-request timeout for KMS adapters.
pub const DEFAULT_KMS_TIMEOUT: Duration = Duration::from_secs(30);

/// Plaintext/ciphertext pair returned by a KMS data-key request.
pub struct GeneratedDataKey {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub ciphertext: Vec<u8>,
}

/// Transit-style KMS adapter.
///
/// Implementations wrap whatever transport reaches the KMS and must bound
/// each request with their own timeout ([`DEFAULT_KMS_TIMEOUT`] is the
/// reference default). The codec never retries; every failure propagates.
pub trait KmsClient {
    /// Refresh or verify credentials. Called before every operation.
    fn authenticate(&self) -> Result<(), KmsError>;

    /// Ask the KMS for a fresh data key of `bits` under the named master key.
    fn generate_data_key(&self, key_name: &str, bits: u32) -> Result<GeneratedDataKey, KmsError>;

    /// Decrypt a wrapped data key under the named master key.
    fn decrypt(&self, key_name: &str, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, KmsError>;
}

#[derive(Debug)]
pub enum KmsError {
    /// KMS unreachable or unhealthy.
    Unavailable(String),

    /// KMS refused the request (authentication or policy).
    Denied(String),

    /// Malformed or unexpected KMS response.
    Protocol(String),
}

impl fmt::Display for KmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KmsError::Unavailable(msg) => write!(f, "KMS unavailable: {}", msg),
            KmsError::Denied(msg) => write!(f, "KMS denied request: {}", msg),
            KmsError::Protocol(msg) => write!(f, "KMS protocol error: {}", msg),
        }
    }
}

impl std::error::Error for KmsError {}

impl From<KmsError> for KeyError {
    fn from(e: KmsError) -> Self {
        match e {
            KmsError::Unavailable(msg) => KeyError::Unavailable(msg),
            KmsError::Denied(msg) => KeyError::Denied(msg),
            KmsError::Protocol(msg) => KeyError::Provider(msg),
        }
    }
}

/// Key provider backed by a KMS through a [`KmsClient`] adapter.
pub struct EnvelopeKeyProvider<C> {
    client: C,
    key_name: String,
    key_bits: u32,
}

impl<C: KmsClient> EnvelopeKeyProvider<C> {
    pub fn new(client: C, key_name: impl Into<String>) -> Self {
        Self {
            client,
            key_name: key_name.into(),
            key_bits: DEFAULT_KEY_BITS,
        }
    }

    /// Override the requested data-key size (128, 192, or 256 bits).
    pub fn with_key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }
}

impl<C: KmsClient> KeyProvider for EnvelopeKeyProvider<C> {
    fn generate_key(&self) -> Result<DataKey, KeyError> {
        // Credentials may have expired between streams.
        self.client.authenticate()?;

        let gk = self.client.generate_data_key(&self.key_name, self.key_bits)?;
        debug!(
            key_name = %self.key_name,
            wrapped_len = gk.ciphertext.len(),
            "generated data key"
        );
        Ok(DataKey {
            plaintext: gk.plaintext,
            wrapped: gk.ciphertext,
        })
    }

    fn unwrap_key(&self, wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeyError> {
        self.client.authenticate()?;

        let plaintext = self.client.decrypt(&self.key_name, wrapped)?;
        debug!(key_name = %self.key_name, "unwrapped data key");
        Ok(plaintext)
    }
}
