//! crypto/aead.rs
//! AES-GCM wrapper keyed by data-key length.
//!
//! - 16/24/32-byte keys select AES-128/192/256-GCM; all use 12-byte nonces.
//! - Tag verification fails closed: `open` never returns partial plaintext.
//! - The caller supplies nonce and AAD per chunk.

use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};

use crate::crypto::types::{CryptoError, NONCE_LEN};

/// AES-192-GCM with the standard 96-bit nonce.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// AEAD instance bound to one stream's data key.
#[derive(Clone)]
pub enum AeadCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl AeadCipher {
    /// Bind a cipher to `key`, selecting the AES variant by key length.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = |_| CryptoError::InvalidKeyLen { have: key.len() };
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            have => Err(CryptoError::InvalidKeyLen { have }),
        }
    }

    /// Seal `plaintext` under `nonce` with `aad`, returning ciphertext‖tag.
    pub fn seal(
        &self,
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let payload = Payload { msg: plaintext, aad };
        match self {
            AeadCipher::Aes128(c) => c.encrypt(Nonce::from_slice(nonce), payload),
            AeadCipher::Aes192(c) => c.encrypt(Nonce::from_slice(nonce), payload),
            AeadCipher::Aes256(c) => c.encrypt(Nonce::from_slice(nonce), payload),
        }
        .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))
    }

    /// Open ciphertext‖tag sealed for chunk `chunk`.
    ///
    /// Tag mismatch, wrong key, and AAD mismatch all report the same
    /// authentication failure.
    pub fn open(
        &self,
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
        chunk: u64,
    ) -> Result<Vec<u8>, CryptoError> {
        let payload = Payload {
            msg: ciphertext_and_tag,
            aad,
        };
        match self {
            AeadCipher::Aes128(c) => c.decrypt(Nonce::from_slice(nonce), payload),
            AeadCipher::Aes192(c) => c.decrypt(Nonce::from_slice(nonce), payload),
            AeadCipher::Aes256(c) => c.decrypt(Nonce::from_slice(nonce), payload),
        }
        .map_err(|_| CryptoError::AuthenticationFailed { chunk })
    }
}
