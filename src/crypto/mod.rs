pub mod aead;
pub mod nonce;
pub mod types;

pub use aead::AeadCipher;
pub use nonce::build_nonce;
pub use types::{CryptoError, NONCE_LEN, TAG_LEN};
