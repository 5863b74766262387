pub mod direct;
pub mod envelope;
pub mod types;

pub use direct::StaticKeyProvider;
pub use envelope::{
    EnvelopeKeyProvider, GeneratedDataKey, KmsClient, KmsError, DEFAULT_KEY_BITS,
    DEFAULT_KMS_TIMEOUT,
};
pub use types::{DataKey, KeyError, KeyProvider};
