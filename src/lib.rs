//! crfs
//!
//! Streaming authenticated encryption for byte streams, persisted in the
//! CRFS v1 container: a self-authenticating header, length-framed AES-GCM
//! chunks with counter-chained nonces, optional gzip pre-compression, and
//! pluggable data-key providers (direct keys or envelope keys unwrapped by
//! a KMS).
//!
//! ```no_run
//! use std::io::Write;
//!
//! use crfs::{Reader, StaticKeyProvider, StreamOptions, Writer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = StaticKeyProvider::new(b"0123456789abcdef")?;
//!
//! let mut sealed = Vec::new();
//! let mut w = Writer::new(&mut sealed, &provider, StreamOptions::new())?;
//! w.write_all(b"hello, world")?;
//! w.close()?;
//! drop(w);
//!
//! let mut r = Reader::new(sealed.as_slice(), &provider)?;
//! let mut plain = Vec::new();
//! std::io::Read::read_to_end(&mut r, &mut plain)?;
//! r.close()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Format layers
pub mod crypto;
pub mod headers;
pub mod keys;

// Stream codec
pub mod stream;

pub use keys::{
    DataKey, EnvelopeKeyProvider, GeneratedDataKey, KeyError, KeyProvider, KmsClient, KmsError,
    StaticKeyProvider,
};
pub use stream::{FrameError, Reader, StreamOptions, Writer};
pub use types::StreamError;
