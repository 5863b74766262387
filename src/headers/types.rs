//! headers/types.rs
//! CRFS file header struct and validation.
//!
//! The canonical serialised header doubles as the AAD for chunk 0, which
//! binds flags, nonce prefix, and wrapped key to the ciphertext. The parser
//! therefore preserves reserved flag bits verbatim instead of rejecting them;
//! tampering surfaces as a chunk-0 authentication failure.

use std::fmt;

use crate::constants::{flags, FIXED_HEADER_LEN, FORMAT_VERSION, MAGIC, NONCE_PREFIX_LEN};

/// Parsed CRFS v1 header.
/// - `version` is fixed at 1 for streams this crate produces.
/// - `flags` bit 0 marks gzip pre-compression; high bits are reserved.
/// - `wrapped_key` is opaque provider ciphertext, empty for direct keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u8,
    pub flags: u8,
    pub nonce_prefix: [u8; NONCE_PREFIX_LEN],
    pub wrapped_key: Vec<u8>,
}

impl FileHeader {
    /// Current-version header with the given flags, prefix, and wrapped key.
    pub fn new(flags: u8, nonce_prefix: [u8; NONCE_PREFIX_LEN], wrapped_key: Vec<u8>) -> Self {
        Self {
            version: FORMAT_VERSION,
            flags,
            nonce_prefix,
            wrapped_key,
        }
    }

    /// True when flag bit 0 marks the payload as gzip-compressed.
    pub fn compressed(&self) -> bool {
        self.flags & flags::GZIP != 0
    }

    /// Serialised length: the fixed 15 bytes plus the wrapped key.
    pub fn encoded_len(&self) -> usize {
        FIXED_HEADER_LEN + self.wrapped_key.len()
    }

    /// Writer-side validation before encoding.
    ///
    /// Reserved flag bits must be zero and the wrapped key must fit the
    /// u16 length field.
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.version != FORMAT_VERSION {
            return Err(HeaderError::UnsupportedVersion { have: self.version });
        }
        if self.flags & flags::RESERVED != 0 {
            return Err(HeaderError::ReservedFlags { have: self.flags });
        }
        if self.wrapped_key.len() > u16::MAX as usize {
            return Err(HeaderError::WrappedKeyTooLarge {
                have: self.wrapped_key.len(),
            });
        }
        Ok(())
    }
}

pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[derive(Debug)]
pub enum HeaderError {
    /// Fixed header bytes could not be read in full.
    TruncatedHeader,

    /// Magic marker did not match "CRFS".
    InvalidMagic { have: [u8; 4] },

    /// Version byte is not a version this crate understands.
    UnsupportedVersion { have: u8 },

    /// Wrapped key was shorter than its declared length.
    TruncatedWrappedKey { need: usize },

    /// Reserved flag bits set on the encode path.
    ReservedFlags { have: u8 },

    /// Wrapped key does not fit the u16 length field.
    WrappedKeyTooLarge { have: usize },

    /// Non-EOF I/O failure while reading the header.
    Io(String),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            TruncatedHeader => write!(f, "truncated header"),
            InvalidMagic { have } => write!(
                f,
                "invalid magic bytes: expected {}, got {}",
                fmt_bytes(&MAGIC),
                fmt_bytes(have)
            ),
            UnsupportedVersion { have } => write!(f, "unsupported format version: {}", have),
            TruncatedWrappedKey { need } => {
                write!(f, "truncated wrapped key: expected {} bytes", need)
            }
            ReservedFlags { have } => write!(f, "reserved flag bits set: 0x{:02x}", have),
            WrappedKeyTooLarge { have } => write!(f, "wrapped key too large: {} bytes", have),
            Io(msg) => write!(f, "reading header: {}", msg),
        }
    }
}

impl std::error::Error for HeaderError {}
