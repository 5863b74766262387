//! Header parsing.

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{FIXED_HEADER_LEN, FORMAT_VERSION, MAGIC, NONCE_PREFIX_LEN};
use crate::headers::encode::encode_header;
use crate::headers::types::{FileHeader, HeaderError};

/// Parse a CRFS header from `r`.
///
/// Reads the fixed 15 bytes, validates magic and version, then reads exactly
/// `wrappedKeyLen` further bytes. Returns the structured header together with
/// the reconstructed canonical byte sequence, which the caller feeds to the
/// chunk layer as the chunk-0 AAD.
///
/// Reserved flag bits are carried through untouched; the AAD binding is what
/// detects tampering with them.
pub fn decode_header<R: Read>(r: &mut R) -> Result<(FileHeader, Vec<u8>), HeaderError> {
    let mut fixed = [0u8; FIXED_HEADER_LEN];
    r.read_exact(&mut fixed).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => HeaderError::TruncatedHeader,
        _ => HeaderError::Io(e.to_string()),
    })?;

    if fixed[0..4] != MAGIC {
        let mut have = [0u8; 4];
        have.copy_from_slice(&fixed[0..4]);
        return Err(HeaderError::InvalidMagic { have });
    }
    if fixed[4] != FORMAT_VERSION {
        return Err(HeaderError::UnsupportedVersion { have: fixed[4] });
    }

    let mut nonce_prefix = [0u8; NONCE_PREFIX_LEN];
    nonce_prefix.copy_from_slice(&fixed[6..13]);

    let wk_len = BigEndian::read_u16(&fixed[13..15]) as usize;
    let mut wrapped_key = vec![0u8; wk_len];
    if wk_len > 0 {
        r.read_exact(&mut wrapped_key).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => HeaderError::TruncatedWrappedKey { need: wk_len },
            _ => HeaderError::Io(e.to_string()),
        })?;
    }

    let header = FileHeader {
        version: fixed[4],
        flags: fixed[5],
        nonce_prefix,
        wrapped_key,
    };
    let canonical = encode_header(&header);
    Ok((header, canonical))
}
