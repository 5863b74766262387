//! Header encoding.
//!
//! Field order must match the layout in `types.rs` exactly; the output of
//! this function is the chunk-0 AAD, so both sides must agree byte for byte.

use crate::constants::MAGIC;
use crate::headers::types::FileHeader;

/// Serialise a header into its canonical wire form.
///
/// Emits exactly `15 + wrapped_key.len()` bytes: magic, version, flags,
/// nonce prefix, wrapped-key length as big-endian u16, wrapped key.
/// Callers that build headers from untrusted parts run
/// [`FileHeader::validate`] first; encoding itself cannot fail.
pub fn encode_header(h: &FileHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(h.encoded_len());

    out.extend_from_slice(&MAGIC); // 0..4
    out.push(h.version); // 4
    out.push(h.flags); // 5
    out.extend_from_slice(&h.nonce_prefix); // 6..13
    out.extend_from_slice(&(h.wrapped_key.len() as u16).to_be_bytes()); // 13..15
    out.extend_from_slice(&h.wrapped_key); // 15..

    debug_assert_eq!(out.len(), h.encoded_len(), "encoding wrote incorrect length");
    out
}
