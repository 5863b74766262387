//! crypto/nonce.rs
//! Deterministic nonce construction from stream prefix and chunk counter.
//!
//! Layout: 7 bytes of random per-stream prefix, then the low 40 bits of the
//! counter big-endian in the trailing 5 bytes. The prefix is unique per
//! stream and the counter is unique per chunk, so no (stream, chunk) pair
//! repeats a nonce. 40 bits of counter bound a stream to 2^40 chunks,
//! which at the 64 KiB default chunk size covers ~64 PiB.
//!
//! The same schedule runs on encrypt and decrypt; the reader recomputes the
//! expected nonce and rejects any chunk whose embedded nonce differs, which
//! is what detects reordering, replay, and splicing.

use crate::constants::NONCE_PREFIX_LEN;
use crate::crypto::types::NONCE_LEN;

/// Build the 12-byte AES-GCM nonce for chunk `counter` of a stream.
///
/// Contract:
/// - Deterministic: same `(prefix, counter)` always yields the same nonce.
/// - Injective over `counter` in `0..MAX_CHUNK_COUNT` for a fixed prefix.
/// - Bits above the low 40 of `counter` are discarded without error; callers
///   must stay below `MAX_CHUNK_COUNT` (the chunk writer enforces this).
#[inline]
pub fn build_nonce(prefix: &[u8; NONCE_PREFIX_LEN], counter: u64) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    nonce[..NONCE_PREFIX_LEN].copy_from_slice(prefix);

    // Trailing 5 bytes hold the counter big-endian (most significant first).
    let ctr = counter.to_be_bytes();
    nonce[NONCE_PREFIX_LEN..].copy_from_slice(&ctr[3..8]);
    nonce
}
