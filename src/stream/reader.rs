//! Streaming decryption reader.
//!
//! `ChunkReader` parses frames, verifies the nonce counter, and decrypts;
//! `Reader` owns header consumption, key acquisition, the optional gzip
//! stage below the caller, sticky-error state, and idempotent close.

use std::io::{self, ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};
use bytes::{Buf, Bytes};
use flate2::read::GzDecoder;
use tracing::debug;

use crate::constants::NONCE_PREFIX_LEN;
use crate::crypto::{build_nonce, AeadCipher, NONCE_LEN};
use crate::headers::decode_header;
use crate::keys::KeyProvider;
use crate::stream::{FrameError, MAX_CHUNK_WIRE_LEN, MIN_CHUNK_WIRE_LEN};
use crate::types::{StickyError, StreamError};

/// Reads and decrypts chunks from the underlying source.
pub(crate) struct ChunkReader<R: Read> {
    src: R,
    aead: AeadCipher,
    nonce_prefix: [u8; NONCE_PREFIX_LEN],
    // Serialised header, AAD for verifying the first chunk.
    header_aad: Vec<u8>,
    // Unconsumed plaintext from the current chunk.
    plain: Bytes,
    counter: u64,
    done: bool,
    sticky: Option<StickyError>,
}

impl<R: Read> ChunkReader<R> {
    fn new(
        src: R,
        aead: AeadCipher,
        nonce_prefix: [u8; NONCE_PREFIX_LEN],
        header_aad: Vec<u8>,
    ) -> Self {
        Self {
            src,
            aead,
            nonce_prefix,
            header_aad,
            plain: Bytes::new(),
            counter: 0,
            done: false,
            sticky: None,
        }
    }

    /// Read and decrypt the next frame into `plain`, or set `done` on the
    /// terminator. Every failure is fatal for the stream.
    fn read_next_chunk(&mut self) -> io::Result<()> {
        let chunk_len = self.src.read_u32::<BigEndian>().map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => {
                io::Error::new(ErrorKind::UnexpectedEof, FrameError::UnexpectedEof)
            }
            kind => io::Error::new(kind, format!("reading chunk length: {}", e)),
        })? as usize;

        // End marker: no further bytes follow.
        if chunk_len == 0 {
            self.done = true;
            return Ok(());
        }
        if chunk_len < MIN_CHUNK_WIRE_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                FrameError::ChunkTooSmall { have: chunk_len },
            ));
        }
        if chunk_len > MAX_CHUNK_WIRE_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                FrameError::ChunkTooLarge { have: chunk_len },
            ));
        }

        let mut chunk = vec![0u8; chunk_len];
        self.src.read_exact(&mut chunk).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => io::Error::new(
                ErrorKind::UnexpectedEof,
                FrameError::TruncatedChunk { need: chunk_len },
            ),
            kind => io::Error::new(kind, format!("reading chunk data: {}", e)),
        })?;

        // The embedded nonce must sit exactly at the expected counter;
        // anything else means reordering, replay, or splicing.
        let expected = build_nonce(&self.nonce_prefix, self.counter);
        if chunk[..NONCE_LEN] != expected {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                FrameError::NonceMismatch { chunk: self.counter },
            ));
        }

        let aad: &[u8] = if self.counter == 0 {
            &self.header_aad
        } else {
            &[]
        };
        let plaintext = self
            .aead
            .open(&expected, aad, &chunk[NONCE_LEN..], self.counter)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        self.plain = Bytes::from(plaintext);
        self.counter += 1;
        Ok(())
    }
}

impl<R: Read> Read for ChunkReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        if out.is_empty() {
            return Ok(0);
        }

        loop {
            if !self.plain.is_empty() {
                let n = out.len().min(self.plain.len());
                out[..n].copy_from_slice(&self.plain[..n]);
                self.plain.advance(n);
                return Ok(n);
            }
            if self.done {
                return Ok(0);
            }
            if let Err(e) = self.read_next_chunk() {
                self.sticky = Some(StickyError::record(&e));
                return Err(e);
            }
        }
    }
}

enum ReaderState<R: Read> {
    Plain(ChunkReader<R>),
    Gzip(GzDecoder<ChunkReader<R>>),
}

/// Public streaming decryption reader.
///
/// Reads the CRFS header, acquires the data key, and yields decrypted
/// (and decompressed, when flagged) plaintext through [`Read`].
///
/// Plaintext handed out before the stream ends cleanly is unauthenticated in
/// aggregate; treat the data as untrusted until EOF arrives without error.
pub struct Reader<R: Read> {
    state: Option<ReaderState<R>>,
    sticky: Option<StickyError>,
}

impl<R: Read> Reader<R> {
    /// Construct a reader over `src`.
    ///
    /// When the header carries a wrapped key it is unwrapped through
    /// `provider`; otherwise the provider regenerates the stream key. For
    /// compressed streams the first chunk is decrypted eagerly, so header or
    /// key problems surface here rather than on the first read and the gzip
    /// header sniff never sees an empty source.
    pub fn new(mut src: R, provider: &dyn KeyProvider) -> Result<Self, StreamError> {
        let (header, header_aad) = decode_header(&mut src)?;

        let key = if header.wrapped_key.is_empty() {
            provider.generate_key()?.plaintext
        } else {
            provider.unwrap_key(&header.wrapped_key)?
        };
        let aead = AeadCipher::new(&key)?;
        debug!(
            compressed = header.compressed(),
            wrapped_key_len = header.wrapped_key.len(),
            "opened decryption stream"
        );

        let mut chunks = ChunkReader::new(src, aead, header.nonce_prefix, header_aad);
        let state = if header.compressed() {
            chunks.read_next_chunk().map_err(|e| {
                StreamError::Io(io::Error::new(e.kind(), format!("reading first chunk: {}", e)))
            })?;
            ReaderState::Gzip(GzDecoder::new(chunks))
        } else {
            ReaderState::Plain(chunks)
        };

        Ok(Self {
            state: Some(state),
            sticky: None,
        })
    }

    /// Release the decompressor and the owned source.
    ///
    /// Idempotent: the second call returns [`StreamError::Closed`].
    pub fn close(&mut self) -> Result<(), StreamError> {
        match self.state.take() {
            Some(_) => Ok(()),
            None => Err(StreamError::Closed),
        }
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Err(io::Error::new(ErrorKind::Other, StreamError::Closed)),
        };
        let res = match state {
            ReaderState::Plain(chunks) => chunks.read(out),
            ReaderState::Gzip(dec) => dec.read(out),
        };
        if let Err(e) = &res {
            self.sticky = Some(StickyError::record(e));
        }
        res
    }
}
