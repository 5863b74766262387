//! Streaming encryption writer.
//!
//! `ChunkWriter` buffers plaintext and seals full chunks with AES-GCM;
//! `Writer` owns header emission, the optional gzip stage above the chunk
//! layer, sticky-error state, and idempotent close.

use std::io::{self, ErrorKind, Write};

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::constants::{flags, MAX_CHUNK_COUNT, NONCE_PREFIX_LEN};
use crate::crypto::{build_nonce, AeadCipher, CryptoError, NONCE_LEN};
use crate::headers::{encode_header, FileHeader};
use crate::keys::KeyProvider;
use crate::stream::options::StreamOptions;
use crate::types::{StickyError, StreamError};

/// Buffers plaintext and encrypts full chunks into the sink.
pub(crate) struct ChunkWriter<W: Write> {
    dst: W,
    aead: AeadCipher,
    nonce_prefix: [u8; NONCE_PREFIX_LEN],
    // Serialised header, AAD for the first chunk only.
    header_aad: Vec<u8>,
    buf: Vec<u8>,
    chunk_size: usize,
    counter: u64,
    sticky: Option<StickyError>,
}

impl<W: Write> ChunkWriter<W> {
    fn new(
        dst: W,
        aead: AeadCipher,
        nonce_prefix: [u8; NONCE_PREFIX_LEN],
        header_aad: Vec<u8>,
        chunk_size: usize,
    ) -> Self {
        Self {
            dst,
            aead,
            nonce_prefix,
            header_aad,
            buf: Vec::with_capacity(chunk_size),
            chunk_size,
            counter: 0,
            sticky: None,
        }
    }

    /// Seal and emit the buffered plaintext as one frame. Empty buffers
    /// produce no frame, so a stream of zero user bytes is header plus
    /// terminator only.
    fn seal_chunk(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        if self.counter >= MAX_CHUNK_COUNT {
            return Err(io::Error::new(ErrorKind::Other, CryptoError::NonceExhausted));
        }

        let nonce = build_nonce(&self.nonce_prefix, self.counter);
        let aad: &[u8] = if self.counter == 0 {
            &self.header_aad
        } else {
            &[]
        };
        let ciphertext = self
            .aead
            .seal(&nonce, aad, &self.buf)
            .map_err(|e| io::Error::new(ErrorKind::Other, e))?;

        // frame = length ‖ nonce ‖ ciphertext (tag included)
        let frame_len = (NONCE_LEN + ciphertext.len()) as u32;
        self.dst
            .write_u32::<BigEndian>(frame_len)
            .map_err(|e| io::Error::new(e.kind(), format!("writing chunk length: {}", e)))?;
        self.dst
            .write_all(&nonce)
            .and_then(|_| self.dst.write_all(&ciphertext))
            .map_err(|e| io::Error::new(e.kind(), format!("writing chunk data: {}", e)))?;

        self.buf.clear();
        self.counter += 1;
        Ok(())
    }

    /// Seal any residue and emit the 4-byte zero terminator.
    fn close(&mut self) -> io::Result<()> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        let res = self.seal_chunk().and_then(|_| {
            self.dst
                .write_u32::<BigEndian>(0)
                .map_err(|e| io::Error::new(e.kind(), format!("writing end marker: {}", e)))?;
            self.dst.flush()
        });
        if let Err(e) = &res {
            self.sticky = Some(StickyError::record(e));
        }
        res
    }

    fn chunks_sealed(&self) -> u64 {
        self.counter
    }
}

impl<W: Write> Write for ChunkWriter<W> {
    fn write(&mut self, mut p: &[u8]) -> io::Result<usize> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }

        let mut written = 0;
        while !p.is_empty() {
            // The buffer never exceeds chunk_size: a full buffer is sealed
            // before more bytes are accepted.
            let space = self.chunk_size - self.buf.len();
            let n = p.len().min(space);
            self.buf.extend_from_slice(&p[..n]);
            p = &p[n..];
            written += n;

            if self.buf.len() >= self.chunk_size {
                if let Err(e) = self.seal_chunk() {
                    self.sticky = Some(StickyError::record(&e));
                    return Err(e);
                }
            }
        }
        Ok(written)
    }

    /// Flush the sink without sealing a partial chunk; framing stays aligned
    /// to chunk boundaries.
    fn flush(&mut self) -> io::Result<()> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        self.dst.flush()
    }
}

enum WriterState<W: Write> {
    Plain(ChunkWriter<W>),
    Gzip(GzEncoder<ChunkWriter<W>>),
}

/// Public streaming encryption writer.
///
/// Bytes written are compressed (when configured), encrypted in chunks, and
/// framed into the sink. [`Writer::close`] finalizes the stream; dropping an
/// open writer closes it best-effort.
pub struct Writer<W: Write> {
    state: Option<WriterState<W>>,
    sticky: Option<StickyError>,
}

impl<W: Write> std::fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("sticky", &self.sticky)
            .finish_non_exhaustive()
    }
}

impl<W: Write> Writer<W> {
    /// Construct a writer over `dst`.
    ///
    /// Obtains a data key from `provider`, generates a random nonce prefix,
    /// writes the stream header, and binds AES-GCM over the key plaintext.
    /// The key plaintext is wiped when construction returns.
    pub fn new(
        mut dst: W,
        provider: &dyn KeyProvider,
        opts: StreamOptions,
    ) -> Result<Self, StreamError> {
        let chunk_size = opts.resolved_chunk_size()?;

        let dk = provider.generate_key()?;

        let mut prefix = [0u8; NONCE_PREFIX_LEN];
        OsRng.fill_bytes(&mut prefix);

        let mut header_flags = 0u8;
        if opts.compress {
            header_flags |= flags::GZIP;
        }

        let header = FileHeader::new(header_flags, prefix, dk.wrapped.clone());
        header.validate()?;
        let header_bytes = encode_header(&header);

        dst.write_all(&header_bytes).map_err(|e| {
            StreamError::Io(io::Error::new(e.kind(), format!("writing header: {}", e)))
        })?;

        let aead = AeadCipher::new(&dk.plaintext)?;
        debug!(
            compress = opts.compress,
            chunk_size,
            wrapped_key_len = dk.wrapped.len(),
            "opened encryption stream"
        );

        let chunks = ChunkWriter::new(dst, aead, prefix, header_bytes, chunk_size);
        let state = if opts.compress {
            WriterState::Gzip(GzEncoder::new(chunks, Compression::default()))
        } else {
            WriterState::Plain(chunks)
        };

        Ok(Self {
            state: Some(state),
            sticky: None,
        })
    }

    /// Flush buffered data, emit the terminator, and release the stream.
    ///
    /// The gzip stage (when present) is finished first so its residue flows
    /// into the chunk layer; the terminator is attempted even when gzip
    /// finalization fails, so readers can still tell truncation from a
    /// finished stream. A second call returns [`StreamError::Closed`]; after
    /// a write failure every call reports that same error.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if let Some(s) = &self.sticky {
            // Release resources, but never report a clean close.
            self.state = None;
            return Err(StreamError::Io(s.replay()));
        }

        match self.state.take() {
            None => Err(StreamError::Closed),
            Some(WriterState::Plain(mut chunks)) => {
                let res = chunks.close();
                self.finish_close(chunks, res)
            }
            Some(WriterState::Gzip(mut enc)) => match enc.try_finish() {
                Ok(()) => {
                    let mut chunks = enc.finish().map_err(StreamError::Io)?;
                    let res = chunks.close();
                    self.finish_close(chunks, res)
                }
                Err(e) => {
                    // Still terminate the frame sequence so the failure is
                    // not mistaken for truncation by a later reader.
                    let _ = enc.get_mut().close();
                    self.sticky = Some(StickyError::record(&e));
                    Err(StreamError::Io(e))
                }
            },
        }
    }

    fn finish_close(
        &mut self,
        chunks: ChunkWriter<W>,
        res: io::Result<()>,
    ) -> Result<(), StreamError> {
        match res {
            Ok(()) => {
                debug!(chunks = chunks.chunks_sealed(), "closed encryption stream");
                Ok(())
            }
            Err(e) => {
                self.sticky = Some(StickyError::record(&e));
                Err(StreamError::Io(e))
            }
        }
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, p: &[u8]) -> io::Result<usize> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Err(io::Error::new(ErrorKind::Other, StreamError::Closed)),
        };
        let res = match state {
            WriterState::Plain(chunks) => chunks.write(p),
            WriterState::Gzip(enc) => enc.write(p),
        };
        if let Err(e) = &res {
            self.sticky = Some(StickyError::record(e));
        }
        res
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(s) = &self.sticky {
            return Err(s.replay());
        }
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Err(io::Error::new(ErrorKind::Other, StreamError::Closed)),
        };
        let res = match state {
            WriterState::Plain(chunks) => chunks.flush(),
            WriterState::Gzip(enc) => enc.flush(),
        };
        if let Err(e) = &res {
            self.sticky = Some(StickyError::record(e));
        }
        res
    }
}

impl<W: Write> Drop for Writer<W> {
    /// Best-effort close so a forgotten `close` still yields a finished
    /// stream. Errors here are unreportable and dropped.
    fn drop(&mut self) {
        if self.state.is_some() && self.sticky.is_none() {
            let _ = self.close();
        }
    }
}
