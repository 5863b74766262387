#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use crfs::constants::{DEFAULT_CHUNK_SIZE, FIXED_HEADER_LEN, MAX_CHUNK_SIZE};
    use crfs::{Reader, StaticKeyProvider, StreamError, StreamOptions, Writer};
    use rand::rngs::OsRng;
    use rand::RngCore;

    const KEY: &[u8] = b"1111111111111111"; // AES-128

    fn write_stream(data: &[u8], compress: bool, chunk_size: usize) -> Vec<u8> {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut opts = StreamOptions::new().with_chunk_size(chunk_size);
        if compress {
            opts = opts.with_compression();
        }

        let mut out = Vec::new();
        let mut w = Writer::new(&mut out, &kp, opts).unwrap();
        w.write_all(data).unwrap();
        w.close().unwrap();
        drop(w);
        out
    }

    fn read_stream(data: &[u8]) -> Vec<u8> {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut r = Reader::new(data, &kp).unwrap();
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        r.close().unwrap();
        out
    }

    /// Frame bodies between the header and the terminator.
    fn split_frames(data: &[u8]) -> Vec<Vec<u8>> {
        let wk_len = u16::from_be_bytes([data[13], data[14]]) as usize;
        let mut off = FIXED_HEADER_LEN + wk_len;

        let mut frames = Vec::new();
        loop {
            let len = u32::from_be_bytes(data[off..off + 4].try_into().unwrap()) as usize;
            off += 4;
            if len == 0 {
                break;
            }
            frames.push(data[off..off + len].to_vec());
            off += len;
        }
        assert_eq!(off, data.len(), "trailing bytes after terminator");
        frames
    }

    #[test]
    fn small_plaintext_single_frame_layout() {
        let sealed = write_stream(b"hello, world", false, 0);

        // 15-byte header, one 4+40-byte frame (12 nonce + 12 ciphertext +
        // 16 tag), 4-byte terminator.
        assert_eq!(sealed.len(), 63);
        let frames = split_frames(&sealed);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 40);

        assert_eq!(read_stream(&sealed), b"hello, world");
    }

    #[test]
    fn empty_stream_is_header_plus_terminator() {
        let sealed = write_stream(b"", false, 0);
        assert_eq!(sealed.len(), FIXED_HEADER_LEN + 4);
        assert!(split_frames(&sealed).is_empty());
        assert_eq!(read_stream(&sealed), b"");
    }

    #[test]
    fn exact_chunk_boundary_yields_one_frame() {
        let mut original = vec![0u8; DEFAULT_CHUNK_SIZE];
        OsRng.fill_bytes(&mut original);

        let sealed = write_stream(&original, false, 0);
        assert_eq!(split_frames(&sealed).len(), 1);
        assert_eq!(read_stream(&sealed), original);
    }

    #[test]
    fn multi_chunk_stream() {
        let mut original = vec![0u8; DEFAULT_CHUNK_SIZE * 3 + 42];
        OsRng.fill_bytes(&mut original);

        let sealed = write_stream(&original, false, 0);
        let frames = split_frames(&sealed);
        assert_eq!(frames.len(), 4);
        // Last frame holds only the 42-byte residue.
        assert_eq!(frames[3].len(), 12 + 42 + 16);
        assert_eq!(read_stream(&sealed), original);
    }

    #[test]
    fn small_chunk_size_splits_input() {
        let original = b"The quick brown fox jumps over the lazy dog";
        let sealed = write_stream(original, false, 10);

        assert_eq!(split_frames(&sealed).len(), 5);
        assert_eq!(read_stream(&sealed), original);
    }

    #[test]
    fn incremental_writes_cross_chunk_boundaries() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out, &kp, StreamOptions::new().with_chunk_size(16)).unwrap();
        for _ in 0..10 {
            w.write_all(b"hello").unwrap();
        }
        w.close().unwrap();
        drop(w);

        assert_eq!(read_stream(&out), b"hello".repeat(10));
    }

    #[test]
    fn compression_shrinks_repetitive_input() {
        let original = b"abcdefghij".repeat(100_000); // 1 MB
        let sealed = write_stream(&original, true, 0);

        assert!(sealed.len() < original.len());
        assert_eq!(read_stream(&sealed), original);
    }

    #[test]
    fn compression_roundtrip_small_and_empty() {
        for data in [&b"hello, world"[..], &b""[..]] {
            let sealed = write_stream(data, true, 0);
            assert_eq!(read_stream(&sealed), data);
        }
    }

    #[test]
    fn write_after_close_returns_closed_error() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out, &kp, StreamOptions::new()).unwrap();
        w.write_all(b"payload").unwrap();
        w.close().unwrap();

        let err = w.write(b"more").unwrap_err();
        assert!(err.to_string().contains("use of closed"));
    }

    #[test]
    fn double_close_returns_closed_error() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut out = Vec::new();
        let mut w = Writer::new(&mut out, &kp, StreamOptions::new()).unwrap();
        w.close().unwrap();

        assert!(matches!(w.close().unwrap_err(), StreamError::Closed));
    }

    #[test]
    fn drop_without_close_still_finishes_the_stream() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let mut out = Vec::new();
        {
            let mut w = Writer::new(&mut out, &kp, StreamOptions::new()).unwrap();
            w.write_all(b"finished by drop").unwrap();
        }
        assert_eq!(read_stream(&out), b"finished by drop");
    }

    #[test]
    fn oversized_chunk_size_is_rejected() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let err = Writer::new(
            Vec::new(),
            &kp,
            StreamOptions::new().with_chunk_size(MAX_CHUNK_SIZE + 1),
        )
        .unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)));
    }

    #[test]
    fn nonce_prefixes_differ_between_streams() {
        let a = write_stream(b"same input", false, 0);
        let b = write_stream(b"same input", false, 0);
        assert_ne!(a[6..13], b[6..13]);
    }

    #[test]
    fn file_sink_roundtrip() {
        let kp = StaticKeyProvider::new(KEY).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();

        let sink = std::fs::File::create(file.path()).unwrap();
        let mut w = Writer::new(sink, &kp, StreamOptions::new()).unwrap();
        w.write_all(b"persisted to disk").unwrap();
        w.close().unwrap();

        let sealed = std::fs::read(file.path()).unwrap();
        assert_eq!(read_stream(&sealed), b"persisted to disk");
    }
}
