#[cfg(test)]
mod tests {
    use crfs::constants::{flags, FIXED_HEADER_LEN, FORMAT_VERSION, MAGIC};
    use crfs::headers::{decode_header, encode_header, FileHeader, HeaderError};
    use proptest::prelude::*;

    fn sample_header() -> FileHeader {
        FileHeader::new(flags::GZIP, [0xA5; 7], b"wrapped-key-material".to_vec())
    }

    #[test]
    fn encode_layout_is_canonical() {
        let h = sample_header();
        let bytes = encode_header(&h);

        assert_eq!(bytes.len(), FIXED_HEADER_LEN + 20);
        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(bytes[5], flags::GZIP);
        assert_eq!(&bytes[6..13], &[0xA5; 7]);
        assert_eq!(&bytes[13..15], &20u16.to_be_bytes());
        assert_eq!(&bytes[15..], b"wrapped-key-material");
    }

    #[test]
    fn encode_decode_roundtrip() {
        let h = sample_header();
        let bytes = encode_header(&h);

        let (parsed, canonical) = decode_header(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(canonical, bytes);
    }

    #[test]
    fn empty_wrapped_key_roundtrip() {
        let h = FileHeader::new(0, [0x11; 7], Vec::new());
        let bytes = encode_header(&h);
        assert_eq!(bytes.len(), FIXED_HEADER_LEN);

        let (parsed, canonical) = decode_header(&mut bytes.as_slice()).unwrap();
        assert!(parsed.wrapped_key.is_empty());
        assert_eq!(canonical, bytes);
    }

    #[test]
    fn truncated_fixed_header_is_rejected() {
        let bytes = encode_header(&sample_header());
        let err = decode_header(&mut &bytes[..FIXED_HEADER_LEN - 1]).unwrap_err();
        assert!(matches!(err, HeaderError::TruncatedHeader));
        assert_eq!(err.to_string(), "truncated header");
    }

    #[test]
    fn invalid_magic_is_rejected() {
        let mut bytes = encode_header(&sample_header());
        bytes[0..4].copy_from_slice(b"NOPE");

        match decode_header(&mut bytes.as_slice()) {
            Err(HeaderError::InvalidMagic { have }) => assert_eq!(&have, b"NOPE"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut bytes = encode_header(&sample_header());
        bytes[4] = FORMAT_VERSION + 1;

        let err = decode_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, HeaderError::UnsupportedVersion { have } if have == 2));
        assert!(err.to_string().contains("unsupported format version"));
    }

    #[test]
    fn truncated_wrapped_key_is_rejected() {
        let bytes = encode_header(&sample_header());
        // Cut into the wrapped key tail.
        let err = decode_header(&mut &bytes[..FIXED_HEADER_LEN + 5]).unwrap_err();
        assert!(matches!(err, HeaderError::TruncatedWrappedKey { need: 20 }));
    }

    #[test]
    fn parse_preserves_reserved_flag_bits() {
        // A header with reserved bits fails writer-side validation but still
        // parses: the bits are authenticated through the chunk-0 AAD instead.
        let h = FileHeader::new(0x80, [0x22; 7], Vec::new());
        assert!(matches!(
            h.validate().unwrap_err(),
            HeaderError::ReservedFlags { have: 0x80 }
        ));

        let bytes = encode_header(&h);
        let (parsed, _) = decode_header(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed.flags, 0x80);
        assert!(!parsed.compressed());
    }

    #[test]
    fn validate_accepts_known_flags() {
        FileHeader::new(0, [1; 7], Vec::new()).validate().unwrap();
        FileHeader::new(flags::GZIP, [1; 7], Vec::new())
            .validate()
            .unwrap();
    }

    #[test]
    fn validate_rejects_oversized_wrapped_key() {
        let h = FileHeader::new(0, [1; 7], vec![0u8; 70_000]);
        assert!(matches!(
            h.validate().unwrap_err(),
            HeaderError::WrappedKeyTooLarge { have: 70_000 }
        ));
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            prefix in any::<[u8; 7]>(),
            gzip in any::<bool>(),
            wrapped in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let flag_byte = if gzip { flags::GZIP } else { 0 };
            let h = FileHeader::new(flag_byte, prefix, wrapped);
            let bytes = encode_header(&h);

            let (parsed, canonical) = decode_header(&mut bytes.as_slice()).unwrap();
            prop_assert_eq!(parsed, h);
            prop_assert_eq!(canonical, bytes);
        }
    }
}
