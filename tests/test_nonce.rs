#[cfg(test)]
mod tests {
    use crfs::constants::MAX_CHUNK_COUNT;
    use crfs::crypto::build_nonce;
    use proptest::prelude::*;

    #[test]
    fn layout_is_prefix_then_big_endian_counter() {
        let prefix = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let nonce = build_nonce(&prefix, 0x01_02_03_04_05);

        assert_eq!(&nonce[..7], &prefix);
        assert_eq!(&nonce[7..], &[0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn counter_zero_has_zero_tail() {
        let nonce = build_nonce(&[0xFF; 7], 0);
        assert_eq!(&nonce[7..], &[0; 5]);
    }

    #[test]
    fn consecutive_counters_differ() {
        let prefix = [0x42; 7];
        let mut seen = std::collections::HashSet::new();
        for counter in 0..1024u64 {
            assert!(seen.insert(build_nonce(&prefix, counter)));
        }
    }

    #[test]
    fn high_counter_bits_are_discarded() {
        // Bits above the low 40 do not reach the wire; the chunk writer
        // refuses to count that far.
        let prefix = [0x10; 7];
        assert_eq!(
            build_nonce(&prefix, 7),
            build_nonce(&prefix, MAX_CHUNK_COUNT + 7)
        );
    }

    #[test]
    fn boundary_counters() {
        let prefix = [0x00; 7];
        let last = build_nonce(&prefix, MAX_CHUNK_COUNT - 1);
        assert_eq!(&last[7..], &[0xFF; 5]);
    }

    proptest! {
        #[test]
        fn deterministic(prefix in any::<[u8; 7]>(), counter in 0..MAX_CHUNK_COUNT) {
            prop_assert_eq!(build_nonce(&prefix, counter), build_nonce(&prefix, counter));
        }

        #[test]
        fn injective_over_counters(
            prefix in any::<[u8; 7]>(),
            a in 0..MAX_CHUNK_COUNT,
            b in 0..MAX_CHUNK_COUNT,
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(build_nonce(&prefix, a), build_nonce(&prefix, b));
        }

        #[test]
        fn prefix_is_embedded_verbatim(prefix in any::<[u8; 7]>(), counter in 0..MAX_CHUNK_COUNT) {
            let nonce = build_nonce(&prefix, counter);
            prop_assert_eq!(&nonce[..7], &prefix[..]);
        }
    }
}
