use lzs::compressor::Compressor;
use lzs::decompressor::Decompressor;
use lzs::status::Status;
use lzs::{compress, decompress};
use proptest::prelude::*;

fn feed_incrementally(src: &[u8], chunk_sizes: &[usize]) -> Vec<u8> {
    let compressed = compress(src);
    let mut d = Decompressor::new();
    let mut out = Vec::new();
    let mut buf = [0u8; 256];
    let mut pos = 0;
    let mut i = 0;
    loop {
        if pos >= compressed.len() {
            break;
        }
        let step = if chunk_sizes.is_empty() { 1 } else { chunk_sizes[i % chunk_sizes.len()].max(1) };
        let end = (pos + step).min(compressed.len());
        let (_, written, _) = d.decompress_incremental(&compressed[pos..end], &mut buf);
        out.extend_from_slice(&buf[..written]);
        pos = end;
        i += 1;
    }
    out
}

proptest! {
    #[test]
    fn round_trips_through_single_shot(src in proptest::collection::vec(any::<u8>(), 0..12048)) {
        let compressed = compress(&src);
        let decompressed = decompress(&compressed).unwrap();
        prop_assert_eq!(decompressed, src);
    }

    #[test]
    fn round_trips_regardless_of_decoder_chunking(
        src in proptest::collection::vec(any::<u8>(), 0..12048),
        chunk_sizes in proptest::collection::vec(1usize..7, 1..20),
    ) {
        let out = feed_incrementally(&src, &chunk_sizes);
        prop_assert_eq!(out, src);
    }

    #[test]
    fn compressor_produces_identical_output_for_any_input_chunking(
        src in proptest::collection::vec(any::<u8>(), 0..12048),
        chunk_sizes in proptest::collection::vec(1usize..9, 1..20),
    ) {
        let whole = compress(&src);

        let mut c = Compressor::new();
        let mut out = Vec::new();
        let mut buf = [0u8; 256];
        let mut pos = 0;
        let mut i = 0;
        loop {
            let step = chunk_sizes[i % chunk_sizes.len()];
            let end = (pos + step).min(src.len());
            let finish = end >= src.len();
            loop {
                let (consumed, written, status) = c.compress_incremental(&src[pos..end], finish, &mut buf);
                out.extend_from_slice(&buf[..written]);
                pos += consumed;
                if status.contains(Status::END_MARKER) {
                    break;
                }
                if consumed == 0 && written == 0 {
                    break;
                }
            }
            i += 1;
            if finish {
                break;
            }
        }
        prop_assert_eq!(out, whole);
    }
}

#[test]
fn worst_case_expansion_matches_the_documented_bound() {
    let src = vec![0u8; 64];
    let mut unique = Vec::with_capacity(src.len());
    for i in 0..src.len() {
        unique.push((i % 256) as u8);
    }
    let compressed = compress(&unique);
    let bound = unique.len() + (unique.len() + 7) / 8 + 3;
    assert!(compressed.len() <= bound, "{} > {}", compressed.len(), bound);
}

#[test]
fn round_trips_past_one_ring_capacity() {
    // Exercises matches whose offsets and lengths span a point where the
    // committed history alone (ignoring look-ahead) would already fill the
    // ring, the case that "historyLen + lookAheadLen <= capacity" guards.
    let mut src = Vec::new();
    for i in 0..3000u32 {
        src.push((i % 251) as u8);
    }
    src.extend_from_slice(b"the quick brown fox");
    src.extend(std::iter::repeat(b'z').take(50));
    assert_eq!(decompress(&compress(&src)).unwrap(), src);
}

#[test]
fn decoder_reports_input_starved_mid_token() {
    let compressed = compress(b"aaaaaaaaaaaaaaaaaaaaaaaaa");
    let mut d = Decompressor::new();
    let mut buf = [0u8; 64];
    let (consumed, _, status) = d.decompress_incremental(&compressed[..1], &mut buf);
    assert_eq!(consumed, 1);
    assert!(status.contains(Status::INPUT_STARVED));
}
