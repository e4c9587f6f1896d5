use lzs::decompressor::Decompressor;
use lzs::status::Status;
use lzs::{compress, decompress};

#[test]
fn scenario_1_empty_input() {
    assert_eq!(compress(b""), vec![0xC0, 0x00]);
}

#[test]
fn scenario_2_single_literal() {
    let out = compress(b"A");
    assert_eq!(out[0], 0b0_0100000);
    assert_eq!(decompress(&out).unwrap(), b"A");
}

#[test]
fn scenario_3_repeated_byte() {
    let out = compress(b"XXXXX");
    assert_eq!(decompress(&out).unwrap(), b"XXXXX");
}

#[test]
fn scenario_4_alternating_pair() {
    let out = compress(b"ABAB");
    assert_eq!(decompress(&out).unwrap(), b"ABAB");
}

#[test]
fn scenario_5_run_needing_extended_length() {
    let src = vec![b'a'; 23];
    let out = compress(&src);
    assert_eq!(decompress(&out).unwrap(), src);
}

#[test]
fn scenario_6_descriptive_string() {
    let src = b"Return a string containing a printable representation of an object.";
    assert_eq!(decompress(&compress(src)).unwrap(), src);
}

#[test]
fn uncompressible_size_law() {
    // Every 2-byte prefix unique: strictly ascending bytes.
    let src: Vec<u8> = (0..64u8).collect();
    let out = compress(&src);
    let expected = (9 * src.len() + 9 + 7) / 8;
    assert_eq!(out.len(), expected);
}

#[test]
fn end_marker_idempotence() {
    let src = b"the quick brown fox";
    let compressed = compress(src);
    assert_eq!(decompress(&compressed).unwrap(), src);

    // Stripping the trailing end marker and its padding (here, exactly the
    // last byte) still yields the same payload at the incremental level;
    // the single-shot wrapper, however, now requires an end marker to
    // distinguish legitimate completion from truncation, so it's the
    // incremental API directly that demonstrates the idempotence law.
    let truncated = &compressed[..compressed.len() - 1];
    let mut d = Decompressor::new();
    let mut out = Vec::new();
    let mut buf = [0u8; 256];
    let (_, written, status) = d.decompress_incremental(truncated, &mut buf);
    out.extend_from_slice(&buf[..written]);
    assert!(!status.contains(Status::END_MARKER));
    assert_eq!(out, src.to_vec());
}

#[test]
fn truncated_stream_is_reported_as_unexpected_eof() {
    let compressed = compress(b"the quick brown fox");
    let truncated = &compressed[..compressed.len() - 1];
    let err = decompress(truncated).unwrap_err();
    assert!(matches!(err, lzs::error::Error::UnexpectedEof));
}

#[test]
fn concatenated_frames_both_decode() {
    let mut both = compress(b"A");
    both.extend_from_slice(&compress(b"B"));
    assert_eq!(decompress(&both).unwrap(), b"AB");
}
