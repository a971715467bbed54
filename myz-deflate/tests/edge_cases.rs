//! Edge case tests for the zlib codec.

use myz_deflate::{deflate, inflate, zlib_compress, zlib_decompress};

fn roundtrip(input: &[u8]) -> Vec<u8> {
    let compressed = zlib_compress(input).unwrap();
    let decompressed = zlib_decompress(&compressed).unwrap();
    assert_eq!(decompressed, input);
    compressed
}

#[test]
fn test_empty_input() {
    let compressed = roundtrip(b"");
    assert_eq!(compressed.len(), 8);
}

#[test]
fn test_single_byte() {
    roundtrip(b"A");
}

#[test]
fn test_all_zeros() {
    let input = vec![0u8; 1000];
    let compressed = roundtrip(&input);
    assert!(compressed.len() < input.len() / 10);
}

#[test]
fn test_all_same_byte() {
    let input = vec![255u8; 5000];
    let compressed = roundtrip(&input);
    assert!(compressed.len() < input.len() / 20);
}

#[test]
fn test_max_match_length() {
    let mut input = Vec::new();
    for i in 0..10u8 {
        input.push(i);
        input.extend_from_slice(&[42u8; 258]);
    }
    roundtrip(&input);
}

#[test]
fn test_every_byte_value() {
    let input: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    roundtrip(&input);
}

#[test]
fn test_alternating_pattern() {
    let input: Vec<u8> = (0..1000).map(|i| if i % 2 == 0 { b'A' } else { b'B' }).collect();
    roundtrip(&input);
}

#[test]
fn test_pseudo_random_does_not_expand_much() {
    let mut seed = 12345u32;
    let input: Vec<u8> = (0..200_000)
        .map(|_| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (seed >> 16) as u8
        })
        .collect();

    let compressed = roundtrip(&input);
    // zlib framing plus the stored block framing
    assert!(compressed.len() <= input.len() + 6 + 6 * 4);
}

#[test]
fn test_large_text() {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let input: Vec<u8> = pattern.iter().copied().cycle().take(1024 * 1024).collect();
    let compressed = roundtrip(&input);
    assert!(compressed.len() < input.len() / 50);
}

#[test]
fn test_matches_across_window_boundary() {
    let mut input: Vec<u8> = (0..40_000u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
        .collect();
    let head = input[..1000].to_vec();
    input.extend_from_slice(&head);
    let tail = input[input.len() - 33_000..input.len() - 32_000].to_vec();
    input.extend_from_slice(&tail);
    roundtrip(&input);
}

#[test]
fn test_raw_deflate_roundtrip() {
    let input = b"raw deflate without framing, raw deflate without framing";
    let compressed = deflate(input).unwrap();
    assert_eq!(inflate(&compressed).unwrap(), input);
}

#[test]
fn test_truncated_streams_fail() {
    let input = b"Truncate me at every position. Truncate me at every position.";
    let compressed = zlib_compress(input).unwrap();

    for len in 0..compressed.len() {
        assert!(
            zlib_decompress(&compressed[..len]).is_err(),
            "prefix of {len} bytes decoded"
        );
    }
}

#[test]
fn test_corrupted_stream_never_panics() {
    let input = "corruption test data ".repeat(64).into_bytes();
    let compressed = zlib_compress(&input).unwrap();

    for i in 2..compressed.len() {
        for mask in [0x01u8, 0x80, 0xFF] {
            let mut corrupted = compressed.clone();
            corrupted[i] ^= mask;
            // Flips in the final padding bits may decode fine; anything
            // else must come back as an error rather than a panic.
            if let Ok(output) = zlib_decompress(&corrupted) {
                assert_eq!(output, input);
            }
        }
    }
}

#[test]
fn test_corrupted_trailer_fails() {
    let compressed = zlib_compress(b"checksum protected").unwrap();
    for i in compressed.len() - 4..compressed.len() {
        let mut corrupted = compressed.clone();
        corrupted[i] ^= 0x10;
        assert!(zlib_decompress(&corrupted).is_err());
    }
}
