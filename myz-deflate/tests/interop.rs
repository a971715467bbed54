//! Interoperability with the reference zlib implementation via flate2.

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use myz_deflate::{zlib_compress, zlib_decompress};
use std::io::{Read, Write};

fn sample_text() -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..2000 {
        writeln!(data, "line {i}: the payload of a myz container is plain zlib").unwrap();
    }
    data
}

fn flate2_compress(data: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn flate2_decompress(data: &[u8]) -> Vec<u8> {
    let mut decoder = ZlibDecoder::new(data);
    let mut output = Vec::new();
    decoder.read_to_end(&mut output).unwrap();
    output
}

#[test]
fn test_decode_flate2_dynamic_blocks() {
    let data = sample_text();
    let compressed = flate2_compress(&data, Compression::default());
    assert_eq!(&compressed[..2], &[0x78, 0x9C]);
    assert_eq!(zlib_decompress(&compressed).unwrap(), data);
}

#[test]
fn test_decode_flate2_every_level() {
    let data = sample_text();
    for level in 0..=9 {
        let compressed = flate2_compress(&data, Compression::new(level));
        assert_eq!(zlib_decompress(&compressed).unwrap(), data, "level {level}");
    }
}

#[test]
fn test_decode_flate2_binary() {
    let data: Vec<u8> = (0..100_000u32).map(|i| (i.wrapping_mul(i) >> 7) as u8).collect();
    let compressed = flate2_compress(&data, Compression::best());
    assert_eq!(zlib_decompress(&compressed).unwrap(), data);
}

#[test]
fn test_flate2_decodes_our_output() {
    let data = sample_text();
    let compressed = zlib_compress(&data).unwrap();
    assert_eq!(flate2_decompress(&compressed), data);
}

#[test]
fn test_flate2_decodes_our_stored_blocks() {
    let mut state = 0x9E37_79B9u32;
    let data: Vec<u8> = (0..150_000)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect();
    let compressed = zlib_compress(&data).unwrap();
    assert_eq!(flate2_decompress(&compressed), data);
}

#[test]
fn test_flate2_decodes_empty() {
    let compressed = zlib_compress(b"").unwrap();
    assert!(flate2_decompress(&compressed).is_empty());
}
