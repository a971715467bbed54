//! Throughput of the zlib codec on a few input shapes.

use myz_deflate::{zlib_compress, zlib_decompress};
use std::time::Instant;

fn main() {
    let test_cases = vec![
        ("small_text", generate_text(4 * 1024)),
        ("large_text", generate_text(1024 * 1024)),
        ("repeated", vec![b'x'; 1024 * 1024]),
        ("noise", generate_noise(1024 * 1024)),
    ];

    println!("zlib Codec Benchmarks");
    println!("=====================\n");

    for (name, data) in &test_cases {
        let start = Instant::now();
        let compressed = zlib_compress(data).unwrap();
        let compress_time = start.elapsed();

        let start = Instant::now();
        let decompressed = zlib_decompress(&compressed).unwrap();
        let decompress_time = start.elapsed();

        assert_eq!(&decompressed, data);

        let mb = data.len() as f64 / 1024.0 / 1024.0;
        println!(
            "{:<12} {:>8} -> {:>8} bytes ({:5.1}%)  compress {:7.2} MB/s  decompress {:7.2} MB/s",
            name,
            data.len(),
            compressed.len(),
            compressed.len() as f64 * 100.0 / data.len() as f64,
            mb / compress_time.as_secs_f64(),
            mb / decompress_time.as_secs_f64(),
        );
    }
}

fn generate_text(size: usize) -> Vec<u8> {
    let words = [
        "archive ", "header ", "payload ", "zlib ", "name ", "size ", "block ", "stream ",
    ];
    let mut data = Vec::with_capacity(size);
    let mut seed = 7u32;
    while data.len() < size {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        data.extend_from_slice(words[(seed >> 16) as usize % words.len()].as_bytes());
    }
    data.truncate(size);
    data
}

fn generate_noise(size: usize) -> Vec<u8> {
    let mut state = 0x2545_F491u32;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
