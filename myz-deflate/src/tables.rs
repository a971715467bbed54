//! Code tables for DEFLATE (RFC 1951, sections 3.2.5 and 3.2.6).

use crate::huffman::{HuffmanCode, HuffmanTree, canonical_codes};
use myz_core::error::Result;
use std::sync::OnceLock;

/// Base match length for length codes 257-285.
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits following length codes 257-285.
pub const LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base distance for distance codes 0-29.
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits following distance codes 0-29.
pub const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Transmission order of code length code lengths in a dynamic block header.
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Fixed literal/length code lengths.
///
/// 0-143 use 8 bits, 144-255 use 9, 256-279 use 7, 280-287 use 8.
pub fn fixed_litlen_lengths() -> [u8; 288] {
    let mut lengths = [8u8; 288];
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths
}

/// Fixed distance code lengths: all 30 codes use 5 bits.
pub fn fixed_distance_lengths() -> [u8; 30] {
    [5u8; 30]
}

/// Decoding tree for the fixed literal/length code, built once.
pub fn fixed_litlen_tree() -> Result<&'static HuffmanTree> {
    static TREE: OnceLock<HuffmanTree> = OnceLock::new();
    if let Some(tree) = TREE.get() {
        return Ok(tree);
    }
    let tree = HuffmanTree::from_code_lengths(&fixed_litlen_lengths())?;
    Ok(TREE.get_or_init(|| tree))
}

/// Decoding tree for the fixed distance code, built once.
pub fn fixed_distance_tree() -> Result<&'static HuffmanTree> {
    static TREE: OnceLock<HuffmanTree> = OnceLock::new();
    if let Some(tree) = TREE.get() {
        return Ok(tree);
    }
    let tree = HuffmanTree::from_code_lengths(&fixed_distance_lengths())?;
    Ok(TREE.get_or_init(|| tree))
}

/// Encoding table for the fixed literal/length code.
pub fn fixed_litlen_codes() -> &'static [HuffmanCode] {
    static CODES: OnceLock<Vec<HuffmanCode>> = OnceLock::new();
    CODES.get_or_init(|| canonical_codes(&fixed_litlen_lengths()))
}

/// Encoding table for the fixed distance code.
pub fn fixed_distance_codes() -> &'static [HuffmanCode] {
    static CODES: OnceLock<Vec<HuffmanCode>> = OnceLock::new();
    CODES.get_or_init(|| canonical_codes(&fixed_distance_lengths()))
}

/// Map a match length (3-258) to `(code, extra_bits, extra_value)`.
pub fn length_to_code(length: u16) -> (u16, u8, u16) {
    debug_assert!((3..=258).contains(&length), "Length out of range: {length}");

    let idx = LENGTH_BASE.partition_point(|&base| base <= length) - 1;
    (
        257 + idx as u16,
        LENGTH_EXTRA_BITS[idx],
        length - LENGTH_BASE[idx],
    )
}

/// Map a distance (1-32768) to `(code, extra_bits, extra_value)`.
pub fn distance_to_code(distance: u16) -> (u16, u8, u16) {
    debug_assert!(
        (1..=32768).contains(&distance),
        "Distance out of range: {distance}"
    );

    let idx = DISTANCE_BASE.partition_point(|&base| base <= distance) - 1;
    (
        idx as u16,
        DISTANCE_EXTRA_BITS[idx],
        distance - DISTANCE_BASE[idx],
    )
}
