//! Canonical Huffman codes for DEFLATE.
//!
//! DEFLATE transmits a Huffman code as a list of code lengths only; codes of
//! the same length take consecutive values in symbol order (RFC 1951,
//! section 3.2.2). Codes are packed starting from their most significant
//! bit, so the encoder stores them bit-reversed for the LSB-first writer.

use myz_core::BitReader;
use myz_core::error::{MyzError, Result};
use std::io::Read;

/// Maximum code length in DEFLATE (15 bits).
pub const MAX_CODE_LENGTH: usize = 15;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// A Huffman decoding table.
///
/// Decoding walks the code one bit at a time, comparing against the first
/// canonical code of each length. Symbols are stored sorted by code length
/// and then by symbol value, which is exactly canonical order.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    /// Number of codes of each length (index 0 unused).
    counts: [u16; MAX_CODE_LENGTH + 1],
    /// Symbols in canonical code order.
    symbols: Vec<u16>,
}

impl HuffmanTree {
    /// Build a decoding table from per-symbol code lengths.
    ///
    /// A length of 0 marks an unused symbol. Over-subscribed length sets are
    /// rejected; incomplete ones are accepted, and the unused codes fail at
    /// decode time.
    pub fn from_code_lengths(code_lengths: &[u8]) -> Result<Self> {
        if code_lengths.is_empty() {
            return Err(MyzError::invalid_header("Empty code lengths"));
        }

        let mut counts = [0u16; MAX_CODE_LENGTH + 1];
        for &len in code_lengths {
            if len as usize > MAX_CODE_LENGTH {
                return Err(MyzError::invalid_header(format!(
                    "Code length {len} exceeds maximum {MAX_CODE_LENGTH}"
                )));
            }
            counts[len as usize] += 1;
        }
        counts[0] = 0;

        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left = (left << 1) - count as i32;
            if left < 0 {
                return Err(MyzError::invalid_header("Over-subscribed Huffman code"));
            }
        }

        let mut offsets = [0u16; MAX_CODE_LENGTH + 2];
        for len in 1..=MAX_CODE_LENGTH {
            offsets[len + 1] = offsets[len] + counts[len];
        }

        let mut symbols = vec![0u16; offsets[MAX_CODE_LENGTH + 1] as usize];
        for (symbol, &len) in code_lengths.iter().enumerate() {
            if len != 0 {
                let slot = &mut offsets[len as usize];
                symbols[*slot as usize] = symbol as u16;
                *slot += 1;
            }
        }

        Ok(Self { counts, symbols })
    }

    /// Whether the code has no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Decode one symbol from the bit stream.
    pub fn decode<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        if self.is_empty() {
            return Err(MyzError::invalid_huffman(reader.bit_position()));
        }

        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;

        for &count in &self.counts[1..] {
            code |= reader.read_bits(1)? as i32;
            let count = count as i32;
            if code - first < count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }

        Err(MyzError::invalid_huffman(reader.bit_position()))
    }
}

/// A code ready for the LSB-first bit writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCode {
    /// Code bits, already reversed.
    pub bits: u16,
    /// Code length in bits; 0 for unused symbols.
    pub length: u8,
}

/// Assign canonical codes to a set of code lengths.
pub fn canonical_codes(code_lengths: &[u8]) -> Vec<HuffmanCode> {
    let mut bl_count = [0u32; MAX_CODE_LENGTH + 1];
    for &len in code_lengths {
        if len > 0 {
            bl_count[len as usize] += 1;
        }
    }

    let mut next_code = [0u32; MAX_CODE_LENGTH + 1];
    let mut code = 0u32;
    for bits in 1..=MAX_CODE_LENGTH {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    code_lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                return HuffmanCode::default();
            }
            let code = next_code[len as usize];
            next_code[len as usize] += 1;
            HuffmanCode {
                bits: reverse_bits(code, len),
                length: len,
            }
        })
        .collect()
}

#[inline]
fn reverse_bits(code: u32, length: u8) -> u16 {
    (code.reverse_bits() >> (32 - length as u32)) as u16
}
