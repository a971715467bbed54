//! DEFLATE compression.
//!
//! The whole input is tokenized by the LZ77 match finder and emitted as a
//! single fixed-Huffman block. When the fixed code would not beat storing
//! the bytes verbatim (already-compressed or random input), stored blocks
//! are written instead, so output never grows by more than the block
//! framing.

use crate::huffman::END_OF_BLOCK;
use crate::lz77::{Lz77Encoder, Lz77Token};
use crate::tables::{distance_to_code, fixed_distance_codes, fixed_litlen_codes, length_to_code};
use myz_core::BitWriter;
use myz_core::error::Result;
use std::io::Write;

/// Largest payload of one stored block.
const MAX_STORED_BLOCK: usize = 65535;

/// Worst-case bits of framing per stored block: header, padding, LEN/NLEN.
const STORED_BLOCK_OVERHEAD: u64 = 3 + 7 + 32;

/// DEFLATE compressor.
#[derive(Debug, Clone, Default)]
pub struct Deflater {
    lz77: Lz77Encoder,
}

impl Deflater {
    /// Create a new compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compress `data` as a complete raw DEFLATE stream into `writer`.
    pub fn deflate<W: Write>(&self, data: &[u8], writer: W) -> Result<()> {
        let mut bits = BitWriter::new(writer);
        let tokens = self.lz77.compress(data);

        if data.is_empty() || fixed_block_bits(&tokens) <= stored_bits(data.len()) {
            write_fixed_block(&mut bits, &tokens)?;
        } else {
            write_stored_blocks(&mut bits, data)?;
        }

        bits.flush()
    }

    /// Compress `data` into a new buffer.
    pub fn compress_to_vec(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(data.len() / 2 + 16);
        self.deflate(data, &mut output)?;
        Ok(output)
    }
}

/// Compress `data` as a raw DEFLATE stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    Deflater::new().compress_to_vec(data)
}

fn fixed_block_bits(tokens: &[Lz77Token]) -> u64 {
    let litlen = fixed_litlen_codes();
    let body: u64 = tokens
        .iter()
        .map(|token| match *token {
            Lz77Token::Literal(byte) => litlen[byte as usize].length as u64,
            Lz77Token::Match { length, distance } => {
                let (code, length_extra, _) = length_to_code(length);
                let (_, distance_extra, _) = distance_to_code(distance);
                litlen[code as usize].length as u64
                    + length_extra as u64
                    + 5
                    + distance_extra as u64
            }
        })
        .sum();

    3 + body + litlen[END_OF_BLOCK as usize].length as u64
}

fn stored_bits(len: usize) -> u64 {
    let blocks = len.div_ceil(MAX_STORED_BLOCK).max(1) as u64;
    blocks * STORED_BLOCK_OVERHEAD + len as u64 * 8
}

fn write_fixed_block<W: Write>(bits: &mut BitWriter<W>, tokens: &[Lz77Token]) -> Result<()> {
    let litlen = fixed_litlen_codes();
    let dist = fixed_distance_codes();

    bits.write_bit(true)?;
    bits.write_bits(1, 2)?;

    for token in tokens {
        match *token {
            Lz77Token::Literal(byte) => {
                let code = litlen[byte as usize];
                bits.write_bits(code.bits as u32, code.length)?;
            }
            Lz77Token::Match { length, distance } => {
                let (symbol, extra_bits, extra) = length_to_code(length);
                let code = litlen[symbol as usize];
                bits.write_bits(code.bits as u32, code.length)?;
                bits.write_bits(extra as u32, extra_bits)?;

                let (symbol, extra_bits, extra) = distance_to_code(distance);
                let code = dist[symbol as usize];
                bits.write_bits(code.bits as u32, code.length)?;
                bits.write_bits(extra as u32, extra_bits)?;
            }
        }
    }

    let eob = litlen[END_OF_BLOCK as usize];
    bits.write_bits(eob.bits as u32, eob.length)
}

fn write_stored_blocks<W: Write>(bits: &mut BitWriter<W>, data: &[u8]) -> Result<()> {
    let block_count = data.len().div_ceil(MAX_STORED_BLOCK);

    for (i, chunk) in data.chunks(MAX_STORED_BLOCK).enumerate() {
        bits.write_bit(i + 1 == block_count)?;
        bits.write_bits(0, 2)?;
        bits.align_to_byte()?;

        let len = chunk.len() as u16;
        bits.write_bits(len as u32, 16)?;
        bits.write_bits(!len as u32, 16)?;
        bits.write_bytes(chunk)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflate::inflate;

    #[test]
    fn test_empty_input_is_fixed_block() {
        assert_eq!(deflate(b"").unwrap(), vec![0x03, 0x00]);
    }

    #[test]
    fn test_single_literal() {
        // Same bytes zlib produces for "a".
        assert_eq!(deflate(b"a").unwrap(), vec![0x4B, 0x04, 0x00]);
    }

    #[test]
    fn test_roundtrip_text() {
        let data = b"Hello, World! Hello, World! Hello, World!";
        let compressed = deflate(data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_incompressible_falls_back_to_stored() {
        // xorshift noise has no repeats worth coding
        let mut state = 0x2545_F491u32;
        let data: Vec<u8> = (0..70_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();

        let compressed = deflate(&data).unwrap();
        // Two stored blocks: 5 bytes of framing each.
        assert_eq!(compressed.len(), data.len() + 10);
        assert_eq!(compressed[0] & 0x07, 0x00);
        assert_eq!(inflate(&compressed).unwrap(), data);
    }

    #[test]
    fn test_fixed_estimate_matches_output() {
        let data = "abracadabra ".repeat(100).into_bytes();
        let tokens = Lz77Encoder::new().compress(&data);
        let estimate = fixed_block_bits(&tokens);

        let compressed = deflate(&data).unwrap();
        assert_eq!(compressed.len() as u64, estimate.div_ceil(8));
        assert_eq!(crate::lz77::expand(&tokens), data);
    }

    #[test]
    fn test_stored_bits() {
        assert_eq!(stored_bits(0), 42);
        assert_eq!(stored_bits(65535), 42 + 65535 * 8);
        assert_eq!(stored_bits(65536), 84 + 65536 * 8);
    }
}
