//! DEFLATE decompression (inflate).
//!
//! Supports all three block types of RFC 1951:
//! - Type 0: Stored (uncompressed)
//! - Type 1: Fixed Huffman codes
//! - Type 2: Dynamic Huffman codes

use crate::huffman::{END_OF_BLOCK, HuffmanTree};
use crate::tables::{
    CODE_LENGTH_ORDER, DISTANCE_BASE, DISTANCE_EXTRA_BITS, LENGTH_BASE, LENGTH_EXTRA_BITS,
    fixed_distance_tree, fixed_litlen_tree,
};
use myz_core::BitReader;
use myz_core::error::{MyzError, Result};
use std::io::{Cursor, Read};

/// DEFLATE decompressor producing the whole output in memory.
#[derive(Debug, Default)]
pub struct Inflater {
    /// Decompressed bytes so far; doubles as the back-reference window.
    output: Vec<u8>,
    /// Whether the block flagged BFINAL has been decoded.
    final_block: bool,
}

impl Inflater {
    /// Create a new DEFLATE decompressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode blocks until the final one.
    ///
    /// The reader is left just after the final block, not byte-aligned, so
    /// a container trailer can be read from it afterwards.
    pub fn inflate<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        while !self.final_block {
            self.inflate_block(reader)?;
        }
        Ok(())
    }

    /// Whether the final block has been decoded.
    pub fn is_finished(&self) -> bool {
        self.final_block
    }

    /// Decompressed output so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Take ownership of the decompressed output.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }

    fn inflate_block<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        self.final_block = reader.read_bit()?;
        let btype = reader.read_bits(2)?;

        match btype {
            0 => self.inflate_stored(reader),
            1 => self.inflate_huffman(reader, fixed_litlen_tree()?, fixed_distance_tree()?),
            2 => self.inflate_dynamic(reader),
            _ => Err(MyzError::invalid_header("Reserved block type 3")),
        }
    }

    fn inflate_stored<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        reader.align_to_byte();

        let len = reader.read_bits(16)? as u16;
        let nlen = reader.read_bits(16)? as u16;
        if len != !nlen {
            return Err(MyzError::corrupted(
                reader.bit_position() / 8,
                format!("Stored block LEN/NLEN mismatch: {len:#06x} vs {nlen:#06x}"),
            ));
        }

        let start = self.output.len();
        self.output.resize(start + len as usize, 0);
        reader.read_bytes(&mut self.output[start..])
    }

    fn inflate_dynamic<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<()> {
        let hlit = reader.read_bits(5)? as usize + 257;
        let hdist = reader.read_bits(5)? as usize + 1;
        let hclen = reader.read_bits(4)? as usize + 4;

        if hlit > 286 || hdist > 30 {
            return Err(MyzError::corrupted(
                reader.bit_position() / 8,
                format!("Too many codes: HLIT={hlit}, HDIST={hdist}"),
            ));
        }

        let mut code_length_lengths = [0u8; 19];
        for &slot in CODE_LENGTH_ORDER.iter().take(hclen) {
            code_length_lengths[slot] = reader.read_bits(3)? as u8;
        }
        let code_length_tree = HuffmanTree::from_code_lengths(&code_length_lengths)?;

        let mut lengths = vec![0u8; hlit + hdist];
        let mut i = 0;
        while i < lengths.len() {
            let symbol = code_length_tree.decode(reader)?;
            let (value, repeat) = match symbol {
                0..=15 => (symbol as u8, 1),
                16 => {
                    if i == 0 {
                        return Err(MyzError::corrupted(
                            reader.bit_position() / 8,
                            "Repeat code with no previous length",
                        ));
                    }
                    (lengths[i - 1], reader.read_bits(2)? as usize + 3)
                }
                17 => (0, reader.read_bits(3)? as usize + 3),
                18 => (0, reader.read_bits(7)? as usize + 11),
                _ => return Err(MyzError::invalid_huffman(reader.bit_position())),
            };

            if i + repeat > lengths.len() {
                return Err(MyzError::corrupted(
                    reader.bit_position() / 8,
                    "Code length repeat overflows the table",
                ));
            }
            lengths[i..i + repeat].fill(value);
            i += repeat;
        }

        let (litlen_lengths, dist_lengths) = lengths.split_at(hlit);
        if litlen_lengths[END_OF_BLOCK as usize] == 0 {
            return Err(MyzError::corrupted(
                reader.bit_position() / 8,
                "Missing end-of-block code",
            ));
        }

        let litlen_tree = HuffmanTree::from_code_lengths(litlen_lengths)?;
        let dist_tree = HuffmanTree::from_code_lengths(dist_lengths)?;
        self.inflate_huffman(reader, &litlen_tree, &dist_tree)
    }

    fn inflate_huffman<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        litlen_tree: &HuffmanTree,
        dist_tree: &HuffmanTree,
    ) -> Result<()> {
        loop {
            let symbol = litlen_tree.decode(reader)?;

            if symbol < 256 {
                self.output.push(symbol as u8);
                continue;
            }
            if symbol == END_OF_BLOCK {
                return Ok(());
            }

            let length_idx = (symbol - 257) as usize;
            if length_idx >= LENGTH_BASE.len() {
                return Err(MyzError::corrupted(
                    reader.bit_position() / 8,
                    format!("Invalid literal/length code: {symbol}"),
                ));
            }
            let length = LENGTH_BASE[length_idx] as usize
                + reader.read_bits(LENGTH_EXTRA_BITS[length_idx])? as usize;

            let dist_code = dist_tree.decode(reader)? as usize;
            if dist_code >= DISTANCE_BASE.len() {
                return Err(MyzError::corrupted(
                    reader.bit_position() / 8,
                    format!("Invalid distance code: {dist_code}"),
                ));
            }
            let distance = DISTANCE_BASE[dist_code] as usize
                + reader.read_bits(DISTANCE_EXTRA_BITS[dist_code])? as usize;

            self.copy_match(distance, length)?;
        }
    }

    fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance == 0 || distance > self.output.len() {
            return Err(MyzError::invalid_distance(distance, self.output.len()));
        }

        let start = self.output.len() - distance;
        if distance >= length {
            self.output.extend_from_within(start..start + length);
        } else {
            // Overlapping copy repeats the last `distance` bytes.
            self.output.reserve(length);
            for i in 0..length {
                let byte = self.output[start + i];
                self.output.push(byte);
            }
        }
        Ok(())
    }
}

/// Decompress a raw DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = BitReader::new(Cursor::new(data));
    let mut inflater = Inflater::new();
    inflater.inflate(&mut reader)?;
    Ok(inflater.into_output())
}
