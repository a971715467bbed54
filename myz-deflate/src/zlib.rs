//! Zlib framing (RFC 1950) around a DEFLATE stream.
//!
//! # Format
//!
//! ```text
//! +---+---+============+---+---+---+---+
//! |CMF|FLG| compressed |    ADLER32    |
//! +---+---+============+---+---+---+---+
//! ```
//!
//! - CMF: compression method 8 (DEFLATE) in the low nibble, log2(window) - 8
//!   in the high nibble
//! - FLG: check bits making `(CMF * 256 + FLG) % 31 == 0`, FDICT in bit 5,
//!   level hint in bits 6-7
//! - ADLER32: checksum of the uncompressed data, big-endian
//!
//! The compressor always writes `78 9C` (32 KiB window, default level),
//! the header every mainstream zlib produces by default.

use crate::deflate::Deflater;
use crate::inflate::Inflater;
use myz_core::BitReader;
use myz_core::error::{MyzError, Result};
use std::io::{Cursor, Write};

/// Header written by [`zlib_compress`].
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x9C];

/// Largest prime smaller than 65536.
const ADLER_MOD: u32 = 65521;

/// Bytes that can be summed before `b` may overflow a `u32`.
const NMAX: usize = 5552;

/// Running Adler-32 checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                self.a += byte as u32;
                self.b += self.a;
            }
            self.a %= ADLER_MOD;
            self.b %= ADLER_MOD;
        }
    }

    /// Current checksum value.
    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }

    /// One-shot checksum of `data`.
    pub fn checksum(data: &[u8]) -> u32 {
        let mut adler = Self::new();
        adler.update(data);
        adler.finish()
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compress `input` into a complete zlib stream.
///
/// # Example
///
/// ```
/// use myz_deflate::{zlib_compress, zlib_decompress};
///
/// let compressed = zlib_compress(b"aaaaaaaaaaaaaaaa").unwrap();
/// assert_eq!(zlib_decompress(&compressed).unwrap(), b"aaaaaaaaaaaaaaaa");
/// ```
pub fn zlib_compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() / 2 + 16);
    zlib_compress_to(input, &mut output)?;
    Ok(output)
}

/// Compress `input` as a zlib stream written straight into `writer`.
///
/// Any failure, including one raised by `writer`, is reported as
/// [`MyzError::Compression`].
pub fn zlib_compress_to<W: Write>(input: &[u8], writer: &mut W) -> Result<()> {
    write_zlib(input, writer).map_err(|e| match e {
        MyzError::Compression { .. } => e,
        other => MyzError::compression(other.to_string()),
    })
}

fn write_zlib<W: Write>(input: &[u8], writer: &mut W) -> Result<()> {
    writer.write_all(&ZLIB_HEADER)?;
    Deflater::new().deflate(input, &mut *writer)?;
    writer.write_all(&Adler32::checksum(input).to_be_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Decompress a complete zlib stream.
///
/// Bytes following the Adler-32 trailer are ignored. Any failure is
/// reported as [`MyzError::Decompression`] carrying the underlying cause.
pub fn zlib_decompress(input: &[u8]) -> Result<Vec<u8>> {
    read_zlib(input).map_err(|e| match e {
        MyzError::Decompression { .. } => e,
        other => MyzError::decompression(other.to_string()),
    })
}

fn read_zlib(input: &[u8]) -> Result<Vec<u8>> {
    let [cmf, flg, ..] = *input else {
        return Err(MyzError::invalid_header("zlib stream too short"));
    };

    if cmf & 0x0F != 8 {
        return Err(MyzError::invalid_header(format!(
            "Unsupported compression method {}",
            cmf & 0x0F
        )));
    }
    if cmf >> 4 > 7 {
        return Err(MyzError::invalid_header("Invalid window size"));
    }
    if (u16::from(cmf) * 256 + u16::from(flg)) % 31 != 0 {
        return Err(MyzError::invalid_header("zlib header check failed"));
    }
    if flg & 0x20 != 0 {
        return Err(MyzError::invalid_header("Preset dictionary not supported"));
    }

    let mut reader = BitReader::new(Cursor::new(&input[2..]));
    let mut inflater = Inflater::new();
    inflater.inflate(&mut reader)?;

    reader.align_to_byte();
    let mut trailer = [0u8; 4];
    reader.read_bytes(&mut trailer)?;

    let output = inflater.into_output();
    let expected = u32::from_be_bytes(trailer);
    let computed = Adler32::checksum(&output);
    if expected != computed {
        return Err(MyzError::checksum_mismatch(expected, computed));
    }

    Ok(output)
}
