//! Bit-level I/O for DEFLATE.
//!
//! DEFLATE packs data elements starting at the least significant bit of each
//! byte. [`BitReader`] and [`BitWriter`] keep a 64-bit accumulator so callers
//! can move up to 32 bits at a time across byte boundaries.
//!
//! # Example
//!
//! ```
//! use myz_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write_bits(0b101, 3).unwrap();
//!     writer.write_bits(0b1100, 4).unwrap();
//!     writer.flush().unwrap();
//! }
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{MyzError, Result};
use std::io::{self, Read, Write};

/// A bit-level reader over any `Read` implementation.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits consumed (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Consume this `BitReader` and return the underlying reader.
    ///
    /// Bits already pulled into the buffer are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Current bit position, counted from the start of the stream.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Pull bytes one at a time until `count` bits are buffered.
    ///
    /// Reading a byte at a time never consumes input past what the caller
    /// asked for, so byte-aligned data following the bit stream stays
    /// reachable through [`BitReader::read_bytes`].
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot buffer more than 32 bits at once");

        while self.bits_in_buffer < count {
            let mut byte = [0u8; 1];
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    let missing = (count - self.bits_in_buffer).div_ceil(8);
                    return Err(MyzError::unexpected_eof(missing as usize));
                }
                Ok(_) => {
                    self.buffer |= (byte[0] as u64) << self.bits_in_buffer;
                    self.bits_in_buffer += 8;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Read up to 32 bits; the first bit read lands in the LSB.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        let result = (self.buffer & mask) as u32;

        self.buffer >>= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;

        Ok(result)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Discard bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        let remainder = self.bits_in_buffer % 8;
        if remainder > 0 {
            self.buffer >>= remainder;
            self.bits_in_buffer -= remainder;
            self.total_bits_read += remainder as u64;
        }
    }

    /// Read whole bytes. The reader must be byte-aligned.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        debug_assert!(self.bits_in_buffer % 8 == 0, "read_bytes on unaligned reader");

        let mut offset = 0;
        while self.bits_in_buffer >= 8 && offset < buf.len() {
            buf[offset] = (self.buffer & 0xFF) as u8;
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
            self.total_bits_read += 8;
            offset += 1;
        }

        if offset < buf.len() {
            let missing = buf.len() - offset;
            self.reader
                .read_exact(&mut buf[offset..])
                .map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => MyzError::unexpected_eof(missing),
                    _ => e.into(),
                })?;
            self.total_bits_read += missing as u64 * 8;
        }

        Ok(())
    }
}

/// A bit-level writer over any `Write` implementation.
///
/// Complete bytes are pushed to the underlying writer as soon as they are
/// formed. Call [`BitWriter::flush`] to pad and emit the last partial byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_written: 0,
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    /// Total number of bits written so far, padding included.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    fn flush_bytes(&mut self) -> Result<()> {
        if self.bits_in_buffer < 8 {
            return Ok(());
        }

        let whole = (self.bits_in_buffer / 8) as usize;
        let bytes = self.buffer.to_le_bytes();
        self.writer.write_all(&bytes[..whole])?;

        self.buffer = self.buffer.checked_shr(whole as u32 * 8).unwrap_or(0);
        self.bits_in_buffer -= whole as u8 * 8;
        Ok(())
    }

    /// Write the low `count` bits of `value` (0-32), LSB first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return Ok(());
        }

        let mask = (1u64 << count).wrapping_sub(1);
        self.buffer |= (value as u64 & mask) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.flush_bytes()
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u32, 1)
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) -> Result<()> {
        let remainder = self.bits_in_buffer % 8;
        if remainder != 0 {
            self.write_bits(0, 8 - remainder)?;
        }
        Ok(())
    }

    /// Write whole bytes. The writer must be byte-aligned.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        debug_assert!(self.bits_in_buffer % 8 == 0, "write_bytes on unaligned writer");

        self.flush_bytes()?;
        self.writer.write_all(buf)?;
        self.total_bits_written += buf.len() as u64 * 8;
        Ok(())
    }

    /// Pad the final partial byte with zeros and flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.align_to_byte()?;
        self.flush_bytes()?;
        self.writer.flush()?;
        Ok(())
    }
}
