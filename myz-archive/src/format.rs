//! The `.myz` container layout.
//!
//! ```text
//! +------------+--------------+----------------+======+=========+
//! | NameLength | OriginalSize | CompressedSize | name | payload |
//! +------------+--------------+----------------+======+=========+
//!    u32 LE        u32 LE          u32 LE
//! ```
//!
//! The name is the raw bytes of the source file's base name. The payload is
//! a zlib stream. There is no magic number, trailer or checksum field.

use myz_core::error::{MyzError, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 12;

/// File extension of containers, without the dot.
pub const MYZ_EXTENSION: &str = "myz";

/// The fixed 12-byte header at the start of every container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MyzHeader {
    /// Length of the stored name in bytes.
    pub name_length: u32,
    /// Length of the uncompressed file.
    pub original_size: u32,
    /// Length of the zlib payload.
    pub compressed_size: u32,
}

impl MyzHeader {
    /// Create a header from its three fields.
    pub fn new(name_length: u32, original_size: u32, compressed_size: u32) -> Self {
        Self {
            name_length,
            original_size,
            compressed_size,
        }
    }

    /// Build a header from actual lengths, refusing any that overflow a field.
    pub fn from_lengths(
        name_length: usize,
        original_size: u64,
        compressed_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            name_length: to_field("Name", name_length as u64)?,
            original_size: to_field("Original size", original_size)?,
            compressed_size: to_field("Compressed size", compressed_size as u64)?,
        })
    }

    /// Encode as 12 little-endian bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.name_length.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.original_size.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.compressed_size.to_le_bytes());
        bytes
    }

    /// Decode the first 12 bytes of `bytes`. No field is validated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(header) = bytes.first_chunk::<HEADER_SIZE>() else {
            return Err(MyzError::truncated_header(bytes.len()));
        };
        let field = |at: usize| {
            u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };

        Ok(Self {
            name_length: field(0),
            original_size: field(4),
            compressed_size: field(8),
        })
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read a header, reporting how many bytes were there if fewer than 12.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let bytes = read_run(reader, HEADER_SIZE)?;
        Self::from_bytes(&bytes)
    }

    /// Total container length this header describes.
    pub fn container_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.name_length as u64 + self.compressed_size as u64
    }

    /// Compressed size as a percentage of the original, if the original is non-empty.
    pub fn ratio(&self) -> Option<f64> {
        (self.original_size > 0)
            .then(|| self.compressed_size as f64 * 100.0 / self.original_size as f64)
    }
}

/// Default container path for `source`: the same path with `.myz` appended.
///
/// `notes/hello.txt` becomes `notes/hello.txt.myz`.
pub fn default_container_path(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_owned();
    path.push(".");
    path.push(MYZ_EXTENSION);
    PathBuf::from(path)
}

fn to_field(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| MyzError::field_overflow(field, value))
}

/// Read up to `len` bytes, stopping early only at end of input.
///
/// A short result is not an error here; callers turn it into the
/// truncation error for the field being read.
pub(crate) fn read_run<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    // Declared lengths are untrusted; grow as data actually arrives.
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    reader.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}
