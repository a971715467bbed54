//! Reading containers.
//!
//! A container is consumed strictly in order: header, name, payload. The
//! payload is then decompressed and its length checked against the header.
//! The first failure ends the read; nothing is retried or recovered.

use crate::format::{MyzHeader, read_run};
use myz_core::error::{FileAction, MyzError, Result};
use myz_deflate::zlib_decompress;
use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Step of a container read, used for logging and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the 12-byte header.
    ReadingHeader,
    /// Reading the stored name.
    ReadingName,
    /// Reading the compressed payload.
    ReadingPayload,
    /// Inflating the payload and checking its length.
    Decompressing,
    /// Writing the recovered bytes out.
    WritingOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadingHeader => "reading header",
            Self::ReadingName => "reading name",
            Self::ReadingPayload => "reading payload",
            Self::Decompressing => "decompressing",
            Self::WritingOutput => "writing output",
        };
        f.write_str(name)
    }
}

/// A fully decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyzEntry {
    /// The header as stored.
    pub header: MyzHeader,
    /// Stored name, decoded lossily as UTF-8.
    pub name: String,
    /// Recovered file contents.
    pub data: Vec<u8>,
}

/// Staged reader over a container.
///
/// The header and name are read on construction; the payload is read on
/// demand so inspection does not have to inflate anything.
#[derive(Debug)]
pub struct MyzReader<R: Read> {
    reader: R,
    header: MyzHeader,
    name: Vec<u8>,
}

impl<R: Read> MyzReader<R> {
    /// Read the header and name from `reader`.
    pub fn new(mut reader: R) -> Result<Self> {
        tracing::debug!("Container stage: {}", Stage::ReadingHeader);
        let header = MyzHeader::read(&mut reader)?;

        tracing::debug!(
            "Container stage: {} ({} bytes)",
            Stage::ReadingName,
            header.name_length
        );
        let name = read_run(&mut reader, header.name_length as usize)?;
        if name.len() != header.name_length as usize {
            return Err(MyzError::truncated_name(header.name_length, name.len()));
        }

        Ok(Self {
            reader,
            header,
            name,
        })
    }

    /// The container header.
    pub fn header(&self) -> &MyzHeader {
        &self.header
    }

    /// Stored name exactly as written.
    pub fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    /// Stored name, with invalid UTF-8 replaced.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Read the compressed payload without decoding it.
    pub fn read_payload(&mut self) -> Result<Vec<u8>> {
        let expected = self.header.compressed_size;
        tracing::debug!(
            "Container stage: {} ({} bytes)",
            Stage::ReadingPayload,
            expected
        );

        let payload = read_run(&mut self.reader, expected as usize)?;
        if payload.len() != expected as usize {
            return Err(MyzError::truncated_payload(expected, payload.len()));
        }
        Ok(payload)
    }

    /// Read and decode the payload.
    pub fn decode(mut self) -> Result<MyzEntry> {
        let payload = self.read_payload()?;
        let data = decode_payload(&self.header, &payload)?;

        Ok(MyzEntry {
            header: self.header,
            name: String::from_utf8_lossy(&self.name).into_owned(),
            data,
        })
    }
}

/// Inflate `payload` and check it against the header's original size.
pub fn decode_payload(header: &MyzHeader, payload: &[u8]) -> Result<Vec<u8>> {
    tracing::debug!("Container stage: {}", Stage::Decompressing);
    let data = zlib_decompress(payload)?;

    if data.len() != header.original_size as usize {
        return Err(MyzError::size_mismatch(header.original_size, data.len()));
    }
    Ok(data)
}

/// Open `path` and read its header and name.
pub fn open_container(path: &Path) -> Result<MyzReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| MyzError::file(FileAction::Open, path, e))?;
    MyzReader::new(BufReader::new(file)).map_err(|e| e.at_path(FileAction::Read, path))
}

/// Read a container file, returning the stored name and recovered bytes.
pub fn read_container(path: &Path) -> Result<(String, Vec<u8>)> {
    let entry = read_entry(path)?;
    Ok((entry.name, entry.data))
}

/// Read a container file into a [`MyzEntry`].
pub fn read_entry(path: &Path) -> Result<MyzEntry> {
    open_container(path)?
        .decode()
        .map_err(|e| e.at_path(FileAction::Read, path))
}

/// Decode the container at `container` and write the recovered bytes to
/// `output`, creating or truncating it.
///
/// Nothing is written unless decoding succeeds in full.
pub fn extract_container(container: &Path, output: &Path) -> Result<MyzEntry> {
    let entry = read_entry(container)?;

    tracing::debug!(
        "Container stage: {} ({})",
        Stage::WritingOutput,
        output.display()
    );
    fs::write(output, &entry.data).map_err(|e| MyzError::file(FileAction::Write, output, e))?;

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::HEADER_SIZE;
    use crate::writer::{SourceMetadata, write_container};
    use myz_deflate::zlib_compress;
    use std::io::Cursor;

    fn container(name: &str, data: &[u8]) -> Vec<u8> {
        let payload = zlib_compress(data).unwrap();
        let mut output = Vec::new();
        write_container(
            &mut output,
            &SourceMetadata::new(name, data.len() as u64),
            &payload,
        )
        .unwrap();
        output
    }

    #[test]
    fn test_decode_roundtrip() {
        let bytes = container("hello.txt", b"Hello, World!");
        let entry = MyzReader::new(Cursor::new(bytes)).unwrap().decode().unwrap();

        assert_eq!(entry.name, "hello.txt");
        assert_eq!(entry.data, b"Hello, World!");
        assert_eq!(entry.header.name_length, 9);
        assert_eq!(entry.header.original_size, 13);
    }

    #[test]
    fn test_staged_access() {
        let bytes = container("data.bin", &[7u8; 100]);
        let mut reader = MyzReader::new(Cursor::new(bytes.clone())).unwrap();

        assert_eq!(reader.name(), "data.bin");
        assert_eq!(reader.name_bytes(), b"data.bin");

        let payload = reader.read_payload().unwrap();
        assert_eq!(payload.len(), reader.header().compressed_size as usize);
        assert_eq!(&payload[..], &bytes[HEADER_SIZE + 8..]);
        assert_eq!(decode_payload(reader.header(), &payload).unwrap(), vec![7u8; 100]);
    }

    #[test]
    fn test_truncated_name() {
        let bytes = container("hello.txt", b"Hello");
        let cut = &bytes[..HEADER_SIZE + 4];
        assert!(matches!(
            MyzReader::new(Cursor::new(cut)),
            Err(MyzError::TruncatedName { expected: 9, available: 4 })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = container("hello.txt", b"Hello");
        let cut = &bytes[..bytes.len() - 1];
        let reader = MyzReader::new(Cursor::new(cut)).unwrap();
        let expected = reader.header().compressed_size;

        match reader.decode() {
            Err(MyzError::TruncatedPayload {
                expected: e,
                available,
            }) => {
                assert_eq!(e, expected);
                assert_eq!(available, expected as usize - 1);
            }
            other => panic!("expected truncated payload, got {other:?}"),
        }
    }

    #[test]
    fn test_size_mismatch() {
        let mut bytes = container("a", b"abc");
        // OriginalSize field
        bytes[4] = 4;
        assert!(matches!(
            MyzReader::new(Cursor::new(bytes)).unwrap().decode(),
            Err(MyzError::SizeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_garbage_payload() {
        let mut bytes = MyzHeader::new(1, 5, 4).to_bytes().to_vec();
        bytes.push(b'x');
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(
            MyzReader::new(Cursor::new(bytes)).unwrap().decode(),
            Err(MyzError::Decompression { .. })
        ));
    }

    #[test]
    fn test_huge_declared_name_does_not_allocate_up_front() {
        let bytes = MyzHeader::new(u32::MAX, 0, 0).to_bytes();
        assert!(matches!(
            MyzReader::new(Cursor::new(bytes)),
            Err(MyzError::TruncatedName { available: 0, .. })
        ));
    }

    #[test]
    fn test_non_utf8_name() {
        let payload = zlib_compress(b"").unwrap();
        let mut bytes = MyzHeader::new(2, 0, payload.len() as u32).to_bytes().to_vec();
        bytes.extend_from_slice(&[0xFF, b'a']);
        bytes.extend_from_slice(&payload);

        let reader = MyzReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.name_bytes(), &[0xFF, b'a']);
        assert_eq!(reader.name(), "\u{FFFD}a");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::ReadingHeader.to_string(), "reading header");
        assert_eq!(Stage::WritingOutput.to_string(), "writing output");
    }
}
