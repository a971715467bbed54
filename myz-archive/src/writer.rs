//! Writing containers.
//!
//! The writer only lays bytes out; compressing the payload is the caller's
//! job (see [`crate::job::CompressJob`]).

use crate::format::MyzHeader;
use myz_core::error::{FileAction, MyzError, Result};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// What the container records about its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Base name of the source file, without any directory part, as the
    /// platform's raw bytes.
    pub name: Vec<u8>,
    /// Length of the source file in bytes.
    pub original_size: u64,
}

impl SourceMetadata {
    /// Create metadata from a name and size.
    pub fn new(name: impl Into<Vec<u8>>, original_size: u64) -> Self {
        Self {
            name: name.into(),
            original_size,
        }
    }

    /// Stat `path` for its base name and size.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| MyzError::file(FileAction::Stat, path, e))?;
        if !metadata.is_file() {
            return Err(MyzError::file(
                FileAction::Stat,
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let name = path
            .file_name()
            .map(|name| name.as_encoded_bytes().to_vec())
            .ok_or_else(|| {
                MyzError::file(
                    FileAction::Stat,
                    path,
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?;

        Ok(Self::new(name, metadata.len()))
    }

    /// Name for display, with invalid UTF-8 replaced.
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Header for this source followed by a payload of `payload_len` bytes.
    pub fn header_for(&self, payload_len: usize) -> Result<MyzHeader> {
        MyzHeader::from_lengths(self.name.len(), self.original_size, payload_len)
    }
}

/// Write a complete container: header, name, payload.
pub fn write_container<W: Write>(
    writer: &mut W,
    source: &SourceMetadata,
    payload: &[u8],
) -> Result<MyzHeader> {
    let header = source.header_for(payload.len())?;
    header.write(writer)?;
    writer.write_all(&source.name)?;
    writer.write_all(payload)?;
    Ok(header)
}

/// Create (or truncate) `path` and write a container into it.
///
/// Field overflow is detected before the file is touched.
pub fn write_container_file(
    path: &Path,
    source: &SourceMetadata,
    payload: &[u8],
) -> Result<MyzHeader> {
    source.header_for(payload.len())?;

    let file = File::create(path).map_err(|e| MyzError::file(FileAction::Create, path, e))?;
    let mut writer = BufWriter::new(file);

    let header = write_container(&mut writer, source, payload)
        .map_err(|e| e.at_path(FileAction::Write, path))?;
    writer
        .flush()
        .map_err(|e| MyzError::file(FileAction::Write, path, e))?;

    tracing::debug!(
        "Wrote container {} ({} bytes)",
        path.display(),
        header.container_len()
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::HEADER_SIZE;

    #[test]
    fn test_write_container_layout() {
        let source = SourceMetadata::new("hello.txt", 13);
        let payload = [0xAAu8; 5];

        let mut output = Vec::new();
        let header = write_container(&mut output, &source, &payload).unwrap();

        assert_eq!(header, MyzHeader::new(9, 13, 5));
        assert_eq!(output.len(), HEADER_SIZE + 9 + 5);
        assert_eq!(&output[..HEADER_SIZE], &header.to_bytes());
        assert_eq!(&output[HEADER_SIZE..HEADER_SIZE + 9], b"hello.txt");
        assert_eq!(&output[HEADER_SIZE + 9..], &payload);
    }

    #[test]
    fn test_name_length_counts_bytes() {
        let source = SourceMetadata::new("résumé.txt", 0);
        let header = source.header_for(8).unwrap();
        assert_eq!(header.name_length, 12);
    }

    #[test]
    fn test_overflowing_size_rejected() {
        let source = SourceMetadata::new("big.bin", 1 << 32);
        let mut output = Vec::new();
        let err = write_container(&mut output, &source, b"x").unwrap_err();
        assert!(matches!(err, MyzError::FieldOverflow { .. }));
        assert!(output.is_empty());
    }

    #[test]
    fn test_overflow_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin.myz");
        let source = SourceMetadata::new("big.bin", 1 << 32);

        assert!(write_container_file(&path, &source, b"x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"Hello, World!").unwrap();

        let source = SourceMetadata::from_path(&path).unwrap();
        assert_eq!(source, SourceMetadata::new("hello.txt", 13));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_from_path_keeps_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&path, b"latin-1").unwrap();

        let source = SourceMetadata::from_path(&path).unwrap();
        assert_eq!(source.name, b"caf\xe9.txt");
        assert_eq!(source.display_name(), "caf\u{FFFD}.txt");

        let mut output = Vec::new();
        let header = write_container(&mut output, &source, b"").unwrap();
        assert_eq!(header.name_length, 8);
        assert_eq!(&output[HEADER_SIZE..HEADER_SIZE + 8], b"caf\xe9.txt");
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceMetadata::from_path(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, MyzError::File { action: FileAction::Stat, .. }));
    }

    #[test]
    fn test_from_path_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SourceMetadata::from_path(dir.path()).is_err());
    }

    #[test]
    fn test_create_failure_has_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.myz");
        let source = SourceMetadata::new("a", 1);

        let err = write_container_file(&path, &source, b"p").unwrap_err();
        assert!(matches!(err, MyzError::File { action: FileAction::Create, .. }));
        assert!(err.to_string().contains("out.myz"));
    }
}
