//! File-to-file compress and decompress operations.
//!
//! Jobs are plain values configured with builder methods and executed with
//! `run`. They hold no state between runs.

use crate::format::{MyzHeader, default_container_path};
use crate::reader::{Stage, open_container};
use crate::writer::{SourceMetadata, write_container_file};
use myz_core::error::{FileAction, MyzError, Result};
use myz_deflate::zlib_compress;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Compress one file into a container.
#[derive(Debug, Clone)]
pub struct CompressJob {
    source: PathBuf,
    output: Option<PathBuf>,
}

/// Outcome of a [`CompressJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackReport {
    /// File that was compressed.
    pub source: PathBuf,
    /// Container that was written.
    pub container: PathBuf,
    /// Name stored in the container, with invalid UTF-8 replaced.
    pub name: String,
    /// Header that was written.
    pub header: MyzHeader,
}

impl CompressJob {
    /// Compress `source` into `<source>.myz` unless an output is set.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: None,
        }
    }

    /// Write the container to `path` instead of the default.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Where the container will be written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_container_path(&self.source))
    }

    /// Stat and read the source, compress it and write the container.
    pub fn run(&self) -> Result<PackReport> {
        let mut metadata = SourceMetadata::from_path(&self.source)?;
        let data = fs::read(&self.source)
            .map_err(|e| MyzError::file(FileAction::Read, &self.source, e))?;

        // The header must describe the bytes actually compressed.
        if data.len() as u64 != metadata.original_size {
            tracing::debug!(
                "{} changed size after stat: {} -> {} bytes",
                self.source.display(),
                metadata.original_size,
                data.len()
            );
            metadata.original_size = data.len() as u64;
        }

        let payload = zlib_compress(&data)?;
        let container = self.output_path();
        let header = write_container_file(&container, &metadata, &payload)?;

        tracing::info!(
            "Compressed {} -> {} ({} -> {} bytes)",
            self.source.display(),
            container.display(),
            header.original_size,
            header.compressed_size
        );

        Ok(PackReport {
            source: self.source.clone(),
            container,
            name: metadata.display_name().into_owned(),
            header,
        })
    }
}

/// Restore the file held in a container.
#[derive(Debug, Clone)]
pub struct DecompressJob {
    container: PathBuf,
    output: Option<PathBuf>,
    overwrite: bool,
}

/// Outcome of a [`DecompressJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackReport {
    /// Container that was read.
    pub container: PathBuf,
    /// File that was written.
    pub output: PathBuf,
    /// Name stored in the container, with invalid UTF-8 replaced.
    pub name: String,
    /// Header of the container.
    pub header: MyzHeader,
}

impl DecompressJob {
    /// Restore `container` next to itself under its stored name, unless an
    /// output is set.
    pub fn new(container: impl Into<PathBuf>) -> Self {
        Self {
            container: container.into(),
            output: None,
            overwrite: false,
        }
    }

    /// Write the recovered file to `path`.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Replace an existing output file instead of failing.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Read and verify the container, then write the recovered file.
    ///
    /// The output is only created once the payload has decoded and its
    /// length matched the header.
    pub fn run(&self) -> Result<UnpackReport> {
        let reader = open_container(&self.container)?;
        let name = reader.name().into_owned();
        let output = match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.container, reader.name_bytes())?,
        };
        if !self.overwrite && output.exists() {
            return Err(MyzError::output_exists(output));
        }

        let header = *reader.header();
        let data = reader
            .decode()
            .map_err(|e| e.at_path(FileAction::Read, &self.container))?
            .data;

        tracing::debug!(
            "Container stage: {} ({})",
            Stage::WritingOutput,
            output.display()
        );
        self.write_output(&output, &data)?;

        tracing::info!(
            "Decompressed {} -> {} ({} bytes)",
            self.container.display(),
            output.display(),
            data.len()
        );

        Ok(UnpackReport {
            container: self.container.clone(),
            output,
            name,
            header,
        })
    }

    fn write_output(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            // Also catches a file that appeared while decoding.
            options.create_new(true);
        }

        let mut file = options.open(path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => MyzError::output_exists(path),
            _ => MyzError::file(FileAction::Create, path, e),
        })?;
        file.write_all(data)
            .map_err(|e| MyzError::file(FileAction::Write, path, e))
    }
}

/// Output path for a stored `name` restored next to `container`.
///
/// Only a bare file name is accepted; anything that could leave the
/// container's directory is refused.
pub fn default_output_path(container: &Path, name: &[u8]) -> Result<PathBuf> {
    if name.is_empty() {
        return Err(MyzError::invalid_header(
            "Stored name is empty; an explicit output path is required",
        ));
    }
    let is_dot_entry = name == b"." || name == b"..";
    if is_dot_entry || name.iter().any(|&b| matches!(b, b'/' | b'\\' | 0)) {
        return Err(MyzError::path_traversal(String::from_utf8_lossy(name)));
    }

    let dir = container.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(file_name(name)?))
}

#[cfg(unix)]
fn file_name(name: &[u8]) -> Result<OsString> {
    use std::os::unix::ffi::OsStrExt;
    Ok(std::ffi::OsStr::from_bytes(name).to_os_string())
}

#[cfg(not(unix))]
fn file_name(name: &[u8]) -> Result<OsString> {
    std::str::from_utf8(name).map(OsString::from).map_err(|_| {
        MyzError::invalid_header(
            "Stored name is not valid UTF-8; an explicit output path is required",
        )
    })
}
