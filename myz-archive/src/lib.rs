//! # myz Archive
//!
//! The `.myz` container: one file's name and size followed by its zlib
//! compressed contents.
//!
//! - [`format`]: the 12-byte header and container layout
//! - [`writer`]: laying out a container from metadata and a payload
//! - [`reader`]: reading a container back in order and verifying it
//! - [`job`]: file-to-file compress and decompress operations
//!
//! ## Example
//!
//! ```rust
//! use myz_archive::{MyzReader, SourceMetadata, write_container};
//! use myz_deflate::zlib_compress;
//! use std::io::Cursor;
//!
//! let data = b"Hello, World!";
//! let payload = zlib_compress(data).unwrap();
//!
//! let mut container = Vec::new();
//! let source = SourceMetadata::new("hello.txt", data.len() as u64);
//! write_container(&mut container, &source, &payload).unwrap();
//!
//! let entry = MyzReader::new(Cursor::new(container)).unwrap().decode().unwrap();
//! assert_eq!(entry.name, "hello.txt");
//! assert_eq!(entry.data, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod format;
pub mod job;
pub mod reader;
pub mod writer;

pub use format::{HEADER_SIZE, MYZ_EXTENSION, MyzHeader, default_container_path};
pub use job::{CompressJob, DecompressJob, PackReport, UnpackReport, default_output_path};
pub use reader::{
    MyzEntry, MyzReader, Stage, decode_payload, extract_container, open_container, read_container,
    read_entry,
};
pub use writer::{SourceMetadata, write_container, write_container_file};
