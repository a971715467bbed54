//! # myz Core
//!
//! Core components shared by the myz crates.
//!
//! - [`bitstream`]: LSB-first bit-level I/O for DEFLATE
//! - [`error`]: the error type used by every layer
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Driver                                              │
//! │     myz CLI (compress, decompress, info, test)          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     .myz header, writer, reader, jobs                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     DEFLATE (LZ77 + Huffman) in zlib framing            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, MyzError                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use myz_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! let mut writer = BitWriter::new(&mut output);
//! writer.write_bits(0b1011, 4).unwrap();
//! writer.flush().unwrap();
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;

pub use bitstream::{BitReader, BitWriter};
pub use error::{FileAction, MyzError, Result};
