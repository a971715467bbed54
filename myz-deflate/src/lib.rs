//! # myz Deflate
//!
//! Pure Rust DEFLATE (RFC 1951) wrapped in zlib framing (RFC 1950).
//!
//! This is the codec behind the `.myz` payload. Both directions work on
//! whole in-memory buffers.
//!
//! ## Features
//!
//! - **Decompression**: stored, fixed-Huffman and dynamic-Huffman blocks, so
//!   streams from any conforming zlib encoder decode
//! - **Compression**: LZ77 hash chains with lazy matching, emitted as a
//!   fixed-Huffman block, or as stored blocks when coding would expand
//!   the input
//!
//! ## Example
//!
//! ```rust
//! use myz_deflate::{zlib_compress, zlib_decompress};
//!
//! let original = b"Hello, World! Hello, World!";
//! let compressed = zlib_compress(original).unwrap();
//! assert_eq!(&compressed[..2], &[0x78, 0x9C]);
//!
//! let decompressed = zlib_decompress(&compressed).unwrap();
//! assert_eq!(&decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod huffman;
pub mod inflate;
pub mod lz77;
pub mod tables;
pub mod zlib;

pub use deflate::{Deflater, deflate};
pub use huffman::{HuffmanCode, HuffmanTree};
pub use inflate::{Inflater, inflate};
pub use lz77::{Lz77Encoder, Lz77Token};
pub use zlib::{Adler32, zlib_compress, zlib_compress_to, zlib_decompress};
