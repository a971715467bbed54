//! Error types for myz operations.
//!
//! A single error enum covers every layer: bit-level I/O, the DEFLATE and
//! zlib codec, the `.myz` container and the filesystem jobs built on top.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation that failed, used for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Reading file metadata.
    Stat,
    /// Reading a whole file into memory.
    Read,
    /// Opening a file for reading.
    Open,
    /// Creating or truncating a file for writing.
    Create,
    /// Writing to an open file.
    Write,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Stat => "stat",
            Self::Read => "read",
            Self::Open => "open",
            Self::Create => "create",
            Self::Write => "write",
        };
        f.write_str(verb)
    }
}

/// The main error type for myz operations.
#[derive(Debug, Error)]
pub enum MyzError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Filesystem error with the path it happened on.
    #[error("Failed to {action} {}: {source}", path.display())]
    File {
        /// What was being attempted.
        action: FileAction,
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The compressor could not produce or emit its stream.
    #[error("Compression failed: {message}")]
    Compression {
        /// Description of the failure.
        message: String,
    },

    /// The payload is not a valid zlib stream.
    #[error("Decompression failed: {message}")]
    Decompression {
        /// Description of the failure.
        message: String,
    },

    /// Fewer than 12 bytes were available for the container header.
    #[error("Truncated header: need 12 bytes, found {available}")]
    TruncatedHeader {
        /// Bytes actually available.
        available: usize,
    },

    /// The name field is shorter than the header declares.
    #[error("Truncated name: header declares {expected} bytes, found {available}")]
    TruncatedName {
        /// Declared name length.
        expected: u32,
        /// Bytes actually available.
        available: usize,
    },

    /// The payload is shorter than the header declares.
    #[error("Truncated payload: header declares {expected} bytes, found {available}")]
    TruncatedPayload {
        /// Declared compressed size.
        expected: u32,
        /// Bytes actually available.
        available: usize,
    },

    /// The decompressed length disagrees with the declared original size.
    #[error("Size mismatch: header declares {expected} bytes, decompressed {actual}")]
    SizeMismatch {
        /// Declared original size.
        expected: u32,
        /// Length of the decompressed data.
        actual: usize,
    },

    /// A length does not fit in its 32-bit header field.
    #[error("{field} of {value} bytes does not fit in a 32-bit header field")]
    FieldOverflow {
        /// Header field name.
        field: &'static str,
        /// Offending value.
        value: u64,
    },

    /// Stored name would escape the destination directory.
    #[error("Path traversal detected in stored name: {path}")]
    PathTraversal {
        /// The suspicious name.
        path: String,
    },

    /// Refusing to replace an existing output file.
    #[error("Output file already exists: {}", path.display())]
    OutputExists {
        /// The existing file.
        path: PathBuf,
    },

    /// Invalid stream header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Corrupted compressed data.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// A bit sequence matched no Huffman code.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where decoding failed.
        bit_position: u64,
    },

    /// Back-reference points before the start of the output.
    #[error("Invalid back-reference distance: {distance} exceeds history size {history_size}")]
    InvalidDistance {
        /// The distance read from the stream.
        distance: usize,
        /// Bytes of history available.
        history_size: usize,
    },

    /// Stream ended early.
    #[error("Unexpected end of stream: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected.
        expected: usize,
    },

    /// Stored checksum disagrees with the data.
    #[error("Checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum stored in the stream.
        expected: u32,
        /// Checksum of the decoded data.
        computed: u32,
    },
}

/// Result type alias for myz operations.
pub type Result<T> = std::result::Result<T, MyzError>;

impl MyzError {
    /// Create a filesystem error with path context.
    pub fn file(action: FileAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }

    /// Create a compression error.
    pub fn compression(message: impl Into<String>) -> Self {
        Self::Compression {
            message: message.into(),
        }
    }

    /// Create a decompression error.
    pub fn decompression(message: impl Into<String>) -> Self {
        Self::Decompression {
            message: message.into(),
        }
    }

    /// Create a truncated header error.
    pub fn truncated_header(available: usize) -> Self {
        Self::TruncatedHeader { available }
    }

    /// Create a truncated name error.
    pub fn truncated_name(expected: u32, available: usize) -> Self {
        Self::TruncatedName {
            expected,
            available,
        }
    }

    /// Create a truncated payload error.
    pub fn truncated_payload(expected: u32, available: usize) -> Self {
        Self::TruncatedPayload {
            expected,
            available,
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u32, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create a field overflow error.
    pub fn field_overflow(field: &'static str, value: u64) -> Self {
        Self::FieldOverflow { field, value }
    }

    /// Create a path traversal error.
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Create an output-exists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, history_size: usize) -> Self {
        Self::InvalidDistance {
            distance,
            history_size,
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Attach a path to a bare I/O error. Other variants pass through.
    pub fn at_path(self, action: FileAction, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io(source) => Self::file(action, path, source),
            other => other,
        }
    }

    /// Whether this error means the container is shorter than its header claims.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::TruncatedName { .. }
                | Self::TruncatedPayload { .. }
        )
    }
}
