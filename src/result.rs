//! Error handling with this crate's `Result` type.

use std::fmt;
use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

use crate::constants::{CHUNK_HEADER_SIZE, FILE_HEADER_SIZE, FILE_MAGIC};

/// The part of a sparse file that was being read when the input ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    FileHeader,
    FileHeaderPadding,
    ChunkHeaderPadding { index: u32 },
    RawPayload { index: u32 },
    FillPattern { index: u32 },
    Crc32Value { index: u32 },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Section::FileHeader => write!(f, "file header"),
            Section::FileHeaderPadding => write!(f, "file header padding"),
            Section::ChunkHeaderPadding { index } => {
                write!(f, "chunk #{} header padding", index)
            }
            Section::RawPayload { index } => write!(f, "chunk #{} raw payload", index),
            Section::FillPattern { index } => write!(f, "chunk #{} fill pattern", index),
            Section::Crc32Value { index } => write!(f, "chunk #{} crc32 value", index),
        }
    }
}

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid file magic: {0:#010x} (expected {expected:#010x})", expected = FILE_MAGIC)]
    BadMagic(u32),
    #[error("Unsupported sparse format version: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },
    #[error("Invalid file header size: {0} < {min}", min = FILE_HEADER_SIZE)]
    InvalidFileHeaderSize(u16),
    #[error("Invalid chunk header size: {0} < {min}", min = CHUNK_HEADER_SIZE)]
    InvalidChunkHeaderSize(u16),
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(u32),
    #[error("Truncated input: {section} at offset {offset} is incomplete")]
    TruncatedInput { section: Section, offset: u64 },
    #[error("Chunk #{index}: Unrecognized chunk type: {chunk_type:#06x}")]
    UnrecognizedChunkType { index: u32, chunk_type: u16 },
    #[error(
        "Chunk #{index}: Raw chunk total size {total_size} is smaller than its header ({chunk_header_size})"
    )]
    InvalidRawSize {
        index: u32,
        total_size: u32,
        chunk_header_size: u16,
    },
    #[error("Chunk #{index}: Write ends at {end}, past the image size {image_size}")]
    OutOfBounds {
        index: u32,
        end: u64,
        image_size: u64,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Turns an unexpected EOF into `TruncatedInput`, leaving other I/O
    /// errors alone.
    pub(crate) fn truncated(err: io::Error, section: Section, offset: u64) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput { section, offset }
        } else {
            Error::Io(err)
        }
    }
}

/// Specialized `Result` type used for error handling in this crate.
pub type Result<T> = StdResult<T, Error>;
