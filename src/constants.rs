//! Public constants.

/// Magic number at the start of every sparse file.
pub const FILE_MAGIC: u32 = 0xed26_ff3a;

/// The only sparse format major version that can be decoded.
pub const MAJOR_VERSION: u16 = 1;

/// Minimum size of the sparse file header.
pub const FILE_HEADER_SIZE: u16 = 28;

/// Minimum size of a sparse chunk header.
pub const CHUNK_HEADER_SIZE: u16 = 12;

pub const CHUNK_TYPE_RAW: u16 = 0xcac1;
pub const CHUNK_TYPE_FILL: u16 = 0xcac2;
pub const CHUNK_TYPE_DONT_CARE: u16 = 0xcac3;
pub const CHUNK_TYPE_CRC32: u16 = 0xcac4;
