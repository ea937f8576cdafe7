use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::constants::{
    CHUNK_HEADER_SIZE, CHUNK_TYPE_CRC32, CHUNK_TYPE_DONT_CARE, CHUNK_TYPE_FILL, CHUNK_TYPE_RAW,
    FILE_HEADER_SIZE, FILE_MAGIC, MAJOR_VERSION,
};
use crate::ext::{read_all, skip};
use crate::result::{Error, Result, Section};

/// The header at the start of a sparse file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseHeader {
    pub major_version: u16,
    pub minor_version: u16,
    /// Declared header size, including any padding after the fixed fields.
    pub file_header_size: u16,
    /// Declared size of every chunk header in the file.
    pub chunk_header_size: u16,
    /// Bytes per output block.
    pub block_size: u32,
    /// Number of blocks in the expanded image.
    pub total_blocks: u32,
    /// Number of chunk records that follow the header.
    pub total_chunks: u32,
    /// Stored checksum of the expanded image. Never verified.
    pub image_checksum: u32,
}

impl SparseHeader {
    /// Size of the expanded image in bytes.
    pub fn image_size(&self) -> u64 {
        u64::from(self.block_size) * u64::from(self.total_blocks)
    }

    /// Reads and validates a header from `r`, which must be positioned at
    /// the start of the file. On success `r` is positioned right after the
    /// declared header region.
    pub fn read_from<R: Read>(mut r: R) -> Result<Self> {
        let mut buf = [0; FILE_HEADER_SIZE as usize];
        if read_all(&mut r, &mut buf)? < buf.len() {
            return Err(Error::TruncatedInput {
                section: Section::FileHeader,
                offset: 0,
            });
        }
        let mut fields = &buf[..];

        let magic = fields.read_u32::<LittleEndian>()?;
        if magic != FILE_MAGIC {
            return Err(Error::BadMagic(magic));
        }

        let major_version = fields.read_u16::<LittleEndian>()?;
        let minor_version = fields.read_u16::<LittleEndian>()?;
        if major_version != MAJOR_VERSION {
            return Err(Error::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        let file_header_size = fields.read_u16::<LittleEndian>()?;
        if file_header_size < FILE_HEADER_SIZE {
            return Err(Error::InvalidFileHeaderSize(file_header_size));
        }
        let chunk_header_size = fields.read_u16::<LittleEndian>()?;
        if chunk_header_size < CHUNK_HEADER_SIZE {
            return Err(Error::InvalidChunkHeaderSize(chunk_header_size));
        }
        let block_size = fields.read_u32::<LittleEndian>()?;
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }

        let header = Self {
            major_version,
            minor_version,
            file_header_size,
            chunk_header_size,
            block_size,
            total_blocks: fields.read_u32::<LittleEndian>()?,
            total_chunks: fields.read_u32::<LittleEndian>()?,
            image_checksum: fields.read_u32::<LittleEndian>()?,
        };

        let padding = file_header_size - FILE_HEADER_SIZE;
        if padding > 0 {
            skip(&mut r, u64::from(padding)).map_err(|e| {
                Error::truncated(e, Section::FileHeaderPadding, u64::from(FILE_HEADER_SIZE))
            })?;
        }

        Ok(header)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkType {
    Raw,
    Fill,
    DontCare,
    Crc32,
}

impl TryFrom<u16> for ChunkType {
    type Error = u16;

    fn try_from(magic: u16) -> std::result::Result<Self, u16> {
        match magic {
            CHUNK_TYPE_RAW => Ok(ChunkType::Raw),
            CHUNK_TYPE_FILL => Ok(ChunkType::Fill),
            CHUNK_TYPE_DONT_CARE => Ok(ChunkType::DontCare),
            CHUNK_TYPE_CRC32 => Ok(ChunkType::Crc32),
            _ => Err(magic),
        }
    }
}

/// The header in front of every chunk record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Raw type code, see [`ChunkType`].
    pub chunk_type: u16,
    /// Number of output blocks this chunk expands to.
    pub block_count: u32,
    /// On-disk size of the record, header included.
    pub total_size: u32,
}

impl ChunkHeader {
    /// Reads one chunk header of `header_size` bytes.
    ///
    /// Returns `None` if the input ends before the fixed header fields are
    /// complete. Running out inside the padding is an error.
    pub(crate) fn read_from<R: Read>(
        mut r: R,
        header_size: u16,
        index: u32,
        offset: u64,
    ) -> Result<Option<Self>> {
        let mut buf = [0; CHUNK_HEADER_SIZE as usize];
        if read_all(&mut r, &mut buf)? < buf.len() {
            return Ok(None);
        }
        let mut fields = &buf[..];

        let chunk_type = fields.read_u16::<LittleEndian>()?;
        fields.read_u16::<LittleEndian>()?; // reserved1
        let header = Self {
            chunk_type,
            block_count: fields.read_u32::<LittleEndian>()?,
            total_size: fields.read_u32::<LittleEndian>()?,
        };

        let padding = header_size.saturating_sub(CHUNK_HEADER_SIZE);
        if padding > 0 {
            skip(&mut r, u64::from(padding)).map_err(|e| {
                Error::truncated(
                    e,
                    Section::ChunkHeaderPadding { index },
                    offset + u64::from(CHUNK_HEADER_SIZE),
                )
            })?;
        }

        Ok(Some(header))
    }
}
