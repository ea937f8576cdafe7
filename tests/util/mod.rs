#![allow(dead_code)]

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

pub const RAW: u16 = 0xcac1;
pub const FILL: u16 = 0xcac2;
pub const DONT_CARE: u16 = 0xcac3;
pub const CRC32: u16 = 0xcac4;

/// Assembles sparse files byte by byte, including malformed ones.
pub struct SparseBuilder {
    block_size: u32,
    total_blocks: u32,
    total_chunks: Option<u32>,
    header_padding: u16,
    chunk_padding: u16,
    major_version: u16,
    chunks: Vec<Vec<u8>>,
}

impl SparseBuilder {
    pub fn new(block_size: u32, total_blocks: u32) -> Self {
        Self {
            block_size,
            total_blocks,
            total_chunks: None,
            header_padding: 0,
            chunk_padding: 0,
            major_version: 1,
            chunks: Vec::new(),
        }
    }

    pub fn total_chunks(mut self, total_chunks: u32) -> Self {
        self.total_chunks = Some(total_chunks);
        self
    }

    pub fn header_padding(mut self, padding: u16) -> Self {
        self.header_padding = padding;
        self
    }

    pub fn chunk_padding(mut self, padding: u16) -> Self {
        self.chunk_padding = padding;
        self
    }

    pub fn major_version(mut self, major_version: u16) -> Self {
        self.major_version = major_version;
        self
    }

    fn chunk_header_size(&self) -> u16 {
        12 + self.chunk_padding
    }

    /// Adds a chunk whose `total_sz` is computed from `body`.
    pub fn chunk(self, chunk_type: u16, block_count: u32, body: &[u8]) -> Self {
        let total_size = u32::from(self.chunk_header_size()) + body.len() as u32;
        self.chunk_with_size(chunk_type, block_count, total_size, body)
    }

    pub fn chunk_with_size(
        mut self,
        chunk_type: u16,
        block_count: u32,
        total_size: u32,
        body: &[u8],
    ) -> Self {
        let mut chunk = Vec::new();
        chunk.extend_from_slice(&chunk_type.to_le_bytes());
        chunk.extend_from_slice(&0_u16.to_le_bytes());
        chunk.extend_from_slice(&block_count.to_le_bytes());
        chunk.extend_from_slice(&total_size.to_le_bytes());
        chunk.extend(std::iter::repeat(0xee).take(self.chunk_padding as usize));
        chunk.extend_from_slice(body);
        self.chunks.push(chunk);
        self
    }

    pub fn raw(self, payload: &[u8]) -> Self {
        let block_count = payload.len() as u32 / self.block_size;
        self.chunk(RAW, block_count, payload)
    }

    pub fn fill(self, block_count: u32, pattern: [u8; 4]) -> Self {
        self.chunk(FILL, block_count, &pattern)
    }

    pub fn dont_care(self, block_count: u32) -> Self {
        self.chunk(DONT_CARE, block_count, &[])
    }

    pub fn crc32(self, crc: u32) -> Self {
        self.chunk(CRC32, 0, &crc.to_le_bytes())
    }

    pub fn build(&self) -> Vec<u8> {
        let total_chunks = self.total_chunks.unwrap_or(self.chunks.len() as u32);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xed26_ff3a_u32.to_le_bytes());
        bytes.extend_from_slice(&self.major_version.to_le_bytes());
        bytes.extend_from_slice(&0_u16.to_le_bytes());
        bytes.extend_from_slice(&(28 + self.header_padding).to_le_bytes());
        bytes.extend_from_slice(&self.chunk_header_size().to_le_bytes());
        bytes.extend_from_slice(&self.block_size.to_le_bytes());
        bytes.extend_from_slice(&self.total_blocks.to_le_bytes());
        bytes.extend_from_slice(&total_chunks.to_le_bytes());
        bytes.extend_from_slice(&0_u32.to_le_bytes());
        bytes.extend(std::iter::repeat(0xee).take(self.header_padding as usize));

        for chunk in &self.chunks {
            bytes.extend_from_slice(chunk);
        }
        bytes
    }

    pub fn build_to(&self, path: &Path) {
        let mut file = File::create(path).unwrap();
        file.write_all(&self.build()).unwrap();
    }
}

/// A block of `len` bytes counting up from `start`.
pub fn counting(start: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| start.wrapping_add(i as u8)).collect()
}

pub fn read_file(path: &Path) -> Vec<u8> {
    let mut result = Vec::new();
    File::open(path).unwrap().read_to_end(&mut result).unwrap();
    result
}
