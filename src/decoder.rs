use std::io::{self, Read, SeekFrom};

use log::{debug, info, warn};

use crate::ext::Tracked;
use crate::headers::{ChunkHeader, ChunkType, SparseHeader};
use crate::image::Image;
use crate::result::{Error, Result, Section};

/// Outcome of a successful conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Number of chunk records that were decoded.
    pub chunks: u32,
    /// Number of chunk records the header declared.
    pub total_chunks: u32,
    /// Size of the expanded image in bytes.
    pub image_size: u64,
}

impl Summary {
    /// Whether the input ended before the declared number of chunks.
    pub fn stopped_early(&self) -> bool {
        self.chunks < self.total_chunks
    }
}

/// Expands a sparse file into a raw image.
///
/// The header is parsed by [`Decoder::new`], so callers can inspect it
/// before creating any output.
#[derive(Debug)]
pub struct Decoder<R> {
    src: Tracked<R>,
    header: SparseHeader,
}

impl<R: Read> Decoder<R> {
    pub fn new(mut r: R) -> Result<Self> {
        let header = SparseHeader::read_from(&mut r)?;
        debug!("Sparse header: {:?}", header);

        let src = Tracked::new(r, u64::from(header.file_header_size));
        Ok(Self { src, header })
    }

    pub fn header(&self) -> &SparseHeader {
        &self.header
    }

    /// Writes the expanded image into `dst`, which is first resized to
    /// `block_size * total_blocks` bytes.
    pub fn decode<W: Image>(self, dst: W) -> Result<Summary> {
        self.decode_with_progress(dst, |_, _| ())
    }

    /// Like [`Decoder::decode`], calling `progress(processed, total)` after
    /// every chunk.
    pub fn decode_with_progress<W, F>(mut self, mut dst: W, mut progress: F) -> Result<Summary>
    where
        W: Image,
        F: FnMut(u32, u32),
    {
        let image_size = self.header.image_size();
        dst.set_size(image_size)?;

        let total_chunks = self.header.total_chunks;
        let mut chunks = 0;
        let mut cursor = 0_u64;
        for index in 0..total_chunks {
            let offset = self.src.pos();
            let chunk = match ChunkHeader::read_from(
                &mut self.src,
                self.header.chunk_header_size,
                index,
                offset,
            )? {
                Some(chunk) => chunk,
                None => {
                    warn!(
                        "Input ended after {} of {} chunks",
                        chunks, total_chunks
                    );
                    break;
                }
            };

            let span = u64::from(chunk.block_count) * u64::from(self.header.block_size);
            self.write_chunk(&chunk, index, cursor, &mut dst)?;

            cursor = cursor.saturating_add(span);
            chunks += 1;
            progress(chunks, total_chunks);
        }

        dst.flush()?;

        let summary = Summary {
            chunks,
            total_chunks,
            image_size,
        };
        info!(
            "Decoded {} chunks into {} blocks of {} bytes",
            summary.chunks, self.header.total_blocks, self.header.block_size
        );
        Ok(summary)
    }

    fn write_chunk<W: Image>(
        &mut self,
        chunk: &ChunkHeader,
        index: u32,
        cursor: u64,
        dst: &mut W,
    ) -> Result<()> {
        let chunk_type = ChunkType::try_from(chunk.chunk_type).map_err(|chunk_type| {
            Error::UnrecognizedChunkType { index, chunk_type }
        })?;
        debug!(
            "Chunk #{}: {:?}, {} blocks at output offset {}",
            index, chunk_type, chunk.block_count, cursor
        );

        match chunk_type {
            ChunkType::Raw => self.write_raw(chunk, index, cursor, dst),
            ChunkType::Fill => self.write_fill(chunk, index, cursor, dst),
            ChunkType::DontCare => Ok(()),
            ChunkType::Crc32 => {
                let offset = self.src.pos();
                let mut crc = [0; 4];
                self.src
                    .read_exact(&mut crc)
                    .map_err(|e| Error::truncated(e, Section::Crc32Value { index }, offset))?;
                debug!("Chunk #{}: skipping crc32 {:#010x}", index, u32::from_le_bytes(crc));
                Ok(())
            }
        }
    }

    fn write_raw<W: Image>(
        &mut self,
        chunk: &ChunkHeader,
        index: u32,
        cursor: u64,
        dst: &mut W,
    ) -> Result<()> {
        let chunk_header_size = self.header.chunk_header_size;
        let len = chunk
            .total_size
            .checked_sub(u32::from(chunk_header_size))
            .ok_or(Error::InvalidRawSize {
                index,
                total_size: chunk.total_size,
                chunk_header_size,
            })?;
        let len = u64::from(len);
        self.check_bounds(index, cursor, len)?;

        let offset = self.src.pos();
        dst.seek(SeekFrom::Start(cursor))?;
        let copied = io::copy(&mut (&mut self.src).take(len), dst)?;
        if copied < len {
            return Err(Error::TruncatedInput {
                section: Section::RawPayload { index },
                offset,
            });
        }

        Ok(())
    }

    fn write_fill<W: Image>(
        &mut self,
        chunk: &ChunkHeader,
        index: u32,
        cursor: u64,
        dst: &mut W,
    ) -> Result<()> {
        let offset = self.src.pos();
        let mut pattern = [0; 4];
        self.src
            .read_exact(&mut pattern)
            .map_err(|e| Error::truncated(e, Section::FillPattern { index }, offset))?;

        let block_size = u64::from(self.header.block_size);
        self.check_bounds(index, cursor, u64::from(chunk.block_count) * block_size)?;
        if chunk.block_count == 0 {
            return Ok(());
        }

        let block = fill_block(pattern, self.header.block_size)?;
        dst.seek(SeekFrom::Start(cursor))?;
        for _ in 0..chunk.block_count {
            dst.write_all(&block)?;
        }

        Ok(())
    }

    fn check_bounds(&self, index: u32, cursor: u64, len: u64) -> Result<()> {
        let image_size = self.header.image_size();
        let end = cursor.saturating_add(len);
        if len > 0 && end > image_size {
            return Err(Error::OutOfBounds {
                index,
                end,
                image_size,
            });
        }
        Ok(())
    }
}

/// Builds one block of `pattern` repeated, cutting the last repetition
/// short when `block_size` is not a multiple of 4.
fn fill_block(pattern: [u8; 4], block_size: u32) -> Result<Vec<u8>> {
    let len = usize::try_from(block_size).map_err(|_| Error::InvalidBlockSize(block_size))?;
    Ok(pattern.iter().copied().cycle().take(len).collect())
}
