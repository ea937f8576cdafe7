//! Expansion of Android sparse images into raw block images.

pub mod constants;
pub mod headers;
pub mod image;
pub mod result;
pub mod sniff;

mod decoder;
mod ext;

pub use decoder::{Decoder, Summary};
pub use headers::{ChunkHeader, ChunkType, SparseHeader};
pub use image::Image;
pub use result::{Error, Result, Section};
pub use sniff::{is_sparse, is_sparse_image};
