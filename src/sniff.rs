//! Best-effort detection of sparse files.
//!
//! These checks only look at the magic number. A positive answer does not
//! mean the rest of the file parses.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::constants::FILE_MAGIC;

/// Returns whether `r` starts with the sparse file magic. Any read failure,
/// including a short read, counts as "not sparse".
pub fn is_sparse<R: Read>(mut r: R) -> bool {
    let mut magic = [0; 4];
    match r.read_exact(&mut magic) {
        Ok(()) => u32::from_le_bytes(magic) == FILE_MAGIC,
        Err(_) => false,
    }
}

/// Returns whether the file at `path` starts with the sparse file magic.
pub fn is_sparse_image<P: AsRef<Path>>(path: P) -> bool {
    match File::open(path) {
        Ok(file) => is_sparse(file),
        Err(_) => false,
    }
}
