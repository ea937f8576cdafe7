//! Output sinks for expanded images.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, ErrorKind, Seek, Write};

/// A seekable byte sink that can be sized up front.
///
/// After `set_size(n)` every byte in `0..n` that has not been written must
/// read back as zero.
pub trait Image: Write + Seek {
    fn set_size(&mut self, size: u64) -> io::Result<()>;
}

impl Image for File {
    fn set_size(&mut self, size: u64) -> io::Result<()> {
        self.set_len(size)
    }
}

fn vec_len(size: u64) -> io::Result<usize> {
    usize::try_from(size).map_err(|_| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("image size {} does not fit in memory", size),
        )
    })
}

impl Image for Cursor<Vec<u8>> {
    fn set_size(&mut self, size: u64) -> io::Result<()> {
        let len = vec_len(size)?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

impl Image for Cursor<&mut Vec<u8>> {
    fn set_size(&mut self, size: u64) -> io::Result<()> {
        let len = vec_len(size)?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

impl<W: Image> Image for BufWriter<W> {
    fn set_size(&mut self, size: u64) -> io::Result<()> {
        self.flush()?;
        self.get_mut().set_size(size)
    }
}

impl<T: Image + ?Sized> Image for &mut T {
    fn set_size(&mut self, size: u64) -> io::Result<()> {
        (**self).set_size(size)
    }
}
