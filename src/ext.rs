//! I/O helpers shared by the header and chunk readers.

use std::io::{self, ErrorKind, Read};

/// A reader that remembers how many bytes have been pulled through it, so
/// errors can point at an input offset without requiring `Seek`.
#[derive(Debug)]
pub(crate) struct Tracked<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> Tracked<R> {
    pub(crate) fn new(inner: R, pos: u64) -> Self {
        Self { inner, pos }
    }

    pub(crate) fn pos(&self) -> u64 {
        self.pos
    }
}

impl<R: Read> Read for Tracked<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

/// Reads into `buf` until it is full or the reader hits EOF, returning the
/// number of bytes read.
pub(crate) fn read_all<R: Read>(mut r: R, mut buf: &mut [u8]) -> io::Result<usize> {
    let buf_size = buf.len();

    while !buf.is_empty() {
        match r.read(buf) {
            Ok(0) => break,
            Ok(n) => {
                let tmp = buf;
                buf = &mut tmp[n..];
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => (),
            Err(e) => return Err(e),
        };
    }

    Ok(buf_size - buf.len())
}

/// Consumes and discards exactly `n` bytes.
pub(crate) fn skip<R: Read>(r: R, n: u64) -> io::Result<()> {
    let skipped = io::copy(&mut r.take(n), &mut io::sink())?;
    if skipped != n {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}
