use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{DecodeError, Result};

/// Initial capacity for `read_bytes`; larger reads grow as data arrives.
const READ_CHUNK: usize = 64 * 1024;

/// Sequential big-endian reader over any byte source.
///
/// Every decoder in this crate reads through one of these. Reads never seek;
/// `offset()` is the number of bytes consumed so far and is carried into
/// truncation errors so a bad file can be located with a hex dump.
pub struct ByteOrderReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteOrderReader<R> {
    pub fn new(inner: R) -> Self {
        ByteOrderReader { inner, offset: 0 }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads 4 bytes, most-significant first, regardless of host byte order.
    pub fn read_u32_be(&mut self, what: &'static str) -> Result<u32> {
        let at = self.offset;
        let value = self
            .inner
            .read_u32::<BigEndian>()
            .map_err(|e| classify(e, what, at, 4))?;
        self.offset += 4;
        Ok(value)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        let at = self.offset;
        let value = self.inner.read_u8().map_err(|e| classify(e, what, at, 1))?;
        self.offset += 1;
        Ok(value)
    }

    /// Fills `buf` completely or fails with `Truncated`.
    pub fn read_into(&mut self, buf: &mut [u8], what: &'static str) -> Result<()> {
        let at = self.offset;
        self.inner
            .read_exact(buf)
            .map_err(|e| classify(e, what, at, buf.len()))?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    /// Reads exactly `n` bytes into a fresh buffer.
    ///
    /// The buffer grows with the bytes actually read, so a header that
    /// declares more data than the source holds fails with `Truncated`
    /// instead of allocating the declared size up front.
    pub fn read_bytes(&mut self, n: usize, what: &'static str) -> Result<Vec<u8>> {
        let at = self.offset;
        let mut buf = Vec::with_capacity(n.min(READ_CHUNK));
        let got = (&mut self.inner)
            .take(n as u64)
            .read_to_end(&mut buf)
            .map_err(|source| DecodeError::Read { offset: at, source })?;
        self.offset += got as u64;
        if got < n {
            return Err(DecodeError::Truncated { what, offset: self.offset, needed: n - got });
        }
        Ok(buf)
    }
}

fn classify(err: io::Error, what: &'static str, offset: u64, needed: usize) -> DecodeError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        DecodeError::Truncated { what, offset, needed }
    } else {
        DecodeError::Read { offset, source: err }
    }
}
