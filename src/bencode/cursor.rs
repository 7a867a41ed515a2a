use std::io::{self, BufRead, Read};

use bytes::Bytes;

use super::error::{BencodeError, ErrorKind};

/// Offset-tracked reads over a buffered byte source.
///
/// All reads go through [`BufRead::fill_buf`], so a source that hands out a
/// few bytes at a time is handled the same as an in-memory slice. The offset
/// is the absolute position of the next unread byte and is what every error
/// raised here is located at.
pub struct ByteCursor<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the next byte without consuming it.
    pub fn peek_byte(&mut self) -> Result<u8, BencodeError> {
        let next = self.fill()?.first().copied();
        next.ok_or_else(|| self.error(ErrorKind::UnexpectedEnd))
    }

    /// Consumes and returns one byte.
    pub fn next_byte(&mut self) -> Result<u8, BencodeError> {
        let b = self.peek_byte()?;
        self.inner.consume(1);
        self.offset += 1;
        Ok(b)
    }

    /// Consumes exactly `n` bytes.
    ///
    /// The buffer grows with the data actually read, so a bogus length on a
    /// short input fails with `UnexpectedEnd` instead of allocating `n` bytes.
    pub fn read_exact(&mut self, n: usize) -> Result<Bytes, BencodeError> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(n as u64).read_to_end(&mut buf);
        self.offset += buf.len() as u64;
        read.map_err(|e| self.error(ErrorKind::Io(e)))?;

        if buf.len() < n {
            return Err(self.error(ErrorKind::UnexpectedEnd));
        }
        Ok(Bytes::from(buf))
    }

    /// Consumes bytes up to and including `delim`.
    pub fn read_until(&mut self, delim: u8) -> Result<Vec<u8>, BencodeError> {
        self.read_until_within(delim, usize::MAX)
    }

    /// Like [`read_until`](Self::read_until), but stops after `limit` bytes.
    ///
    /// If the delimiter is not among the first `limit` bytes, the returned run
    /// does not end with `delim` and the cursor sits right after it.
    pub fn read_until_within(&mut self, delim: u8, limit: usize) -> Result<Vec<u8>, BencodeError> {
        let mut out = Vec::new();
        loop {
            let remaining = limit - out.len();
            let buf = self.fill()?;
            if buf.is_empty() {
                return Err(self.error(ErrorKind::UnexpectedEnd));
            }

            let window = &buf[..buf.len().min(remaining)];
            let (used, found) = match window.iter().position(|&b| b == delim) {
                Some(i) => (i + 1, true),
                None => (window.len(), false),
            };
            out.extend_from_slice(&window[..used]);
            self.inner.consume(used);
            self.offset += used as u64;

            if found || out.len() >= limit {
                return Ok(out);
            }
        }
    }

    /// Returns `true` if the source has no more bytes.
    pub fn is_at_end(&mut self) -> Result<bool, BencodeError> {
        Ok(self.fill()?.is_empty())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> BencodeError {
        BencodeError::new(self.offset, kind)
    }

    fn fill(&mut self) -> Result<&[u8], BencodeError> {
        let available = loop {
            match self.inner.fill_buf() {
                Ok(buf) => break buf.len(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BencodeError::new(self.offset, ErrorKind::Io(e))),
            }
        };
        if available == 0 {
            return Ok(&[]);
        }
        // The buffer is non-empty, so this call does not read the source again.
        self.inner
            .fill_buf()
            .map_err(|e| BencodeError::new(self.offset, ErrorKind::Io(e)))
    }
}
