//! Refillable read buffer with an absolute byte cursor.

use std::io::{self, Read};

/// Bytes requested from the reader per refill.
const CHUNK_SIZE: usize = 64 * 1024;

/// Largest single refill. The buffer grows only as bytes arrive, so a corrupt
/// length never allocates ahead of the data.
const MAX_REFILL: usize = 16 * CHUNK_SIZE;

/// Sliding window over a byte source.
///
/// `pos` indexes the first unconsumed byte of `buf`; `base` is the stream
/// offset of `buf[0]`. Consumed bytes are dropped lazily when a refill needs
/// room, so a unit's bytes stay addressable until the decoder consumes it.
pub(crate) struct StreamBuffer<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    base: u64,
    eof: bool,
}

impl<R: Read> StreamBuffer<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pos: 0,
            base: 0,
            eof: false,
        }
    }

    /// Stream offset of the first unconsumed byte.
    #[inline]
    pub(crate) fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Unconsumed bytes currently buffered.
    #[inline]
    pub(crate) fn available(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    #[inline]
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.buf.len() - self.pos);
        self.pos += n;
    }

    /// Drop everything buffered.
    pub(crate) fn consume_all(&mut self) {
        self.pos = self.buf.len();
    }

    /// Read until at least `n` bytes are available or the source is exhausted.
    ///
    /// Returns whether `n` bytes are available.
    pub(crate) fn fill_to(&mut self, n: usize) -> io::Result<bool> {
        while self.available().len() < n {
            if self.eof {
                return Ok(false);
            }
            self.compact();
            let start = self.buf.len();
            let want = (n - self.available().len()).clamp(CHUNK_SIZE, MAX_REFILL);
            self.buf.resize(start + want, 0);
            let read = loop {
                match self.reader.read(&mut self.buf[start..]) {
                    Ok(read) => break read,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.buf.truncate(start);
                        return Err(e);
                    }
                }
            };
            self.buf.truncate(start + read);
            if read == 0 {
                self.eof = true;
            }
        }
        Ok(true)
    }

    /// Whether the source is exhausted and nothing is left unconsumed.
    pub(crate) fn at_end(&mut self) -> io::Result<bool> {
        Ok(!self.fill_to(1)?)
    }

    fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        self.buf.drain(..self.pos);
        self.base += self.pos as u64;
        self.pos = 0;
    }
}
