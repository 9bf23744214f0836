use std::io::Write;

use crate::error::{Error, Result};

/// Growable per-row output buffer with an explicit flush discipline.
///
/// Bytes accumulate for exactly one row. [`OutBuf::flush_row`] hands them to
/// the sink in a single `write` call and then releases the backing storage,
/// so peak memory is bounded by the largest single row at the price of one
/// fresh allocation per row.
#[derive(Debug)]
pub struct OutBuf<W> {
    sink: W,
    buf: Vec<u8>,
}

impl<W: Write> OutBuf<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buf: Vec::new(),
        }
    }

    /// Append one byte, growing the buffer geometrically.
    ///
    /// The first growth allocates at least 16 bytes, later growths double the
    /// capacity. Allocation failure aborts the process.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        if self.buf.len() == self.buf.capacity() {
            let grow = if self.buf.capacity() == 0 {
                16
            } else {
                self.buf.capacity()
            };
            self.buf.reserve_exact(grow);
        }
        self.buf.push(byte);
    }

    /// Write the accumulated row in one call and drop the backing storage.
    ///
    /// A short write is fatal: the sink is a regular file or pipe here, so a
    /// partial write would leave a torn row and there is no retry.
    pub fn flush_row(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        let written = self.sink.write(&self.buf)?;
        if written != self.buf.len() {
            return Err(Error::ShortWrite {
                expected: self.buf.len(),
                written,
            });
        }

        self.buf = Vec::new();
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn into_sink(self) -> W {
        self.sink
    }
}
