//! The row-acquisition boundary between the strategies and a connection.
//!
//! The four strategies differ only in the lifetime and ownership of field
//! memory, so the distinction is made at the type level:
//!
//! - [`ResultSet`] owns every row for the whole query (full materialization),
//! - [`RowView`] borrows one materialized row from the connection, valid
//!   until the next poll,
//! - [`RawRow`] borrows column descriptors straight out of the connection's
//!   decode buffer, also valid until the next poll,
//! - [`RowSnapshot`] owns a minimal copy of one raw row and is dropped as
//!   soon as the row has been serialized.

use crate::error::{Error, Result};

pub use crate::protocol::backend::RawCol;

/// A source of rows for one query at a time.
///
/// Full materialization and row-by-row polling are mandatory capabilities;
/// direct descriptor access ([`RowSource::fetch_raw`]) is optional, and its
/// default body reports the capability as absent so callers fail fast instead
/// of silently falling back.
pub trait RowSource {
    /// Execute `sql`, materializing the entire result set before returning.
    fn query_full(&mut self, sql: &str) -> Result<ResultSet>;

    /// Send `sql` and switch the connection into row-by-row delivery.
    fn send_query(&mut self, sql: &str) -> Result<()>;

    /// Poll for the next row as a one-row materialized view.
    ///
    /// Returns `Ok(None)` once the query is complete. The view borrows the
    /// connection's row buffer, so it cannot outlive the next poll.
    fn fetch_row(&mut self) -> Result<Option<RowView<'_>>>;

    /// Poll for the next row as raw descriptors into the decode buffer.
    ///
    /// The buffer may be overwritten in place by the next poll; every column
    /// must be read before polling again (the borrow enforces this).
    fn fetch_raw(&mut self) -> Result<Option<RawRow<'_>>> {
        Err(Error::RawAccessUnsupported)
    }
}

/// A fully materialized result set: one data arena plus a row-major cell
/// table. Field memory is valid for the set's whole lifetime.
#[derive(Debug)]
pub struct ResultSet {
    num_cols: usize,
    /// Row-major; `None` is NULL, `Some((offset, len))` indexes into `data`.
    cells: Vec<Option<(usize, usize)>>,
    data: Vec<u8>,
}

impl ResultSet {
    pub fn new(num_cols: usize) -> Self {
        Self {
            num_cols,
            cells: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        if self.num_cols == 0 {
            0
        } else {
            self.cells.len() / self.num_cols
        }
    }

    /// Append one row, copying its field bytes into the arena.
    pub fn push_row<'a, I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        let before = self.cells.len();
        for field in fields {
            match field {
                None => self.cells.push(None),
                Some(value) => {
                    let offset = self.data.len();
                    self.data.extend_from_slice(value);
                    self.cells.push(Some((offset, value.len())));
                }
            }
        }
        let pushed = self.cells.len() - before;
        if pushed != self.num_cols {
            self.cells.truncate(before);
            return Err(Error::ColumnCount {
                expected: self.num_cols,
                actual: pushed,
            });
        }
        Ok(())
    }

    /// One cell; `None` is NULL. An empty span is `Some(b"")`, never `None`.
    pub fn value(&self, row: usize, col: usize) -> Option<&[u8]> {
        self.cells[row * self.num_cols + col].map(|(offset, len)| &self.data[offset..offset + len])
    }

    /// Iterate one row's fields in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<&[u8]>> {
        (0..self.num_cols).map(move |col| self.value(row, col))
    }
}

/// One materialized row borrowed from the connection's row buffer.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    buf: &'a [u8],
    cells: &'a [Option<(usize, usize)>],
}

impl<'a> RowView<'a> {
    pub fn new(buf: &'a [u8], cells: &'a [Option<(usize, usize)>]) -> Self {
        Self { buf, cells }
    }

    pub fn num_cols(&self) -> usize {
        self.cells.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Option<&'a [u8]>> {
        let buf = self.buf;
        self.cells
            .iter()
            .map(move |cell| cell.map(|(offset, len)| &buf[offset..offset + len]))
    }
}

/// Column descriptors pointing straight into the connection's decode buffer.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    buf: &'a [u8],
    cols: &'a [RawCol],
}

impl<'a> RawRow<'a> {
    pub fn new(buf: &'a [u8], cols: &'a [RawCol]) -> Self {
        Self { buf, cols }
    }

    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    pub fn field(&self, col: usize) -> Option<&'a [u8]> {
        let col = self.cols[col];
        if col.len < 0 {
            None
        } else {
            Some(&self.buf[col.offset..col.offset + col.len as usize])
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Option<&'a [u8]>> {
        let this = *self;
        (0..self.cols.len()).map(move |col| this.field(col))
    }

    /// Minimal byte range covering all of the row's columns: from the first
    /// column's value to the end of the last column's value. NULL and
    /// zero-length columns contribute no bytes.
    pub fn span(&self) -> std::ops::Range<usize> {
        match (self.cols.first(), self.cols.last()) {
            (Some(first), Some(last)) => first.offset..last.offset + last.len.max(0) as usize,
            _ => 0..0,
        }
    }

    /// Copy the spanning range and rebase the descriptors onto the copy.
    pub fn snapshot(&self) -> RowSnapshot<'a> {
        let span = self.span();
        RowSnapshot {
            base: span.start,
            data: self.buf[span].to_vec(),
            cols: self.cols,
        }
    }
}

/// An owned copy of one raw row's spanning byte range.
///
/// The descriptors still carry their original offsets; each field is re-based
/// by subtracting the span start. Exactness of that arithmetic is what makes
/// non-leading columns read the right bytes.
#[derive(Debug)]
pub struct RowSnapshot<'a> {
    base: usize,
    data: Vec<u8>,
    cols: &'a [RawCol],
}

impl RowSnapshot<'_> {
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    pub fn field(&self, col: usize) -> Option<&[u8]> {
        let col = self.cols[col];
        if col.len < 0 {
            None
        } else {
            let start = col.offset - self.base;
            Some(&self.data[start..start + col.len as usize])
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Option<&[u8]>> {
        (0..self.cols.len()).map(move |col| self.field(col))
    }
}
