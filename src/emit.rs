use std::io::Write;

use crate::error::Result;
use crate::escape::escape_into;
use crate::outbuf::OutBuf;

/// Serializes rows into `COPY`-style text: tab-separated fields, `\N` for
/// NULL, one newline-terminated line and exactly one flush per row.
pub struct RowEmitter<W: Write> {
    out: OutBuf<W>,
    /// Diagnostic only; reset when a query completes.
    rows: u64,
}

impl<W: Write> RowEmitter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            out: OutBuf::new(sink),
            rows: 0,
        }
    }

    /// Serialize one row. `None` is a NULL field, `Some` an opaque byte span.
    ///
    /// The row's bytes reach the sink in a single write, never interleaved
    /// with another row's.
    pub fn emit_row<'a, I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        self.rows += 1;

        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.out.push(b'\t');
            }
            match field {
                None => {
                    self.out.push(b'\\');
                    self.out.push(b'N');
                }
                Some(value) => escape_into(&mut self.out, value),
            }
        }

        self.out.push(b'\n');
        self.out.flush_row()
    }

    /// Mark the end of a query: log and reset the diagnostic row counter.
    pub fn finish_query(&mut self) {
        tracing::debug!(rows = self.rows, "query complete");
        self.rows = 0;
    }

    pub fn rows_emitted(&self) -> u64 {
        self.rows
    }

    pub fn into_sink(self) -> W {
        self.out.into_sink()
    }
}
