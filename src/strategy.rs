use std::io::Write;

use crate::emit::RowEmitter;
use crate::error::Result;
use crate::source::RowSource;

/// How rows are pulled out of the connection.
///
/// All four produce byte-identical output for the same result set; they
/// differ in materialization granularity and copy count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Materialize the entire result set, then emit.
    #[default]
    Full,
    /// One materialized row per poll.
    SingleRow,
    /// Read column spans straight out of the decode buffer.
    ZeroCopy,
    /// Like zero-copy, plus a minimal per-row copy before serializing.
    FakeCopy,
}

impl Strategy {
    /// Run one query to completion, feeding every row to the emitter.
    pub fn run<S, W>(self, source: &mut S, sql: &str, emitter: &mut RowEmitter<W>) -> Result<()>
    where
        S: RowSource,
        W: Write,
    {
        match self {
            Strategy::Full => run_full(source, sql, emitter),
            Strategy::SingleRow => run_single_row(source, sql, emitter),
            Strategy::ZeroCopy => run_zero_copy(source, sql, emitter),
            Strategy::FakeCopy => run_fake_copy(source, sql, emitter),
        }
    }
}

fn run_full<S, W>(source: &mut S, sql: &str, emitter: &mut RowEmitter<W>) -> Result<()>
where
    S: RowSource,
    W: Write,
{
    let result = source.query_full(sql)?;
    for row in 0..result.num_rows() {
        emitter.emit_row(result.row(row))?;
    }
    emitter.finish_query();
    Ok(())
}

fn run_single_row<S, W>(source: &mut S, sql: &str, emitter: &mut RowEmitter<W>) -> Result<()>
where
    S: RowSource,
    W: Write,
{
    source.send_query(sql)?;
    // each view must be fully serialized before the next poll reuses the
    // row buffer; the borrow ends with the loop body
    while let Some(row) = source.fetch_row()? {
        emitter.emit_row(row.fields())?;
    }
    emitter.finish_query();
    Ok(())
}

fn run_zero_copy<S, W>(source: &mut S, sql: &str, emitter: &mut RowEmitter<W>) -> Result<()>
where
    S: RowSource,
    W: Write,
{
    source.send_query(sql)?;
    while let Some(raw) = source.fetch_raw()? {
        emitter.emit_row(raw.fields())?;
    }
    emitter.finish_query();
    Ok(())
}

fn run_fake_copy<S, W>(source: &mut S, sql: &str, emitter: &mut RowEmitter<W>) -> Result<()>
where
    S: RowSource,
    W: Write,
{
    source.send_query(sql)?;
    while let Some(raw) = source.fetch_raw()? {
        let snapshot = raw.snapshot();
        emitter.emit_row(snapshot.fields())?;
        // snapshot dropped here, before the next poll
    }
    emitter.finish_query();
    Ok(())
}
