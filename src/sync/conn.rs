use std::io::{BufReader, Read, Write};
use std::net::TcpStream;

use zerocopy::{FromZeros, IntoBytes};

use crate::error::{Error, Result};
use crate::opts::Opts;
use crate::protocol::backend::{self, AuthRequest, RawCol};
use crate::protocol::frontend;
use crate::protocol::message::{MessageHeader, tag};
use crate::source::{RawRow, ResultSet, RowSource, RowView};

/// Where the connection is within one query's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    Idle,
    QuerySent,
    StreamingRows,
    Complete,
}

/// What the message pump found next.
enum Advance {
    /// A `DataRow` payload is sitting in the read buffer.
    Row,
    /// The query is complete and the server is ready again.
    Done,
}

/// A blocking PostgreSQL connection speaking the v3 simple-query protocol.
///
/// All buffers are owned by the connection and reused across messages, so the
/// borrowed views handed out by [`RowSource::fetch_row`] and
/// [`RowSource::fetch_raw`] are invalidated by the next poll, exactly as
/// their lifetimes say.
pub struct Conn {
    stream: BufReader<TcpStream>,
    /// Payload of the last backend message.
    read_buffer: Vec<u8>,
    /// Reusable buffer for building outgoing messages.
    write_buffer: Vec<u8>,
    /// Materialized copy of the current row (single-row mode).
    row_buffer: Vec<u8>,
    /// Cell table for `row_buffer`.
    row_cells: Vec<Option<(usize, usize)>>,
    /// Column descriptors into `read_buffer` (raw mode).
    raw_cols: Vec<RawCol>,
    /// Column count of the active result set.
    num_cols: usize,
    /// Result sets seen since the last `send_query`.
    results_seen: usize,
    state: QueryState,
}

impl Conn {
    /// Connect and authenticate.
    ///
    /// Supports trust and cleartext password authentication; anything else
    /// fails with [`Error::UnsupportedAuth`].
    pub fn new(opts: &Opts) -> Result<Self> {
        let addr = format!("{}:{}", opts.host, opts.port);
        let stream = TcpStream::connect(&addr)?;
        stream.set_nodelay(true)?;

        let mut conn = Self {
            stream: BufReader::new(stream),
            read_buffer: Vec::new(),
            write_buffer: Vec::new(),
            row_buffer: Vec::new(),
            row_cells: Vec::new(),
            raw_cols: Vec::new(),
            num_cols: 0,
            results_seen: 0,
            state: QueryState::Idle,
        };
        conn.startup(opts)?;
        Ok(conn)
    }

    fn startup(&mut self, opts: &Opts) -> Result<()> {
        frontend::write_startup(&mut self.write_buffer, &opts.user, opts.database());
        self.write_payload()?;

        loop {
            match self.read_message()? {
                tag::AUTHENTICATION => match backend::read_auth_request(&self.read_buffer)? {
                    AuthRequest::Ok => {}
                    AuthRequest::CleartextPassword => {
                        let password = opts.password.as_deref().ok_or_else(|| {
                            Error::BadConfig(
                                "server requires a password but none was given".to_string(),
                            )
                        })?;
                        frontend::write_password(&mut self.write_buffer, password);
                        self.write_payload()?;
                    }
                    AuthRequest::Unsupported { code } => {
                        return Err(Error::UnsupportedAuth(format!(
                            "{} (code {code})",
                            AuthRequest::name(code)
                        )));
                    }
                },
                tag::BACKEND_KEY_DATA => {
                    tracing::debug!("backend key data received");
                }
                tag::PARAMETER_STATUS => {
                    let (name, value) = backend::read_parameter_status(&self.read_buffer)?;
                    tracing::debug!(
                        name = %String::from_utf8_lossy(name),
                        value = %String::from_utf8_lossy(value),
                        "server parameter"
                    );
                }
                tag::NOTICE_RESPONSE => {
                    let notice = backend::read_error_fields(&self.read_buffer)?;
                    tracing::warn!(%notice, "server notice");
                }
                tag::ERROR_RESPONSE => {
                    return Err(backend::read_error_fields(&self.read_buffer)?.into());
                }
                tag::READY_FOR_QUERY => return Ok(()),
                other => return Err(Error::UnexpectedMessage(other)),
            }
        }
    }

    /// Read one backend message into the read buffer; returns its tag.
    #[tracing::instrument(skip_all)]
    fn read_message(&mut self) -> Result<u8> {
        let mut header = MessageHeader::new_zeroed();
        self.stream.read_exact(header.as_mut_bytes())?;

        let payload_len = header.payload_len()?;
        self.read_buffer.clear();
        self.read_buffer.resize(payload_len, 0);
        self.stream.read_exact(&mut self.read_buffer)?;

        Ok(header.tag)
    }

    /// Write the prepared outgoing message in one piece.
    #[tracing::instrument(skip_all)]
    fn write_payload(&mut self) -> Result<()> {
        self.stream.get_mut().write_all(&self.write_buffer)?;
        self.stream.get_mut().flush()?;
        Ok(())
    }

    /// Pump messages until the next row or query completion.
    ///
    /// Anything other than the expected result-stream messages is terminal:
    /// a server error propagates as [`Error::Server`], an unknown tag as
    /// [`Error::UnexpectedMessage`].
    fn advance(&mut self) -> Result<Advance> {
        if matches!(self.state, QueryState::Idle | QueryState::Complete) {
            return Ok(Advance::Done);
        }

        loop {
            match self.read_message()? {
                tag::ROW_DESCRIPTION => {
                    self.num_cols = backend::read_row_description(&self.read_buffer)?;
                    self.results_seen += 1;
                    tracing::debug!(columns = self.num_cols, "result set started");
                }
                tag::DATA_ROW => {
                    self.state = QueryState::StreamingRows;
                    return Ok(Advance::Row);
                }
                tag::COMMAND_COMPLETE => {
                    let command = backend::read_command_tag(&self.read_buffer)?;
                    tracing::debug!(command = %String::from_utf8_lossy(command), "command complete");
                }
                tag::EMPTY_QUERY_RESPONSE => {}
                tag::READY_FOR_QUERY => {
                    self.state = QueryState::Complete;
                    return Ok(Advance::Done);
                }
                tag::NOTICE_RESPONSE => {
                    let notice = backend::read_error_fields(&self.read_buffer)?;
                    tracing::warn!(%notice, "server notice");
                }
                tag::PARAMETER_STATUS | tag::NOTIFICATION_RESPONSE => {}
                tag::ERROR_RESPONSE => {
                    return Err(backend::read_error_fields(&self.read_buffer)?.into());
                }
                other => return Err(Error::UnexpectedMessage(other)),
            }
        }
    }

    /// Parse the `DataRow` sitting in the read buffer into `raw_cols`.
    fn decode_current_row(&mut self) -> Result<()> {
        backend::read_data_row(&self.read_buffer, &mut self.raw_cols)?;
        if self.raw_cols.len() != self.num_cols {
            return Err(Error::ColumnCount {
                expected: self.num_cols,
                actual: self.raw_cols.len(),
            });
        }
        Ok(())
    }

    /// Send `Terminate` and shut the connection down.
    pub fn close(mut self) -> Result<()> {
        frontend::write_terminate(&mut self.write_buffer);
        self.write_payload()?;
        Ok(())
    }
}

impl RowSource for Conn {
    fn query_full(&mut self, sql: &str) -> Result<ResultSet> {
        self.send_query(sql)?;

        let mut result: Option<ResultSet> = None;
        loop {
            match self.advance()? {
                Advance::Row => {
                    self.decode_current_row()?;
                    match &mut result {
                        None => {
                            let mut set = ResultSet::new(self.num_cols);
                            set.push_row(RawRow::new(&self.read_buffer, &self.raw_cols).fields())?;
                            result = Some(set);
                        }
                        // only the first result set is materialized; rows of
                        // later statements are drained
                        Some(set) if self.results_seen == 1 => {
                            set.push_row(RawRow::new(&self.read_buffer, &self.raw_cols).fields())?;
                        }
                        Some(_) => {}
                    }
                }
                Advance::Done => {
                    return Ok(result.unwrap_or_else(|| ResultSet::new(self.num_cols)));
                }
            }
        }
    }

    fn send_query(&mut self, sql: &str) -> Result<()> {
        if matches!(self.state, QueryState::QuerySent | QueryState::StreamingRows) {
            return Err(Error::BadConfig(
                "a query is already streaming on this connection".to_string(),
            ));
        }

        frontend::write_query(&mut self.write_buffer, sql);
        self.write_payload()?;

        self.state = QueryState::QuerySent;
        self.num_cols = 0;
        self.results_seen = 0;
        Ok(())
    }

    fn fetch_row(&mut self) -> Result<Option<RowView<'_>>> {
        match self.advance()? {
            Advance::Done => Ok(None),
            Advance::Row => {
                self.decode_current_row()?;

                // materialize this row into the connection-owned row buffer;
                // the previous row's copy dies here
                self.row_buffer.clear();
                self.row_cells.clear();
                for col in &self.raw_cols {
                    if col.len < 0 {
                        self.row_cells.push(None);
                    } else {
                        let len = col.len as usize;
                        let start = self.row_buffer.len();
                        self.row_buffer
                            .extend_from_slice(&self.read_buffer[col.offset..col.offset + len]);
                        self.row_cells.push(Some((start, len)));
                    }
                }

                Ok(Some(RowView::new(&self.row_buffer, &self.row_cells)))
            }
        }
    }

    #[cfg(feature = "raw-rows")]
    fn fetch_raw(&mut self) -> Result<Option<RawRow<'_>>> {
        match self.advance()? {
            Advance::Done => Ok(None),
            Advance::Row => {
                self.decode_current_row()?;
                Ok(Some(RawRow::new(&self.read_buffer, &self.raw_cols)))
            }
        }
    }
}
