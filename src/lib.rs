//! Dump PostgreSQL query results to stdout as `COPY`-style text, comparing
//! four strategies for pulling rows out of the connection: full
//! materialization, row-by-row materialization, zero-copy reads from the wire
//! decode buffer, and a minimal per-row copy of that buffer.
//!
//! The acquisition boundary is the [`source::RowSource`] trait; the shipped
//! implementation is the blocking [`sync::Conn`] speaking the v3 simple-query
//! protocol.

pub mod emit;
pub mod error;
pub mod escape;
pub mod outbuf;
pub mod protocol;
pub mod source;
pub mod strategy;
pub mod sync;

mod opts;

pub use opts::Opts;
