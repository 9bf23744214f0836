//! PostgreSQL v3 wire messages, sans-I/O.
//!
//! Frontend writers build complete messages into a caller-supplied buffer;
//! backend parsers work on the payload of one already-framed message and
//! return borrowed views into it. All I/O lives in [`crate::sync`].

pub mod backend;
pub mod frontend;
pub mod message;
pub mod primitive;

pub use message::MessageHeader;
