use thiserror::Error;

/// An error reported by the server through an `ErrorResponse` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub severity: String,
    /// SQLSTATE code.
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.code)
    }
}

impl std::error::Error for ServerError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad config error: {0}")]
    BadConfig(String),

    #[error("Invalid message from server")]
    InvalidMessage,

    #[error("Unexpected message from server: tag {0:#04x}")]
    UnexpectedMessage(u8),

    #[error("Unsupported authentication method: {0}")]
    UnsupportedAuth(String),

    #[error("Column count mismatch: expected {expected}, got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    #[error("Direct row access is not supported by this connection")]
    RawAccessUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;
