use zerocopy::byteorder::big_endian::U32 as U32BE;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// PostgreSQL message header (zero-copy).
///
/// Layout matches the v3 wire protocol:
/// - tag: 1 byte
/// - length: 4 bytes (big-endian, counts itself but not the tag)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct MessageHeader {
    pub tag: u8,
    length: U32BE,
}

impl MessageHeader {
    pub fn encode(tag: u8, payload_len: usize) -> Self {
        Self {
            tag,
            length: U32BE::new(payload_len as u32 + 4),
        }
    }

    /// Number of payload bytes following the header.
    pub fn payload_len(&self) -> Result<usize> {
        let length = self.length.get() as usize;
        if length < 4 {
            return Err(Error::InvalidMessage);
        }
        Ok(length - 4)
    }
}

/// Backend message tags.
pub mod tag {
    pub const AUTHENTICATION: u8 = b'R';
    pub const BACKEND_KEY_DATA: u8 = b'K';
    pub const PARAMETER_STATUS: u8 = b'S';
    pub const READY_FOR_QUERY: u8 = b'Z';
    pub const ROW_DESCRIPTION: u8 = b'T';
    pub const DATA_ROW: u8 = b'D';
    pub const COMMAND_COMPLETE: u8 = b'C';
    pub const EMPTY_QUERY_RESPONSE: u8 = b'I';
    pub const ERROR_RESPONSE: u8 = b'E';
    pub const NOTICE_RESPONSE: u8 = b'N';
    pub const NOTIFICATION_RESPONSE: u8 = b'A';
}
