//! Big-endian read helpers over message payloads.
//!
//! Each helper consumes from the front of a slice and returns the value plus
//! the remaining bytes.

use crate::error::{Error, Result};

pub fn read_int_2(data: &[u8]) -> Result<(u16, &[u8])> {
    if data.len() < 2 {
        return Err(Error::InvalidMessage);
    }
    let (bytes, rest) = data.split_at(2);
    Ok((u16::from_be_bytes([bytes[0], bytes[1]]), rest))
}

pub fn read_int_4(data: &[u8]) -> Result<(i32, &[u8])> {
    if data.len() < 4 {
        return Err(Error::InvalidMessage);
    }
    let (bytes, rest) = data.split_at(4);
    Ok((
        i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        rest,
    ))
}

/// Read a NUL-terminated string, returning it without the terminator.
pub fn read_cstr(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::InvalidMessage)?;
    Ok((&data[..nul], &data[nul + 1..]))
}
