//! Backend message parsers.
//!
//! Parsers take the payload of one framed message and return either owned
//! summaries (auth codes, error fields) or borrowed descriptors into the
//! payload (`DataRow` columns).

use crate::error::{Error, Result, ServerError};
use crate::protocol::primitive::{read_cstr, read_int_2, read_int_4};

/// Authentication request carried by an `R` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequest {
    Ok,
    CleartextPassword,
    /// Anything this client does not speak; the code is kept for diagnostics.
    Unsupported { code: i32 },
}

impl AuthRequest {
    /// Human-readable name of an unsupported authentication code.
    pub fn name(code: i32) -> &'static str {
        match code {
            2 => "KerberosV5",
            5 => "MD5Password",
            7 => "GSS",
            8 => "GSSContinue",
            9 => "SSPI",
            10 => "SASL",
            11 => "SASLContinue",
            12 => "SASLFinal",
            _ => "unknown",
        }
    }
}

pub fn read_auth_request(payload: &[u8]) -> Result<AuthRequest> {
    let (code, _rest) = read_int_4(payload)?;
    Ok(match code {
        0 => AuthRequest::Ok,
        3 => AuthRequest::CleartextPassword,
        code => AuthRequest::Unsupported { code },
    })
}

/// One column descriptor inside a `DataRow` payload: the value's offset into
/// the payload plus its wire length, `-1` for NULL.
///
/// For a NULL column the offset is the position just past its length word, so
/// span arithmetic over a row stays total even with leading or trailing
/// NULLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCol {
    pub offset: usize,
    pub len: i32,
}

/// Parse a `DataRow` payload into `cols`, reusing its allocation.
pub fn read_data_row(payload: &[u8], cols: &mut Vec<RawCol>) -> Result<()> {
    cols.clear();

    let (count, mut rest) = read_int_2(payload)?;
    let mut offset = payload.len() - rest.len();

    for _ in 0..count {
        let (len, after_len) = read_int_4(rest)?;
        offset += 4;
        if len < 0 {
            cols.push(RawCol { offset, len: -1 });
            rest = after_len;
        } else {
            let value_len = len as usize;
            if after_len.len() < value_len {
                return Err(Error::InvalidMessage);
            }
            cols.push(RawCol { offset, len });
            rest = &after_len[value_len..];
            offset += value_len;
        }
    }

    if !rest.is_empty() {
        return Err(Error::InvalidMessage);
    }
    Ok(())
}

/// Parse a `RowDescription` payload, returning the column count after
/// validating the field walk.
pub fn read_row_description(payload: &[u8]) -> Result<usize> {
    let (count, mut rest) = read_int_2(payload)?;
    for _ in 0..count {
        let (_name, r) = read_cstr(rest)?;
        // table oid, attnum, type oid, typlen, typmod, format
        if r.len() < 18 {
            return Err(Error::InvalidMessage);
        }
        rest = &r[18..];
    }
    if !rest.is_empty() {
        return Err(Error::InvalidMessage);
    }
    Ok(count as usize)
}

/// Parse the fields of an `ErrorResponse` or `NoticeResponse` payload.
pub fn read_error_fields(payload: &[u8]) -> Result<ServerError> {
    let mut severity = String::new();
    let mut code = String::new();
    let mut message = String::new();

    let mut rest = payload;
    loop {
        let (&field_type, r) = rest.split_first().ok_or(Error::InvalidMessage)?;
        if field_type == 0 {
            break;
        }
        let (value, r) = read_cstr(r)?;
        let value = String::from_utf8_lossy(value).into_owned();
        match field_type {
            b'S' => severity = value,
            b'C' => code = value,
            b'M' => message = value,
            _ => {}
        }
        rest = r;
    }

    Ok(ServerError {
        severity,
        code,
        message,
    })
}

/// Parse a `ParameterStatus` payload into (name, value).
pub fn read_parameter_status(payload: &[u8]) -> Result<(&[u8], &[u8])> {
    let (name, rest) = read_cstr(payload)?;
    let (value, _rest) = read_cstr(rest)?;
    Ok((name, value))
}

/// Parse a `CommandComplete` payload into its command tag.
pub fn read_command_tag(payload: &[u8]) -> Result<&[u8]> {
    let (tag, _rest) = read_cstr(payload)?;
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_row(fields: &[Option<&[u8]>]) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&(fields.len() as u16).to_be_bytes());
        for field in fields {
            match field {
                None => payload.extend_from_slice(&(-1i32).to_be_bytes()),
                Some(v) => {
                    payload.extend_from_slice(&(v.len() as i32).to_be_bytes());
                    payload.extend_from_slice(v);
                }
            }
        }
        payload
    }

    #[test]
    fn data_row_descriptors_point_into_the_payload() {
        let payload = data_row(&[Some(b"abc"), None, Some(b"")]);
        let mut cols = Vec::new();
        read_data_row(&payload, &mut cols).unwrap();

        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], RawCol { offset: 6, len: 3 });
        assert_eq!(&payload[6..9], b"abc");
        // NULL sits just past its length word, zero bytes of value
        assert_eq!(cols[1], RawCol {
            offset: 13,
            len: -1
        });
        assert_eq!(cols[2], RawCol {
            offset: 17,
            len: 0
        });
    }

    #[test]
    fn data_row_rejects_truncated_values() {
        let mut payload = data_row(&[Some(b"abcdef")]);
        payload.truncate(payload.len() - 2);
        let mut cols = Vec::new();
        assert!(read_data_row(&payload, &mut cols).is_err());
    }

    #[test]
    fn data_row_rejects_trailing_garbage() {
        let mut payload = data_row(&[Some(b"x")]);
        payload.push(0xAA);
        let mut cols = Vec::new();
        assert!(read_data_row(&payload, &mut cols).is_err());
    }

    #[test]
    fn row_description_counts_columns() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&2u16.to_be_bytes());
        for name in [&b"id"[..], &b"name"[..]] {
            payload.extend_from_slice(name);
            payload.push(0);
            payload.extend_from_slice(&[0u8; 18]);
        }
        assert_eq!(read_row_description(&payload).unwrap(), 2);
    }

    #[test]
    fn error_fields_are_extracted() {
        let payload = b"SERROR\0C42601\0Msyntax error at or near \"frm\"\0Wsome context\0\0";
        let err = read_error_fields(payload).unwrap();
        assert_eq!(err.severity, "ERROR");
        assert_eq!(err.code, "42601");
        assert_eq!(err.message, "syntax error at or near \"frm\"");
    }

    #[test]
    fn auth_codes() {
        assert_eq!(
            read_auth_request(&0i32.to_be_bytes()).unwrap(),
            AuthRequest::Ok
        );
        assert_eq!(
            read_auth_request(&3i32.to_be_bytes()).unwrap(),
            AuthRequest::CleartextPassword
        );
        assert_eq!(
            read_auth_request(&10i32.to_be_bytes()).unwrap(),
            AuthRequest::Unsupported { code: 10 }
        );
        assert_eq!(AuthRequest::name(10), "SASL");
    }

    #[test]
    fn parameter_status_and_command_tag() {
        let (name, value) = read_parameter_status(b"server_version\017.2\0").unwrap();
        assert_eq!(name, b"server_version");
        assert_eq!(value, b"17.2");
        assert_eq!(read_command_tag(b"SELECT 3\0").unwrap(), b"SELECT 3");
    }
}
