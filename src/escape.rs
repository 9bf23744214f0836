use std::io::Write;

use crate::outbuf::OutBuf;

/// Escape one value span into the output buffer using the `COPY` text rules.
///
/// Backslash, tab, newline, and carriage return become the two-byte escapes
/// `\\`, `\t`, `\n`, `\r`; every other byte passes through unchanged. Total
/// over all byte values, no error conditions.
pub fn escape_into<W: Write>(out: &mut OutBuf<W>, value: &[u8]) {
    for &byte in value {
        match byte {
            b'\\' => {
                out.push(b'\\');
                out.push(b'\\');
            }
            b'\t' => {
                out.push(b'\\');
                out.push(b't');
            }
            b'\n' => {
                out.push(b'\\');
                out.push(b'n');
            }
            b'\r' => {
                out.push(b'\\');
                out.push(b'r');
            }
            _ => out.push(byte),
        }
    }
}
