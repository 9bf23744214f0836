//! Frontend message writers.
//!
//! Each writer clears the supplied buffer and leaves one complete, framed
//! message in it, ready to hand to the stream in a single write.

/// Protocol version 3.0.
const PROTOCOL_VERSION: i32 = 196608;

/// Build the (untagged) startup message: protocol version plus the `user` and
/// `database` parameters.
pub fn write_startup(out: &mut Vec<u8>, user: &str, database: &str) {
    out.clear();
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&PROTOCOL_VERSION.to_be_bytes());
    for (key, value) in [("user", user), ("database", database)] {
        out.extend_from_slice(key.as_bytes());
        out.push(0);
        out.extend_from_slice(value.as_bytes());
        out.push(0);
    }
    out.push(0);
    patch_length(out, 0);
}

/// Build a simple `Query` message.
pub fn write_query(out: &mut Vec<u8>, sql: &str) {
    out.clear();
    out.push(b'Q');
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(sql.as_bytes());
    out.push(0);
    patch_length(out, 1);
}

/// Build a `PasswordMessage` (cleartext authentication).
pub fn write_password(out: &mut Vec<u8>, password: &str) {
    out.clear();
    out.push(b'p');
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(password.as_bytes());
    out.push(0);
    patch_length(out, 1);
}

/// Build a `Terminate` message.
pub fn write_terminate(out: &mut Vec<u8>) {
    out.clear();
    out.push(b'X');
    out.extend_from_slice(&[0u8; 4]);
    patch_length(out, 1);
}

/// Patch the 4-byte length word at `at` to cover everything from there to the
/// end of the buffer (the length counts itself, not the tag).
fn patch_length(out: &mut [u8], at: usize) {
    let length = (out.len() - at) as u32;
    out[at..at + 4].copy_from_slice(&length.to_be_bytes());
}
