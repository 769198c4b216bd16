//! Percent-encoding primitives for the query, cookie, and path parsers.
//!
//! # Design Decisions
//! - Unreserved set is `A-Z a-z 0-9 - _ . ~` (RFC 3986)
//! - Space encodes to `+` and `+` decodes to space (form-urlencoded style)
//! - Decoding is permissive: a truncated or non-hex escape passes through
//!   literally instead of failing the whole string

/// Converts the low nibble of `code` to an uppercase hex character.
fn to_hex(code: u8) -> u8 {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    HEX[(code & 0xF) as usize]
}

/// Converts a hex character to its numeric value.
fn from_hex(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

/// Percent-encodes a string.
///
/// Unreserved characters pass through, spaces become `+`, everything else
/// (including multi-byte UTF-8 sequences) becomes `%XX` escapes.
pub fn url_encode(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b),
            b' ' => out.push(b'+'),
            _ => {
                out.push(b'%');
                out.push(to_hex(b >> 4));
                out.push(to_hex(b));
            }
        }
    }
    // Only ASCII was emitted.
    String::from_utf8(out).expect("encoded output is ASCII")
}

/// Decodes a percent-encoded string.
///
/// `+` decodes to a space. Escapes that decode to invalid UTF-8 are
/// replaced rather than rejected; the caller never sees an error.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if let (Some(hi), Some(lo)) = (
                    bytes.get(i + 1).copied().and_then(from_hex),
                    bytes.get(i + 2).copied().and_then(from_hex),
                ) {
                    out.push(hi << 4 | lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
