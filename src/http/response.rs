//! Buffered response construction.
//!
//! # Responsibilities
//! - Hold status, headers, cookies, and the body buffer for one request
//! - Serialize the finished response for the transport collaborator
//!
//! # Design Decisions
//! - Nothing is flushed until dispatch ends, so headers and status may be
//!   set after body writes in any order
//! - The status code is mirrored into a `Status` header, which is how the
//!   gateway protocol carries it to the web server
//! - Body appends are binary-safe; embedded NUL bytes are preserved

use std::fmt;
use std::io::{self, Write};

use crate::http::cookie::{Cookie, CookieError};
use crate::http::headers::HeaderMap;

/// The buffered response for a single request.
///
/// Created with status 200 alongside the request context, mutated by
/// middleware and handler code, and consumed once by the transport when
/// dispatch completes.
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> ResponseBuffer {
        let mut response = ResponseBuffer {
            status: 0,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        response.set_status(200);
        response
    }

    /// Stores `code` and mirrors it into the `Status` header.
    pub fn set_status(&mut self, code: u16) {
        self.status = code;
        self.headers.replace_all("Status", code.to_string());
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Serializes `cookie` and adds it as one more `Set-Cookie` value.
    ///
    /// Each cookie becomes its own header line; nothing is merged.
    pub fn set_cookie(&mut self, cookie: &Cookie) -> Result<(), CookieError> {
        let value = cookie.serialize()?;
        self.headers.add("Set-Cookie", value);
        Ok(())
    }

    /// Appends raw bytes to the body buffer.
    pub fn write(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }

    /// Appends a string to the body buffer.
    pub fn write_str(&mut self, s: &str) {
        self.body.extend_from_slice(s.as_bytes());
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.headers.replace_all("Content-Type", content_type);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type", 0)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Writes the response in gateway wire form: one `Name: value` line
    /// per header value, a blank line, then the body bytes.
    pub fn serialize_into<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (name, value) in self.headers.iter() {
            write!(writer, "{}: {}\r\n", name, value)?;
        }
        writer.write_all(b"\r\n")?;
        writer.write_all(&self.body)
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        ResponseBuffer::new()
    }
}

/// Formatted appends go to the body buffer, so handlers can build the
/// body with `write!`/`writeln!`.
impl fmt::Write for ResponseBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.body.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
