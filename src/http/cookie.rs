//! Cookie parsing and serialization.
//!
//! # Responsibilities
//! - Parse the request `Cookie` header into a name → value map
//! - Serialize response cookies into `Set-Cookie` header values
//!
//! # Design Decisions
//! - Attribute order in serialized cookies is fixed: Expires, Max-Age,
//!   Domain, Path, Secure, HttpOnly, SameSite; unset attributes are omitted
//! - A malformed request cookie segment (no `=`) aborts the rest of cookie
//!   parsing but keeps everything parsed so far
//! - Names and values are percent-decoded on parse, matching the query map

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::http::encoding::url_decode;

/// Error for response cookies that cannot be serialized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    /// Cookies must have a non-empty name.
    #[error("cookie name must not be empty")]
    EmptyName,

    /// Cookies must have a non-empty value.
    #[error("cookie value must not be empty")]
    EmptyValue,
}

/// `SameSite` cookie attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A response cookie.
///
/// Built with `Cookie::new` plus the attribute setters, then handed to
/// [`ResponseBuffer::set_cookie`](crate::http::response::ResponseBuffer::set_cookie).
///
/// ```
/// use fastcgi_gateway::http::cookie::Cookie;
///
/// let cookie = Cookie::new("session", "abc123")
///     .path("/")
///     .http_only();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cookie {
    name: String,
    value: String,
    expires: Option<DateTime<Utc>>,
    max_age: Option<i64>,
    domain: Option<String>,
    path: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Cookie {
        Cookie {
            name: name.into(),
            value: value.into(),
            ..Cookie::default()
        }
    }

    pub fn expires(mut self, at: DateTime<Utc>) -> Cookie {
        self.expires = Some(at);
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Cookie {
        self.max_age = Some(seconds);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Cookie {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Cookie {
        self.path = Some(path.into());
        self
    }

    pub fn secure(mut self) -> Cookie {
        self.secure = true;
        self
    }

    pub fn http_only(mut self) -> Cookie {
        self.http_only = true;
        self
    }

    pub fn same_site(mut self, policy: SameSite) -> Cookie {
        self.same_site = Some(policy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders this cookie as a single `Set-Cookie` header value.
    pub(crate) fn serialize(&self) -> Result<String, CookieError> {
        if self.name.is_empty() {
            return Err(CookieError::EmptyName);
        }
        if self.value.is_empty() {
            return Err(CookieError::EmptyValue);
        }

        let mut out = format!("{}={}", self.name, self.value);
        if let Some(at) = self.expires {
            // RFC 1123 date, always GMT.
            let _ = write!(out, "; Expires={}", at.format("%a, %d %b %Y %H:%M:%S GMT"));
        }
        if let Some(secs) = self.max_age {
            let _ = write!(out, "; Max-Age={}", secs);
        }
        if let Some(domain) = &self.domain {
            let _ = write!(out, "; Domain={}", domain);
        }
        if let Some(path) = &self.path {
            let _ = write!(out, "; Path={}", path);
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if let Some(policy) = self.same_site {
            let _ = write!(out, "; SameSite={}", policy.as_str());
        }
        Ok(out)
    }
}

/// Parses a request `Cookie` header value into `map`, last write wins.
///
/// Returns `false` if a malformed segment aborted parsing early; entries
/// parsed before the abort stay in the map.
pub(crate) fn parse_cookie_header(raw: &str, map: &mut HashMap<String, String>) -> bool {
    for segment in raw.split(';') {
        let segment = segment.trim_start_matches(' ');
        match segment.split_once('=') {
            Some((name, value)) => {
                map.insert(url_decode(name), url_decode(value));
            }
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialize_name_value_only() {
        let cookie = Cookie::new("session", "abc123");
        assert_eq!(cookie.serialize().unwrap(), "session=abc123");
    }

    #[test]
    fn test_serialize_full_attribute_order() {
        let expiry = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        let cookie = Cookie::new("id", "a3fWa")
            .expires(expiry)
            .max_age(2592000)
            .domain("example.com")
            .path("/docs")
            .secure()
            .http_only()
            .same_site(SameSite::Lax);

        assert_eq!(
            cookie.serialize().unwrap(),
            "id=a3fWa; Expires=Sun, 06 Nov 1994 08:49:37 GMT; Max-Age=2592000; \
             Domain=example.com; Path=/docs; Secure; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_serialize_omits_unset_attributes() {
        let expiry = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let cookie = Cookie::new("n", "v")
            .expires(expiry)
            .path("/")
            .domain("example.org")
            .http_only();
        let s = cookie.serialize().unwrap();
        assert!(s.contains("; Expires="));
        assert!(s.contains("; Domain=example.org"));
        assert!(s.contains("; Path=/"));
        assert!(s.contains("; HttpOnly"));
        assert!(!s.contains("Max-Age"));
        assert!(!s.contains("Secure;"));
        assert!(!s.ends_with("Secure"));
        assert!(!s.contains("SameSite"));
    }

    #[test]
    fn test_serialize_rejects_empty_name_or_value() {
        assert_eq!(Cookie::new("", "v").serialize(), Err(CookieError::EmptyName));
        assert_eq!(Cookie::new("n", "").serialize(), Err(CookieError::EmptyValue));
    }

    #[test]
    fn test_parse_basic() {
        let mut map = HashMap::new();
        assert!(parse_cookie_header("a=1; b=2;c=3", &mut map));
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("b").map(String::as_str), Some("2"));
        assert_eq!(map.get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_parse_last_write_wins() {
        let mut map = HashMap::new();
        assert!(parse_cookie_header("dup=first; dup=second", &mut map));
        assert_eq!(map.get("dup").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_parse_malformed_segment_aborts() {
        let mut map = HashMap::new();
        assert!(!parse_cookie_header("a=1; broken; b=2", &mut map));
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert!(!map.contains_key("broken"));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_parse_decodes_values() {
        let mut map = HashMap::new();
        assert!(parse_cookie_header("pref=dark+mode%2Fwide", &mut map));
        assert_eq!(map.get("pref").map(String::as_str), Some("dark mode/wide"));
    }
}
