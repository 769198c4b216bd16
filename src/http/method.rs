//! HTTP method enum and bitmask sets for multi-method registration.

use std::fmt;
use std::ops::BitOr;

/// Number of routable methods; sizes the per-method slot array on trie nodes.
pub(crate) const METHOD_COUNT: usize = 9;

/// An HTTP request method.
///
/// `Unknown` is the explicit sentinel for an unparseable `REQUEST_METHOD`
/// value. It can never be registered or resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
    Unknown,
}

impl Method {
    /// Parse a method string, case-insensitively.
    ///
    /// Unrecognized input yields `Method::Unknown` rather than an error.
    pub fn parse(s: &str) -> Method {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "CONNECT" => Method::Connect,
            "OPTIONS" => Method::Options,
            "TRACE" => Method::Trace,
            "PATCH" => Method::Patch,
            _ => Method::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
            Method::Unknown => "UNKNOWN",
        }
    }

    /// Index into a trie node's chain slot array. `Unknown` has no slot.
    pub(crate) fn slot(&self) -> Option<usize> {
        match self {
            Method::Get => Some(0),
            Method::Head => Some(1),
            Method::Post => Some(2),
            Method::Put => Some(3),
            Method::Delete => Some(4),
            Method::Connect => Some(5),
            Method::Options => Some(6),
            Method::Trace => Some(7),
            Method::Patch => Some(8),
            Method::Unknown => None,
        }
    }

    fn bit(&self) -> u16 {
        match self.slot() {
            Some(i) => 1 << i,
            None => 0,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of HTTP methods, used to register one route for several verbs at
/// once.
///
/// Build sets by or-ing methods together:
///
/// ```
/// use fastcgi_gateway::http::method::{Method, MethodSet};
///
/// let set = Method::Post | Method::Put;
/// assert!(set.contains(Method::Post));
/// assert!(!set.contains(Method::Get));
/// assert!(MethodSet::ALL.contains(Method::Trace));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSet(u16);

impl MethodSet {
    /// The empty set.
    pub const EMPTY: MethodSet = MethodSet(0);

    /// Every routable method.
    pub const ALL: MethodSet = MethodSet((1 << METHOD_COUNT) - 1);

    pub fn contains(&self, method: Method) -> bool {
        let bit = method.bit();
        bit != 0 && self.0 & bit != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the methods in the set, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        const ORDER: [Method; METHOD_COUNT] = [
            Method::Get,
            Method::Head,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Connect,
            Method::Options,
            Method::Trace,
            Method::Patch,
        ];
        ORDER.into_iter().filter(|m| self.contains(*m))
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        MethodSet(method.bit())
    }
}

impl BitOr for Method {
    type Output = MethodSet;

    fn bitor(self, rhs: Method) -> MethodSet {
        MethodSet(self.bit() | rhs.bit())
    }
}

impl BitOr<Method> for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: Method) -> MethodSet {
        MethodSet(self.0 | rhs.bit())
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: MethodSet) -> MethodSet {
        MethodSet(self.0 | rhs.0)
    }
}
