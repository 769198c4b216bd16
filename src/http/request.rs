//! Per-request context built from the gateway environment.
//!
//! # Responsibilities
//! - Populate the request view (method, headers, query, cookies, named
//!   CGI fields) from the raw `KEY=VALUE` environment list in one pass
//! - Provide lazy, one-shot body materialization and direct chunk reads
//! - Carry the response buffer and the dispatch cursor for the request
//!
//! # Design Decisions
//! - The context owns every derived string and map outright; dropping it
//!   releases everything the request allocated
//! - Duplicate `HTTP_*` entries become additional ordered header values,
//!   matching response-header semantics
//! - A malformed cookie segment aborts cookie parsing only; everything
//!   else parsed from the environment stays valid
//! - Body read errors degrade to a logged warning and partial bytes,
//!   never a panic

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;

use uuid::Uuid;

use crate::dispatch::chain::HandlerChain;
use crate::dispatch::cursor::{DispatchCursor, Step};
use crate::dispatch::{DispatchError, Handling};
use crate::http::cookie::parse_cookie_header;
use crate::http::encoding::url_decode;
use crate::http::headers::HeaderMap;
use crate::http::method::Method;
use crate::http::response::ResponseBuffer;

/// Environment entries carrying request headers.
const HTTP_PREFIX: &str = "HTTP_";

struct BodyReader {
    stream: Box<dyn Read>,
    cache: Option<Vec<u8>>,
}

/// The populated view of one incoming request.
///
/// Created once per request, dropped when dispatch completes. Handlers and
/// middleware receive `&mut RequestContext`, read the request through the
/// accessors, and write the reply through [`response_mut`](Self::response_mut).
pub struct RequestContext {
    id: Uuid,

    // Raw environment, in arrival order.
    env: Vec<(String, String)>,

    method: Method,
    query_str: String,
    content_type: Option<String>,
    content_length: usize,
    script_name: Option<String>,
    request_uri: Option<String>,
    document_uri: Option<String>,
    document_root: Option<String>,
    server_protocol: Option<String>,
    request_scheme: Option<String>,
    https: bool,
    gateway_interface: Option<String>,
    server_software: Option<String>,
    remote_addr: Option<String>,
    remote_port: Option<String>,
    server_addr: Option<String>,
    server_port: Option<String>,
    server_name: Option<String>,

    headers: HeaderMap,
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,

    body: BodyReader,
    max_body_bytes: usize,

    response: ResponseBuffer,
    cursor: DispatchCursor,
    diag: Box<dyn Write>,
}

impl RequestContext {
    /// Builds the request view from the raw environment list.
    ///
    /// `body` is the transport's request body stream; `diag` is its
    /// diagnostic sink. `max_body_bytes` caps cached body reads
    /// (0 = no cap).
    pub(crate) fn populate(
        env_pairs: Vec<String>,
        body: Box<dyn Read>,
        diag: Box<dyn Write>,
        max_body_bytes: usize,
    ) -> RequestContext {
        let mut req = RequestContext {
            id: Uuid::new_v4(),
            env: Vec::with_capacity(env_pairs.len()),
            method: Method::Unknown,
            query_str: String::new(),
            content_type: None,
            content_length: 0,
            script_name: None,
            request_uri: None,
            document_uri: None,
            document_root: None,
            server_protocol: None,
            request_scheme: None,
            https: false,
            gateway_interface: None,
            server_software: None,
            remote_addr: None,
            remote_port: None,
            server_addr: None,
            server_port: None,
            server_name: None,
            headers: HeaderMap::new(),
            query: HashMap::new(),
            cookies: HashMap::new(),
            body: BodyReader {
                stream: body,
                cache: None,
            },
            max_body_bytes,
            response: ResponseBuffer::new(),
            cursor: DispatchCursor::unrouted(),
            diag,
        };

        for raw in env_pairs {
            let Some((key, value)) = raw.split_once('=') else {
                tracing::debug!(entry = %raw, "skipping malformed environment entry");
                continue;
            };

            if let Some(name) = key.strip_prefix(HTTP_PREFIX) {
                let name = name.replace('_', "-");
                req.headers.add(&name, value);
            } else {
                match key {
                    "QUERY_STRING" => {
                        req.query_str = value.to_string();
                        parse_query(value, &mut req.query);
                    }
                    "REQUEST_METHOD" => req.method = Method::parse(value),
                    "CONTENT_TYPE" => req.content_type = Some(value.to_string()),
                    "CONTENT_LENGTH" => {
                        req.content_length = value.trim().parse().unwrap_or(0);
                    }
                    "SCRIPT_NAME" => req.script_name = Some(value.to_string()),
                    "REQUEST_URI" => req.request_uri = Some(value.to_string()),
                    "DOCUMENT_URI" => req.document_uri = Some(value.to_string()),
                    "DOCUMENT_ROOT" => req.document_root = Some(value.to_string()),
                    "SERVER_PROTOCOL" => req.server_protocol = Some(value.to_string()),
                    "REQUEST_SCHEME" => {
                        req.https = value.eq_ignore_ascii_case("https");
                        req.request_scheme = Some(value.to_string());
                    }
                    "GATEWAY_INTERFACE" => req.gateway_interface = Some(value.to_string()),
                    "SERVER_SOFTWARE" => req.server_software = Some(value.to_string()),
                    "REMOTE_ADDR" => req.remote_addr = Some(value.to_string()),
                    "REMOTE_PORT" => req.remote_port = Some(value.to_string()),
                    "SERVER_ADDR" => req.server_addr = Some(value.to_string()),
                    "SERVER_PORT" => req.server_port = Some(value.to_string()),
                    "SERVER_NAME" => req.server_name = Some(value.to_string()),
                    _ => {}
                }
            }

            req.env.push((key.to_string(), value.to_string()));
        }

        // Cookies come out of the fully populated header map. Values are
        // visited in order; a malformed segment abandons what remains.
        for i in 0..req.headers.count("Cookie") {
            let Some(raw) = req.headers.get("Cookie", i) else {
                break;
            };
            if !parse_cookie_header(raw, &mut req.cookies) {
                tracing::warn!(request_id = %req.id, "malformed cookie segment, cookie parsing aborted");
                break;
            }
        }

        req
    }

    /// Attaches the resolved handler chain, arming the dispatch cursor.
    pub(crate) fn attach_chain(&mut self, chain: Arc<HandlerChain>) {
        self.cursor = DispatchCursor::routed(chain);
    }

    /// The path used for route resolution: `DOCUMENT_URI` when present,
    /// otherwise `REQUEST_URI` stripped of its query part.
    pub(crate) fn routing_path(&self) -> &str {
        if let Some(uri) = &self.document_uri {
            return uri;
        }
        if let Some(uri) = &self.request_uri {
            return uri.split_once('?').map(|(path, _)| path).unwrap_or(uri);
        }
        ""
    }

    pub(crate) fn into_response(self) -> ResponseBuffer {
        self.response
    }

    /// Unique id assigned at population, for log correlation.
    pub fn request_id(&self) -> Uuid {
        self.id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The raw, undecoded query string.
    pub fn query_str(&self) -> &str {
        &self.query_str
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Parsed `CONTENT_LENGTH`; 0 when missing or invalid.
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_deref()
    }

    pub fn request_uri(&self) -> Option<&str> {
        self.request_uri.as_deref()
    }

    pub fn document_uri(&self) -> Option<&str> {
        self.document_uri.as_deref()
    }

    pub fn document_root(&self) -> Option<&str> {
        self.document_root.as_deref()
    }

    pub fn server_protocol(&self) -> Option<&str> {
        self.server_protocol.as_deref()
    }

    pub fn request_scheme(&self) -> Option<&str> {
        self.request_scheme.as_deref()
    }

    /// True when `REQUEST_SCHEME` equals `https`, case-insensitively.
    pub fn https(&self) -> bool {
        self.https
    }

    pub fn gateway_interface(&self) -> Option<&str> {
        self.gateway_interface.as_deref()
    }

    pub fn server_software(&self) -> Option<&str> {
        self.server_software.as_deref()
    }

    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    pub fn remote_port(&self) -> Option<&str> {
        self.remote_port.as_deref()
    }

    pub fn server_addr(&self) -> Option<&str> {
        self.server_addr.as_deref()
    }

    pub fn server_port(&self) -> Option<&str> {
        self.server_port.as_deref()
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// First value of a request header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name, 0)
    }

    /// Full multi-valued request header map.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded query value for `key`; last occurrence wins on duplicates.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Decoded cookie value for `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn cookie_map(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Raw environment lookup. Linear scan over the arrival-ordered pairs.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates every environment pair in arrival order.
    pub fn env_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reads and caches the request body, up to `max_size` bytes.
    ///
    /// When `max_size` is 0, `Content-Length` bounds the read instead.
    /// The first call fixes the cache; later calls ignore `max_size` and
    /// return the cached bytes.
    pub fn body(&mut self, max_size: usize) -> &[u8] {
        if self.body.cache.is_none() {
            let mut limit = if max_size == 0 {
                self.content_length
            } else {
                max_size
            };
            if self.max_body_bytes > 0 {
                limit = limit.min(self.max_body_bytes);
            }

            let mut buf = Vec::new();
            if limit > 0 {
                let stream = &mut self.body.stream;
                if let Err(err) = stream.take(limit as u64).read_to_end(&mut buf) {
                    tracing::warn!(
                        request_id = %self.id,
                        error = %err,
                        "request body read failed, returning partial body"
                    );
                }
            }
            self.body.cache = Some(buf);
        }

        match &self.body.cache {
            Some(bytes) => bytes,
            None => &[],
        }
    }

    /// Length of the cached body; 0 until [`body`](Self::body) has run.
    pub fn body_len(&self) -> usize {
        self.body.cache.as_ref().map_or(0, Vec::len)
    }

    /// Reads directly from the body stream without caching.
    ///
    /// Mixing this with [`body`](Self::body) yields whatever bytes remain
    /// unread on the stream; that is not an error.
    pub fn read_body_chunk(&mut self, buf: &mut [u8]) -> usize {
        match self.body.stream.read(buf) {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(request_id = %self.id, error = %err, "body chunk read failed");
                0
            }
        }
    }

    /// Writes directly to the transport's diagnostic sink, bypassing the
    /// buffered response body.
    pub fn write_diagnostic(&mut self, message: &str) {
        let result = self
            .diag
            .write_all(message.as_bytes())
            .and_then(|()| self.diag.flush());
        if let Err(err) = result {
            tracing::warn!(request_id = %self.id, error = %err, "diagnostic write failed");
        }
    }

    pub fn response(&self) -> &ResponseBuffer {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseBuffer {
        &mut self.response
    }

    /// Position of the dispatch cursor for this request.
    pub fn dispatch_position(&self) -> usize {
        self.cursor.position()
    }

    /// Advances the handler chain by one step and runs that member.
    ///
    /// Middleware call this to continue the chain; returning without
    /// calling it short-circuits the rest of the chain.
    pub fn next(&mut self) -> Result<Handling, DispatchError> {
        let chain = match self.cursor.chain() {
            Some(chain) => Arc::clone(chain),
            None => return Err(DispatchError::NoRoute),
        };
        match self.cursor.step()? {
            Step::Middleware(index) => Ok(chain.middleware(index).handle(self)),
            Step::Terminal => Ok(chain.terminal().handle(self)),
        }
    }
}

/// Decodes `raw` into `map`, last write wins; a segment without `=`
/// terminates parsing and the remainder is ignored.
fn parse_query(raw: &str, map: &mut HashMap<String, String>) {
    for segment in raw.split('&') {
        match segment.split_once('=') {
            Some((key, value)) => {
                map.insert(url_decode(key), url_decode(value));
            }
            None => break,
        }
    }
}
