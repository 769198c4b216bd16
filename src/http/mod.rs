//! HTTP data model for the gateway.
//!
//! # Data Flow
//! ```text
//! Raw KEY=VALUE environment (from the web server)
//!     → request.rs (one-pass populate: headers, query, cookies, fields)
//!     → [routing layer resolves the handler chain]
//!     → handlers read the RequestContext, write the ResponseBuffer
//!     → response.rs serializes status/headers/body for the transport
//! ```
//!
//! # Design Decisions
//! - One HeaderMap implementation backs request and response headers
//! - Parsing never fails a request: bad method → Unknown, bad length → 0,
//!   bad cookie segment → abort cookies only
//! - Percent-encoding lives here; the routing layer sees decoded paths

pub mod cookie;
pub mod encoding;
pub mod headers;
pub mod method;
pub mod request;
pub mod response;

pub use cookie::{Cookie, SameSite};
pub use headers::HeaderMap;
pub use method::{Method, MethodSet};
pub use request::RequestContext;
pub use response::ResponseBuffer;
