//! Handler chains and per-request dispatch sequencing.
//!
//! # Data Flow
//! ```text
//! Router::register(methods, path, Route)
//!     → Route builder freezes into HandlerChain (middleware…, handler)
//!     → chain stored in the route trie, shared per method slot
//!
//! Gateway::handle
//!     → DispatchCursor attached to the RequestContext at position 0
//!     → RequestContext::next() steps the cursor
//!         position < N  → middleware[position] runs, may call next() again
//!         position == N → terminal handler runs
//!         beyond        → checked DispatchError, never an OOB access
//! ```
//!
//! # Design Decisions
//! - Middleware and handlers share one trait; closures capture their
//!   per-route state
//! - A middleware that returns without calling `next()` short-circuits the
//!   chain; nothing downstream runs for that request
//! - The cursor is a field of the per-request context, never shared state

pub mod chain;
pub mod cursor;

pub use chain::{Handler, HandlerChain, Route};
pub use cursor::{DispatchCursor, DispatchError};

/// Result code returned by every middleware and handler invocation.
///
/// Combines two flags: whether the buffered response should be sent, and
/// whether the transport should keep accepting new requests afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// Send the response, accept the next request.
    RespondAccept,
    /// Send the response, then stop accepting.
    RespondTerm,
    /// Send nothing, accept the next request.
    IgnoreAccept,
    /// Send nothing and stop accepting.
    IgnoreTerm,
}

impl Handling {
    pub fn should_respond(&self) -> bool {
        matches!(self, Handling::RespondAccept | Handling::RespondTerm)
    }

    pub fn keep_accepting(&self) -> bool {
        matches!(self, Handling::RespondAccept | Handling::IgnoreAccept)
    }
}
