//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Router::register(methods, path, Route)
//!         → trie.rs descends byte by byte, creating nodes
//!         → kind conflicts and occupied slots reject the registration
//!         → Router moves into the Gateway, frozen
//!
//! Per request:
//!     (decoded path, method)
//!         → trie.rs walk (literal bytes, capture skips, wildcard stops)
//!         → matched chain, or the configured not-found chain, or nothing
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Matching is deterministic: node kind is fixed per tree position, so a
//!   literal and a capture can never compete for the same request
//! - Registration conflicts are synchronous errors, never runtime surprises

pub mod router;
pub mod trie;

pub use router::Router;
pub use trie::{RegisterError, RouteTrie};
