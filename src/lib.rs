//! FastCGI-style Gateway Core
//!
//! A request-dispatch and protocol-adaptation layer for a CGI-environment
//! web-service gateway. The transport (connection accept loop, variable
//! decoding, socket writes) is an external collaborator; this crate maps
//! (method, URI) to registered handler chains and buffers the response.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │                 GATEWAY CORE                   │
//!                        │                                                │
//!   KEY=VALUE env        │  ┌─────────┐    ┌─────────┐    ┌────────────┐  │
//!   + body stream  ──────┼─▶│  http   │───▶│ routing │───▶│  dispatch  │  │
//!                        │  │ request │    │  trie   │    │   cursor   │  │
//!                        │  └─────────┘    └─────────┘    └─────┬──────┘  │
//!                        │                                      │         │
//!                        │                              middleware chain  │
//!                        │                                + handler       │
//!                        │                                      │         │
//!   status/headers/body  │  ┌─────────┐                         │         │
//!   to the transport ◀───┼──│  http   │◀────────────────────────┘         │
//!                        │  │response │                                   │
//!                        │  └─────────┘                                   │
//!                        │                                                │
//!                        │  ┌──────────────────────────────────────────┐  │
//!                        │  │          Cross-Cutting Concerns          │  │
//!                        │  │   ┌────────┐        ┌───────────────┐    │  │
//!                        │  │   │ config │        │ observability │    │  │
//!                        │  │   └────────┘        └───────────────┘    │  │
//!                        │  └──────────────────────────────────────────┘  │
//!                        └────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod dispatch;
pub mod gateway;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::GatewayConfig;
pub use dispatch::{Handler, Handling, Route};
pub use gateway::{Gateway, RequestOutcome};
pub use http::{Cookie, HeaderMap, Method, MethodSet, RequestContext, ResponseBuffer};
pub use routing::{RegisterError, Router};
