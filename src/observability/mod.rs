//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (registration, population, dispatch)
//!     → per-request spans carrying the request id
//!
//! Consumers:
//!     → Log aggregation (stdout, collected by the process supervisor)
//! ```
//!
//! # Design Decisions
//! - Structured logging through the tracing crate
//! - The request ID flows through every per-request event via the span
//! - Level and format come from config; `RUST_LOG` wins when set

pub mod logging;
