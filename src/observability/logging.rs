//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once at startup
//! - Apply the configured level and output format
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level when present
//! - Pretty format for development, compact for production

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::LoggingConfig;

/// Initializes the global tracing subscriber from `config`.
///
/// Call once at process startup, before the gateway starts serving.
/// A second call logs a warning and leaves the first subscriber in place.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.format == "pretty" {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()
    };

    if let Err(err) = result {
        tracing::warn!(error = %err, "logging already initialized, keeping existing subscriber");
    }
}
