//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Request size limits.
    pub limits: LimitsConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Hard cap on cached request body reads, in bytes. 0 disables the cap.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level directive (e.g. "info", "fastcgi_gateway=debug").
    /// The `RUST_LOG` environment variable overrides it.
    pub level: String,

    /// Output format: "compact" or "pretty".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.limits.max_body_bytes, 1024 * 1024);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_minimal_toml_gets_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.limits.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [limits]
            max_body_bytes = 4096

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_body_bytes, 4096);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
    }
}
