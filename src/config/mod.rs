//! Configuration module for logdeck
//!
//! Provides layered configuration loading from files, environment
//! variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`LOGDECK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

use crate::query::{BucketInterval, GroupBy};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the analytics service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the analytics service
    pub url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Initial query settings applied when the dashboard starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// Log page size (the service caps this at 1000)
    pub limit: u64,
    /// Window length in hours, ending now
    pub window_hours: i64,
    /// Initial time-series grouping
    pub group_by: GroupBy,
    /// Initial time-series bucket interval
    pub interval: BucketInterval,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            limit: 100,
            window_hours: 24,
            group_by: GroupBy::Status,
            interval: BucketInterval::FiveMinutes,
        }
    }
}

/// Unified configuration for logdeck.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LogdeckConfig {
    /// Analytics service connection
    pub service: ServiceConfig,
    /// Initial query state
    pub query: QueryDefaults,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl LogdeckConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports LOGDECK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LOGDECK_URL") {
            self.service.url = url;
        }
        if let Ok(timeout) = std::env::var("LOGDECK_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.service.timeout_seconds = t;
            }
        }
        if let Ok(limit) = std::env::var("LOGDECK_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.query.limit = l;
            }
        }
        if let Ok(level) = std::env::var("LOGDECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOGDECK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.url.is_empty() {
            return Err(ConfigError::Validation {
                field: "service.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if self.service.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "service.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.query.limit == 0 || self.query.limit > 1000 {
            return Err(ConfigError::Validation {
                field: "query.limit".to_string(),
                message: "limit must be between 1 and 1000".to_string(),
            });
        }
        if self.query.window_hours <= 0 {
            return Err(ConfigError::Validation {
                field: "query.window_hours".to_string(),
                message: "window must cover at least one hour".to_string(),
            });
        }

        Ok(())
    }
}
