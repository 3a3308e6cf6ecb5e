//! Configuration management with TOML support
//!
//! This module provides the configuration for the error layer:
//! - Loads from TOML files
//! - Supports environment variable overrides
//! - Validates configuration values
//! - Offers a builder for programmatic construction

use crate::error_handler::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Complete configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry and backoff policy
    pub retry: RetryPolicyConfig,

    /// Error tracker configuration
    pub tracking: TrackingConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

/// Backoff constants used by the error handler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    /// Delay before the first retry
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,

    /// Upper bound on the exponential delay, before jitter
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,

    /// Growth factor applied per attempt
    pub multiplier: f64,

    /// Exclusive upper bound of the random jitter added to each delay
    #[serde(with = "humantime_serde")]
    pub max_jitter: Duration,

    /// Attempts made by the retry driver, including the first call
    pub max_attempts: u32,
}

/// Error tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Number of recent errors kept in memory
    pub capacity: usize,

    /// Default number of entries returned by `recent_errors`
    pub recent_limit: usize,

    /// Ambient page URL recorded with every tracked error
    pub page_url: String,

    /// Ambient user agent recorded with every tracked error
    pub user_agent: String,

    /// Emit tracked errors as structured telemetry events
    pub telemetry_enabled: bool,

    /// Origin of the ingestion API; reports are POSTed to `<origin>/api/errors`
    pub ingestion_origin: Option<String>,

    /// Timeout for a single ingestion request
    #[serde(with = "humantime_serde")]
    pub ingestion_timeout: Duration,
}

/// Observability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
}

// Default implementations

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            max_jitter: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            recent_limit: 10,
            page_url: String::new(),
            user_agent: concat!("realty-core/", env!("CARGO_PKG_VERSION")).to_string(),
            telemetry_enabled: true,
            ingestion_origin: None,
            ingestion_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl RetryPolicyConfig {
    /// The backoff policy described by this section
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            multiplier: self.multiplier,
            max_jitter: self.max_jitter,
        }
    }
}

// Configuration loading and management

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&contents)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("REALTY_LOG_LEVEL") {
            self.observability.logging.level = level;
        }
        if let Ok(origin) = std::env::var("REALTY_INGESTION_ORIGIN") {
            self.tracking.ingestion_origin = Some(origin);
        }
        if let Ok(capacity) = std::env::var("REALTY_TRACKER_CAPACITY") {
            match capacity.parse() {
                Ok(capacity) => self.tracking.capacity = capacity,
                Err(e) => warn!("Ignoring REALTY_TRACKER_CAPACITY={}: {}", capacity, e),
            }
        }
        if let Ok(url) = std::env::var("REALTY_PAGE_URL") {
            self.tracking.page_url = url;
        }
        if let Ok(agent) = std::env::var("REALTY_USER_AGENT") {
            self.tracking.user_agent = agent;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let retry = &self.retry;
        if retry.base_delay.is_zero() {
            return Err(ConfigError::invalid("retry.base_delay", "must be greater than zero"));
        }
        if retry.max_delay < retry.base_delay {
            return Err(ConfigError::invalid(
                "retry.max_delay",
                "must be at least retry.base_delay",
            ));
        }
        if !retry.multiplier.is_finite() || retry.multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "retry.multiplier",
                format!("must be a finite value >= 1.0, got {}", retry.multiplier),
            ));
        }
        if retry.max_attempts == 0 {
            return Err(ConfigError::invalid("retry.max_attempts", "must be at least 1"));
        }

        if self.tracking.capacity == 0 {
            return Err(ConfigError::invalid("tracking.capacity", "must be at least 1"));
        }
        if let Some(origin) = &self.tracking.ingestion_origin {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::invalid(
                    "tracking.ingestion_origin",
                    format!("expected an http(s) origin, got '{}'", origin),
                ));
            }
        }
        if self.tracking.ingestion_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "tracking.ingestion_timeout",
                "must be greater than zero",
            ));
        }

        match self.observability.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::invalid(
                    "observability.logging.level",
                    format!("invalid log level: {}", other),
                ))
            }
        }

        Ok(())
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.retry.max_delay = delay;
        self
    }

    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.config.retry.multiplier = multiplier;
        self
    }

    pub fn max_jitter(mut self, jitter: Duration) -> Self {
        self.config.retry.max_jitter = jitter;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.tracking.capacity = capacity;
        self
    }

    pub fn page_url(mut self, url: impl Into<String>) -> Self {
        self.config.tracking.page_url = url.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.tracking.user_agent = agent.into();
        self
    }

    pub fn telemetry_enabled(mut self, enabled: bool) -> Self {
        self.config.tracking.telemetry_enabled = enabled;
        self
    }

    pub fn ingestion_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.tracking.ingestion_origin = Some(origin.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.observability.logging.level = level.into();
        self
    }

    pub fn build(self) -> ConfigResult<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
