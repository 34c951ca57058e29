//! Configuration management for adaptcomp
//!
//! This crate loads the engine, codec and logging configuration from layered
//! sources: built-in defaults, then a YAML, TOML or JSON file, then environment
//! variables. Every loaded configuration is validated before it is returned.
//!
//! # Features
//!
//! - **Multiple formats**: YAML, TOML and JSON configuration files
//! - **Validation**: probabilities, weights, search budgets and log levels are checked
//! - **Environment overrides**: `ADAPTCOMP__SECTION__KEY` variables win over files
//! - **Defaults**: every option has a default, so an empty file is a valid config
//!
//! # Examples
//!
//! ```rust
//! use adaptcomp_config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("adaptcomp.yaml")
//!     .add_env_prefix("ADAPTCOMP")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! println!("Top alternatives: {}", config.engine.selector.top_n);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use adaptcomp_types::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ADAPTCOMP";

/// Log levels accepted in `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for adaptcomp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Decision engine configuration
    pub engine: EngineConfig,
    /// Codec invocation configuration
    pub codec: CodecConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::validation(e.to_string()))?;
        self.codec.validate()?;
        self.logging.validate()
    }
}

/// Codec invocation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Upper bound on one compression or decompression run, in seconds
    pub timeout_secs: u64,
    /// Decompress and compare the output after compressing
    pub verify: bool,
}

impl CodecConfig {
    /// Codec timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "Codec timeout must be at least 1 second",
            ));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            verify: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::invalid_value(
                "logging.format",
                format!("'{}' is not one of: text, json", other),
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::validation(
                "Log level must be one of: trace, debug, info, warn, error",
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
