//! Configuration loaded from TOML
//!
//! Lookup order: an explicit path, then `config.toml` in the platform config
//! directory (`~/.config/surfcast/` on Linux), then built-in defaults.
//! Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::forecast::pipeline::{DEFAULT_DAYS_BACK, DEFAULT_RECORD_LIMIT};
use crate::source::http::{DEFAULT_BEACH_CACHE_TTL_HOURS, DEFAULT_TIMEOUT};
use crate::APP_NAME;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where forecasts are read from
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the forecast API
    pub base_url: Option<String>,
    /// Local JSON dataset used instead of the API
    pub dataset: Option<PathBuf>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// How long the beach directory stays fresh in the cache
    pub beach_cache_ttl_hours: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            dataset: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            beach_cache_ttl_hours: DEFAULT_BEACH_CACHE_TTL_HOURS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Forecast request defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Days of history before the last update
    pub days_back: u32,
    /// Cap on records fetched per beach
    pub record_limit: usize,
    /// Region used when a command does not name one
    pub default_region: Option<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            record_limit: DEFAULT_RECORD_LIMIT,
            default_region: None,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub forecast: ForecastConfig,
}

impl Config {
    /// Loads configuration from `path`, or from the default location
    ///
    /// A missing default file yields the defaults. A missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Path of the default config file, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Rejects settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.record_limit == 0 {
            return Err(ConfigError::Invalid(
                "forecast.record_limit must be at least 1".to_string(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.source.base_url.is_some() && self.source.dataset.is_some() {
            return Err(ConfigError::Invalid(
                "set either source.base_url or source.dataset, not both".to_string(),
            ));
        }
        Ok(())
    }
}
