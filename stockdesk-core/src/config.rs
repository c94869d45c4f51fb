//! Application configuration, read from a TOML file.
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{default_companies, CircuitBreaker, CompanyEntry, FetchPeriod, YahooSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite cache file. Relative paths resolve against the working directory.
    pub database_path: PathBuf,
    pub fetch: FetchConfig,
    pub server: ServerConfig,
    /// Overrides the built-in directory when non-empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub companies: Vec<CompanyEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("stock_data.db"),
            fetch: FetchConfig::default(),
            server: ServerConfig::default(),
            companies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub period: FetchPeriod,
    pub timeout_secs: u64,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    pub breaker_cooldown_secs: u64,
    /// Consecutive transient failures before the breaker opens.
    pub breaker_threshold: u32,
    pub base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let yahoo = YahooSettings::default();
        Self {
            period: FetchPeriod::default(),
            timeout_secs: yahoo.timeout.as_secs(),
            retries: yahoo.retries,
            breaker_cooldown_secs: 60,
            breaker_threshold: 5,
            base_url: yahoo.base_url,
        }
    }
}

impl FetchConfig {
    pub fn yahoo_settings(&self) -> YahooSettings {
        YahooSettings {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retries: self.retries,
            ..YahooSettings::default()
        }
    }

    pub fn circuit_breaker(&self) -> Arc<CircuitBreaker> {
        Arc::new(CircuitBreaker::new(
            Duration::from_secs(self.breaker_cooldown_secs),
            self.breaker_threshold,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Rows returned by `/data/{symbol}` when `days` is not given.
    pub default_days: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            default_days: 30,
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Configured companies, or the built-in directory if none are listed.
    pub fn directory(&self) -> Vec<CompanyEntry> {
        if self.companies.is_empty() {
            default_companies()
        } else {
            self.companies.clone()
        }
    }
}
