//! Configuration module for GeoSpider.
//!
//! Provides the typed configuration struct that maps to the YAML
//! configuration file, with loading, validation, and defaults. The
//! configuration is loaded and validated exactly once at startup;
//! invalid configuration is rejected before any component starts,
//! never discovered mid-run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating configuration
///
/// These are the only errors allowed to abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML
    #[error("Invalid YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No server URL was provided
    #[error("serverUrl is required")]
    MissingServerUrl,

    /// The server URL is not an absolute URL
    #[error("serverUrl must be a valid absolute URL: {0}")]
    InvalidServerUrl(String),

    /// A numeric setting that must be positive is zero or negative
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Application configuration loaded from the YAML config file
///
/// Field names in the file are camelCase (`serverUrl`,
/// `collectionIntervalSeconds`, ...). All fields except `serverUrl`
/// have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Endpoint that receives batched location uploads (absolute URL)
    pub server_url: String,
    /// Seconds between location collections
    pub collection_interval_seconds: u64,
    /// Number of samples per sync batch
    pub sync_batch_size: usize,
    /// Maximum days to keep offline samples before eviction
    pub max_offline_storage_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            collection_interval_seconds: 60,
            sync_batch_size: 50,
            max_offline_storage_days: 7,
        }
    }
}

impl AppConfig {
    /// Parses and validates configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a YAML file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/geospider/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("geospider")
            .join("config.yaml")
    }

    /// Validates all configuration constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::MissingServerUrl);
        }

        if Url::parse(&self.server_url).is_err() {
            return Err(ConfigError::InvalidServerUrl(self.server_url.clone()));
        }

        if self.collection_interval_seconds == 0 {
            return Err(ConfigError::NonPositive {
                field: "collectionIntervalSeconds",
            });
        }

        if self.sync_batch_size == 0 {
            return Err(ConfigError::NonPositive {
                field: "syncBatchSize",
            });
        }

        if self.max_offline_storage_days <= 0 {
            return Err(ConfigError::NonPositive {
                field: "maxOfflineStorageDays",
            });
        }

        Ok(())
    }

    /// The collection interval as a [`Duration`]
    pub fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.collection_interval_seconds)
    }

    /// The retention window as a chrono duration
    pub fn retention_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.max_offline_storage_days)
    }
}
