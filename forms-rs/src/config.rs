//! Configuration for forms-rs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FormError, Result};

/// Option key the form collection is stored under by default
pub const DEFAULT_OPTION_KEY: &str = "main_tree_forms";

/// Main service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP API (e.g., "127.0.0.1:8085")
    pub listen_addr: String,
}

/// Which option store backs the form collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Option key holding the serialized form collection
    #[serde(default = "default_option_key")]
    pub option_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty", "compact" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}

fn default_database_url() -> String {
    "sqlite://forms.db?mode=rwc".to_string()
}

fn default_option_key() -> String {
    DEFAULT_OPTION_KEY.to_string()
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: default_database_url(),
            option_key: default_option_key(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| FormError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.listen_addr.trim().is_empty() {
            return Err(FormError::Config("server.listen_addr is empty".to_string()));
        }
        if self.storage.option_key.trim().is_empty() {
            return Err(FormError::Config("storage.option_key is empty".to_string()));
        }
        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => Ok(()),
            other => Err(FormError::Config(format!(
                "Unknown logging format: {}",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "127.0.0.1:8085".to_string(),
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
