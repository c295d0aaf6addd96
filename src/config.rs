//! Dashboard configuration
//!
//! Defaults, optionally replaced by a YAML file, then overridden field by
//! field from `STICKY_NOTE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_PREFIX: &str = "STICKY_NOTE_";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error
    #[error("Cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML error
    #[error("Invalid config file {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Bind address
    pub address: String,
    /// HTTP port
    pub port: u16,
    /// Directory holding `<ticker>_executives.json` and `market/`
    pub data_dir: PathBuf,
    /// Ticker to company name mapping
    pub companies_file: PathBuf,
    /// Shared review document
    pub review_file: PathBuf,
    /// Reviews per page
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            companies_file: PathBuf::from("sp500_companies.json"),
            review_file: PathBuf::from("data/reviews.json"),
            page_size: crate::review::DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Load a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Apply `STICKY_NOTE_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, keyed by full variable name.
    /// Unparseable numeric values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));

        if let Some(address) = var("ADDRESS") {
            self.address = address;
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!("Ignoring invalid {}PORT={}", ENV_PREFIX, port),
            }
        }
        if let Some(dir) = var("DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("COMPANIES_FILE") {
            self.companies_file = PathBuf::from(file);
        }
        if let Some(file) = var("REVIEW_FILE") {
            self.review_file = PathBuf::from(file);
        }
        if let Some(size) = var("PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => warn!("Ignoring invalid {}PAGE_SIZE={}", ENV_PREFIX, size),
            }
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
