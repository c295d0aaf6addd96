//! Executive and company directory loading
//!
//! Both files are read-only at runtime. A missing or malformed file is
//! treated as "no data" and only logged.

use super::types::{ExecutiveMap, ExecutiveRecord};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads `<data_dir>/<ticker>_executives.json`
#[derive(Debug, Clone)]
pub struct ExecutiveStore {
    data_dir: PathBuf,
}

impl ExecutiveStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}_executives.json", ticker.to_lowercase()))
    }

    /// Executives for `ticker`, or `None` when the file is absent or unreadable.
    /// Entries that are not JSON objects are skipped.
    pub fn load(&self, ticker: &str) -> Option<ExecutiveMap> {
        let path = self.path_for(ticker);
        let raw: IndexMap<String, Value> = read_json(&path)?;

        let mut executives = ExecutiveMap::with_capacity(raw.len());
        for (name, value) in raw {
            match serde_json::from_value::<ExecutiveRecord>(value) {
                Ok(record) => {
                    executives.insert(name, record);
                }
                Err(e) => warn!("Skipping executive {:?} in {:?}: {}", name, path, e),
            }
        }
        debug!("Loaded {} executives from {:?}", executives.len(), path);
        Some(executives)
    }
}

/// One entry of the company picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyOption {
    pub ticker: String,
    pub name: String,
    pub display: String,
}

/// Ticker to display name mapping from the companies file
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    companies: IndexMap<String, String>,
}

impl CompanyDirectory {
    pub fn from_map(companies: IndexMap<String, String>) -> Self {
        Self { companies }
    }

    /// Load the directory; an unreadable file yields an empty directory
    pub fn load(path: impl AsRef<Path>) -> Self {
        let companies = read_json(path.as_ref()).unwrap_or_default();
        Self { companies }
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn name(&self, ticker: &str) -> Option<&str> {
        self.companies.get(ticker).map(String::as_str)
    }

    /// Picker options sorted by their display string
    pub fn options(&self) -> Vec<CompanyOption> {
        let mut options: Vec<CompanyOption> = self
            .companies
            .iter()
            .map(|(ticker, name)| CompanyOption {
                ticker: ticker.clone(),
                name: name.clone(),
                display: format!("{} - {}", ticker, name),
            })
            .collect();
        options.sort_by(|a, b| a.display.cmp(&b.display));
        options
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("No data at {:?}: {}", path, e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed JSON in {:?}: {}", path, e);
            None
        }
    }
}
