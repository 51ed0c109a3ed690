//! Phonebook configuration.
//!
//! Loaded from an optional TOML file; every field has a default so a missing
//! file or a partial one is fine. Resolved values are handed to the store and
//! pager explicitly, nothing is kept in process-wide state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Central source of truth for configuration defaults.
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const PAGE_SIZE: usize = 10;
    pub const DATA_PATH: &'static str = "sample_data.csv";
    pub const SAMPLE_SIZE: usize = 100;
}

// Thin wrappers for serde's #[serde(default = "...")] requirement
fn default_data_path() -> PathBuf {
    PathBuf::from(ConfigDefaults::DATA_PATH)
}
fn default_page_size() -> usize {
    ConfigDefaults::PAGE_SIZE
}
fn default_sample_size() -> usize {
    ConfigDefaults::SAMPLE_SIZE
}

/// Phonebook settings (`config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backing contact file
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Contacts shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Number of contacts produced by sample generation
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            page_size: default_page_size(),
            sample_size: default_sample_size(),
        }
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Effective page size. Enforces a minimum of 1.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
