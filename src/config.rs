//! Dashboard configuration: where the record store lives and how long fetched
//! sheets stay fresh.
//!
//! Values come from an optional TOML file and are then overridden by `BRD_*`
//! environment variables (a `.env` file is honoured by the binary).

use crate::error::{DashboardError, Result};
use crate::source::DEFAULT_CACHE_TTL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "BRD_DATA_DIR";
pub const ENV_WORKBOOK: &str = "BRD_WORKBOOK";
pub const ENV_SUBMISSIONS_SHEET: &str = "BRD_SUBMISSIONS_SHEET";
pub const ENV_CONTENT_SHEET: &str = "BRD_CONTENT_SHEET";
pub const ENV_CACHE_TTL_SECS: &str = "BRD_CACHE_TTL_SECS";
pub const ENV_BIND_ADDR: &str = "BRD_BIND_ADDR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root of the record store; required
    pub data_dir: Option<PathBuf>,
    pub workbook: String,
    pub submissions_sheet: String,
    pub content_sheet: String,
    pub cache_ttl_secs: u64,
    pub bind_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            workbook: "EMBGPT".to_string(),
            submissions_sheet: "Sheet1".to_string(),
            content_sheet: "BRD_Content".to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DashboardError::ConfigurationInvalid(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::ConfigurationMissing(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `BRD_*` overrides read through `lookup`
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(workbook) = lookup(ENV_WORKBOOK) {
            self.workbook = workbook;
        }
        if let Some(sheet) = lookup(ENV_SUBMISSIONS_SHEET) {
            self.submissions_sheet = sheet;
        }
        if let Some(sheet) = lookup(ENV_CONTENT_SHEET) {
            self.content_sheet = sheet;
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            self.cache_ttl_secs = ttl.trim().parse().map_err(|_| {
                DashboardError::ConfigurationInvalid(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_CACHE_TTL_SECS, ttl
                ))
            })?;
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        Ok(self)
    }

    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Fails fast on anything the dashboard cannot run without
    pub fn validate(&self) -> Result<()> {
        match &self.data_dir {
            Some(dir) if !dir.as_os_str().is_empty() => {}
            _ => {
                return Err(DashboardError::ConfigurationMissing(format!(
                    "data_dir (set {} or data_dir in the config file)",
                    ENV_DATA_DIR
                )));
            }
        }

        let names = [
            ("workbook", &self.workbook),
            ("submissions_sheet", &self.submissions_sheet),
            ("content_sheet", &self.content_sheet),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(DashboardError::ConfigurationMissing(field.to_string()));
            }
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
