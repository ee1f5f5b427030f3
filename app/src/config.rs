//! FILENAME: app/src/config.rs
//! PURPOSE: Dashboard configuration, read from a JSON file.
//! CONTEXT: Every field has a default so a partial (or missing) file works.
//! Spreadsheet ids name workbooks in `data_dir` when the workbook source is used.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use persistence::{CredentialConfig, SheetRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The tabs the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Technicians,
    Ioan,
    Psb,
    B2b,
    RawData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub main_spreadsheet_id: String,
    /// Holds the raw daily data used by the pivot explorer.
    pub second_spreadsheet_id: String,
    pub technicians_tab: String,
    pub ioan_tab: String,
    pub psb_tab: String,
    pub b2b_tab: String,
    pub raw_data_tab: String,
    pub data_dir: PathBuf,
    pub cache_ttl_secs: u64,
    pub credentials: CredentialConfig,
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            main_spreadsheet_id: "main".to_string(),
            second_spreadsheet_id: "second".to_string(),
            technicians_tab: "ALL TEKNISI TNS".to_string(),
            ioan_tab: "CEK IOAN".to_string(),
            psb_tab: "CEK PSB".to_string(),
            b2b_tab: "Data B2B".to_string(),
            raw_data_tab: "BANK DATA ALL 2025".to_string(),
            data_dir: PathBuf::from("data"),
            cache_ttl_secs: 60,
            credentials: CredentialConfig::default(),
            log_file: None,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn tab_name(&self, tab: Tab) -> &str {
        match tab {
            Tab::Technicians => &self.technicians_tab,
            Tab::Ioan => &self.ioan_tab,
            Tab::Psb => &self.psb_tab,
            Tab::B2b => &self.b2b_tab,
            Tab::RawData => &self.raw_data_tab,
        }
    }

    pub fn spreadsheet_for(&self, tab: Tab) -> &str {
        match tab {
            Tab::RawData => &self.second_spreadsheet_id,
            _ => &self.main_spreadsheet_id,
        }
    }

    /// Builds the load request for a tab, optionally cropped to `range`.
    pub fn request(&self, tab: Tab, range: Option<&str>) -> SheetRequest {
        let request = SheetRequest::new(self.spreadsheet_for(tab), self.tab_name(tab));
        match range {
            Some(range) => request.with_range(range),
            None => request,
        }
    }
}
