//! Persisted user settings
//!
//! Stored as JSON at `<config_dir>/stockroom/settings.json`. A missing file
//! means defaults; unknown or missing keys fall back to their defaults too.

pub mod settings_file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stockroom_table::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE_OPTIONS, PaginationState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StockroomSettings {
    pub table: TableSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

impl StockroomSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file::settings_file()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub filter_debounce_ms: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE_OPTIONS[0],
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            filter_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl TableSettings {
    /// Initial pagination state; a zero page size falls back to the default
    pub fn pagination(&self) -> PaginationState {
        let page_size = match self.page_size {
            0 => {
                tracing::warn!("page_size of 0 in settings, using default");
                DEFAULT_PAGE_SIZE_OPTIONS[0]
            }
            n => n,
        };
        PaginationState::new(page_size).with_page_size_options(self.page_size_options.clone())
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSettings {
    /// Minimum stock given to newly generated variants
    pub default_minimum_stock: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write JSON logs to daily files under the data directory
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
        }
    }
}
