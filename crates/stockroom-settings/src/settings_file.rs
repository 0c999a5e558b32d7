//! Where stockroom keeps its files on disk

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "stockroom";

/// `<config_dir>/stockroom`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_DIR))
}

/// `<data_dir>/stockroom`
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base.join(APP_DIR))
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.json"))
}

/// Daily JSON log files when file logging is on
pub fn logs_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_namespaced() {
        // Headless CI may have no config dir at all
        let (Ok(settings), Ok(logs)) = (settings_file(), logs_dir()) else {
            return;
        };
        assert!(settings.ends_with("stockroom/settings.json"));
        assert!(logs.ends_with("stockroom/logs"));
    }
}
