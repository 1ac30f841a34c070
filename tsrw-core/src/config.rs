use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternative settings file
pub const CONFIG_ENV_VAR: &str = "TSRW_CONFIG";

/// Defaults applied before command line flags
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of longest tests shown after analysis
    pub top_x: i64,
    /// Export order: Requirement, Test Case, Duration, Status or none
    pub sort_key: String,
    /// Folder receiving `tsrw.log`
    pub log_folder: Option<PathBuf>,
    /// Mirror log records to the console
    pub verbose: bool,
    /// Append a timestamp to exported file names
    pub timestamp: bool,
    /// Aligned table output instead of plain lines
    pub formatting: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_x: 10,
            sort_key: "Duration".to_string(),
            log_folder: None,
            verbose: false,
            timestamp: false,
            formatting: true,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }
}

/// Gets the path to the settings file
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;

    Ok(config_dir.join("tsrw").join("config.yaml"))
}
