use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::format::{DateFormatter, DEFAULT_DATE_FORMAT};
use crate::persistence::DEFAULT_STORAGE_KEY;

const APP_NAME: &str = "tickoff";
const CONFIG_FILE: &str = "config.json";

/// User settings, stored as JSON in the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the slot the task list is stored under.
    pub storage_key: String,
    /// SQLite file holding the slot. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// strftime pattern for task timestamps.
    pub date_format: String,
    /// Accept tasks with empty or whitespace-only text.
    pub allow_blank: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            allow_blank: false,
        }
    }
}

impl Config {
    /// Load configuration from the user's config directory, then apply
    /// environment overrides. Falls back to defaults if the file is missing
    /// or fails to parse.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self =
            serde_json::from_str(&content).context("Failed to parse config file")?;

        if !DateFormatter::is_valid_pattern(&config.date_format) {
            tracing::warn!(
                pattern = %config.date_format,
                "Unsupported date format, timestamps will show as invalid"
            );
        }

        Ok(config)
    }

    /// Apply `TICKOFF_DB` and `TICKOFF_STORAGE_KEY` if set.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var_os("TICKOFF_DB").map(PathBuf::from),
            std::env::var("TICKOFF_STORAGE_KEY").ok(),
        )
    }

    pub fn with_overrides(mut self, database_path: Option<PathBuf>, storage_key: Option<String>) -> Self {
        if let Some(path) = database_path {
            self.database_path = Some(path);
        }
        if let Some(key) = storage_key.filter(|k| !k.trim().is_empty()) {
            self.storage_key = key;
        }
        self
    }

    pub fn formatter(&self) -> DateFormatter {
        DateFormatter::new(self.date_format.clone())
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
