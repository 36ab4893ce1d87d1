use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::AppConfig;

const CONFIG_FILE: &str = "config.toml";
const CACHE_FILE: &str = "schedule.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "RamadanCountdown", "RamadanCountdown")
}

/// Location of the user's config file.
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        dirs.config_dir().join(CONFIG_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for config");
        PathBuf::from(CONFIG_FILE)
    }
}

/// Location of the schedule cache.
pub fn default_cache_path() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        dirs.data_dir().join(CACHE_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for schedule cache");
        PathBuf::from(CACHE_FILE)
    }
}

/// Loads and stores [`AppConfig`] as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, returning defaults when the file does not exist.
    ///
    /// The result is parsed but not validated. Callers apply their overrides
    /// first and then call [`AppConfig::validate`].
    pub fn get(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            log::debug!("No config at {}; using defaults", self.path.display());
            return Ok(AppConfig::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {}", self.path.display()))?;
        let config: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config at {}", self.path.display()))?;

        Ok(config)
    }

    pub fn update(&self, config: &AppConfig) -> Result<()> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))?;
        Ok(())
    }
}
