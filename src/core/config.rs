use crate::error::{NupakError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration, persisted as JSON under `~/.nupak`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub install_root: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        Ok(Config {
            install_root: get_nupak_dir()?.join("packages"),
        })
    }

    /// Load the config file, creating it with defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            let config = Self::new()?;
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::ensure_dir_exists(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }
}

fn get_nupak_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".nupak"))
        .ok_or(NupakError::HomeDirectoryNotFound)
}

fn get_config_path() -> Result<PathBuf> {
    Ok(get_nupak_dir()?.join("config.json"))
}
