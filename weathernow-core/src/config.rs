use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{
    backend::BaseUrl,
    map::{DEFAULT_ZOOM, MAX_ZOOM},
};

/// Environment variable overriding the configured backend base URL.
pub const BASE_URL_ENV: &str = "WEATHERNOW_BACKEND_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// backend_base_url = "https://weather.example.com/api"
/// map_zoom = 9
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Prefix for every backend request.
    pub backend_base_url: Option<String>,

    /// Zoom level for the weather map.
    pub map_zoom: Option<u8>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the base URL: explicit override, then `env_value`
    /// (normally [`BASE_URL_ENV`]), then the config file, then empty.
    pub fn base_url(&self, explicit: Option<&str>, env_value: Option<&str>) -> BaseUrl {
        let raw = [explicit, env_value, self.backend_base_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|v| !v.trim().is_empty())
            .unwrap_or_default();

        BaseUrl::new(raw)
    }

    pub fn set_base_url(&mut self, raw: &str) {
        let base = BaseUrl::new(raw);
        self.backend_base_url = (!base.is_relative()).then(|| base.as_str().to_string());
    }

    /// Configured zoom, capped at [`MAX_ZOOM`].
    pub fn zoom(&self) -> u8 {
        self.map_zoom.unwrap_or(DEFAULT_ZOOM).min(MAX_ZOOM)
    }
}
