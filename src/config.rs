//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which covers the directory service URL and the cache staleness window.
//!
//! Configuration is stored at `~/.config/dircache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_SERVICE_URL;
use crate::freshness::DEFAULT_STALE_WINDOW_MS;

/// Application name used for config/data directory paths
const APP_NAME: &str = "dircache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub service_url: Option<String>,
    pub stale_window_ms: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Data directory holding the person store and the fetch marker.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn service_url_or_default(&self) -> &str {
        self.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
    }

    pub fn stale_window(&self) -> Duration {
        Duration::milliseconds(self.stale_window_ms.unwrap_or(DEFAULT_STALE_WINDOW_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::default();
        assert_eq!(config.service_url_or_default(), "https://randomuser.me");
        assert_eq!(
            config.stale_window(),
            Duration::milliseconds(DEFAULT_STALE_WINDOW_MS)
        );
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = Config {
            service_url: Some("https://mirror.example".to_string()),
            stale_window_ms: Some(60_000),
        };
        assert_eq!(config.service_url_or_default(), "https://mirror.example");
        assert_eq!(config.stale_window(), Duration::minutes(1));
    }
}
