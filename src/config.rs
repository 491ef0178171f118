//! Channel credential store for `sensordash`.
//!
//! This module centralizes the persisted configuration (channel ID + read API
//! key) and its on-disk location. By consolidating the load/save/validate
//! logic here, the rest of the codebase never touches the filesystem or the
//! config file format directly.
//!
//! Persistence is a single JSON file under the platform config directory
//! (e.g. `~/.config/sensordash/config.json` on Linux); the `SENSORDASH_CONFIG`
//! environment variable overrides the full path, which keeps tests and
//! containers hermetic.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

// ---

const CONFIG_FILE: &str = "config.json";
const CONFIG_PATH_ENV: &str = "SENSORDASH_CONFIG";

/// Channel credentials. Both fields must be non-empty before any fetch is
/// attempted; an invalid config keeps the dashboard on the setup screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    // ---
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub api_key: String,
}

impl Config {
    // ---
    /// True iff both fields are non-empty. Fields are trimmed on save, so no
    /// trimming is repeated here.
    pub fn is_valid(&self) -> bool {
        !self.channel_id.is_empty() && !self.api_key.is_empty()
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the API key, showing only its first two characters.
    pub fn log_config(&self) {
        // ---
        let masked_key = if self.api_key.len() > 2 {
            format!("{}****", &self.api_key[..2])
        } else if self.api_key.is_empty() {
            "<unset>".to_string()
        } else {
            "****".to_string()
        };

        let channel = if self.channel_id.is_empty() {
            "<unset>"
        } else {
            self.channel_id.as_str()
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  CHANNEL_ID : {}", channel);
        tracing::info!("  API_KEY    : {}", masked_key);
    }
}

// ---

/// Handle on the persisted config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    // ---
    path: PathBuf,
}

impl ConfigStore {
    // ---
    /// Store at the default platform location, honoring `SENSORDASH_CONFIG`.
    pub fn from_env() -> Self {
        // ---
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self { path: PathBuf::from(path) };
        }

        let path = directories::ProjectDirs::from("", "", "sensordash")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Self { path }
    }

    /// Store at an explicit path (tests).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the persisted config. Absent or unparsable files yield an empty
    /// (invalid) config without surfacing an error; the user just lands on
    /// the setup screen again.
    pub fn load(&self) -> Config {
        // ---
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    tracing::debug!("Ignoring unparsable config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::debug!("No saved config at {}: {}", self.path.display(), e);
                Config::default()
            }
        }
    }

    /// Trim and persist new credentials.
    ///
    /// Fails with [`DashError::Validation`] when either field is empty after
    /// trimming; the caller shows the message inline and keeps the old state.
    pub fn save(&self, channel_id: &str, api_key: &str) -> Result<Config, DashError> {
        // ---
        let config = Config {
            channel_id: channel_id.trim().to_string(),
            api_key: api_key.trim().to_string(),
        };

        if !config.is_valid() {
            return Err(DashError::Validation(
                "Please enter both Channel ID and API Key".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(&config).map_err(DashError::Parse)?;
        fs::write(&self.path, raw)?;

        tracing::info!("Saved configuration to {}", self.path.display());
        Ok(config)
    }
}

// ---
