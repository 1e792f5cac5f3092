//! TOML-based application configuration.
//!
//! Stores the player's defaults:
//! - Player name used when persisting scores
//! - Default difficulty and grid size for new sessions
//! - Sound toggle forwarded to the audio collaborator
//! - Optional base URL of the remote placement/score backend
//!
//! Configuration is stored at `~/.config/molehunt/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::difficulty::Difficulty;
use crate::error::ConfigError;
use crate::game::DEFAULT_GRID_SIZE;

use super::data_dir;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/molehunt/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name attached to persisted scores.
    #[serde(default = "default_player_name")]
    pub player_name: String,
    /// Difficulty used when `game start` gives none.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Grid size used when `game start` gives none.
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    /// Whether the audio collaborator should make noise.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Base URL of the remote placement and score backend. When absent the
    /// CLI places targets locally and keeps scores only in SQLite.
    #[serde(default)]
    pub server_url: Option<String>,
}

fn default_player_name() -> String {
    "Anonymous".to_string()
}

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            difficulty: Difficulty::default(),
            grid_size: default_grid_size(),
            sound_enabled: true,
            server_url: None,
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/molehunt"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path (tests).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the config.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Save to an explicit path (tests).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
