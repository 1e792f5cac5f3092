mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, ScoreRecord, ScoreStats};

use std::path::PathBuf;

/// Returns `~/.config/molehunt[-dev]/` based on MOLEHUNT_ENV.
///
/// Set MOLEHUNT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MOLEHUNT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("molehunt-dev")
    } else {
        base_dir.join("molehunt")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
