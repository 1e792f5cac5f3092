//! Configuration management.

use clap::Subcommand;
use molehunt_core::{Config, Difficulty};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as JSON
    Show,
    /// Update configuration values
    Set {
        /// Name attached to persisted scores
        #[arg(long)]
        player_name: Option<String>,
        /// Default difficulty: Easy, Medium or Hard
        #[arg(long)]
        difficulty: Option<String>,
        /// Default grid side length
        #[arg(long)]
        grid_size: Option<u32>,
        /// Enable or disable sound
        #[arg(long)]
        sound: Option<bool>,
        /// Base URL of the remote placement/score backend
        #[arg(long)]
        server_url: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            player_name,
            difficulty,
            grid_size,
            sound,
            server_url,
        } => {
            let mut config = Config::load()?;
            if let Some(name) = player_name {
                config.player_name = name;
            }
            if let Some(label) = difficulty {
                config.difficulty = label.parse::<Difficulty>()?;
            }
            if let Some(size) = grid_size {
                config.grid_size = size;
            }
            if let Some(enabled) = sound {
                config.sound_enabled = enabled;
            }
            if let Some(url) = server_url {
                config.server_url = if url.is_empty() { None } else { Some(url) };
            }
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
