use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "molehunt-cli", version, about = "Molehunt CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session control
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Leaderboard queries
    Scores {
        #[command(subcommand)]
        action: commands::scores::ScoresAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Game { action } => commands::game::run(action),
        Commands::Scores { action } => commands::scores::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
