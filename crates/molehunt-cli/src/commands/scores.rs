//! Leaderboard queries.

use clap::Subcommand;
use molehunt_core::storage::Database;

#[derive(Subcommand)]
pub enum ScoresAction {
    /// Best scores, highest first
    List {
        /// How many rows to show
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Aggregate statistics
    Stats,
    /// Delete all recorded scores
    Clear,
}

pub fn run(action: ScoresAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        ScoresAction::List { limit, json } => {
            let scores = db.top_scores(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
            } else if scores.is_empty() {
                println!("no scores recorded yet");
            } else {
                for (rank, s) in scores.iter().enumerate() {
                    println!(
                        "{:>3}. {:<20} {:>5}  (level {}, {}, {})",
                        rank + 1,
                        s.player_name,
                        s.score,
                        s.level,
                        s.difficulty,
                        s.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        ScoresAction::Stats => {
            let stats = db.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        ScoresAction::Clear => {
            let deleted = db.clear_scores()?;
            println!("deleted {deleted} score(s)");
        }
    }
    Ok(())
}
