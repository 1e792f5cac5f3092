//! Session control commands.
//!
//! The engine lives in the database key-value store between invocations;
//! every command loads it, settles due deadlines with `tick`, applies the
//! action and saves it back. Events are printed as JSON.

use clap::Subcommand;
use molehunt_core::storage::Database;
use molehunt_core::surfaces::{HttpPlacement, HttpScorePersistence, RandomPlacement};
use molehunt_core::{
    now_ms, ClaimOutcome, Config, Difficulty, Event, GameEngine, Phase, PlacementService, Surfaces,
};

const ENGINE_KEY: &str = "game_engine";

#[derive(Subcommand)]
pub enum GameAction {
    /// Start a new session
    Start {
        /// Grid side length (cells are 1..=size*size)
        #[arg(long)]
        grid: Option<u32>,
        /// Difficulty label: Easy, Medium or Hard
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Suspend the live countdown
    Pause,
    /// Resume a paused session
    Resume,
    /// End the session and persist the score
    End,
    /// Return an ended session to idle
    Reset,
    /// Claim a cell
    Claim {
        /// Cell id, 1-based
        cell: u32,
    },
    /// Switch difficulty mid-session
    Difficulty {
        /// Difficulty label: Easy, Medium or Hard
        label: String,
    },
    /// Settle due deadlines (spawns, expiries)
    Tick,
    /// Print the current session state as JSON
    Status,
}

fn load_engine(db: &Database) -> GameEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<GameEngine>(&json) {
            return engine;
        }
    }
    GameEngine::new()
}

fn save_engine(db: &Database, engine: &GameEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    if !events.is_empty() {
        println!("{}", serde_json::to_string_pretty(events)?);
    }
    Ok(())
}

/// Record the finished session locally and, when a server is configured,
/// remotely. Remote failure is a warning only; ending never blocks on it.
fn persist_score(db: &Database, config: &Config, engine: &GameEngine) {
    if let Err(e) = db.insert_score(
        &config.player_name,
        engine.score(),
        engine.level(),
        &engine.difficulty().to_string(),
    ) {
        eprintln!("warning: could not record score locally: {e}");
    }

    if let Some(url) = &config.server_url {
        let result = HttpScorePersistence::new(url)
            .and_then(|client| client.save(&config.player_name, engine.score(), engine.difficulty()));
        match result {
            Ok(saved) => {
                if let Some(id) = saved.id {
                    eprintln!("score saved remotely, id: {id}");
                }
            }
            Err(e) => eprintln!("warning: could not save score remotely: {e}"),
        }
    }
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let mut engine = load_engine(&db);

    let placement: Box<dyn PlacementService> = match &config.server_url {
        Some(url) => Box::new(HttpPlacement::new(url)?),
        None => Box::new(RandomPlacement),
    };
    let surfaces = Surfaces::headless(placement.as_ref());
    let mut rng = rand::thread_rng();
    let now = now_ms();

    let mut events = Vec::new();
    match action {
        GameAction::Start { grid, difficulty } => {
            let label = match difficulty {
                Some(s) => s.parse::<Difficulty>()?,
                None => config.difficulty,
            };
            let grid = grid.unwrap_or(config.grid_size);
            events = engine.start(now, grid, label.profile(), &mut rng, &surfaces);
            if events.is_empty() {
                eprintln!("a session is already in progress; end it first");
            }
        }
        GameAction::Pause => {
            events.extend(engine.tick(now, &mut rng, &surfaces));
            events.extend(engine.pause(now, &surfaces));
        }
        GameAction::Resume => {
            events = engine.resume(now, &mut rng, &surfaces);
        }
        GameAction::End => {
            events.extend(engine.tick(now, &mut rng, &surfaces));
            events.extend(engine.end(&surfaces));
            if engine.phase() == Phase::Ended {
                persist_score(&db, &config, &engine);
            }
        }
        GameAction::Reset => {
            events = engine.reset();
        }
        GameAction::Claim { cell } => {
            let (outcome, claim_events) = engine.claim(now, cell, &mut rng, &surfaces);
            events = claim_events;
            match outcome {
                ClaimOutcome::Hit => println!("hit! score: {}", engine.score()),
                ClaimOutcome::Miss => println!("miss"),
            }
        }
        GameAction::Difficulty { label } => {
            let label = label.parse::<Difficulty>()?;
            events.extend(engine.tick(now, &mut rng, &surfaces));
            events.extend(engine.set_difficulty(now, label.profile(), &mut rng));
        }
        GameAction::Tick => {
            events = engine.tick(now, &mut rng, &surfaces);
        }
        GameAction::Status => {
            events.extend(engine.tick(now, &mut rng, &surfaces));
            events.push(engine.snapshot(now));
        }
    }

    print_events(&events)?;
    save_engine(&db, &engine)?;
    Ok(())
}
