//! # Molehunt Core Library
//!
//! Core business logic for Molehunt, a timed reaction game: a target
//! appears in a random grid cell for a limited window, the player claims it
//! in time or it vanishes, and hits raise a score that tightens the timing
//! as levels go up.
//!
//! ## Architecture
//!
//! - **Game Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` with the current time; no
//!   internal threads, no OS timers
//! - **Surfaces**: Trait seams for the external collaborators - target
//!   placement, UI notifications, audio cues - with HTTP clients for the
//!   remote placement and score backends
//! - **Storage**: SQLite-based leaderboard and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`GameEngine`]: Session state machine, spawn scheduling, visibility
//!   timing, scoring and leveling
//! - [`Difficulty`]: The fixed profile store mapping labels to timings
//! - [`Database`]: Score persistence and key-value state storage
//! - [`Config`]: Application configuration management

pub mod difficulty;
pub mod error;
pub mod events;
pub mod game;
pub mod storage;
pub mod surfaces;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use error::{
    ConfigError, CoreError, DatabaseError, DifficultyError, PersistenceError, PlacementError,
};
pub use events::Event;
pub use game::{now_ms, ClaimOutcome, GameEngine, Phase};
pub use storage::{Config, Database, ScoreRecord, ScoreStats};
pub use surfaces::{
    AudioSurface, HttpPlacement, HttpScorePersistence, PlacementService, RandomPlacement,
    Surfaces, UiSurface,
};
