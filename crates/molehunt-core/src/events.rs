use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::game::Phase;

/// Every state change in the engine produces an Event.
/// The CLI prints them; UI and audio collaborators consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        grid_size: u32,
        difficulty: Difficulty,
        first_wait_ms: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        wait_remaining_ms: Option<u64>,
        target_remaining_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    SessionResumed {
        wait_remaining_ms: Option<u64>,
        target_remaining_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    SessionEnded {
        score: u32,
        level: u32,
        difficulty: Difficulty,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A target appeared and its visibility countdown started.
    TargetSpawned {
        cell_id: u32,
        visible_ms: u64,
        at: DateTime<Utc>,
    },
    /// The player claimed the live target in time.
    TargetHit {
        cell_id: u32,
        score: u32,
        at: DateTime<Utc>,
    },
    /// The player claimed a cell with no live target on it. Not an error
    /// and never scored; purely informational feedback.
    TargetMissed {
        cell_id: u32,
        at: DateTime<Utc>,
    },
    /// The target's visibility window elapsed unclaimed.
    TargetExpired {
        cell_id: u32,
        at: DateTime<Utc>,
    },
    /// Placement yielded no usable cell; the cycle re-armed without a spawn.
    SpawnSkipped {
        reason: String,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    DifficultyChanged {
        difficulty: Difficulty,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        score: u32,
        level: u32,
        grid_size: u32,
        difficulty: Difficulty,
        wait_remaining_ms: Option<u64>,
        target_cell: Option<u32>,
        target_remaining_ms: Option<u64>,
        at: DateTime<Utc>,
    },
}
