//! Scoring and leveling policy.
//!
//! A hit is worth one point; every `LEVEL_UP_EVERY` points the level rises
//! by exactly one. Score and level only ever increase, and a threshold
//! triggers exactly one level-up because the score moves in steps of one.

use serde::{Deserialize, Serialize};

/// Points per level-up.
pub const LEVEL_UP_EVERY: u32 = 10;

/// What a hit did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Score incremented, level unchanged.
    Scored,
    /// Score incremented and a threshold was crossed; the new level.
    LevelUp(u32),
}

/// Session score and level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u32,
    level: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self { score: 0, level: 1 }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Register a successful hit. The level-up, when triggered, happens in
    /// the same call as the increment so the caller re-arms under the new
    /// level before the next spawn.
    pub fn on_hit(&mut self) -> HitOutcome {
        self.score += 1;
        if self.score % LEVEL_UP_EVERY == 0 {
            self.level += 1;
            HitOutcome::LevelUp(self.level)
        } else {
            HitOutcome::Scored
        }
    }

    /// A player-triggered miss. Informational only; nothing changes.
    pub fn on_miss(&self) {}
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
