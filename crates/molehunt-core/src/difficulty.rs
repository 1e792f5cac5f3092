//! Difficulty profile store.
//!
//! Maps the fixed difficulty labels to their base timing parameters.
//! Profiles are immutable; a session holds exactly one at a time and
//! switching mid-session goes through `GameEngine::set_difficulty`, which
//! tears down and re-arms any pending wait so no timer keeps running under
//! the old profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DifficultyError;

/// One of the fixed difficulty labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Base timing parameters for this label.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                label: Difficulty::Easy,
                min_interval_ms: 1800,
                max_interval_ms: 2000,
                base_visible_ms: 1600,
            },
            Difficulty::Medium => DifficultyProfile {
                label: Difficulty::Medium,
                min_interval_ms: 1100,
                max_interval_ms: 1300,
                base_visible_ms: 1200,
            },
            Difficulty::Hard => DifficultyProfile {
                label: Difficulty::Hard,
                min_interval_ms: 500,
                max_interval_ms: 700,
                base_visible_ms: 900,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(DifficultyError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

/// Immutable timing parameters for one difficulty label.
///
/// `min_interval_ms..=max_interval_ms` bounds the randomized wait before a
/// target spawns; `base_visible_ms` is how long a spawned target stays
/// claimable at level 1. Both shrink with the level penalty (100 ms per
/// level above 1), floor-clamped in the scheduler and visibility timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub label: Difficulty,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub base_visible_ms: u64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::Medium.profile()
    }
}
