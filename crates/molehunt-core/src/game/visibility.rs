//! Visibility timer for the live target.
//!
//! Owns the single `ActiveTarget` slot and bounds how long a spawned target
//! stays claimable. A claim either hits the live target (clearing it and its
//! expiry countdown) or is a miss; a miss is a normal game outcome, never an
//! error.

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyProfile;
use crate::game::scheduler::LEVEL_PENALTY_MS;

/// Floor for the visible duration after the level penalty.
pub const MIN_VISIBLE_FLOOR_MS: u64 = 200;

/// How long a target spawned at `level` stays claimable.
pub fn visible_duration(profile: &DifficultyProfile, level: u32) -> u64 {
    let penalty = u64::from(level.saturating_sub(1)) * LEVEL_PENALTY_MS;
    profile
        .base_visible_ms
        .saturating_sub(penalty)
        .max(MIN_VISIBLE_FLOOR_MS)
}

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimOutcome {
    Hit,
    Miss,
}

/// The one target currently on the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTarget {
    pub cell_id: u32,
    /// Epoch milliseconds when the target appeared.
    pub spawned_at: u64,
    /// Visibility window in milliseconds.
    pub visible_ms: u64,
    /// Remaining milliseconds captured at pause time.
    pub remaining_at_pause: Option<u64>,
}

impl ActiveTarget {
    fn expires_at(&self) -> u64 {
        self.spawned_at.saturating_add(self.visible_ms)
    }
}

/// Single-slot owner of the live target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibilityTimer {
    active: Option<ActiveTarget>,
}

impl VisibilityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly spawned target, replacing any previous one.
    pub fn start(&mut self, now: u64, cell_id: u32, visible_ms: u64) {
        self.active = Some(ActiveTarget {
            cell_id,
            spawned_at: now,
            visible_ms,
            remaining_at_pause: None,
        });
    }

    /// Drop the live target without an outcome. Safe when nothing is live.
    pub fn cancel(&mut self) -> Option<ActiveTarget> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// Whether the live target's window has elapsed. Suspended targets
    /// never expire.
    pub fn expired(&self, now: u64) -> bool {
        match &self.active {
            Some(t) => t.remaining_at_pause.is_none() && t.expires_at() <= now,
            None => false,
        }
    }

    /// Clear an expired target and return it, if one expired.
    pub fn take_expired(&mut self, now: u64) -> Option<ActiveTarget> {
        if self.expired(now) {
            self.active.take()
        } else {
            None
        }
    }

    /// Milliseconds of visibility left, whether live or suspended.
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.active.as_ref().map(|t| match t.remaining_at_pause {
            Some(rem) => rem,
            None => t.expires_at().saturating_sub(now),
        })
    }

    /// Attempt to claim `cell_id`. A hit clears the target and cancels its
    /// expiry; anything else (no target, wrong cell, already expired,
    /// suspended) is a miss.
    pub fn claim(&mut self, now: u64, cell_id: u32) -> ClaimOutcome {
        let hit = matches!(
            &self.active,
            Some(t)
                if t.cell_id == cell_id
                    && t.remaining_at_pause.is_none()
                    && t.expires_at() > now
        );
        if hit {
            self.active = None;
            ClaimOutcome::Hit
        } else {
            ClaimOutcome::Miss
        }
    }

    /// Capture remaining visibility and stop the countdown.
    pub fn suspend(&mut self, now: u64) -> Option<u64> {
        let t = self.active.as_mut()?;
        if t.remaining_at_pause.is_none() {
            t.remaining_at_pause = Some(t.expires_at().saturating_sub(now));
        }
        t.remaining_at_pause
    }

    /// Restart a suspended target for exactly the captured remainder, not a
    /// fresh full window. Returns the remainder if a target was mid-flight.
    pub fn resume(&mut self, now: u64) -> Option<u64> {
        let t = self.active.as_mut()?;
        let rem = t.remaining_at_pause.take()?;
        t.spawned_at = now;
        t.visible_ms = rem;
        Some(rem)
    }
}
