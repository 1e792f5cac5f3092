//! Interval scheduler for the spawn wait.
//!
//! Owns the single `ScheduledWait` slot. `arm()` is the only way a wait
//! comes into existence and it always cancels the previous one first, so
//! two concurrent "next target" timers cannot exist. `cancel()` is a safe
//! no-op when nothing is pending.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyProfile;

/// Floor for the lower wait bound after the level penalty.
pub const MIN_WAIT_FLOOR_MS: u64 = 200;
/// Floor for the upper wait bound after the level penalty.
pub const MAX_WAIT_FLOOR_MS: u64 = 300;
/// Linear penalty applied per level above 1, in milliseconds.
pub const LEVEL_PENALTY_MS: u64 = 100;

/// Randomized delay before the next target spawns.
///
/// `penalty = (level - 1) * 100`; the bounds shrink linearly with level and
/// are floor-clamped at 200/300 ms so they never degenerate to zero.
pub fn next_delay(profile: &DifficultyProfile, level: u32, rng: &mut dyn RngCore) -> u64 {
    let penalty = u64::from(level.saturating_sub(1)) * LEVEL_PENALTY_MS;
    let lo = profile
        .min_interval_ms
        .saturating_sub(penalty)
        .max(MIN_WAIT_FLOOR_MS);
    let hi = profile
        .max_interval_ms
        .saturating_sub(penalty)
        .max(MAX_WAIT_FLOOR_MS);
    rng.gen_range(lo..=hi)
}

/// The one pending wait before the next spawn.
///
/// `remaining_at_pause` is `Some` only while the session is paused; a
/// suspended wait is never considered due, regardless of its deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledWait {
    /// Epoch milliseconds when the wait was (re)armed.
    pub armed_at: u64,
    /// Length of the wait in milliseconds.
    pub duration_ms: u64,
    /// Remaining milliseconds captured at pause time.
    pub remaining_at_pause: Option<u64>,
}

impl ScheduledWait {
    fn deadline(&self) -> u64 {
        self.armed_at.saturating_add(self.duration_ms)
    }
}

/// Single-slot owner of the spawn wait.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pending: Option<ScheduledWait>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh delay and arm the wait, replacing any pending one.
    /// Returns the drawn delay.
    pub fn arm(
        &mut self,
        now: u64,
        profile: &DifficultyProfile,
        level: u32,
        rng: &mut dyn RngCore,
    ) -> u64 {
        self.cancel();
        let delay = next_delay(profile, level, rng);
        self.pending = Some(ScheduledWait {
            armed_at: now,
            duration_ms: delay,
            remaining_at_pause: None,
        });
        delay
    }

    /// Drop the pending wait without firing. Safe when nothing is pending.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the wait has counted down. Suspended waits are never due.
    pub fn due(&self, now: u64) -> bool {
        match &self.pending {
            Some(w) => w.remaining_at_pause.is_none() && w.deadline() <= now,
            None => false,
        }
    }

    /// Milliseconds left on the wait, whether live or suspended.
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.pending.as_ref().map(|w| match w.remaining_at_pause {
            Some(rem) => rem,
            None => w.deadline().saturating_sub(now),
        })
    }

    /// Capture the remaining time and stop the countdown.
    /// Returns the captured remainder, or None if nothing was pending.
    pub fn suspend(&mut self, now: u64) -> Option<u64> {
        let w = self.pending.as_mut()?;
        if w.remaining_at_pause.is_none() {
            w.remaining_at_pause = Some(w.deadline().saturating_sub(now));
        }
        w.remaining_at_pause
    }

    /// Restart a suspended wait for exactly the captured remainder.
    /// Returns the remainder, or None if no suspended wait exists.
    pub fn resume(&mut self, now: u64) -> Option<u64> {
        let w = self.pending.as_mut()?;
        let rem = w.remaining_at_pause.take()?;
        w.armed_at = now;
        w.duration_ms = rem;
        Some(rem)
    }
}
