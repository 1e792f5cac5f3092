//! Session engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads or OS timers - every operation takes the current time in epoch
//! milliseconds and the caller invokes `tick()` periodically to process due
//! deadlines.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Ended -> Idle (reset)
//! ```
//!
//! ## Invariants
//!
//! While Running, exactly one of {spawn wait pending, target live} holds;
//! the cycle alternates strictly between waiting and visible. While Paused,
//! both slots are suspended with their remaining time captured, not lost.
//! All arming goes through the scheduler's single `arm()` choke point, and
//! every operation checks the phase first, so a deadline that was in flight
//! when pause or end was requested becomes a guarded no-op.

use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::events::Event;
use crate::game::scheduler::SpawnScheduler;
use crate::game::scoring::{HitOutcome, ScoreBoard};
use crate::game::visibility::{visible_duration, ClaimOutcome, VisibilityTimer};
use crate::surfaces::Surfaces;

/// Fallback when the caller passes a zero grid size.
pub const DEFAULT_GRID_SIZE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Ended,
}

/// Core session engine.
///
/// Plain serializable state; collaborators (placement, UI, audio) and the
/// RNG are borrowed per call so the engine can be persisted between
/// invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEngine {
    phase: Phase,
    board: ScoreBoard,
    grid_size: u32,
    profile: DifficultyProfile,
    scheduler: SpawnScheduler,
    visibility: VisibilityTimer,
    /// Bumped on every phase transition. A placement result captured under
    /// an older generation is discarded instead of mutating state.
    generation: u64,
    /// Set when the profile changed while paused; the captured wait from
    /// the old profile was dropped, so resume draws fresh.
    rearm_on_resume: bool,
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            board: ScoreBoard::new(),
            grid_size: DEFAULT_GRID_SIZE,
            profile: DifficultyProfile::default(),
            scheduler: SpawnScheduler::new(),
            visibility: VisibilityTimer::new(),
            generation: 0,
            rearm_on_resume: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn level(&self) -> u32 {
        self.board.level()
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn difficulty(&self) -> Difficulty {
        self.profile.label
    }

    /// Milliseconds until the next spawn, if a wait is pending.
    pub fn wait_remaining_ms(&self, now: u64) -> Option<u64> {
        self.scheduler.remaining(now)
    }

    /// Cell and remaining visibility of the live target, if any.
    pub fn target(&self, now: u64) -> Option<(u32, u64)> {
        let t = self.visibility.active()?;
        Some((t.cell_id, self.visibility.remaining(now)?))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: u64) -> Event {
        let target = self.target(now);
        Event::StateSnapshot {
            phase: self.phase,
            score: self.board.score(),
            level: self.board.level(),
            grid_size: self.grid_size,
            difficulty: self.profile.label,
            wait_remaining_ms: self.scheduler.remaining(now),
            target_cell: target.map(|(cell, _)| cell),
            target_remaining_ms: target.map(|(_, rem)| rem),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session. Legal from Idle or Ended; anywhere else is a no-op.
    /// Resets score and level, applies grid and profile, arms the first
    /// wait.
    pub fn start(
        &mut self,
        now: u64,
        grid_size: u32,
        profile: DifficultyProfile,
        rng: &mut dyn RngCore,
        surfaces: &Surfaces,
    ) -> Vec<Event> {
        if !matches!(self.phase, Phase::Idle | Phase::Ended) {
            return Vec::new();
        }
        let grid_size = if grid_size == 0 {
            DEFAULT_GRID_SIZE
        } else {
            grid_size
        };
        self.board = ScoreBoard::new();
        self.grid_size = grid_size;
        self.profile = profile;
        self.scheduler.cancel();
        self.visibility.cancel();
        self.rearm_on_resume = false;
        self.phase = Phase::Running;
        self.generation += 1;

        let first_wait_ms = self
            .scheduler
            .arm(now, &self.profile, self.board.level(), rng);

        surfaces.ui.render_grid(grid_size);
        surfaces.ui.update_score(0);
        surfaces.ui.update_level(1);
        surfaces.audio.play_background_loop();

        vec![Event::SessionStarted {
            grid_size,
            difficulty: self.profile.label,
            first_wait_ms,
            at: Utc::now(),
        }]
    }

    /// Suspend the live countdown, capturing remaining time. Legal only
    /// while Running.
    pub fn pause(&mut self, now: u64, surfaces: &Surfaces) -> Vec<Event> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.phase = Phase::Paused;
        self.generation += 1;
        let wait_remaining_ms = self.scheduler.suspend(now);
        let target_remaining_ms = self.visibility.suspend(now);
        surfaces.audio.pause_background_loop();
        vec![Event::SessionPaused {
            wait_remaining_ms,
            target_remaining_ms,
            at: Utc::now(),
        }]
    }

    /// Restart whichever countdown was suspended, for exactly its captured
    /// remainder. Legal only while Paused.
    pub fn resume(&mut self, now: u64, rng: &mut dyn RngCore, surfaces: &Surfaces) -> Vec<Event> {
        if self.phase != Phase::Paused {
            return Vec::new();
        }
        self.phase = Phase::Running;
        self.generation += 1;

        let target_remaining_ms = self.visibility.resume(now);
        let wait_remaining_ms = if target_remaining_ms.is_some() {
            // A target was mid-flight; the cycle continues from there.
            None
        } else if self.rearm_on_resume || self.scheduler.resume(now).is_none() {
            // Profile changed while paused, or nothing was suspended
            // (self-heal): draw fresh so the session never freezes.
            Some(self.scheduler.arm(now, &self.profile, self.board.level(), rng))
        } else {
            self.scheduler.remaining(now)
        };
        self.rearm_on_resume = false;

        surfaces.audio.play_background_loop();
        vec![Event::SessionResumed {
            wait_remaining_ms,
            target_remaining_ms,
            at: Utc::now(),
        }]
    }

    /// End the session, cancelling all timers unconditionally and
    /// snapshotting the final score for persistence. Legal from Running or
    /// Paused.
    pub fn end(&mut self, surfaces: &Surfaces) -> Vec<Event> {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return Vec::new();
        }
        self.scheduler.cancel();
        if let Some(t) = self.visibility.cancel() {
            surfaces.ui.clear_cell(t.cell_id);
        }
        self.phase = Phase::Ended;
        self.generation += 1;
        surfaces.audio.pause_background_loop();
        vec![Event::SessionEnded {
            score: self.board.score(),
            level: self.board.level(),
            difficulty: self.profile.label,
            at: Utc::now(),
        }]
    }

    /// Return an ended session to Idle, clearing the counters.
    pub fn reset(&mut self) -> Vec<Event> {
        if self.phase != Phase::Ended {
            return Vec::new();
        }
        self.board = ScoreBoard::new();
        self.phase = Phase::Idle;
        self.generation += 1;
        vec![Event::SessionReset { at: Utc::now() }]
    }

    /// Switch the difficulty profile. A pending wait armed under the old
    /// profile is torn down and re-armed through `arm()` rather than left
    /// running; while paused, the captured wait is discarded and resume
    /// draws fresh under the new profile. A live target keeps its current
    /// visibility window; the next cycle uses the new timings.
    pub fn set_difficulty(
        &mut self,
        now: u64,
        profile: DifficultyProfile,
        rng: &mut dyn RngCore,
    ) -> Vec<Event> {
        self.profile = profile;
        match self.phase {
            Phase::Running => {
                if self.scheduler.is_armed() {
                    self.scheduler
                        .arm(now, &self.profile, self.board.level(), rng);
                }
            }
            Phase::Paused => {
                if self.scheduler.is_armed() {
                    self.scheduler.cancel();
                    self.rearm_on_resume = true;
                }
            }
            Phase::Idle | Phase::Ended => {}
        }
        vec![Event::DifficultyChanged {
            difficulty: self.profile.label,
            at: Utc::now(),
        }]
    }

    /// Process due deadlines: a fired wait requests placement and spawns, an
    /// elapsed visibility window expires the target and re-arms. No-op
    /// outside Running.
    pub fn tick(&mut self, now: u64, rng: &mut dyn RngCore, surfaces: &Surfaces) -> Vec<Event> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        // Re-armed deadlines land strictly after `now` (both floors are
        // >= 200 ms), so this settles in at most two passes.
        loop {
            if self.scheduler.due(now) {
                self.scheduler.cancel();
                self.fire_spawn(now, rng, surfaces, &mut events);
            } else if let Some(t) = self.visibility.take_expired(now) {
                surfaces.ui.clear_cell(t.cell_id);
                events.push(Event::TargetExpired {
                    cell_id: t.cell_id,
                    at: Utc::now(),
                });
                self.scheduler
                    .arm(now, &self.profile, self.board.level(), rng);
            } else {
                break;
            }
        }
        events
    }

    /// Attempt to claim `cell_id`. A hit cancels the target's expiry, feeds
    /// the scoring policy (possibly leveling up) and re-arms the next wait
    /// under the then-current level. Anything else is a scoreless miss.
    /// Outside Running the claim is ignored.
    pub fn claim(
        &mut self,
        now: u64,
        cell_id: u32,
        rng: &mut dyn RngCore,
        surfaces: &Surfaces,
    ) -> (ClaimOutcome, Vec<Event>) {
        if self.phase != Phase::Running {
            return (ClaimOutcome::Miss, Vec::new());
        }
        // Settle overdue deadlines first so an expired target cannot be hit.
        let mut events = self.tick(now, rng, surfaces);

        match self.visibility.claim(now, cell_id) {
            ClaimOutcome::Hit => {
                surfaces.ui.show_hit_marker(cell_id);
                surfaces.ui.clear_cell(cell_id);
                surfaces.audio.play_hit();

                let outcome = self.board.on_hit();
                surfaces.ui.update_score(self.board.score());
                events.push(Event::TargetHit {
                    cell_id,
                    score: self.board.score(),
                    at: Utc::now(),
                });
                if let HitOutcome::LevelUp(level) = outcome {
                    surfaces.ui.update_level(level);
                    surfaces.ui.show_level_up_effect();
                    surfaces.audio.play_level_up();
                    events.push(Event::LevelUp {
                        level,
                        at: Utc::now(),
                    });
                }
                // Re-arm in the same step as the increment; a level-up is
                // already in effect for this draw.
                self.scheduler
                    .arm(now, &self.profile, self.board.level(), rng);
                (ClaimOutcome::Hit, events)
            }
            ClaimOutcome::Miss => {
                self.board.on_miss();
                surfaces.audio.play_miss();
                events.push(Event::TargetMissed {
                    cell_id,
                    at: Utc::now(),
                });
                (ClaimOutcome::Miss, events)
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The wait fired: ask placement for a cell and start the visibility
    /// countdown. A failed or unusable response skips this spawn and
    /// re-arms; a response landing under a changed phase or generation is
    /// discarded silently.
    fn fire_spawn(
        &mut self,
        now: u64,
        rng: &mut dyn RngCore,
        surfaces: &Surfaces,
        events: &mut Vec<Event>,
    ) {
        let generation = self.generation;
        let result = surfaces.placement.pick_cell(self.grid_size);

        if self.phase != Phase::Running || self.generation != generation {
            // Stale response: whoever changed the phase owns the timers now.
            return;
        }

        let cells = self.grid_size.saturating_mul(self.grid_size);
        match result {
            Ok(cell_id) if cell_id >= 1 && cell_id <= cells => {
                let visible_ms = visible_duration(&self.profile, self.board.level());
                self.visibility.start(now, cell_id, visible_ms);
                surfaces.ui.show_target_at(cell_id);
                events.push(Event::TargetSpawned {
                    cell_id,
                    visible_ms,
                    at: Utc::now(),
                });
            }
            Ok(cell_id) => {
                events.push(Event::SpawnSkipped {
                    reason: format!("cell {cell_id} not in 1..={cells}"),
                    at: Utc::now(),
                });
                self.scheduler
                    .arm(now, &self.profile, self.board.level(), rng);
            }
            Err(err) => {
                events.push(Event::SpawnSkipped {
                    reason: err.to_string(),
                    at: Utc::now(),
                });
                self.scheduler
                    .arm(now, &self.profile, self.board.level(), rng);
            }
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Current wall clock in epoch milliseconds, the time base for all engine
/// operations.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
