mod engine;
mod scheduler;
mod scoring;
mod visibility;

pub use engine::{now_ms, GameEngine, Phase, DEFAULT_GRID_SIZE};
pub use scheduler::{
    next_delay, ScheduledWait, SpawnScheduler, LEVEL_PENALTY_MS, MAX_WAIT_FLOOR_MS,
    MIN_WAIT_FLOOR_MS,
};
pub use scoring::{HitOutcome, ScoreBoard, LEVEL_UP_EVERY};
pub use visibility::{
    visible_duration, ActiveTarget, ClaimOutcome, VisibilityTimer, MIN_VISIBLE_FLOOR_MS,
};
