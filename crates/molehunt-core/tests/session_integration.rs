//! Integration tests for the session engine.
//!
//! These drive full spawn cycles with synthetic timestamps and a
//! deterministic placement double, and verify the session invariants:
//! strict wait/visible alternation, pause that suspends rather than loses
//! time, and teardown that leaves no timer behind.

use std::sync::atomic::{AtomicU32, Ordering};

use molehunt_core::error::PlacementError;
use molehunt_core::surfaces::{PlacementService, Surfaces, UiSurface};
use molehunt_core::{ClaimOutcome, Difficulty, Event, GameEngine, Phase};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Placement double that always picks the same cell.
struct FixedPlacement(u32);

impl PlacementService for FixedPlacement {
    fn pick_cell(&self, _grid_size: u32) -> Result<u32, PlacementError> {
        Ok(self.0)
    }
}

/// Placement double that always fails.
struct FailingPlacement;

impl PlacementService for FailingPlacement {
    fn pick_cell(&self, _grid_size: u32) -> Result<u32, PlacementError> {
        Err(PlacementError::Request("connection refused".into()))
    }
}

/// Placement double that returns a cell outside the grid.
struct OutOfGridPlacement;

impl PlacementService for OutOfGridPlacement {
    fn pick_cell(&self, grid_size: u32) -> Result<u32, PlacementError> {
        Ok(grid_size * grid_size + 1)
    }
}

/// UI double counting notifications.
#[derive(Default)]
struct CountingUi {
    targets_shown: AtomicU32,
    cells_cleared: AtomicU32,
}

impl UiSurface for CountingUi {
    fn show_target_at(&self, _cell_id: u32) {
        self.targets_shown.fetch_add(1, Ordering::SeqCst);
    }
    fn clear_cell(&self, _cell_id: u32) {
        self.cells_cleared.fetch_add(1, Ordering::SeqCst);
    }
}

fn rng() -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(99)
}

fn start_medium(engine: &mut GameEngine, rng: &mut Pcg64Mcg, surfaces: &Surfaces) {
    let events = engine.start(0, 3, Difficulty::Medium.profile(), rng, surfaces);
    assert!(matches!(events[0], Event::SessionStarted { .. }));
}

/// Advance to the pending wait's deadline and tick; returns (now, events).
fn fire_wait(engine: &mut GameEngine, now: u64, rng: &mut Pcg64Mcg, s: &Surfaces) -> (u64, Vec<Event>) {
    let wait = engine.wait_remaining_ms(now).expect("a wait must be pending");
    let now = now + wait;
    let events = engine.tick(now, rng, s);
    (now, events)
}

#[test]
fn medium_level_one_timings() {
    let placement = FixedPlacement(5);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let mut now = 0;
    for _ in 0..20 {
        let wait = engine.wait_remaining_ms(now).unwrap();
        assert!((1100..=1300).contains(&wait), "wait {wait} out of bounds");

        let (t, events) = fire_wait(&mut engine, now, &mut r, &surfaces);
        now = t;
        match &events[0] {
            Event::TargetSpawned { cell_id, visible_ms, .. } => {
                assert_eq!(*cell_id, 5);
                assert_eq!(*visible_ms, 1200);
            }
            other => panic!("expected TargetSpawned, got {other:?}"),
        }

        // Claim immediately; cycle re-arms.
        let (outcome, _) = engine.claim(now, 5, &mut r, &surfaces);
        assert_eq!(outcome, ClaimOutcome::Hit);
    }
}

#[test]
fn running_session_alternates_wait_and_target() {
    let placement = FixedPlacement(3);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let mut now = 0;
    for _ in 0..10 {
        // Waiting: a wait is pending, no target.
        assert!(engine.wait_remaining_ms(now).is_some());
        assert!(engine.target(now).is_none());

        let (t, _) = fire_wait(&mut engine, now, &mut r, &surfaces);
        now = t;

        // Visible: a target is live, no wait.
        assert!(engine.wait_remaining_ms(now).is_none());
        assert!(engine.target(now).is_some());

        // Let it expire; back to waiting.
        let (_, remaining) = engine.target(now).unwrap();
        now += remaining;
        let events = engine.tick(now, &mut r, &surfaces);
        assert!(matches!(events[0], Event::TargetExpired { .. }));
    }
}

#[test]
fn ten_hits_reach_level_two_and_tighten_timings() {
    let placement = FixedPlacement(1);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let mut now = 0;
    let mut saw_level_up = false;
    for hit in 1..=10 {
        let (t, _) = fire_wait(&mut engine, now, &mut r, &surfaces);
        now = t;
        let (outcome, events) = engine.claim(now, 1, &mut r, &surfaces);
        assert_eq!(outcome, ClaimOutcome::Hit);
        if hit == 10 {
            saw_level_up = events
                .iter()
                .any(|e| matches!(e, Event::LevelUp { level: 2, .. }));
        }
    }
    assert!(saw_level_up, "tenth hit must emit exactly one LevelUp");
    assert_eq!(engine.score(), 10);
    assert_eq!(engine.level(), 2);

    // The wait armed by the tenth hit already uses the level-2 bounds.
    let wait = engine.wait_remaining_ms(now).unwrap();
    assert!((1000..=1200).contains(&wait), "wait {wait} not level-2");

    let (_, events) = fire_wait(&mut engine, now, &mut r, &surfaces);
    match &events[0] {
        Event::TargetSpawned { visible_ms, .. } => assert_eq!(*visible_ms, 1100),
        other => panic!("expected TargetSpawned, got {other:?}"),
    }
}

#[test]
fn pause_mid_wait_resumes_for_exactly_the_remainder() {
    let placement = FixedPlacement(2);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let wait = engine.wait_remaining_ms(0).unwrap();
    let pause_at = wait - 400;
    let events = engine.pause(pause_at, &surfaces);
    match &events[0] {
        Event::SessionPaused { wait_remaining_ms, .. } => {
            assert_eq!(*wait_remaining_ms, Some(400));
        }
        other => panic!("expected SessionPaused, got {other:?}"),
    }

    // Nothing fires while paused, however long it lasts.
    assert!(engine.tick(pause_at + 60_000, &mut r, &surfaces).is_empty());

    let resume_at = pause_at + 60_000;
    let events = engine.resume(resume_at, &mut r, &surfaces);
    match &events[0] {
        Event::SessionResumed { wait_remaining_ms, .. } => {
            assert_eq!(*wait_remaining_ms, Some(400), "not a fresh draw");
        }
        other => panic!("expected SessionResumed, got {other:?}"),
    }

    // Fires exactly 400 ms after resume, not before.
    assert!(engine.tick(resume_at + 399, &mut r, &surfaces).is_empty());
    let events = engine.tick(resume_at + 400, &mut r, &surfaces);
    assert!(matches!(events[0], Event::TargetSpawned { .. }));
}

#[test]
fn pause_with_live_target_preserves_visibility() {
    let placement = FixedPlacement(7);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, _) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    // 1200 ms window; pause 900 in.
    let events = engine.pause(now + 900, &surfaces);
    match &events[0] {
        Event::SessionPaused { target_remaining_ms, .. } => {
            assert_eq!(*target_remaining_ms, Some(300));
        }
        other => panic!("expected SessionPaused, got {other:?}"),
    }

    let resume_at = now + 500_000;
    engine.resume(resume_at, &mut r, &surfaces);
    let (cell, remaining) = engine.target(resume_at).unwrap();
    assert_eq!(cell, 7);
    assert_eq!(remaining, 300);

    // Still claimable within the remainder, gone after.
    let (outcome, _) = engine.claim(resume_at + 299, cell, &mut r, &surfaces);
    assert_eq!(outcome, ClaimOutcome::Hit);
}

#[test]
fn claim_without_target_is_a_scoreless_miss() {
    let placement = FixedPlacement(1);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (outcome, events) = engine.claim(10, 4, &mut r, &surfaces);
    assert_eq!(outcome, ClaimOutcome::Miss);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TargetMissed { cell_id: 4, .. })));
    assert_eq!(engine.score(), 0);
    // The pending wait is untouched by a miss.
    assert!(engine.wait_remaining_ms(10).is_some());
}

#[test]
fn claim_on_wrong_cell_keeps_the_target_live() {
    let placement = FixedPlacement(5);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, _) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    let (outcome, _) = engine.claim(now + 10, 2, &mut r, &surfaces);
    assert_eq!(outcome, ClaimOutcome::Miss);
    assert_eq!(engine.target(now + 10).map(|(c, _)| c), Some(5));
    // The real cell still hits.
    let (outcome, _) = engine.claim(now + 20, 5, &mut r, &surfaces);
    assert_eq!(outcome, ClaimOutcome::Hit);
}

#[test]
fn end_with_live_target_leaves_no_timers() {
    let placement = FixedPlacement(5);
    let ui = CountingUi::default();
    let audio = molehunt_core::surfaces::NullAudio;
    let surfaces = Surfaces::new(&placement, &ui, &audio);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, _) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    let events = engine.end(&surfaces);
    match &events[0] {
        Event::SessionEnded { score, .. } => assert_eq!(*score, 0),
        other => panic!("expected SessionEnded, got {other:?}"),
    }
    assert_eq!(engine.phase(), Phase::Ended);
    assert!(engine.wait_remaining_ms(now).is_none());
    assert!(engine.target(now).is_none());

    // A deadline that was in flight when end was requested must not land.
    assert!(engine.tick(now + 10_000, &mut r, &surfaces).is_empty());
    let (outcome, events) = engine.claim(now + 10_000, 5, &mut r, &surfaces);
    assert_eq!(outcome, ClaimOutcome::Miss);
    assert!(events.is_empty());
}

#[test]
fn placement_failure_skips_the_spawn_but_rearms() {
    let placement = FailingPlacement;
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, events) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    assert!(matches!(events[0], Event::SpawnSkipped { .. }));
    // No target, but the next wait is already armed: never stalls.
    assert!(engine.target(now).is_none());
    let wait = engine.wait_remaining_ms(now).unwrap();
    assert!((1100..=1300).contains(&wait));
}

#[test]
fn out_of_range_placement_is_a_skipped_spawn() {
    let placement = OutOfGridPlacement;
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, events) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    assert!(matches!(events[0], Event::SpawnSkipped { .. }));
    assert!(engine.target(now).is_none());
    assert!(engine.wait_remaining_ms(now).is_some());
}

#[test]
fn difficulty_switch_rearms_under_the_new_profile() {
    let placement = FixedPlacement(1);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let events = engine.set_difficulty(100, Difficulty::Hard.profile(), &mut r);
    assert!(matches!(
        events[0],
        Event::DifficultyChanged { difficulty: Difficulty::Hard, .. }
    ));
    // The stale Medium wait is gone; the new one uses Hard bounds.
    let wait = engine.wait_remaining_ms(100).unwrap();
    assert!((500..=700).contains(&wait), "wait {wait} not re-armed as Hard");
}

#[test]
fn difficulty_switch_while_paused_draws_fresh_on_resume() {
    let placement = FixedPlacement(1);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    engine.pause(200, &surfaces);
    engine.set_difficulty(200, Difficulty::Hard.profile(), &mut r);

    let events = engine.resume(1_000, &mut r, &surfaces);
    match &events[0] {
        Event::SessionResumed { wait_remaining_ms, .. } => {
            let wait = wait_remaining_ms.expect("a wait must be armed on resume");
            assert!((500..=700).contains(&wait), "wait {wait} not a Hard draw");
        }
        other => panic!("expected SessionResumed, got {other:?}"),
    }
}

#[test]
fn ui_is_notified_of_spawns_and_expiries() {
    let placement = FixedPlacement(4);
    let ui = CountingUi::default();
    let audio = molehunt_core::surfaces::NullAudio;
    let surfaces = Surfaces::new(&placement, &ui, &audio);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);

    let (now, _) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    let (_, remaining) = engine.target(now).unwrap();
    engine.tick(now + remaining, &mut r, &surfaces);

    assert_eq!(ui.targets_shown.load(Ordering::SeqCst), 1);
    assert_eq!(ui.cells_cleared.load(Ordering::SeqCst), 1);
}

#[test]
fn engine_state_survives_serialization() {
    let placement = FixedPlacement(5);
    let surfaces = Surfaces::headless(&placement);
    let mut r = rng();
    let mut engine = GameEngine::new();
    start_medium(&mut engine, &mut r, &surfaces);
    let (now, _) = fire_wait(&mut engine, 0, &mut r, &surfaces);
    engine.pause(now + 100, &surfaces);

    let json = serde_json::to_string(&engine).unwrap();
    let mut revived: GameEngine = serde_json::from_str(&json).unwrap();

    assert_eq!(revived.phase(), Phase::Paused);
    let resume_at = now + 90_000;
    revived.resume(resume_at, &mut r, &surfaces);
    // The suspended target carried its remaining 1100 ms across the trip.
    assert_eq!(revived.target(resume_at).map(|(_, rem)| rem), Some(1100));
}
