use crate::error::PlacementError;

/// Remote service that picks the cell for the next target.
///
/// The engine treats every failure as "no spawn this cycle" and re-arms;
/// a placement error can never stall the session.
pub trait PlacementService: Send + Sync {
    /// Pick a cell in `1..=grid_size * grid_size`.
    fn pick_cell(&self, grid_size: u32) -> Result<u32, PlacementError>;
}

/// Rendering collaborator. The engine calls these as pure side-effecting
/// notifications and owns no rendering state; every method is a default
/// no-op so headless callers implement nothing.
pub trait UiSurface: Send + Sync {
    fn render_grid(&self, _size: u32) {}
    fn show_target_at(&self, _cell_id: u32) {}
    fn clear_cell(&self, _cell_id: u32) {}
    fn show_hit_marker(&self, _cell_id: u32) {}
    fn update_score(&self, _score: u32) {}
    fn update_level(&self, _level: u32) {}
    fn show_level_up_effect(&self) {}
}

/// Audio collaborator. Fire-and-forget; failures are the implementor's
/// problem, the engine never checks.
pub trait AudioSurface: Send + Sync {
    fn play_hit(&self) {}
    fn play_miss(&self) {}
    fn play_level_up(&self) {}
    fn play_background_loop(&self) {}
    fn pause_background_loop(&self) {}
}

/// UI surface that does nothing.
pub struct NullUi;

impl UiSurface for NullUi {}

/// Audio surface that does nothing.
pub struct NullAudio;

impl AudioSurface for NullAudio {}

/// The collaborators an engine operation may notify.
///
/// Borrowed per call rather than owned by the engine, so the engine state
/// stays plain serializable data.
pub struct Surfaces<'a> {
    pub placement: &'a dyn PlacementService,
    pub ui: &'a dyn UiSurface,
    pub audio: &'a dyn AudioSurface,
}

impl<'a> Surfaces<'a> {
    pub fn new(
        placement: &'a dyn PlacementService,
        ui: &'a dyn UiSurface,
        audio: &'a dyn AudioSurface,
    ) -> Self {
        Self {
            placement,
            ui,
            audio,
        }
    }

    /// Placement only; UI and audio notifications go nowhere.
    pub fn headless(placement: &'a dyn PlacementService) -> Self {
        Self {
            placement,
            ui: &NullUi,
            audio: &NullAudio,
        }
    }
}
