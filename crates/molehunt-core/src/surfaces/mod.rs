pub mod http;
pub mod random;
pub mod traits;

pub use http::{HttpPlacement, HttpScorePersistence, SavedScore};
pub use random::RandomPlacement;
pub use traits::{AudioSurface, NullAudio, NullUi, PlacementService, Surfaces, UiSurface};
