//! Local placement fallback.
//!
//! Used by the CLI when no remote placement server is configured, and by
//! tests. Draws uniformly over the grid, 1-based like the wire format.

use rand::Rng;

use crate::error::PlacementError;
use crate::surfaces::traits::PlacementService;

pub struct RandomPlacement;

impl PlacementService for RandomPlacement {
    fn pick_cell(&self, grid_size: u32) -> Result<u32, PlacementError> {
        let cells = grid_size.saturating_mul(grid_size).max(1);
        Ok(rand::thread_rng().gen_range(1..=cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_within_the_grid() {
        for _ in 0..200 {
            let cell = RandomPlacement.pick_cell(3).unwrap();
            assert!((1..=9).contains(&cell));
        }
    }

    #[test]
    fn degenerate_grid_still_yields_a_cell() {
        assert_eq!(RandomPlacement.pick_cell(1).unwrap(), 1);
    }
}
