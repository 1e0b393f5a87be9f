use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform rejection sampling: draw `(row, col)` pairs and keep those that are neither the
/// safe origin nor already mined.
///
/// Only terminates when `mines < size²`, which every preset satisfies.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>> {
        let size = config.size();
        debug_assert!(config.mines() < config.total_cells());

        let mut mines: Array2<bool> = Array2::default((size, size).to_nd_index());
        let mut mines_placed: CellCount = 0;
        let mut rejected = 0usize;

        while mines_placed < config.mines() {
            let coords = (self.rng.random_range(0..size), self.rng.random_range(0..size));
            if coords == safe || mines[coords.to_nd_index()] {
                rejected += 1;
                continue;
            }
            mines[coords.to_nd_index()] = true;
            mines_placed += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} avoiding {:?} ({} draws rejected)",
            mines_placed,
            size,
            size,
            safe,
            rejected
        );
        Ok(mines)
    }
}
