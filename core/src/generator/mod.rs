use crate::*;
use ndarray::Array2;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Produces the mine mask for a fresh session once the first revealed cell is known.
pub trait MineGenerator {
    /// Returns a `size × size` mask with exactly `config.mines()` mines, none at `safe`.
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>>;
}
