use alloc::vec::Vec;

use super::*;

/// Replays a predetermined layout, for reproducible games and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, config: GameConfig, safe: Coord2) -> Result<Array2<bool>> {
        let size = config.size();
        let mut mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in &self.mines {
            if coords.0 >= size || coords.1 >= size {
                return Err(GameError::InvalidCoords);
            }
            if coords == safe {
                return Err(GameError::MineOnSafeOrigin(safe));
            }
            mask[coords.to_nd_index()] = true;
        }

        let actual = mask.iter().filter(|&&mine| mine).count() as CellCount;
        if actual != config.mines() {
            return Err(GameError::MineCountMismatch {
                expected: config.mines(),
                actual,
            });
        }

        Ok(mask)
    }
}
