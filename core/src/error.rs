use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Unsupported grid size {0}, expected one of 4, 6 or 9")]
    UnsupportedSize(u8),
    #[error("Mine layout has {actual} mines, the preset expects {expected}")]
    MineCountMismatch { expected: CellCount, actual: CellCount },
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Mine layout places a mine on the safe origin {0:?}")]
    MineOnSafeOrigin(Coord2),
}

pub type Result<T> = core::result::Result<T, GameError>;
