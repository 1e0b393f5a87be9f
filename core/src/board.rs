use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square grid of cells, indexed `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Empty `size × size` board with every cell hidden, unflagged and mine-free.
    pub fn new(size: Coord) -> Self {
        Self {
            cells: Array2::default((size, size).to_nd_index()),
            mine_count: 0,
        }
    }

    /// Board with mines already placed from a mask, neighbor counts computed.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        if rows != cols {
            return Err(GameError::InvalidBoardShape);
        }
        let size = Coord::try_from(rows).map_err(|_| GameError::InvalidBoardShape)?;
        let mut board = Self::new(size);
        board.place_mines(mine_mask);
        Ok(board)
    }

    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default((size, size).to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    /// Side length of the square grid.
    pub fn size(&self) -> Coord {
        let (rows, _) = self.cells.dim();
        Coord::try_from(rows).unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    /// Number of mines placed so far, zero before placement.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn has_mines(&self) -> bool {
        self.mine_count > 0
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// All cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.count_cells(Cell::is_revealed)
    }

    pub fn flagged_cells(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count() as u8
    }

    /// Copies the mask into the board and recomputes every neighbor count.
    ///
    /// The mask must have the board's shape.
    pub(crate) fn place_mines(&mut self, mine_mask: &Array2<bool>) {
        debug_assert_eq!(mine_mask.dim(), self.cells.dim());

        let mut mine_count = 0;
        for (cell, &is_mine) in self.cells.iter_mut().zip(mine_mask.iter()) {
            cell.set_mine(is_mine);
            if is_mine {
                mine_count += 1;
            }
        }
        self.mine_count = mine_count;
        self.recompute_neighbor_counts();
    }

    fn recompute_neighbor_counts(&mut self) {
        let size = self.size();
        for row in 0..size {
            for col in 0..size {
                let coords = (row, col);
                let count = if self[coords].is_mine() {
                    0
                } else {
                    self.adjacent_mine_count(coords)
                };
                self.cell_mut(coords).set_neighbor_mines(count);
            }
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    fn count_cells(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&&cell| predicate(cell)).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_count(mines: &[Coord2], (row, col): Coord2) -> u8 {
        mines
            .iter()
            .filter(|&&(mine_row, mine_col)| {
                (mine_row, mine_col) != (row, col)
                    && mine_row.abs_diff(row) <= 1
                    && mine_col.abs_diff(col) <= 1
            })
            .count() as u8
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(6);

        assert_eq!(board.size(), 6);
        assert_eq!(board.total_cells(), 36);
        assert!(!board.has_mines());
        assert!(board.iter_cells().all(|(_, cell)| cell == Cell::default()));
    }

    #[test]
    fn neighbor_counts_match_brute_force() {
        let mines = [(0, 0), (0, 3), (1, 1), (2, 3)];
        let board = Board::from_mine_coords(4, &mines).unwrap();

        assert_eq!(board.mine_count(), 4);
        for (coords, cell) in board.iter_cells() {
            if cell.is_mine() {
                assert!(mines.contains(&coords));
            } else {
                assert_eq!(cell.neighbor_mines(), brute_force_count(&mines, coords));
            }
        }
    }

    #[test]
    fn out_of_range_mine_is_rejected() {
        assert_eq!(
            Board::from_mine_coords(4, &[(4, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn non_square_mask_is_rejected() {
        let mask: Array2<bool> = Array2::default([3, 4]);

        assert_eq!(
            Board::from_mine_mask(&mask),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn validate_coords_rejects_outside_grid() {
        let board = Board::new(4);

        assert_eq!(board.validate_coords((3, 3)), Ok((3, 3)));
        assert_eq!(board.validate_coords((0, 4)), Err(GameError::InvalidCoords));
    }
}
