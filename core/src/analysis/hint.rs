use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    /// Proven mine-free by a numbered cell whose flags already account for its count
    Safe,
    /// Nothing could be proven, picked uniformly among the open cells
    Guess,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub coords: Coord2,
    pub kind: HintKind,
}

/// Cells proven safe by a single satisfied clue, de-duplicated, in discovery order.
///
/// Clues are scanned row-major and each clue's neighbors row-major, so the first entry is
/// stable for a given board. Only one clue is considered at a time, safe cells that need
/// two overlapping clues to prove are not found.
pub fn guaranteed_safe_cells(board: &Board) -> Vec<Coord2> {
    let mut seen = BTreeSet::new();
    let mut safe = Vec::new();

    for (clue, cell) in board.iter_cells() {
        if !cell.is_clue() {
            continue;
        }
        if board.count_flagged_neighbors(clue) != cell.neighbor_mines() {
            continue;
        }

        for neighbor in board.iter_neighbors(clue) {
            if board[neighbor].is_open_candidate() && seen.insert(neighbor) {
                safe.push(neighbor);
            }
        }
    }

    safe
}

/// Every cell that is neither revealed nor flagged, row-major.
pub fn open_candidates(board: &Board) -> Vec<Coord2> {
    board
        .iter_cells()
        .filter(|(_, cell)| cell.is_open_candidate())
        .map(|(coords, _)| coords)
        .collect()
}

/// Picks the first guaranteed-safe cell, or a uniform guess, or nothing when no cell is open.
pub fn suggest<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Hint> {
    if let Some(&coords) = guaranteed_safe_cells(board).first() {
        log::trace!("Hint: {:?} is guaranteed safe", coords);
        return Some(Hint {
            coords,
            kind: HintKind::Safe,
        });
    }

    let candidates = open_candidates(board);
    if candidates.is_empty() {
        log::trace!("Hint: no open cells left");
        return None;
    }

    let coords = candidates[rng.random_range(0..candidates.len())];
    log::trace!(
        "Hint: guessing {:?} out of {} open cells",
        coords,
        candidates.len()
    );
    Some(Hint {
        coords,
        kind: HintKind::Guess,
    })
}

/// Bare-coordinate form of [`suggest`] for a board that is expected to be `size × size`.
pub fn get_hint<R: Rng + ?Sized>(
    board: &Board,
    size: Coord,
    rng: &mut R,
) -> Result<Option<Coord2>> {
    if board.size() != size {
        return Err(GameError::InvalidBoardShape);
    }
    Ok(suggest(board, rng).map(|hint| hint.coords))
}

/// Owns the randomness used for guesses so the board is only ever borrowed.
#[derive(Clone, Debug)]
pub struct HintAdvisor<R = SmallRng> {
    rng: R,
}

impl HintAdvisor<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HintAdvisor<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn suggest(&mut self, board: &Board) -> Option<Hint> {
        suggest(board, &mut self.rng)
    }

    /// Hints are only offered while a game is being played.
    pub fn suggest_for<G: MineGenerator>(&mut self, session: &GameSession<G>) -> Option<Hint> {
        if !session.status().is_playing() {
            log::debug!("No hint while session is {:?}", session.status());
            return None;
        }
        self.suggest(session.board())
    }
}
