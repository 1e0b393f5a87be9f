use serde::{Deserialize, Serialize};

/// State of a single grid square.
///
/// A cell is never revealed and flagged at the same time, the mutators below keep that.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
    neighbor_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Adjacent mine count, only meaningful for non-mine cells after placement.
    pub const fn neighbor_mines(self) -> u8 {
        self.neighbor_mines
    }

    /// Neither revealed nor flagged, i.e. something a player could still open.
    pub const fn is_open_candidate(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    /// Revealed with a non-zero number.
    pub const fn is_clue(self) -> bool {
        self.is_revealed && !self.is_mine && self.neighbor_mines > 0
    }

    pub(crate) fn set_mine(&mut self, is_mine: bool) {
        self.is_mine = is_mine;
    }

    pub(crate) fn set_neighbor_mines(&mut self, count: u8) {
        self.neighbor_mines = count;
    }

    /// Returns whether the cell changed.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.is_revealed || self.is_flagged {
            return false;
        }
        self.is_revealed = true;
        true
    }

    /// Reveals regardless of a flag, used to expose mines after a loss.
    pub(crate) fn expose(&mut self) -> bool {
        if self.is_revealed {
            return false;
        }
        self.is_flagged = false;
        self.is_revealed = true;
        true
    }

    /// Returns the new flag state, or `None` when the cell is revealed.
    pub(crate) fn toggle_flag(&mut self) -> Option<bool> {
        if self.is_revealed {
            return None;
        }
        self.is_flagged = !self.is_flagged;
        Some(self.is_flagged)
    }
}
