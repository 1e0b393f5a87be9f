use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Playing
/// - Playing -> Won
/// - Playing -> Lost
///
/// Only a reset leaves `Won` or `Lost`, and it goes back to `Ready`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Ready,
    Playing,
    Won,
    Lost,
}

impl SessionStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Ready
    }
}

/// What a reveal did, enough for a host to redraw incrementally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub status: SessionStatus,
    /// Cells revealed by this call and counted towards the win, in reveal order.
    pub revealed_cells: Vec<Coord2>,
    /// Every cell whose state changed, which also includes mines exposed after a loss.
    pub changed_cells: Vec<Coord2>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlagReport {
    pub outcome: MarkOutcome,
    pub is_flagged: bool,
}

/// Point-in-time copy of a session for hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub config: GameConfig,
    pub status: SessionStatus,
    pub revealed_count: CellCount,
    pub flagged_count: CellCount,
    pub elapsed_seconds: u32,
    pub board: Board,
}

/// One game from the first reveal to a win or loss.
///
/// Mines are placed lazily by `G` on the first reveal, which is always safe.
#[derive(Clone, Debug)]
pub struct GameSession<G = RandomMineGenerator> {
    config: GameConfig,
    board: Board,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    status: SessionStatus,
    clock: SessionClock,
    generator: G,
}

impl GameSession<RandomMineGenerator> {
    pub fn new(size: Coord, seed: u64) -> Result<Self> {
        Self::with_generator(size, RandomMineGenerator::new(seed))
    }
}

impl<G: MineGenerator> GameSession<G> {
    pub fn with_generator(size: Coord, generator: G) -> Result<Self> {
        let config = GameConfig::for_size(size)?;
        log::debug!(
            "New {}x{} session with {} mines",
            config.size(),
            config.size(),
            config.mines()
        );
        Ok(Self {
            config,
            board: Board::new(config.size()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            status: Default::default(),
            clock: Default::default(),
            generator,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord {
        self.config.size()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Read-only view of the grid, this is what the hint advisor consumes.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// Can go negative when more flags than mines are placed.
    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.clock.elapsed_seconds()
    }

    /// Called by the host once per second, ignored unless the game is being played.
    pub fn tick(&mut self) -> u32 {
        self.clock.tick()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config,
            status: self.status,
            revealed_count: self.revealed_count.0,
            flagged_count: self.flagged_count.0,
            elapsed_seconds: self.clock.elapsed_seconds(),
            board: self.board.clone(),
        }
    }

    /// Replaces the whole session with a fresh `Ready` one, possibly of another size.
    ///
    /// The generator carries over, so a random generator keeps its stream.
    pub fn reset(&mut self, size: Coord) -> Result<SessionSnapshot> {
        let config = GameConfig::for_size(size)?;
        if self.clock.is_running() {
            self.clock.stop();
        }

        self.config = config;
        self.board = Board::new(config.size());
        self.revealed_count = Saturating(0);
        self.flagged_count = Saturating(0);
        self.status = SessionStatus::Ready;
        self.clock = SessionClock::default();
        log::debug!("Session reset to {}x{}", size, size);

        Ok(self.snapshot())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(self.flag_report(MarkOutcome::NoChange, coords));
        }

        Ok(match self.board.cell_mut(coords).toggle_flag() {
            Some(true) => {
                self.flagged_count += 1;
                self.flag_report(MarkOutcome::Changed, coords)
            }
            Some(false) => {
                self.flagged_count -= 1;
                self.flag_report(MarkOutcome::Changed, coords)
            }
            None => self.flag_report(MarkOutcome::NoChange, coords),
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() || !self.board[coords].is_open_candidate() {
            return Ok(self.reveal_report(RevealOutcome::NoChange, Vec::new(), Vec::new()));
        }

        if self.status.is_ready() {
            self.start(coords)?;
        }

        self.board.cell_mut(coords).reveal();
        self.revealed_count += 1;
        let mut revealed_cells = vec![coords];

        if self.board[coords].is_mine() {
            log::debug!("Hit mine at {:?}", coords);
            let mut changed_cells = revealed_cells.clone();
            changed_cells.extend(self.expose_mines());
            self.finish(SessionStatus::Lost);
            return Ok(self.reveal_report(RevealOutcome::HitMine, revealed_cells, changed_cells));
        }

        if self.board[coords].neighbor_mines() == 0 {
            self.flood_from(coords, &mut revealed_cells);
        }

        let outcome = if self.revealed_count == Saturating(self.config.safe_cells()) {
            self.finish(SessionStatus::Won);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };

        let changed_cells = revealed_cells.clone();
        Ok(self.reveal_report(outcome, revealed_cells, changed_cells))
    }

    fn start(&mut self, safe: Coord2) -> Result<()> {
        let mine_mask = self.generator.generate(self.config, safe)?;
        self.board.place_mines(&mine_mask);
        self.clock.start();
        self.status = SessionStatus::Playing;
        log::debug!("Session started from {:?}", safe);
        Ok(())
    }

    fn finish(&mut self, status: SessionStatus) {
        debug_assert!(status.is_finished());
        if self.status.is_finished() {
            return;
        }
        self.clock.stop();
        self.status = status;
        log::debug!(
            "Session ended {:?} after {}s, {} cells revealed",
            status,
            self.clock.elapsed_seconds(),
            self.revealed_count.0
        );
    }

    /// Opens the zero region around `origin` plus its numbered border, stopping at flags.
    fn flood_from(&mut self, origin: Coord2, revealed_cells: &mut Vec<Coord2>) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .board
            .iter_neighbors(origin)
            .filter(|&pos| self.board[pos].is_open_candidate())
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if !self.board.cell_mut(visit_coords).reveal() {
                log::trace!("Skipping cell at {:?}", visit_coords);
                continue;
            }
            self.revealed_count += 1;
            revealed_cells.push(visit_coords);

            let visit_count = self.board[visit_coords].neighbor_mines();
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                visit_count
            );

            if visit_count == 0 {
                let board = &self.board;
                to_visit.extend(
                    board
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| board[pos].is_open_candidate())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// Reveals every mine for display, without counting them as progress.
    fn expose_mines(&mut self) -> Vec<Coord2> {
        let mines: Vec<_> = self
            .board
            .iter_cells()
            .filter(|(_, cell)| cell.is_mine())
            .map(|(coords, _)| coords)
            .collect();

        let mut exposed = Vec::new();
        for coords in mines {
            let cell = self.board.cell_mut(coords);
            let was_flagged = cell.is_flagged();
            if cell.expose() {
                if was_flagged {
                    self.flagged_count -= 1;
                }
                exposed.push(coords);
            }
        }
        exposed
    }

    fn reveal_report(
        &self,
        outcome: RevealOutcome,
        revealed_cells: Vec<Coord2>,
        changed_cells: Vec<Coord2>,
    ) -> RevealReport {
        RevealReport {
            outcome,
            status: self.status,
            revealed_cells,
            changed_cells,
        }
    }

    fn flag_report(&self, outcome: MarkOutcome, coords: Coord2) -> FlagReport {
        FlagReport {
            outcome,
            is_flagged: self.board[coords].is_flagged(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_session(size: Coord, mines: &[Coord2]) -> GameSession<FixedMineGenerator> {
        GameSession::with_generator(size, FixedMineGenerator::new(mines)).unwrap()
    }

    #[test]
    fn new_session_is_ready_and_empty() {
        let session = GameSession::new(6, 1).unwrap();

        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(!session.board().has_mines());
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(!session.clock().is_running());
    }

    #[test]
    fn unsupported_size_fails_fast() {
        assert_eq!(
            GameSession::new(5, 1).map(|_| ()),
            Err(GameError::UnsupportedSize(5))
        );
    }

    #[test]
    fn first_reveal_places_mines_and_starts_clock() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);

        let report = session.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Revealed);
        assert_eq!(report.status, SessionStatus::Playing);
        assert_eq!(report.revealed_cells, [(1, 1)]);
        assert_eq!(session.board().mine_count(), 4);
        assert!(session.clock().is_running());
        assert_eq!(session.tick(), 1);
    }

    #[test]
    fn reveal_hits_mine_and_exposes_all_mines() {
        let mines = [(0, 0), (0, 3), (3, 0), (3, 3)];
        let mut session = fixed_session(4, &mines);
        session.reveal((1, 1)).unwrap();
        session.toggle_flag((3, 3)).unwrap();

        let report = session.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::HitMine);
        assert_eq!(session.status(), SessionStatus::Lost);
        assert_eq!(report.revealed_cells, [(0, 0)]);
        assert_eq!(report.changed_cells.len(), 4);
        for mine in mines {
            assert!(session.board()[mine].is_revealed());
            assert!(!session.board()[mine].is_flagged());
        }
        assert_eq!(session.revealed_count(), 2);
        assert!(!session.clock().is_running());
    }

    #[test]
    fn terminal_session_ignores_moves() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
        session.reveal((1, 1)).unwrap();
        session.reveal((0, 0)).unwrap();
        let before = session.snapshot();

        let reveal = session.reveal((2, 2)).unwrap();
        let flag = session.toggle_flag((2, 2)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::NoChange);
        assert_eq!(flag.outcome, MarkOutcome::NoChange);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
        session.reveal((1, 1)).unwrap();
        let before = session.snapshot();

        let report = session.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert!(report.changed_cells.is_empty());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn reveal_on_flag_is_no_op() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
        session.toggle_flag((1, 1)).unwrap();

        let report = session.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert_eq!(session.status(), SessionStatus::Ready);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        // 0 0 2 *
        // F 0 2 *
        // 2 2 2 1
        // * * 1 0
        let mut session = fixed_session(4, &[(0, 3), (1, 3), (3, 0), (3, 1)]);
        session.toggle_flag((1, 0)).unwrap();

        let report = session.reveal((0, 0)).unwrap();

        let mut revealed = report.revealed_cells.clone();
        revealed.sort();
        assert_eq!(revealed, [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]);
        assert_eq!(report.outcome, RevealOutcome::Revealed);
        assert!(session.board()[(1, 0)].is_flagged());
        assert!(!session.board()[(1, 0)].is_revealed());
        assert_eq!(session.revealed_count(), 8);
    }

    #[test]
    fn double_toggle_is_net_zero() {
        let mut session = GameSession::new(4, 3).unwrap();

        let first = session.toggle_flag((2, 2)).unwrap();
        assert_eq!(first.outcome, MarkOutcome::Changed);
        assert!(first.is_flagged);
        assert_eq!(session.flagged_count(), 1);

        let second = session.toggle_flag((2, 2)).unwrap();
        assert_eq!(second.outcome, MarkOutcome::Changed);
        assert!(!second.is_flagged);
        assert_eq!(session.flagged_count(), 0);
    }

    #[test]
    fn flag_on_revealed_cell_is_no_op() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);
        session.reveal((1, 1)).unwrap();

        let report = session.toggle_flag((1, 1)).unwrap();

        assert_eq!(report.outcome, MarkOutcome::NoChange);
        assert!(!report.is_flagged);
        assert_eq!(session.flagged_count(), 0);
    }

    #[test]
    fn flags_may_exceed_mine_count() {
        let mut session = GameSession::new(4, 9).unwrap();
        for col in 0..4 {
            session.toggle_flag((0, col)).unwrap();
            session.toggle_flag((1, col)).unwrap();
        }

        assert_eq!(session.flagged_count(), 8);
        assert_eq!(session.mines_left(), -4);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut session = GameSession::new(4, 3).unwrap();

        assert_eq!(
            session.reveal((4, 0)).map(|_| ()),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(
            session.toggle_flag((0, 9)).map(|_| ()),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(session.status(), SessionStatus::Ready);
    }

    #[test]
    fn failed_placement_leaves_session_ready() {
        let mut session = fixed_session(4, &[(0, 0), (0, 3), (3, 0), (3, 3)]);

        assert_eq!(
            session.reveal((0, 0)).map(|_| ()),
            Err(GameError::MineOnSafeOrigin((0, 0)))
        );
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.revealed_count(), 0);
        assert!(!session.clock().is_running());
    }

    #[test]
    fn first_reveal_can_win_immediately() {
        // all mines packed in the bottom-right corner, the top-left zero region covers
        // every safe cell
        let mut session = fixed_session(4, &[(2, 3), (3, 2), (3, 3), (2, 2)]);

        let report = session.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(session.revealed_count(), 12);
        assert_eq!(session.clock().state(), ClockState::Stopped);
    }

    #[test]
    fn reset_returns_to_ready_with_new_size() {
        let mut session = GameSession::new(4, 11).unwrap();
        session.reveal((0, 0)).unwrap();
        session.tick();
        session.toggle_flag((3, 3)).ok();

        let snapshot = session.reset(9).unwrap();

        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.config, GameConfig::LARGE);
        assert_eq!(snapshot.revealed_count, 0);
        assert_eq!(snapshot.flagged_count, 0);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.board, Board::new(9));
        assert_eq!(session.clock().state(), ClockState::Idle);
    }

    #[test]
    fn reset_with_bad_size_keeps_session() {
        let mut session = GameSession::new(6, 11).unwrap();
        session.reveal((2, 2)).unwrap();
        let before = session.snapshot();

        assert_eq!(
            session.reset(7).map(|_| ()),
            Err(GameError::UnsupportedSize(7))
        );
        assert_eq!(session.snapshot(), before);
    }
}
