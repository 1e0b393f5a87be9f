use std::io::{self, Write};

use hintsweeper_core::{Board, Cell, Coord2, GameSession, MineGenerator, SessionStatus};

fn cell_symbol(cell: Cell) -> char {
    if cell.is_flagged() {
        'F'
    } else if !cell.is_revealed() {
        '#'
    } else if cell.is_mine() {
        '*'
    } else if cell.neighbor_mines() == 0 {
        '.'
    } else {
        char::from(b'0' + cell.neighbor_mines())
    }
}

/// Draws the grid with row and column labels, marking `hint` with `?`.
pub fn board(out: &mut impl Write, board: &Board, hint: Option<Coord2>) -> io::Result<()> {
    let size = board.size();

    write!(out, "   ")?;
    for col in 0..size {
        write!(out, " {col}")?;
    }
    writeln!(out)?;

    for row in 0..size {
        write!(out, "{row:>2} ")?;
        for col in 0..size {
            let symbol = if hint == Some((row, col)) {
                '?'
            } else {
                cell_symbol(board[(row, col)])
            };
            write!(out, " {symbol}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn status<G: MineGenerator>(out: &mut impl Write, session: &GameSession<G>) -> io::Result<()> {
    let label = match session.status() {
        SessionStatus::Ready => "Ready",
        SessionStatus::Playing => "Playing",
        SessionStatus::Won => "You win!",
        SessionStatus::Lost => "Game over",
    };
    writeln!(
        out,
        "{label}  mines left: {:03}  time: {:03}",
        session.mines_left().max(0),
        session.elapsed_seconds()
    )
}
