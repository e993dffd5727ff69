//! Game rules for tic-tac-toe.
//!
//! Pure functions over a board snapshot. They take any [`Board`], live or
//! simulated, so the search can call them on hypothetical positions.

use crate::board::Board;
use crate::position::Position;
use crate::types::{Cell, Mark, Outcome};

/// The eight lines, scanned rows first, then columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::BottomLeft, Position::Center, Position::TopRight],
];

/// Returns the mark holding the first uniform line, if any.
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Cell::Marked(mark)
            if board.get(b) == Cell::Marked(mark) && board.get(c) == Cell::Marked(mark) =>
        {
            Some(mark)
        }
        _ => None,
    })
}

/// Checks if every cell holds a mark.
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}

/// Evaluates a board.
///
/// Returns `Some(Outcome::Win(mark))` for the first uniform line found,
/// `Some(Outcome::Tie)` for a full board without one, and `None` while the
/// round is still open.
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(mark) = check_winner(board) {
        return Some(Outcome::Win(mark));
    }
    if is_full(board) {
        return Some(Outcome::Tie);
    }
    None
}
