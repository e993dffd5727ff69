//! The 3x3 grid and its validated mutation.

use crate::error::GameError;
use crate::position::Position;
use crate::types::{Cell, Mark};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{instrument, trace};

/// 3x3 tic-tac-toe board.
///
/// Cells are only ever written through [`Board::apply_move`], which refuses
/// to overwrite a mark. `Clone` is a full copy, so search code can play out
/// hypothetical moves on a snapshot without touching the live board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Checks whether `(x, y)` names an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] if either coordinate is outside
    /// `[0, 2]`. An occupied in-range cell is `Ok(false)`, not an error.
    #[instrument(skip(self))]
    pub fn is_valid_move(&self, x: i32, y: i32) -> Result<bool, GameError> {
        let pos = Position::from_coords(x, y)?;
        Ok(self.is_empty(pos))
    }

    /// Places `mark` at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CellOccupied`] if the cell already holds a mark;
    /// the board is left unchanged.
    pub fn apply_move(&mut self, pos: Position, mark: Mark) -> Result<(), GameError> {
        if !self.is_empty(pos) {
            return Err(GameError::CellOccupied(pos));
        }
        trace!(position = %pos, %mark, "Placing mark");
        self.cells[pos.to_index()] = Cell::Marked(mark);
        Ok(())
    }

    /// True iff every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::ALL.into_iter().filter(|pos| self.is_empty(*pos))
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|c| c.mark() == Some(mark))
            .count()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their `row,col` coordinates so a player can read
    /// the move to type straight off the board.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            let line: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Cell::Empty => format!("{},{}", row, col),
                    Cell::Marked(mark) => format!(" {} ", mark.symbol().to_ascii_uppercase()),
                })
                .collect();
            result.push_str(&line.join("|"));
            if row < 2 {
                result.push_str("\n---+---+---\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Board {
    type Err = GameError;

    /// Parses nine cells in row-major order.
    ///
    /// `x`/`o` (any case) are marks; `.`, `-` and `_` are empty.
    /// Whitespace and `|` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();
        if symbols.len() != 9 {
            return Err(GameError::MalformedBoard(format!(
                "expected 9 cells, found {}",
                symbols.len()
            )));
        }

        let mut board = Board::new();
        for (pos, symbol) in Position::ALL.into_iter().zip(symbols) {
            match symbol {
                '.' | '-' | '_' => {}
                other => {
                    let mark = other.to_string().parse::<Mark>().map_err(|_| {
                        GameError::MalformedBoard(format!("unexpected symbol {:?}", other))
                    })?;
                    board.cells[pos.to_index()] = Cell::Marked(mark);
                }
            }
        }
        Ok(board)
    }
}

impl std::fmt::Display for Board {
    /// Compact single-line form accepted by [`Board::from_str`].
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            match cell {
                Cell::Empty => write!(f, ".")?,
                Cell::Marked(mark) => write!(f, "{}", mark)?,
            }
        }
        Ok(())
    }
}
