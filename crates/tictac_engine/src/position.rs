//! Named squares of the 3x3 board.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A position on the tic-tac-toe board.
///
/// Variants are declared in row-major order, so iterating
/// [`Position::ALL`] visits cells the same way the search does.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Position {
    /// Row 0, column 0
    TopLeft,
    /// Row 0, column 1
    TopCenter,
    /// Row 0, column 2
    TopRight,
    /// Row 1, column 0
    MiddleLeft,
    /// Row 1, column 1
    Center,
    /// Row 1, column 2
    MiddleRight,
    /// Row 2, column 0
    BottomLeft,
    /// Row 2, column 1
    BottomCenter,
    /// Row 2, column 2
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Row coordinate (`x`), 0-2.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column coordinate (`y`), 0-2.
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// Returns `(x, y)` as used by [`crate::GameSession::submit_move`].
    pub fn coords(self) -> (i32, i32) {
        (self.row() as i32, self.col() as i32)
    }

    /// Resolves `(x, y)` = (row, column) to a position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] if either coordinate is outside `[0, 2]`.
    #[instrument]
    pub fn from_coords(x: i32, y: i32) -> Result<Self, GameError> {
        if !(0..3).contains(&x) || !(0..3).contains(&y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        // Both coordinates were just range-checked.
        Ok(Self::ALL[(x * 3 + y) as usize])
    }

    /// Parse from label or number (0-8).
    ///
    /// Labels match case-insensitively and ignore spaces, hyphens and
    /// underscores, so `center`, `top left` and `BOTTOM_RIGHT` all resolve.
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<Position> {
        if let Ok(num) = s.trim().parse::<usize>() {
            return Self::from_index(num);
        }

        let wanted = normalize_label(s);
        if wanted.is_empty() {
            return None;
        }
        <Position as strum::IntoEnumIterator>::iter()
            .find(|pos| normalize_label(pos.label()) == wanted)
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
