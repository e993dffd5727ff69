//! Error types for the game engine.

use crate::position::Position;
use crate::types::Mark;

/// Everything that can go wrong when driving a game.
///
/// All variants are recoverable. A rejected operation leaves the board,
/// the turn order, and the player registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// A coordinate fell outside `[0, 2]`.
    #[display("Coordinate ({}, {}) is outside the 3x3 board", x, y)]
    OutOfBounds {
        /// Row coordinate as supplied.
        x: i32,
        /// Column coordinate as supplied.
        y: i32,
    },

    /// The target cell already holds a mark.
    #[display("{} is already occupied", _0)]
    CellOccupied(Position),

    /// A move was submitted while no round is running.
    #[display("Game is not in progress")]
    GameNotInProgress,

    /// `start` was called on a session that has not been reset.
    #[display("Game has already started")]
    AlreadyStarted,

    /// More than two players were constructed or supplied.
    #[display("Cannot create more than 2 players")]
    TooManyPlayers,

    /// Fewer than two players were supplied to `start`.
    #[display("A game needs two players, got {}", _0)]
    NotEnoughPlayers(usize),

    /// Both players were given the same mark.
    #[display("Both players use mark {}", _0)]
    DuplicateMark(Mark),

    /// A mark string was neither X nor O.
    #[display("Mark must be an X or an O, got {:?}", _0)]
    InvalidMark(String),

    /// A text board could not be parsed.
    #[display("Malformed board: {}", _0)]
    MalformedBoard(String),
}

impl std::error::Error for GameError {}
