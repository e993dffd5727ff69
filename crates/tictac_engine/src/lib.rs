//! Tic-tac-toe game engine with a minimax opponent.
//!
//! # Architecture
//!
//! - **Board**: the 3x3 grid, validated mutation, cheap snapshots
//! - **Rules**: pure win/tie evaluation over any board
//! - **Players**: participants and the two-player registry
//! - **Minimax**: exhaustive search that picks the computer's move
//! - **Session**: turn order, status transitions, automatic AI replies
//!
//! # Example
//!
//! ```
//! use tictac_engine::{GameSession, GameStatus, Position};
//!
//! # fn example() -> Result<(), tictac_engine::GameError> {
//! let mut session = GameSession::start_session("Alice", "", true)?;
//!
//! // Alice (X) takes the center; the computer (O) answers in the same call.
//! session.submit_move(1, 1)?;
//! assert_eq!(session.history().len(), 2);
//! assert_eq!(session.history()[1].position, Position::TopLeft);
//! assert_eq!(session.status(), &GameStatus::InProgress);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod error;
mod minimax;
mod player;
mod position;
mod rules;
mod session;
mod types;

pub use action::Move;
pub use board::Board;
pub use error::GameError;
pub use minimax::{DRAW, LOSS, MinimaxEngine, SearchConfig, WIN};
pub use player::{MAX_PLAYERS, Player, PlayerRegistry};
pub use position::Position;
pub use rules::{LINES, check_winner, evaluate, is_full};
pub use session::{AI_NAME, DEFAULT_PLAYER_ONE, DEFAULT_PLAYER_TWO, GameSession, GameStatus};
pub use types::{Cell, Mark, Outcome};
