//! Turn sequencing for one game between two players.

use crate::action::Move;
use crate::board::Board;
use crate::error::GameError;
use crate::minimax::{MinimaxEngine, SearchConfig};
use crate::player::{MAX_PLAYERS, Player, PlayerRegistry};
use crate::position::Position;
use crate::rules::evaluate;
use crate::types::{Mark, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Name given to player one when none is supplied.
pub const DEFAULT_PLAYER_ONE: &str = "Player 1";
/// Name given to player two when none is supplied.
pub const DEFAULT_PLAYER_TWO: &str = "Player 2";
/// Name of the computer opponent.
pub const AI_NAME: &str = "AI";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for `start`.
    #[default]
    NotStarted,
    /// Accepting moves.
    InProgress,
    /// Someone completed a line.
    WonBy(Player),
    /// Board filled without a winner.
    Tie,
}

impl GameStatus {
    /// True for `WonBy` and `Tie`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::WonBy(_) | GameStatus::Tie)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::NotStarted => write!(f, "Ready to start"),
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::WonBy(player) => write!(f, "{} has won the game!", player.name()),
            GameStatus::Tie => write!(f, "Game is a tie!"),
        }
    }
}

/// One game: the board, the two players, and whose turn it is.
///
/// The session is the only writer of its board. When the player to move is
/// AI-controlled, the session asks its [`MinimaxEngine`] for a move and plays
/// it before returning, so callers only ever see human turns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    players: Vec<Player>,
    active: usize,
    status: GameStatus,
    history: Vec<Move>,
    registry: PlayerRegistry,
    engine: MinimaxEngine,
}

impl GameSession {
    /// Creates a session in `NotStarted` with a full-depth engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session in `NotStarted` that uses `engine` for AI turns.
    pub fn with_engine(engine: MinimaxEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Builds and starts a session in one call.
    ///
    /// Player one plays X. With `ai_enabled`, player two is the computer
    /// playing O and `player_two_name` is ignored. Blank names fall back to
    /// `"Player 1"` / `"Player 2"`.
    #[instrument]
    pub fn start_session(
        player_one_name: &str,
        player_two_name: &str,
        ai_enabled: bool,
    ) -> Result<Self, GameError> {
        Self::with_search(player_one_name, player_two_name, ai_enabled, SearchConfig::default())
    }

    /// Like [`GameSession::start_session`] with an explicit search configuration.
    #[instrument]
    pub fn with_search(
        player_one_name: &str,
        player_two_name: &str,
        ai_enabled: bool,
        config: SearchConfig,
    ) -> Result<Self, GameError> {
        let mut session = Self::with_engine(MinimaxEngine::new(config));
        session.start_named(player_one_name, player_two_name, ai_enabled)?;
        Ok(session)
    }

    /// Registers the standard pair of players and starts the game.
    ///
    /// # Errors
    ///
    /// [`GameError::AlreadyStarted`] unless the session is `NotStarted`;
    /// [`GameError::TooManyPlayers`] if players were already registered by
    /// hand. Nothing is registered when the call fails.
    #[instrument(skip(self))]
    pub fn start_named(
        &mut self,
        player_one_name: &str,
        player_two_name: &str,
        ai_enabled: bool,
    ) -> Result<Option<Outcome>, GameError> {
        if self.status != GameStatus::NotStarted {
            warn!(status = ?self.status, "Start requested on a running session");
            return Err(GameError::AlreadyStarted);
        }

        if self.registry.remaining() < MAX_PLAYERS {
            warn!(constructed = self.registry.constructed(), "Registry already in use");
            return Err(GameError::TooManyPlayers);
        }

        let player_one_name = or_default(player_one_name, DEFAULT_PLAYER_ONE);
        let player_one = self.register_player(player_one_name, "x", false)?;
        let player_two = if ai_enabled {
            self.register_player(AI_NAME, "o", true)?
        } else {
            let player_two_name = or_default(player_two_name, DEFAULT_PLAYER_TWO);
            self.register_player(player_two_name, "o", false)?
        };

        self.start(vec![player_one, player_two])
    }

    /// Constructs a player through this session's registry.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidMark`] or [`GameError::TooManyPlayers`].
    pub fn register_player(
        &mut self,
        name: &str,
        mark: &str,
        is_ai: bool,
    ) -> Result<Player, GameError> {
        self.registry.construct(name, mark, is_ai)
    }

    /// Starts the game with `players`; the first one moves first.
    ///
    /// If the first player is AI-controlled its move is played immediately,
    /// and so on while the AI keeps the turn.
    ///
    /// # Errors
    ///
    /// - [`GameError::AlreadyStarted`] unless the session is `NotStarted`.
    /// - [`GameError::TooManyPlayers`] for more than two players.
    /// - [`GameError::NotEnoughPlayers`] for fewer than two.
    /// - [`GameError::DuplicateMark`] if both players share a mark.
    #[instrument(skip(self, players), fields(player_count = players.len()))]
    pub fn start(&mut self, players: Vec<Player>) -> Result<Option<Outcome>, GameError> {
        if self.status != GameStatus::NotStarted {
            warn!(status = ?self.status, "Start requested on a running session");
            return Err(GameError::AlreadyStarted);
        }
        if players.len() > MAX_PLAYERS {
            warn!(count = players.len(), "Too many players supplied");
            return Err(GameError::TooManyPlayers);
        }
        if players.len() < MAX_PLAYERS {
            return Err(GameError::NotEnoughPlayers(players.len()));
        }
        if players[0].mark() == players[1].mark() {
            return Err(GameError::DuplicateMark(*players[0].mark()));
        }

        info!(
            player_one = %players[0],
            player_two = %players[1],
            "Starting game"
        );
        self.board = Board::new();
        self.history.clear();
        self.players = players;
        self.active = 0;
        self.status = GameStatus::InProgress;

        self.play_ai_turns()
    }

    /// Places the active player's mark at `(x, y)` (row, column).
    ///
    /// Any AI replies are played before this returns. The result is the
    /// outcome of the round if it ended during the call, `None` if it
    /// continues.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameNotInProgress`] outside `InProgress`.
    /// - [`GameError::OutOfBounds`] for coordinates outside `[0, 2]`.
    /// - [`GameError::CellOccupied`] for a cell that already holds a mark.
    ///
    /// A rejected move changes nothing: the board, history and turn stay
    /// as they were.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, x: i32, y: i32) -> Result<Option<Outcome>, GameError> {
        if self.status != GameStatus::InProgress {
            warn!(status = ?self.status, "Move submitted outside a running game");
            return Err(GameError::GameNotInProgress);
        }

        let pos = Position::from_coords(x, y).inspect_err(|e| warn!(error = %e, "Rejected move"))?;
        if !self.board.is_empty(pos) {
            warn!(position = %pos, "Rejected move on occupied cell");
            return Err(GameError::CellOccupied(pos));
        }

        if let Some(outcome) = self.apply_turn(pos)? {
            return Ok(Some(outcome));
        }
        self.play_ai_turns()
    }

    /// Returns to `NotStarted`, clearing board, players, history and registry.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!("Resetting session");
        self.board = Board::new();
        self.players.clear();
        self.history.clear();
        self.active = 0;
        self.status = GameStatus::NotStarted;
        self.registry.reset();
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the session status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Returns the players in turn order (empty before `start`).
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Player to move, while the game is in progress.
    pub fn active_player(&self) -> Option<&Player> {
        match self.status {
            GameStatus::InProgress => self.players.get(self.active),
            _ => None,
        }
    }

    /// Accepted moves in play order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// True while moves are accepted.
    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    /// Outcome of a finished round.
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.status {
            GameStatus::WonBy(player) => Some(Outcome::Win(*player.mark())),
            GameStatus::Tie => Some(Outcome::Tie),
            _ => None,
        }
    }

    /// Returns the engine used for AI turns.
    pub fn engine(&self) -> &MinimaxEngine {
        &self.engine
    }

    /// Applies one validated move for the active player and updates status.
    fn apply_turn(&mut self, pos: Position) -> Result<Option<Outcome>, GameError> {
        let mover = self.players[self.active].clone();
        self.board.apply_move(pos, *mover.mark())?;
        let action = Move::new(*mover.mark(), pos);
        debug!(player = %mover.name(), %action, "Move applied");
        self.history.push(action);

        let outcome = evaluate(&self.board);
        match outcome {
            Some(Outcome::Win(mark)) => {
                let winner = self.player_with_mark(mark).cloned().unwrap_or(mover);
                info!(winner = %winner, moves = self.history.len(), "Game won");
                self.status = GameStatus::WonBy(winner);
            }
            Some(Outcome::Tie) => {
                info!(moves = self.history.len(), "Game tied");
                self.status = GameStatus::Tie;
            }
            None => {
                self.active = (self.active + 1) % MAX_PLAYERS;
            }
        }
        Ok(outcome)
    }

    /// Plays AI moves for as long as an AI player holds the turn.
    fn play_ai_turns(&mut self) -> Result<Option<Outcome>, GameError> {
        while let Some(player) = self.active_player().filter(|p| *p.is_ai()) {
            let mark = *player.mark();
            // An undecided board always has an empty cell.
            let pos = self
                .engine
                .choose_move(&self.board, mark)
                .ok_or(GameError::GameNotInProgress)?;
            if let Some(outcome) = self.apply_turn(pos)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn player_with_mark(&self, mark: Mark) -> Option<&Player> {
        self.players.iter().find(|p| *p.mark() == mark)
    }
}

fn or_default<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.trim().is_empty() { fallback } else { name.trim() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_humans() -> GameSession {
        GameSession::start_session("Alice", "Bob", false).unwrap()
    }

    #[test]
    fn test_start_session_assigns_marks() {
        let session = two_humans();
        assert_eq!(session.status(), &GameStatus::InProgress);
        assert_eq!(*session.players()[0].mark(), Mark::X);
        assert_eq!(*session.players()[1].mark(), Mark::O);
        assert_eq!(session.active_player().unwrap().name(), "Alice");
    }

    #[test]
    fn test_blank_names_use_defaults() {
        let session = GameSession::start_session("  ", "", false).unwrap();
        assert_eq!(session.players()[0].name(), DEFAULT_PLAYER_ONE);
        assert_eq!(session.players()[1].name(), DEFAULT_PLAYER_TWO);
    }

    #[test]
    fn test_ai_opponent_replaces_player_two() {
        let session = GameSession::start_session("Alice", "Bob", true).unwrap();
        let ai = &session.players()[1];
        assert_eq!(ai.name(), AI_NAME);
        assert!(*ai.is_ai());
        assert_eq!(*ai.mark(), Mark::O);
    }

    #[test]
    fn test_turns_alternate() {
        let mut session = two_humans();
        session.submit_move(1, 1).unwrap();
        assert_eq!(session.active_player().unwrap().name(), "Bob");
        session.submit_move(0, 0).unwrap();
        assert_eq!(session.active_player().unwrap().name(), "Alice");
        assert_eq!(
            session.history(),
            &[Move::new(Mark::X, Position::Center), Move::new(Mark::O, Position::TopLeft)]
        );
    }

    #[test]
    fn test_rejected_move_keeps_turn() {
        let mut session = two_humans();
        session.submit_move(1, 1).unwrap();
        let before = session.clone();

        assert_eq!(session.submit_move(1, 1), Err(GameError::CellOccupied(Position::Center)));
        assert_eq!(session.submit_move(3, 0), Err(GameError::OutOfBounds { x: 3, y: 0 }));
        assert_eq!(session.submit_move(0, -1), Err(GameError::OutOfBounds { x: 0, y: -1 }));
        assert_eq!(session, before);
    }

    #[test]
    fn test_move_before_start_is_rejected() {
        let mut session = GameSession::new();
        assert_eq!(session.submit_move(0, 0), Err(GameError::GameNotInProgress));
    }

    #[test]
    fn test_start_validates_players() {
        let mut session = GameSession::new();
        assert_eq!(
            session.start(vec![Player::new("Solo", Mark::X, false)]),
            Err(GameError::NotEnoughPlayers(1))
        );
        assert_eq!(
            session.start(vec![Player::new("A", Mark::X, false), Player::new("B", Mark::X, false)]),
            Err(GameError::DuplicateMark(Mark::X))
        );
        assert_eq!(
            session.start(vec![
                Player::new("A", Mark::X, false),
                Player::new("B", Mark::O, false),
                Player::new("C", Mark::O, false),
            ]),
            Err(GameError::TooManyPlayers)
        );
        assert_eq!(session.status(), &GameStatus::NotStarted);
    }

    #[test]
    fn test_ai_moving_first_plays_on_start() {
        let mut session = GameSession::new();
        let outcome = session
            .start(vec![Player::new("AI", Mark::X, true), Player::new("Human", Mark::O, false)])
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(session.history(), &[Move::new(Mark::X, Position::TopLeft)]);
        assert_eq!(session.active_player().unwrap().name(), "Human");
    }

    #[test]
    fn test_two_ai_players_finish_the_game_on_start() {
        let mut session = GameSession::new();
        let outcome = session
            .start(vec![Player::new("One", Mark::X, true), Player::new("Two", Mark::O, true)])
            .unwrap();
        assert_eq!(outcome, Some(Outcome::Tie));
        assert_eq!(session.status(), &GameStatus::Tie);
        assert!(session.board().is_full());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = two_humans();
        session.submit_move(0, 0).unwrap();
        session.reset();

        assert_eq!(session.status(), &GameStatus::NotStarted);
        assert!(session.players().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.board(), &Board::new());
        assert!(session.start_named("Carol", "Dave", false).is_ok());
    }

    #[test]
    fn test_start_named_registers_nothing_on_failure() {
        let mut session = GameSession::new();
        session.register_player("Early", "o", false).unwrap();

        assert_eq!(session.start_named("A", "B", true), Err(GameError::TooManyPlayers));
        assert_eq!(session.registry.constructed(), 1);
        assert!(session.players().is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(GameStatus::Tie.to_string(), "Game is a tie!");
        let winner = GameStatus::WonBy(Player::new("Alice", Mark::X, false));
        assert_eq!(winner.to_string(), "Alice has won the game!");
    }
}
