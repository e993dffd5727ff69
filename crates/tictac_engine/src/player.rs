//! Participants and the two-player guard.

use crate::error::GameError;
use crate::types::Mark;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Most players a session may construct.
pub const MAX_PLAYERS: usize = 2;

/// A participant in a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    name: String,
    /// Mark this player places.
    mark: Mark,
    /// Whether moves come from the minimax engine.
    is_ai: bool,
}

impl Player {
    /// Creates a player directly, bypassing the registry.
    ///
    /// Sessions validate the pair they are started with, so this is safe
    /// for callers that assemble players themselves.
    pub fn new(name: impl Into<String>, mark: Mark, is_ai: bool) -> Self {
        Self {
            name: name.into(),
            mark,
            is_ai,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.mark)
    }
}

/// Counts constructed players and refuses to build more than [`MAX_PLAYERS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    constructed: usize,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of players built since the last reset.
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Slots left before construction fails.
    pub fn remaining(&self) -> usize {
        MAX_PLAYERS.saturating_sub(self.constructed)
    }

    /// Builds a player from a textual mark.
    ///
    /// The mark is matched case-insensitively. A rejected attempt does not
    /// use up a slot.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidMark`] if `mark` is neither X nor O.
    /// - [`GameError::TooManyPlayers`] if two players already exist.
    #[instrument(skip(self), fields(constructed = self.constructed))]
    pub fn construct(&mut self, name: &str, mark: &str, is_ai: bool) -> Result<Player, GameError> {
        let mark: Mark = mark.parse()?;

        if self.constructed >= MAX_PLAYERS {
            warn!(name, "Registry already holds {} players", MAX_PLAYERS);
            return Err(GameError::TooManyPlayers);
        }

        self.constructed += 1;
        debug!(name, %mark, is_ai, "Player constructed");
        Ok(Player::new(name, mark, is_ai))
    }

    /// Forgets every constructed player.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.constructed = 0;
    }
}
