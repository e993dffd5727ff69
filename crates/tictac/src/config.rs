//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tictac_engine::{DEFAULT_PLAYER_ONE, DEFAULT_PLAYER_TWO, SearchConfig};
use tracing::{debug, info, instrument};

/// Settings for an interactive game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Name of the player moving first (X).
    #[serde(default = "default_player_one")]
    #[setters(into)]
    player_one: String,

    /// Name of the second player (O); unused against the computer.
    #[serde(default = "default_player_two")]
    #[setters(into)]
    player_two: String,

    /// Play against the computer.
    #[serde(default)]
    ai_enabled: bool,

    /// Minimax tuning.
    #[serde(default)]
    search: SearchConfig,
}

fn default_player_one() -> String {
    DEFAULT_PLAYER_ONE.to_string()
}

fn default_player_two() -> String {
    DEFAULT_PLAYER_TWO.to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_one: default_player_one(),
            player_two: default_player_two(),
            ai_enabled: false,
            search: SearchConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(ai_enabled = config.ai_enabled, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            r#"
player_one = "Alice"
player_two = "Bob"
ai_enabled = true

[search]
max_depth = 4
pruning = false
"#,
        );

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.player_one(), "Alice");
        assert_eq!(config.player_two(), "Bob");
        assert!(*config.ai_enabled());
        assert_eq!(*config.search(), SearchConfig::new(Some(4), false));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config("ai_enabled = true\n");

        let config = GameConfig::from_file(file.path()).unwrap();
        assert_eq!(config.player_one(), DEFAULT_PLAYER_ONE);
        assert_eq!(config.player_two(), DEFAULT_PLAYER_TWO);
        assert_eq!(*config.search(), SearchConfig::default());
        assert!(*config.search().pruning());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let file = write_config("ai_enabled = \"maybe\"\n");

        let err = GameConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(err.to_string().contains("config.rs"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_setters_override() {
        let config = GameConfig::default()
            .with_player_one("Carol")
            .with_ai_enabled(true);
        assert_eq!(config.player_one(), "Carol");
        assert!(*config.ai_enabled());
    }
}
