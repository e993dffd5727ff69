//! tictac - terminal tic-tac-toe
//!
//! Interactive play, move suggestions, and computer self-play on top of
//! the `tictac_engine` crate.

#![warn(missing_docs)]

mod cli;
mod commands;
mod config;
mod terminal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::GameConfig;
use std::path::Path;
use tictac_engine::{GameSession, MinimaxEngine, SearchConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,tictac=info,tictac_engine=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            config,
            player_one,
            player_two,
            ai,
            no_ai,
            max_depth,
        } => run_play(&config, player_one, player_two, ai, no_ai, max_depth),
        Command::Suggest { board, mark, json } => run_suggest(&board, mark.as_deref(), json),
        Command::Selfplay { config, json } => run_selfplay(&config, json),
    }
}

/// Run an interactive game on stdin/stdout
#[instrument(skip(player_one, player_two))]
fn run_play(
    config_path: &Path,
    player_one: Option<String>,
    player_two: Option<String>,
    ai: bool,
    no_ai: bool,
    max_depth: Option<usize>,
) -> Result<()> {
    let mut config = GameConfig::load_or_default(config_path)?;

    if let Some(name) = player_one {
        config = config.with_player_one(name);
    }
    if let Some(name) = player_two {
        config = config.with_player_two(name);
    }
    if ai {
        config = config.with_ai_enabled(true);
    } else if no_ai {
        config = config.with_ai_enabled(false);
    }
    if max_depth.is_some() {
        let search = SearchConfig::new(max_depth, *config.search().pruning());
        config = config.with_search(search);
    }

    info!(ai_enabled = *config.ai_enabled(), "Starting interactive game");
    let mut session = GameSession::with_search(
        config.player_one(),
        config.player_two(),
        *config.ai_enabled(),
        *config.search(),
    )?;

    let stdin = std::io::stdin();
    terminal::run(&mut session, &config, stdin.lock(), std::io::stdout())
}

/// Print the best move for a board
#[instrument]
fn run_suggest(board: &str, mark: Option<&str>, json: bool) -> Result<()> {
    let suggestion = commands::suggest(&MinimaxEngine::default(), board, mark)?;
    commands::print_suggestion(&suggestion, json, std::io::stdout())
}

/// Let the computer play itself
#[instrument]
fn run_selfplay(config_path: &Path, json: bool) -> Result<()> {
    let config = GameConfig::load_or_default(config_path)?;
    let session = commands::selfplay(*config.search())?;
    commands::print_selfplay(&session, json, std::io::stdout())
}
