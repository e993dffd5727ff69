//! Line-oriented terminal front end.
//!
//! Reads moves from any `BufRead` and writes the board to any `Write`, so
//! the loop runs the same against stdin/stdout and in-memory buffers.

use crate::config::GameConfig;
use anyhow::Result;
use std::io::{BufRead, Write};
use tictac_engine::{GameSession, Position};
use tracing::{debug, info, instrument};

const HELP: &str = "Enter a move as `row col` (e.g. `1 1`), a cell number 0-8, \
or a name like `center`.\nCommands: `reset` starts over, `quit` exits.";

/// What the player typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Move(i32, i32),
    Reset,
    Quit,
    Help,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "q" | "quit" | "exit" => return Input::Quit,
        "r" | "reset" => return Input::Reset,
        "h" | "help" | "?" => return Input::Help,
        _ => {}
    }

    let parts: Vec<&str> = trimmed
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .collect();
    if let [x, y] = parts.as_slice() {
        if let (Ok(x), Ok(y)) = (x.parse::<i32>(), y.parse::<i32>()) {
            return Input::Move(x, y);
        }
    }

    match Position::from_label_or_number(trimmed) {
        Some(pos) => {
            let (x, y) = pos.coords();
            Input::Move(x, y)
        }
        None => Input::Unknown,
    }
}

/// Starts the configured players on a fresh (or freshly reset) session.
fn start(session: &mut GameSession, config: &GameConfig) -> Result<()> {
    session.start_named(config.player_one(), config.player_two(), *config.ai_enabled())?;
    Ok(())
}

/// Runs games until the input ends or the player quits.
#[instrument(skip_all)]
pub fn run<R: BufRead, W: Write>(
    session: &mut GameSession,
    config: &GameConfig,
    mut input: R,
    mut output: W,
) -> Result<()> {
    if !session.is_in_progress() {
        session.reset();
        start(session, config)?;
    }
    writeln!(output, "{}", HELP)?;

    let mut line = String::new();
    loop {
        writeln!(output, "\n{}\n", session.board().display())?;

        if session.status().is_terminal() {
            writeln!(output, "{}", session.status())?;
            write!(output, "Play again? [y/N] ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 || !line.trim().eq_ignore_ascii_case("y") {
                info!("Player left after the game");
                return Ok(());
            }
            session.reset();
            start(session, config)?;
            continue;
        }

        if let Some(player) = session.active_player() {
            write!(output, "{} ({}) to move: ", player.name(), player.mark())?;
        }
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("Input closed");
            return Ok(());
        }

        match parse_input(&line) {
            Input::Quit => return Ok(()),
            Input::Help => writeln!(output, "{}", HELP)?,
            Input::Unknown => {
                writeln!(output, "Could not read {:?}. Type `help` for options.", line.trim())?
            }
            Input::Reset => {
                session.reset();
                start(session, config)?;
                writeln!(output, "Board cleared.")?;
            }
            Input::Move(x, y) => {
                let seen = session.history().len();
                match session.submit_move(x, y) {
                    Ok(_) => {
                        // Everything after the human's own move was played by the computer.
                        for action in session.history().iter().skip(seen + 1) {
                            writeln!(output, "Computer plays {}", action)?;
                        }
                    }
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }
        }
    }
}
