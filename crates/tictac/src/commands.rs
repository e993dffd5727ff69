//! Non-interactive subcommands: move suggestions and computer self-play.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::io::Write;
use tictac_engine::{
    Board, GameSession, Mark, MinimaxEngine, Player, Position, SearchConfig, evaluate,
};
use tracing::{info, instrument};

/// The computer's answer for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Mark the suggestion is for.
    pub mark: Mark,
    /// Best move, first in row-major order among equal scores.
    pub best: Position,
    /// Every legal move with its minimax score.
    pub scores: Vec<ScoredMove>,
}

/// A legal move and its score from the mover's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredMove {
    /// Candidate cell.
    pub position: Position,
    /// +1 forced win, 0 draw, -1 forced loss.
    pub score: i32,
}

/// X moves first, so X is to move whenever it has not played more marks than O.
fn mark_to_move(board: &Board) -> Mark {
    if board.count(Mark::X) <= board.count(Mark::O) {
        Mark::X
    } else {
        Mark::O
    }
}

/// Scores every move on `board` for the mark to play.
#[instrument(skip(engine))]
pub fn suggest(engine: &MinimaxEngine, board: &str, mark: Option<&str>) -> Result<Suggestion> {
    let board: Board = board.parse().context("Could not read board")?;
    let mark = match mark {
        Some(text) => text.parse::<Mark>()?,
        None => mark_to_move(&board),
    };

    if let Some(outcome) = evaluate(&board) {
        bail!("Game is already over: {}", outcome);
    }

    let Some(best) = engine.choose_move(&board, mark) else {
        bail!("No legal moves left");
    };
    let scores = engine
        .score_moves(&board, mark)
        .into_iter()
        .map(|(position, score)| ScoredMove { position, score })
        .collect();

    info!(%mark, best = %best, "Suggested move");
    Ok(Suggestion { mark, best, scores })
}

/// Writes a suggestion as text or JSON.
pub fn print_suggestion<W: Write>(suggestion: &Suggestion, json: bool, mut out: W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, suggestion)?;
        writeln!(out)?;
        return Ok(());
    }

    let (x, y) = suggestion.best.coords();
    writeln!(
        out,
        "{} should play {} ({}, {})",
        suggestion.mark,
        suggestion.best.label(),
        x,
        y
    )?;
    for scored in &suggestion.scores {
        writeln!(out, "  {:<14} {:>2}", scored.position.label(), scored.score)?;
    }
    Ok(())
}

/// Plays a full game with the computer on both sides.
#[instrument(skip_all)]
pub fn selfplay(search: SearchConfig) -> Result<GameSession> {
    let mut session = GameSession::with_engine(MinimaxEngine::new(search));
    session.start(vec![
        Player::new("AI X", Mark::X, true),
        Player::new("AI O", Mark::O, true),
    ])?;
    info!(status = %session.status(), moves = session.history().len(), "Self-play finished");
    Ok(session)
}

/// Writes a finished self-play session as text or JSON.
pub fn print_selfplay<W: Write>(session: &GameSession, json: bool, mut out: W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, session)?;
        writeln!(out)?;
        return Ok(());
    }

    for (turn, action) in session.history().iter().enumerate() {
        writeln!(out, "{:>2}. {}", turn + 1, action)?;
    }
    writeln!(out, "\n{}\n", session.board().display())?;
    writeln!(out, "{}", session.status())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_engine::GameStatus;

    #[test]
    fn test_mark_inferred_from_counts() {
        assert_eq!(mark_to_move(&Board::new()), Mark::X);
        assert_eq!(mark_to_move(&"x........".parse().unwrap()), Mark::O);
        assert_eq!(mark_to_move(&"x...o....".parse().unwrap()), Mark::X);
    }

    #[test]
    fn test_suggest_reply_to_center() {
        let suggestion = suggest(&MinimaxEngine::default(), "....x....", None).unwrap();
        assert_eq!(suggestion.mark, Mark::O);
        assert_eq!(suggestion.best, Position::TopLeft);
        assert_eq!(suggestion.scores.len(), 8);
    }

    #[test]
    fn test_suggest_explicit_mark_takes_win() {
        // X to move by count, but asking for O finds O's open column.
        let suggestion = suggest(&MinimaxEngine::default(), ".x. ox. o..", Some("O")).unwrap();
        assert_eq!(suggestion.mark, Mark::O);
        assert_eq!(suggestion.best, Position::TopLeft);
        assert_eq!(suggestion.scores[0].score, tictac_engine::WIN);
    }

    #[test]
    fn test_suggest_rejects_finished_board() {
        let err = suggest(&MinimaxEngine::default(), "xxx oo. ...", None).unwrap_err();
        assert!(err.to_string().contains("already over"));
    }

    #[test]
    fn test_suggest_rejects_bad_input() {
        assert!(suggest(&MinimaxEngine::default(), "xx", None).is_err());
        assert!(suggest(&MinimaxEngine::default(), ".........", Some("q")).is_err());
    }

    #[test]
    fn test_suggestion_json() {
        let suggestion = suggest(&MinimaxEngine::default(), "....x....", None).unwrap();
        let mut out = Vec::new();
        print_suggestion(&suggestion, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["mark"], "o");
        assert_eq!(value["best"], "TopLeft");
        assert_eq!(value["scores"][0]["score"], 0);
    }

    #[test]
    fn test_selfplay_is_a_tie() {
        let session = selfplay(SearchConfig::default()).unwrap();
        assert_eq!(session.status(), &GameStatus::Tie);
        assert_eq!(session.history().len(), 9);

        let mut out = Vec::new();
        print_selfplay(&session, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(" 1. x -> Top-left (0, 0)"));
        assert!(text.ends_with("Game is a tie!\n"));
    }
}
