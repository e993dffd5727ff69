//! Exhaustive game-tree search for the computer opponent.
//!
//! The engine always searches from the AI's point of view: the AI's mark is
//! the maximizer and scores `+1` when it wins, the opponent is the minimizer
//! and scores `-1`, and a tie is `0`. Candidate moves are scanned in
//! row-major order and a later candidate only replaces the current choice
//! if it scores strictly higher, so the first of several equally good cells
//! is the one played.
//!
//! Alpha-beta pruning is on by default. It never changes which move is
//! chosen: at the root every candidate after the first is searched with the
//! best score so far as alpha, and a pruned subtree can only report a value
//! at or below alpha, which the strictly-greater comparison ignores.

use crate::board::Board;
use crate::position::Position;
use crate::rules::evaluate;
use crate::types::{Mark, Outcome};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Score of a board the AI has won.
pub const WIN: i32 = 1;
/// Score of a board the AI has lost.
pub const LOSS: i32 = -1;
/// Score of a tie, or of an undecided board once the depth budget runs out.
pub const DRAW: i32 = 0;

/// Tuning for [`MinimaxEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct SearchConfig {
    /// Plies to look ahead, counting the AI's own move. `None` searches to
    /// the end of the game.
    #[serde(default)]
    max_depth: Option<usize>,
    /// Skip branches that cannot change the result.
    #[serde(default = "default_pruning")]
    pruning: bool,
}

fn default_pruning() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            pruning: default_pruning(),
        }
    }
}

/// Minimax move picker.
///
/// Works only on snapshots: every hypothetical placement is made on a clone,
/// and the board handed in is borrowed immutably.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimaxEngine {
    config: SearchConfig,
}

impl MinimaxEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Scores `board` by plain minimax, without pruning.
    ///
    /// `maximizing` says whose ply it is: `true` places `ai_mark`, `false`
    /// places its opponent. The search stops at `depth == 0` or at any
    /// decided board.
    pub fn search(&self, board: &Board, ai_mark: Mark, depth: usize, maximizing: bool) -> i32 {
        Searcher::new(ai_mark).minimax(board, depth, maximizing)
    }

    /// Picks the AI's move on `board`.
    ///
    /// Returns `None` if there is no empty cell.
    #[instrument(skip(self, board), fields(board = %board, pruning = self.config.pruning))]
    pub fn choose_move(&self, board: &Board, ai_mark: Mark) -> Option<Position> {
        let depth = self.depth_budget(board)?;
        let mut searcher = Searcher::new(ai_mark);
        let mut best: Option<(Position, i32)> = None;

        for pos in board.empty_positions() {
            let child = Searcher::child(board, pos, ai_mark);
            let score = if self.config.pruning {
                let alpha = best.map_or(i32::MIN, |(_, score)| score);
                searcher.alphabeta(&child, depth - 1, alpha, i32::MAX, false)
            } else {
                searcher.minimax(&child, depth - 1, false)
            };
            trace!(position = %pos, score, "Scored candidate");

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
                if self.config.pruning && score == WIN {
                    break;
                }
            }
        }

        if let Some((pos, score)) = best {
            debug!(position = %pos, score, nodes = searcher.nodes, "AI chose move");
        }
        best.map(|(pos, _)| pos)
    }

    /// Exact minimax score of every empty cell, in row-major order.
    #[instrument(skip(self, board), fields(board = %board))]
    pub fn score_moves(&self, board: &Board, ai_mark: Mark) -> Vec<(Position, i32)> {
        let Some(depth) = self.depth_budget(board) else {
            return Vec::new();
        };
        let mut searcher = Searcher::new(ai_mark);

        board
            .empty_positions()
            .map(|pos| {
                let child = Searcher::child(board, pos, ai_mark);
                let score = if self.config.pruning {
                    searcher.alphabeta(&child, depth - 1, i32::MIN, i32::MAX, false)
                } else {
                    searcher.minimax(&child, depth - 1, false)
                };
                (pos, score)
            })
            .collect()
    }

    /// Plies to search from `board`, including the AI's own move.
    ///
    /// Defaults to the number of empty cells, which always reaches the end
    /// of the game. `None` when the board is full.
    fn depth_budget(&self, board: &Board) -> Option<usize> {
        let remaining = board.empty_positions().count();
        if remaining == 0 {
            return None;
        }
        Some(self.config.max_depth.map_or(remaining, |d| d.clamp(1, remaining)))
    }
}

/// One search pass from a fixed AI perspective.
struct Searcher {
    ai_mark: Mark,
    nodes: u64,
}

impl Searcher {
    fn new(ai_mark: Mark) -> Self {
        Self { ai_mark, nodes: 0 }
    }

    fn mark_for(&self, maximizing: bool) -> Mark {
        if maximizing {
            self.ai_mark
        } else {
            self.ai_mark.opponent()
        }
    }

    /// Clone of `board` with `mark` placed at the known-empty `pos`.
    fn child(board: &Board, pos: Position, mark: Mark) -> Board {
        let mut next = board.clone();
        let placed = next.apply_move(pos, mark);
        debug_assert!(placed.is_ok(), "search placed a mark on occupied {pos}");
        next
    }

    fn score(&self, outcome: Option<Outcome>) -> i32 {
        match outcome {
            Some(Outcome::Win(mark)) if mark == self.ai_mark => WIN,
            Some(Outcome::Win(_)) => LOSS,
            Some(Outcome::Tie) | None => DRAW,
        }
    }

    fn minimax(&mut self, board: &Board, depth: usize, maximizing: bool) -> i32 {
        self.nodes += 1;
        let outcome = evaluate(board);
        if depth == 0 || outcome.is_some() {
            return self.score(outcome);
        }

        let mark = self.mark_for(maximizing);
        let scores: Vec<i32> = board
            .empty_positions()
            .map(|pos| {
                let child = Self::child(board, pos, mark);
                self.minimax(&child, depth - 1, !maximizing)
            })
            .collect();

        let best = if maximizing {
            scores.into_iter().max()
        } else {
            scores.into_iter().min()
        };
        // Undecided boards always have an empty cell.
        best.unwrap_or(DRAW)
    }

    fn alphabeta(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;
        let outcome = evaluate(board);
        if depth == 0 || outcome.is_some() {
            return self.score(outcome);
        }

        let mark = self.mark_for(maximizing);
        let positions: Vec<Position> = board.empty_positions().collect();

        if maximizing {
            let mut max_eval = i32::MIN;
            for pos in positions {
                let child = Self::child(board, pos, mark);
                let eval = self.alphabeta(&child, depth - 1, alpha, beta, false);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for pos in positions {
                let child = Self::child(board, pos, mark);
                let eval = self.alphabeta(&child, depth - 1, alpha, beta, true);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn engines() -> [MinimaxEngine; 2] {
        [
            MinimaxEngine::new(SearchConfig::new(None, false)),
            MinimaxEngine::new(SearchConfig::new(None, true)),
        ]
    }

    #[test]
    fn test_answers_center_with_first_corner() {
        for engine in engines() {
            assert_eq!(engine.choose_move(&board("... .x. ..."), Mark::O), Some(Position::TopLeft));
        }
    }

    #[test]
    fn test_takes_immediate_win() {
        // O to move can complete the middle column.
        for engine in engines() {
            assert_eq!(
                engine.choose_move(&board("xox .ox x.."), Mark::O),
                Some(Position::BottomCenter)
            );
        }
    }

    #[test]
    fn test_blocks_opponent_win() {
        // X threatens the top row; O must block at top-right.
        for engine in engines() {
            assert_eq!(
                engine.choose_move(&board("xx. .o. ..."), Mark::O),
                Some(Position::TopRight)
            );
        }
    }

    #[test]
    fn test_works_for_either_mark() {
        // X to move wins on the left column.
        for engine in engines() {
            assert_eq!(
                engine.choose_move(&board("xo. xo. ..."), Mark::X),
                Some(Position::BottomLeft)
            );
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        for engine in engines() {
            assert_eq!(engine.choose_move(&board("xox oxx oxo"), Mark::O), None);
            assert!(engine.score_moves(&board("xox oxx oxo"), Mark::O).is_empty());
        }
    }

    #[test]
    fn test_search_terminal_scores() {
        let engine = MinimaxEngine::default();
        assert_eq!(engine.search(&board("ooo xx. x.."), Mark::O, 5, true), WIN);
        assert_eq!(engine.search(&board("ooo xx. x.."), Mark::X, 5, true), LOSS);
        assert_eq!(engine.search(&board("xox oxx oxo"), Mark::O, 5, false), DRAW);
    }

    #[test]
    fn test_zero_depth_scores_undecided_board_as_draw() {
        let engine = MinimaxEngine::default();
        assert_eq!(engine.search(&board("xx. oo. ..."), Mark::O, 0, true), DRAW);
        assert_eq!(engine.search(&board("xx. oo. ..."), Mark::O, 1, true), WIN);
    }

    #[test]
    fn test_empty_board_is_a_draw_with_best_play() {
        let engine = MinimaxEngine::new(SearchConfig::new(None, true));
        let scores = engine.score_moves(&Board::new(), Mark::X);
        assert_eq!(scores.len(), 9);
        assert!(scores.iter().all(|(_, score)| *score == DRAW));
        assert_eq!(engine.choose_move(&Board::new(), Mark::X), Some(Position::TopLeft));
    }

    #[test]
    fn test_score_moves_agree_with_and_without_pruning() {
        let position = board("x.. .o. ..x");
        let [plain, pruned] = engines();
        assert_eq!(plain.score_moves(&position, Mark::O), pruned.score_moves(&position, Mark::O));
    }

    #[test]
    fn test_edges_beat_corners_against_opposite_corners() {
        // X in opposite corners, O in the center: a corner reply loses.
        let scores = MinimaxEngine::default().score_moves(&board("x.. .o. ..x"), Mark::O);
        for (pos, score) in scores {
            match pos {
                Position::TopRight | Position::BottomLeft => assert_eq!(score, LOSS, "{}", pos),
                _ => assert_eq!(score, DRAW, "{}", pos),
            }
        }
    }

    #[test]
    fn test_shallow_depth_still_returns_a_legal_move() {
        let engine = MinimaxEngine::new(SearchConfig::new(Some(1), true));
        let position = board("x.. ... ...");
        let chosen = engine.choose_move(&position, Mark::O).unwrap();
        assert!(position.is_empty(chosen));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "occupied")]
    fn test_child_on_occupied_cell_is_caught() {
        Searcher::child(&board("....x...."), Position::Center, Mark::O);
    }

    #[test]
    fn test_does_not_touch_the_input_board() {
        let position = board("x.. .o. ...");
        let before = position.clone();
        MinimaxEngine::default().choose_move(&position, Mark::X);
        assert_eq!(position, before);
    }
}
