//! Command-line interface for tictac.

use clap::{Parser, Subcommand};

/// Tic-tac-toe with a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Tic-tac-toe against an unbeatable minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        /// Path to the game configuration file
        #[arg(short, long, default_value = "tictac.toml")]
        config: std::path::PathBuf,

        /// Name of the first player (X)
        #[arg(long)]
        player_one: Option<String>,

        /// Name of the second player (O)
        #[arg(long)]
        player_two: Option<String>,

        /// Play against the computer
        #[arg(long, conflicts_with = "no_ai")]
        ai: bool,

        /// Play against another human even if the config enables the computer
        #[arg(long)]
        no_ai: bool,

        /// Limit how many plies the computer looks ahead
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show the computer's move for a position
    Suggest {
        /// Board in row-major order, e.g. "x...o...." (x, o, and . for empty)
        #[arg(short, long)]
        board: String,

        /// Mark to move (defaults to whoever has played fewer marks, X first)
        #[arg(short, long)]
        mark: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Let the computer play both sides
    Selfplay {
        /// Path to the game configuration file (only the search settings are used)
        #[arg(short, long, default_value = "tictac.toml")]
        config: std::path::PathBuf,

        /// Print the finished session as JSON
        #[arg(long)]
        json: bool,
    },
}
