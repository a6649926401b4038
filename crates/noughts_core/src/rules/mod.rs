//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a board snapshot. They never look at session
//! state, so they can be called directly from tests and from the loader.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, WinningLine, find_winning_line};

use crate::{Board, Player};
use tracing::instrument;

/// Status of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Moves remain and nobody has three in a row.
    InProgress,
    /// A player completed a line.
    Won(Player, WinningLine),
    /// The board is full without a completed line.
    Drawn,
}

impl GameStatus {
    /// Returns true for `Won` and `Drawn`.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player, _) => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Won(player, line) => write!(f, "Player {:?} wins on {}", player, line),
            GameStatus::Drawn => write!(f, "Draw"),
        }
    }
}

/// Evaluates the board.
///
/// Lines are checked rows first, then columns, then the main and anti
/// diagonals; the first complete line decides the winner.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some((player, line)) = find_winning_line(board) {
        GameStatus::Won(player, line)
    } else if is_full(board) {
        GameStatus::Drawn
    } else {
        GameStatus::InProgress
    }
}
