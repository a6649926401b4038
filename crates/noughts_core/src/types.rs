//! Core domain types for tic-tac-toe.

use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Player X (the human in single-player modes).
    X,
    /// Player O (the heuristic opponent in single-player modes).
    O,
}

impl Player {
    /// Symbol used on screen and in save files.
    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

/// A cell on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell marked by a player.
    Mark(Player),
}

impl Cell {
    /// Display symbol: `""`, `"X"` or `"O"`.
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Mark(player) => player.symbol(),
        }
    }

    /// Parses a display symbol back into a cell.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" => Some(Cell::Empty),
            "X" => Some(Cell::Mark(Player::X)),
            "O" => Some(Cell::Mark(Player::O)),
            _ => None,
        }
    }

    /// Checks if the cell holds a mark.
    pub fn is_marked(self) -> bool {
        matches!(self, Cell::Mark(_))
    }
}

/// 3x3 tic-tac-toe board.
///
/// Cells are addressed 0-8 in row-major order. The value is immutable from
/// the outside: [`Board::place`] returns a new board rather than mutating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from raw cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if a cell is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Returns a board with `player`'s mark at `index`.
    #[instrument(skip(self))]
    pub fn place(&self, index: usize, player: Player) -> Result<Board, BoardError> {
        match self.get(index) {
            None => Err(BoardError::IndexOutOfRange(index)),
            Some(Cell::Mark(_)) => Err(BoardError::OccupiedCell(index)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Mark(player);
                Ok(next)
            }
        }
    }

    /// Empty cell indices in ascending order.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted by cloning
    /// before consumption.
    pub fn empty_indices(&self) -> impl Iterator<Item = usize> + Clone + '_ {
        (0..CELL_COUNT).filter(move |&index| self.cells[index] == Cell::Empty)
    }

    /// Number of marked cells.
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_marked()).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based position so a player can type it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Mark(player) => player.symbol().to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Who plays whom, fixed when a game starts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// Two humans share the board, X and O alternating.
    #[default]
    HumanVsHuman,
    /// The human opens with two consecutive marks, then the opponent answers
    /// every human move.
    HumanFirstVsHeuristic,
    /// The opponent opens with two consecutive marks, then answers every
    /// human move.
    HeuristicFirstVsHuman,
}

impl GameMode {
    /// Marks the heuristic opponent places as soon as the game starts.
    pub fn opening_moves(self) -> usize {
        match self {
            GameMode::HeuristicFirstVsHuman => 2,
            GameMode::HumanVsHuman | GameMode::HumanFirstVsHeuristic => 0,
        }
    }

    /// The mark a human click places when `turn_count` marks are down.
    pub fn human_mark(self, turn_count: usize) -> Player {
        match self {
            GameMode::HumanVsHuman if turn_count % 2 == 1 => Player::O,
            _ => Player::X,
        }
    }

    /// Whether the opponent answers a human move that brought the board to
    /// `turn_count` marks.
    pub fn replies_after(self, turn_count: usize) -> bool {
        match self {
            GameMode::HumanVsHuman => false,
            GameMode::HumanFirstVsHeuristic => turn_count != 1,
            GameMode::HeuristicFirstVsHuman => true,
        }
    }
}
