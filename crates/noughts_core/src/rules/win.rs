//! Win detection logic for tic-tac-toe.

use crate::{Board, Cell, Player};
use tracing::instrument;

/// All winning lines in evaluation order.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Three board indices forming a completed row, column or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinningLine([usize; 3]);

impl WinningLine {
    /// Wraps three indices.
    pub fn new(indices: [usize; 3]) -> Self {
        Self(indices)
    }

    /// The indices of the line.
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }

    /// Checks if the line passes through `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }
}

impl std::fmt::Display for WinningLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{}, {}, {}]", a, b, c)
    }
}

/// Returns the first completed line and its owner.
#[instrument(skip(board))]
pub fn find_winning_line(board: &Board) -> Option<(Player, WinningLine)> {
    let cells = board.cells();
    LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Cell::Mark(player) if cells[a] == cells[b] && cells[a] == cells[c] => {
            Some((player, WinningLine::new([a, b, c])))
        }
        _ => None,
    })
}
