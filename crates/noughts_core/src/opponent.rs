//! Heuristic opponent: center, then corners, then edges.

use crate::Board;
use tracing::{debug, instrument};

/// Cells in the order the opponent prefers them.
pub const PREFERENCE: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// Returns the first preferred cell that is still empty.
///
/// There is no lookahead: the opponent neither completes its own lines nor
/// blocks the human's. `None` means the board is full.
#[instrument(skip(board))]
pub fn select_move(board: &Board) -> Option<usize> {
    let choice = PREFERENCE.iter().copied().find(|&index| board.is_empty(index));
    debug!(?choice, "Opponent chose cell");
    choice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, evaluate};

    #[test]
    fn test_prefers_center_on_empty_board() {
        assert_eq!(select_move(&Board::new()), Some(4));
    }

    #[test]
    fn test_takes_first_corner_after_center() {
        let board = Board::new().place(4, Player::X).unwrap();
        assert_eq!(select_move(&board), Some(0));
    }

    #[test]
    fn test_falls_through_to_edges() {
        let mut board = Board::new();
        for index in [4, 0, 2, 6, 8] {
            board = board.place(index, Player::X).unwrap();
        }
        assert_eq!(select_move(&board), Some(1));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for index in 0..9 {
            board = board.place(index, Player::O).unwrap();
        }
        assert_eq!(select_move(&board), None);
    }

    #[test]
    fn test_does_not_block_open_line() {
        // X threatens 8 along the bottom row; the opponent still takes 0.
        let board = Board::new()
            .place(6, Player::X)
            .and_then(|b| b.place(7, Player::X))
            .and_then(|b| b.place(4, Player::O))
            .unwrap();
        assert_eq!(select_move(&board), Some(0));

        let next = board.place(0, Player::O).unwrap().place(8, Player::X).unwrap();
        assert_eq!(evaluate(&next).winner(), Some(Player::X));
    }

    #[test]
    fn test_does_not_take_own_win() {
        // O can win at 7 down the middle column but prefers corner 0.
        let board = Board::new()
            .place(4, Player::O)
            .and_then(|b| b.place(1, Player::O))
            .and_then(|b| b.place(3, Player::X))
            .and_then(|b| b.place(5, Player::X))
            .unwrap();
        assert_eq!(select_move(&board), Some(0));
    }
}
