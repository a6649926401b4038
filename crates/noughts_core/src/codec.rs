//! Save-file codec.
//!
//! The file is a small JSON object kept compatible with existing saves:
//!
//! ```json
//! { "board": ["X", "", "O", "", "", "", "", "", ""],
//!   "playerTurnCount": 2,
//!   "gameOver": false }
//! ```
//!
//! `gameOver` is written for older readers but ignored on load; the status
//! is always recomputed from the board.

use crate::error::SessionError;
use crate::types::CELL_COUNT;
use crate::{Board, Cell, GameMode, GameSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// External image of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Nine cell symbols, each `""`, `"X"` or `"O"`.
    pub board: Vec<String>,
    /// Marks placed so far.
    pub player_turn_count: u64,
    /// Whether the game had ended when saved.
    #[serde(default)]
    pub game_over: bool,
}

impl PersistedState {
    /// Validates the stored data and rebuilds a session in `mode`.
    #[instrument(skip(self), fields(turn_count = self.player_turn_count))]
    pub fn into_session(self, mode: GameMode) -> Result<GameSession, SessionError> {
        if self.board.len() != CELL_COUNT {
            return Err(malformed(format!(
                "board has {} cells, expected {}",
                self.board.len(),
                CELL_COUNT
            )));
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, symbol) in self.board.iter().enumerate() {
            cells[index] = Cell::from_symbol(symbol)
                .ok_or_else(|| malformed(format!("cell {} holds {:?}", index, symbol)))?;
        }
        let board = Board::from_cells(cells);

        let marked = board.marked_count();
        if usize::try_from(self.player_turn_count).ok() != Some(marked) {
            return Err(malformed(format!(
                "turn count {} does not match {} marked cells",
                self.player_turn_count, marked
            )));
        }

        let mut session = GameSession::from_board(board, marked, mode);
        session.mark_persisted();
        debug!(state = session.state().label(), "Session restored");
        Ok(session)
    }
}

fn malformed(reason: String) -> SessionError {
    warn!(%reason, "Rejected saved state");
    SessionError::MalformedState(reason)
}

/// Projects a session onto the save format.
#[instrument(skip(session))]
pub fn serialize(session: &GameSession) -> PersistedState {
    PersistedState {
        board: session
            .board()
            .cells()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect(),
        player_turn_count: session.turn_count() as u64,
        game_over: session.status().is_some_and(|status| status.is_over()),
    }
}

/// Decodes and validates saved bytes into a session in the default mode.
#[instrument(skip(data), fields(len = data.len()))]
pub fn deserialize(data: &[u8]) -> Result<GameSession, SessionError> {
    decode(data)?.into_session(GameMode::default())
}

/// Writes the state as UTF-8 JSON.
pub fn encode(state: &PersistedState) -> Result<Vec<u8>, SessionError> {
    Ok(serde_json::to_vec_pretty(state)?)
}

/// Parses UTF-8 JSON without validating the board.
#[instrument(skip(data), fields(len = data.len()))]
pub fn decode(data: &[u8]) -> Result<PersistedState, SessionError> {
    serde_json::from_slice(data).map_err(|e| malformed(e.to_string()))
}
