//! Error types for board placement and session operations.

/// Error placing a mark on a [`Board`](crate::Board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The index is not in 0-8.
    #[display("Index {} is out of range (must be 0-8)", _0)]
    IndexOutOfRange(usize),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    OccupiedCell(usize),
}

impl std::error::Error for BoardError {}

/// Error that can occur while driving a game session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The index is not in 0-8.
    #[display("Index {} is out of range (must be 0-8)", _0)]
    IndexOutOfRange(usize),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    OccupiedCell(usize),

    /// The operation is not allowed in the current session state.
    #[display("Cannot {} while {}", action, from)]
    InvalidStateTransition {
        /// State the session was in.
        from: &'static str,
        /// Operation that was attempted.
        action: &'static str,
    },

    /// Stored data does not describe a valid game.
    #[display("Malformed saved state: {}", _0)]
    MalformedState(String),

    /// No storage target is configured or selected.
    #[display("No save file selected")]
    PersistenceUnavailable,

    /// The storage target failed an I/O operation.
    #[display("Storage error: {}", _0)]
    Storage(String),
}

impl std::error::Error for SessionError {}

impl SessionError {
    /// Errors that are swallowed as no-ops rather than shown to the player.
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            SessionError::IndexOutOfRange(_)
                | SessionError::OccupiedCell(_)
                | SessionError::InvalidStateTransition { .. }
        )
    }
}

impl From<BoardError> for SessionError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::IndexOutOfRange(index) => SessionError::IndexOutOfRange(index),
            BoardError::OccupiedCell(index) => SessionError::OccupiedCell(index),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::MalformedState(err.to_string())
    }
}
