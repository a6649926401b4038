//! Noughts core - tic-tac-toe session logic
//!
//! Pure game logic for a 3x3 tic-tac-toe board shared by two humans or
//! played against a naive computer opponent, with a JSON save format.
//!
//! # Architecture
//!
//! - **Board**: immutable 9-cell grid, marks only ever added
//! - **Rules**: win/draw evaluation of a board snapshot
//! - **Opponent**: fixed-preference move picker (no search)
//! - **Session**: state machine over the three play modes
//! - **Codec**: save-file projection, validated on load
//! - **Table**: input driver with observer callbacks and serialized storage
//!
//! # Example
//!
//! ```
//! use noughts_core::{GameMode, GameSession, GameStatus, Player};
//!
//! let mut session = GameSession::new();
//! session.start(GameMode::HumanFirstVsHeuristic).unwrap();
//! session.apply_human_move(0).unwrap();
//! assert_eq!(session.human_to_move(), Some(Player::X));
//! assert_eq!(session.status(), Some(GameStatus::InProgress));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod error;
mod opponent;
mod rules;
mod session;
mod table;
mod types;

pub use codec::{PersistedState, decode, deserialize, encode, serialize};
pub use error::{BoardError, SessionError};
pub use opponent::{PREFERENCE, select_move};
pub use rules::{GameStatus, LINES, WinningLine, evaluate, find_winning_line, is_full};
pub use session::{GameSession, SessionEvent, SessionState};
pub use table::{MemoryStore, SessionObserver, Store, Table};
pub use types::{Board, CELL_COUNT, Cell, GameMode, Player};
