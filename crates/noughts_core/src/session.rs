//! Game session state machine.
//!
//! A session moves `NotStarted -> InProgress -> (Won | Drawn)` and can be
//! reset to `NotStarted` from anywhere. Every mutation returns the
//! [`SessionEvent`]s the front-end needs to redraw.

use crate::error::SessionError;
use crate::opponent::select_move;
use crate::rules::{GameStatus, WinningLine, evaluate};
use crate::{Board, Cell, GameMode, Player};
use tracing::{debug, info, instrument};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No game running; the board is empty.
    #[default]
    NotStarted,
    /// Moves are accepted.
    InProgress,
    /// A player completed a line.
    Won(Player, WinningLine),
    /// The board filled up without a line.
    Drawn,
}

impl SessionState {
    /// Short name used in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Won(..) => "won",
            SessionState::Drawn => "drawn",
        }
    }

    /// The board status, or `None` before the game starts.
    pub fn status(&self) -> Option<GameStatus> {
        match *self {
            SessionState::NotStarted => None,
            SessionState::InProgress => Some(GameStatus::InProgress),
            SessionState::Won(player, line) => Some(GameStatus::Won(player, line)),
            SessionState::Drawn => Some(GameStatus::Drawn),
        }
    }
}

impl From<GameStatus> for SessionState {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::InProgress => SessionState::InProgress,
            GameStatus::Won(player, line) => SessionState::Won(player, line),
            GameStatus::Drawn => SessionState::Drawn,
        }
    }
}

/// Something the front-end has to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A cell changed value.
    CellChanged {
        /// Board index 0-8.
        index: usize,
        /// New value.
        cell: Cell,
        /// Whether the cell should stop accepting clicks.
        disabled: bool,
    },
    /// A line was completed.
    GameWon(WinningLine),
}

impl SessionEvent {
    fn cell(index: usize, cell: Cell) -> Self {
        SessionEvent::CellChanged {
            index,
            cell,
            disabled: cell.is_marked(),
        }
    }
}

/// One game from start to finish or reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSession {
    board: Board,
    turn_count: usize,
    mode: GameMode,
    state: SessionState,
    persisted: bool,
}

impl GameSession {
    /// Creates a session that has not started.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a session from a validated board.
    ///
    /// The state is recomputed from the board; callers must already have
    /// checked that `turn_count` matches the marked cells.
    pub(crate) fn from_board(board: Board, turn_count: usize, mode: GameMode) -> Self {
        Self {
            board,
            turn_count,
            mode,
            state: evaluate(&board).into(),
            persisted: false,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of marks placed so far.
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    /// Mode of the current (or last) game.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Board status, `None` before the game starts.
    pub fn status(&self) -> Option<GameStatus> {
        self.state.status()
    }

    /// Whether the session was written to or read from storage.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Records a successful save or load.
    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    /// The mark the next click would place, if a click is accepted now.
    pub fn human_to_move(&self) -> Option<Player> {
        (self.state == SessionState::InProgress).then(|| self.mode.human_mark(self.turn_count))
    }

    /// Starts a game in `mode`.
    ///
    /// In [`GameMode::HeuristicFirstVsHuman`] the opponent places its two
    /// opening marks before this returns.
    #[instrument(skip(self), fields(state = self.state.label()))]
    pub fn start(&mut self, mode: GameMode) -> Result<Vec<SessionEvent>, SessionError> {
        if self.state != SessionState::NotStarted {
            debug!("Start ignored, game already running");
            return Err(SessionError::InvalidStateTransition {
                from: self.state.label(),
                action: "start",
            });
        }

        self.board = Board::new();
        self.turn_count = 0;
        self.mode = mode;
        self.state = SessionState::InProgress;
        info!(%mode, "Game started");

        let mut events = Vec::new();
        for _ in 0..mode.opening_moves() {
            self.opponent_move(&mut events)?;
        }
        Ok(events)
    }

    /// Places the human's mark at `index` and lets the opponent answer.
    ///
    /// On error nothing changes.
    #[instrument(skip(self), fields(state = self.state.label(), turn = self.turn_count))]
    pub fn apply_human_move(&mut self, index: usize) -> Result<Vec<SessionEvent>, SessionError> {
        let Some(player) = self.human_to_move() else {
            debug!("Move ignored, game not in progress");
            return Err(SessionError::InvalidStateTransition {
                from: self.state.label(),
                action: "move",
            });
        };

        let mut events = Vec::new();
        self.place(index, player, &mut events)?;

        if self.state == SessionState::InProgress && self.mode.replies_after(self.turn_count) {
            self.opponent_move(&mut events)?;
        }
        Ok(events)
    }

    /// Clears the board back to `NotStarted`.
    ///
    /// Returns an event for every cell that was marked, so calling it twice
    /// yields no events the second time.
    #[instrument(skip(self), fields(state = self.state.label()))]
    pub fn reset(&mut self) -> Vec<SessionEvent> {
        let events = self
            .board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_marked())
            .map(|(index, _)| SessionEvent::cell(index, Cell::Empty))
            .collect();

        if self.state != SessionState::NotStarted {
            info!("Game reset");
        }
        self.board = Board::new();
        self.turn_count = 0;
        self.state = SessionState::NotStarted;
        events
    }

    /// Events that bring a front-end showing `previous` up to date.
    ///
    /// Only cells that differ are reported; the win highlight follows them.
    pub fn redraw_from(&self, previous: &Board) -> Vec<SessionEvent> {
        let mut events: Vec<_> = self
            .board
            .cells()
            .iter()
            .zip(previous.cells())
            .enumerate()
            .filter(|(_, (cell, old))| cell != old)
            .map(|(index, (&cell, _))| SessionEvent::cell(index, cell))
            .collect();
        if let SessionState::Won(_, line) = self.state {
            events.push(SessionEvent::GameWon(line));
        }
        events
    }

    fn opponent_move(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), SessionError> {
        match select_move(&self.board) {
            Some(index) => self.place(index, Player::O, events),
            None => Ok(()),
        }
    }

    fn place(
        &mut self,
        index: usize,
        player: Player,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), SessionError> {
        self.board = self.board.place(index, player)?;
        self.turn_count += 1;
        events.push(SessionEvent::cell(index, Cell::Mark(player)));
        debug!(index, ?player, turn = self.turn_count, "Mark placed");

        self.state = evaluate(&self.board).into();
        match self.state {
            SessionState::Won(winner, line) => {
                info!(?winner, %line, "Game won");
                events.push(SessionEvent::GameWon(line));
            }
            SessionState::Drawn => info!("Game drawn"),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(session: &GameSession) -> Vec<(usize, Player)> {
        session
            .board()
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| match cell {
                Cell::Mark(player) => Some((index, *player)),
                Cell::Empty => None,
            })
            .collect()
    }

    #[test]
    fn test_start_human_vs_human() {
        let mut session = GameSession::new();
        let events = session.start(GameMode::HumanVsHuman).unwrap();
        assert!(events.is_empty());
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.human_to_move(), Some(Player::X));
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        session.apply_human_move(0).unwrap();
        let before = session.clone();
        assert!(matches!(
            session.start(GameMode::HumanVsHuman),
            Err(SessionError::InvalidStateTransition { action: "start", .. })
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn test_heuristic_first_opens_twice() {
        let mut session = GameSession::new();
        let events = session.start(GameMode::HeuristicFirstVsHuman).unwrap();
        assert_eq!(marks(&session), vec![(0, Player::O), (4, Player::O)]);
        assert_eq!(session.turn_count(), 2);
        assert_eq!(events.len(), 2);
        assert_eq!(session.human_to_move(), Some(Player::X));
    }

    #[test]
    fn test_human_first_gets_two_moves_before_reply() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanFirstVsHeuristic).unwrap();

        let events = session.apply_human_move(8).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(session.turn_count(), 1);

        let events = session.apply_human_move(7).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            marks(&session),
            vec![(4, Player::O), (7, Player::X), (8, Player::X)]
        );

        // From here on every human move gets exactly one reply.
        session.apply_human_move(1).unwrap();
        assert_eq!(session.turn_count(), 5);
        assert_eq!(session.board().get(0), Some(Cell::Mark(Player::O)));
    }

    #[test]
    fn test_human_vs_human_alternates_marks() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        session.apply_human_move(0).unwrap();
        session.apply_human_move(1).unwrap();
        assert_eq!(marks(&session), vec![(0, Player::X), (1, Player::O)]);
    }

    #[test]
    fn test_occupied_cell_leaves_session_unchanged() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        session.apply_human_move(0).unwrap();
        let before = session.clone();
        assert_eq!(session.apply_human_move(0), Err(SessionError::OccupiedCell(0)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_out_of_range_leaves_session_unchanged() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        let before = session.clone();
        assert_eq!(session.apply_human_move(9), Err(SessionError::IndexOutOfRange(9)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_move_before_start_rejected() {
        let mut session = GameSession::new();
        assert!(matches!(
            session.apply_human_move(0),
            Err(SessionError::InvalidStateTransition { from: "not started", .. })
        ));
        assert_eq!(session, GameSession::new());
    }

    #[test]
    fn test_winning_move_emits_highlight_and_stops_reply() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        for index in [0, 3, 1, 4] {
            session.apply_human_move(index).unwrap();
        }
        let events = session.apply_human_move(2).unwrap();
        let line = WinningLine::new([0, 1, 2]);
        assert_eq!(events.last(), Some(&SessionEvent::GameWon(line)));
        assert_eq!(session.state(), SessionState::Won(Player::X, line));
        assert!(session.apply_human_move(8).is_err());
    }

    #[test]
    fn test_reset_clears_and_is_idempotent() {
        let mut session = GameSession::new();
        session.start(GameMode::HeuristicFirstVsHuman).unwrap();
        session.apply_human_move(8).unwrap();

        let events = session.reset();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| matches!(
            e,
            SessionEvent::CellChanged { cell: Cell::Empty, disabled: false, .. }
        )));
        let once = session.clone();

        assert!(session.reset().is_empty());
        assert_eq!(session, once);
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_turn_count_tracks_marks() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanFirstVsHeuristic).unwrap();
        for index in [8, 7, 1, 3] {
            let _ = session.apply_human_move(index);
            assert_eq!(session.turn_count(), session.board().marked_count());
        }
    }

    #[test]
    fn test_redraw_reports_only_differing_cells() {
        let mut session = GameSession::new();
        session.start(GameMode::HumanVsHuman).unwrap();
        for index in [0, 3, 1, 4, 2] {
            session.apply_human_move(index).unwrap();
        }
        let previous = Board::new()
            .place(0, Player::X)
            .and_then(|b| b.place(5, Player::O))
            .unwrap();

        let events = session.redraw_from(&previous);
        assert_eq!(
            events,
            vec![
                SessionEvent::cell(1, Cell::Mark(Player::X)),
                SessionEvent::cell(2, Cell::Mark(Player::X)),
                SessionEvent::cell(3, Cell::Mark(Player::O)),
                SessionEvent::cell(4, Cell::Mark(Player::O)),
                SessionEvent::cell(5, Cell::Empty),
                SessionEvent::GameWon(WinningLine::new([0, 1, 2])),
            ]
        );
        assert_eq!(session.redraw_from(session.board()).len(), 1);
    }
}
