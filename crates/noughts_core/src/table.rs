//! Session driver between the front-end and the game session.
//!
//! A [`Table`] takes the raw inputs (cell clicks, the start/clear button,
//! save and load), feeds them to its [`GameSession`], forwards the resulting
//! events to a [`SessionObserver`] and keeps the save file current through a
//! [`Store`].
//!
//! All inputs go through one async mutex that stays held while storage I/O
//! is awaited. A click arriving during a save waits for the save to finish,
//! and queued requests run in arrival order.

use crate::GameMode;
use crate::codec::{decode, encode, serialize};
use crate::error::SessionError;
use crate::rules::WinningLine;
use crate::session::{GameSession, SessionEvent, SessionState};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Storage target for the save file.
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads the whole save file.
    async fn read(&self) -> Result<Vec<u8>, SessionError>;

    /// Replaces the save file.
    async fn write(&self, bytes: &[u8]) -> Result<(), SessionError>;
}

/// Presentation callbacks.
pub trait SessionObserver: Send {
    /// A cell changed; `symbol` is `""`, `"X"` or `"O"`.
    fn on_cell_changed(&mut self, index: usize, symbol: &str, disabled: bool);

    /// A line was completed.
    fn on_game_won(&mut self, line: WinningLine);
}

/// In-memory [`Store`], empty until first written.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Mutex::new(Some(bytes.into())),
        }
    }

    /// Current contents, if anything was written.
    pub async fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read(&self) -> Result<Vec<u8>, SessionError> {
        self.data
            .lock()
            .await
            .clone()
            .ok_or(SessionError::PersistenceUnavailable)
    }

    async fn write(&self, bytes: &[u8]) -> Result<(), SessionError> {
        *self.data.lock().await = Some(bytes.to_vec());
        Ok(())
    }
}

struct Seat<O> {
    session: GameSession,
    mode: GameMode,
    implicit_start: bool,
    store: Option<Arc<dyn Store>>,
    observer: O,
}

impl<O: SessionObserver> Seat<O> {
    fn dispatch(&mut self, events: &[SessionEvent]) {
        for event in events {
            match *event {
                SessionEvent::CellChanged {
                    index,
                    cell,
                    disabled,
                } => self.observer.on_cell_changed(index, cell.symbol(), disabled),
                SessionEvent::GameWon(line) => self.observer.on_game_won(line),
            }
        }
    }

    /// Applies the outcome of a session operation.
    ///
    /// Ignorable errors become no-ops; anything else is returned.
    fn absorb(
        &mut self,
        result: Result<Vec<SessionEvent>, SessionError>,
    ) -> Result<bool, SessionError> {
        match result {
            Ok(events) => {
                self.dispatch(&events);
                Ok(true)
            }
            Err(e) if e.is_ignorable() => {
                debug!(error = %e, "Input ignored");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn write(&mut self) -> Result<(), SessionError> {
        let store = self.store.clone().ok_or(SessionError::PersistenceUnavailable)?;
        let bytes = encode(&serialize(&self.session))?;
        store.write(&bytes).await.inspect_err(|e| {
            warn!(error = %e, "Save failed");
        })?;
        self.session.mark_persisted();
        debug!(bytes = bytes.len(), "Session saved");
        Ok(())
    }

    async fn autosave(&mut self) -> Result<(), SessionError> {
        if self.store.is_some() {
            self.write().await
        } else {
            Ok(())
        }
    }
}

/// Front-end entry point owning one session.
pub struct Table<O> {
    seat: Mutex<Seat<O>>,
}

impl<O: SessionObserver> Table<O> {
    /// Creates a table that starts games in `mode` and reports to `observer`.
    ///
    /// No store is attached and implicit start is off.
    pub fn new(mode: GameMode, observer: O) -> Self {
        Self {
            seat: Mutex::new(Seat {
                session: GameSession::new(),
                mode,
                implicit_start: false,
                store: None,
                observer,
            }),
        }
    }

    /// Attaches a save target; every change is written through it.
    pub fn with_store(self, store: Arc<dyn Store>) -> Self {
        let mut seat = self.seat.into_inner();
        seat.store = Some(store);
        Self {
            seat: Mutex::new(seat),
        }
    }

    /// Lets a click on a board that has not started start the game first.
    pub fn with_implicit_start(self, enabled: bool) -> Self {
        let mut seat = self.seat.into_inner();
        seat.implicit_start = enabled;
        Self {
            seat: Mutex::new(seat),
        }
    }

    /// Handles a click on cell `index`.
    ///
    /// Clicks on occupied cells, out-of-range indices or a finished game are
    /// ignored. Only a failed autosave is reported.
    #[instrument(skip(self))]
    pub async fn on_human_click(&self, index: usize) -> Result<(), SessionError> {
        let mut seat = self.seat.lock().await;
        let mut changed = false;

        if seat.implicit_start && seat.session.state() == SessionState::NotStarted {
            let mode = seat.mode;
            let started = seat.session.start(mode);
            changed |= seat.absorb(started)?;
        }

        let moved = seat.session.apply_human_move(index);
        changed |= seat.absorb(moved)?;

        if changed {
            seat.autosave().await?;
        }
        Ok(())
    }

    /// Starts a game when none is running, otherwise clears the board.
    #[instrument(skip(self))]
    pub async fn on_start_or_clear(&self) -> Result<(), SessionError> {
        let mut seat = self.seat.lock().await;

        let changed = if seat.session.state() == SessionState::NotStarted {
            let mode = seat.mode;
            let started = seat.session.start(mode);
            seat.absorb(started)?
        } else {
            let events = seat.session.reset();
            seat.dispatch(&events);
            true
        };

        if changed {
            seat.autosave().await?;
        }
        Ok(())
    }

    /// Writes the session to the store.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<(), SessionError> {
        let mut seat = self.seat.lock().await;
        seat.write().await?;
        info!("Game saved");
        Ok(())
    }

    /// Replaces the session with the one in the store.
    ///
    /// The table's mode is kept and only cells that differ from the current
    /// board are redrawn. On any failure the current session is left as it
    /// was.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), SessionError> {
        let mut seat = self.seat.lock().await;
        let store = seat.store.clone().ok_or(SessionError::PersistenceUnavailable)?;

        let bytes = store.read().await.inspect_err(|e| {
            warn!(error = %e, "Load failed");
        })?;
        let session = decode(&bytes)?.into_session(seat.mode)?;

        info!(state = session.state().label(), turns = session.turn_count(), "Game loaded");
        let previous = std::mem::replace(&mut seat.session, session);
        let events = seat.session.redraw_from(previous.board());
        seat.dispatch(&events);
        Ok(())
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> GameSession {
        self.seat.lock().await.session.clone()
    }

    /// Runs `f` with the session and observer, after queued inputs finish.
    pub async fn view<R>(&self, f: impl FnOnce(&GameSession, &O) -> R) -> R {
        let seat = self.seat.lock().await;
        f(&seat.session, &seat.observer)
    }
}
