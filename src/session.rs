//! Edit session - owns the current buffer and its load status.
//!
//! State machine:
//!
//! ```text
//!                  init(name)
//!  Uninitialized ─────────────────────────────┐
//!        │                                    ▼
//!        │ load(name, source)   ┌──────▶  Open { name, buffer } ──┐
//!        ▼                      │ ok          ▲                   │ edits
//!     Loading ──────────────────┤             └───────────────────┘
//!        ▲                      │ err
//!        │                      └──────▶  Error { message }
//!        └──────── load(...) from any state
//! ```
//!
//! Edits require `Open`. Calling one in any other state is a caller bug and
//! comes back as [`SessionError::NotOpen`] with the state left unchanged.
//!
//! Loads run on a background thread. Each request gets a fresh [`LoadId`];
//! only the completion carrying the current id is applied, so a slow earlier
//! load can never overwrite a newer one.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::actions::Action;
use crate::buffer::{Buffer, LineJoin};
use crate::config::EditorConfig;
use crate::load::{self, LoadCompleted, LoadId, Loader, Source};
use crate::persist::{PersistedState, SessionSnapshot};
use crate::screen::Screen;
use crate::view::{Export, OpenView, View};

/// Session state. Only `Open` carries a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Error { message: String },
    Open { name: String, buffer: Buffer },
}

impl SessionState {
    pub fn status(&self) -> Status {
        match self {
            SessionState::Uninitialized => Status::Uninitialized,
            SessionState::Loading => Status::Loading,
            SessionState::Error { .. } => Status::Error,
            SessionState::Open { .. } => Status::Open,
        }
    }
}

/// Payload-free tag for a [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Uninitialized,
    Loading,
    Error,
    Open,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Uninitialized => "uninitialized",
            Status::Loading => "loading",
            Status::Error => "error",
            Status::Open => "open",
        };
        f.write_str(name)
    }
}

/// Contract violations. These point at a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {operation} from the {from} state")]
    InvalidTransition {
        operation: &'static str,
        from: Status,
    },
    #[error("cannot {operation}: no open buffer (session is {state})")]
    NotOpen {
        operation: &'static str,
        state: Status,
    },
}

pub struct Session {
    state: SessionState,
    loader: Arc<dyn Loader>,
    /// Lines shown above and below the caret
    visible_lines: usize,
    /// Fill the window with placeholder rows up to its full height
    pad_screen: bool,
    line_join: LineJoin,
    /// Last id handed out
    load_counter: u64,
    /// The load whose completion will be applied, if any
    current_load: Option<LoadId>,
    load_tx: Sender<LoadCompleted>,
    load_rx: Receiver<LoadCompleted>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("visible_lines", &self.visible_lines)
            .field("pad_screen", &self.pad_screen)
            .field("line_join", &self.line_join)
            .field("current_load", &self.current_load)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub const DEFAULT_VISIBLE_LINES: usize = 12;

    pub fn new(loader: Arc<dyn Loader>) -> Self {
        let (load_tx, load_rx) = mpsc::channel();
        Self {
            state: SessionState::Uninitialized,
            loader,
            visible_lines: Self::DEFAULT_VISIBLE_LINES,
            pad_screen: false,
            line_join: LineJoin::default(),
            load_counter: 0,
            current_load: None,
            load_tx,
            load_rx,
        }
    }

    /// Create a session using the screen and delete settings from `config`
    pub fn from_config(loader: Arc<dyn Loader>, config: &EditorConfig) -> Self {
        let mut session = Self::new(loader);
        session.visible_lines = config.visible_lines;
        session.pad_screen = config.pad_screen;
        session.line_join = config.line_join;
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn buffer(&self) -> Option<&Buffer> {
        match &self.state {
            SessionState::Open { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Open { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn set_visible_lines(&mut self, visible_lines: usize) {
        self.visible_lines = visible_lines;
    }

    pub fn pad_screen(&self) -> bool {
        self.pad_screen
    }

    /// Keep the window at `2 * visible_lines + 1` rows near document edges
    pub fn set_pad_screen(&mut self, pad_screen: bool) {
        self.pad_screen = pad_screen;
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn set_line_join(&mut self, line_join: LineJoin) {
        self.line_join = line_join;
    }

    /// Whether a load is in flight whose result will still be applied
    pub fn is_loading(&self) -> bool {
        self.current_load.is_some()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open an empty buffer. Only valid before anything else has happened.
    pub fn init(&mut self, name: &str) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            let err = SessionError::InvalidTransition {
                operation: "init",
                from: self.status(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }
        tracing::info!("Opened blank buffer {:?}", name);
        self.state = SessionState::Open {
            name: name.to_string(),
            buffer: Buffer::empty(),
        };
        Ok(())
    }

    /// Start loading `source` as document `name`.
    ///
    /// The session switches to `Loading` immediately. The result is applied
    /// by [`Session::process_load_results`] or [`Session::wait_for_load`].
    /// Any load started earlier is superseded.
    pub fn load(&mut self, name: &str, source: Source) -> LoadId {
        self.load_counter += 1;
        let id = LoadId(self.load_counter);
        if let Some(previous) = self.current_load.replace(id) {
            tracing::debug!("Load {:?} superseded by {:?}", previous, id);
        }
        tracing::info!("Loading {:?} from {} ({:?})", name, source.describe(), id);
        self.state = SessionState::Loading;

        load::spawn(
            Arc::clone(&self.loader),
            id,
            name.to_string(),
            source,
            self.load_tx.clone(),
        );
        id
    }

    /// Apply a finished load. Returns `false` if it was stale and dropped.
    pub fn complete_load(&mut self, completed: LoadCompleted) -> bool {
        let LoadCompleted { id, name, result } = completed;

        if self.current_load != Some(id) {
            tracing::debug!(
                "Discarding stale load result: {:?} != current {:?}",
                id,
                self.current_load
            );
            return false;
        }
        self.current_load = None;

        self.state = match result {
            Ok(bytes) => {
                let buffer = Buffer::from_bytes(&bytes);
                tracing::info!("Loaded {:?} ({} lines)", name, buffer.line_count());
                SessionState::Open { name, buffer }
            }
            Err(e) => {
                let message = e.user_message(&name);
                tracing::warn!("Load of {:?} failed: {}", name, e);
                SessionState::Error { message }
            }
        };
        true
    }

    /// Apply every load result that has already arrived, without blocking.
    /// Returns `true` if the state changed.
    pub fn process_load_results(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completed) = self.load_rx.try_recv() {
            changed |= self.complete_load(completed);
        }
        changed
    }

    /// Block until the current load settles or `timeout` passes.
    /// Returns `true` if the load settled.
    pub fn wait_for_load(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.current_load.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.load_rx.recv_timeout(remaining) {
                Ok(completed) => {
                    self.complete_load(completed);
                }
                // Disconnection cannot happen while the session holds a sender
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Typed input; line breaks become new lines
    pub fn input(&mut self, text: &str) -> Result<(), SessionError> {
        self.edit("input", |buffer| buffer.input(text))
    }

    pub fn new_line(&mut self) -> Result<(), SessionError> {
        self.edit("new_line", Buffer::new_line)
    }

    pub fn delete_backwards(&mut self) -> Result<(), SessionError> {
        let join = self.line_join;
        self.edit("delete_backwards", |buffer| {
            buffer.delete_backwards_with(join)
        })
    }

    pub fn delete_forwards(&mut self) -> Result<(), SessionError> {
        let join = self.line_join;
        self.edit("delete_forwards", |buffer| buffer.delete_forwards_with(join))
    }

    pub fn caret_left(&mut self) -> Result<(), SessionError> {
        self.edit("caret_left", Buffer::caret_left)
    }

    pub fn caret_right(&mut self) -> Result<(), SessionError> {
        self.edit("caret_right", Buffer::caret_right)
    }

    pub fn caret_up(&mut self) -> Result<(), SessionError> {
        self.edit("caret_up", Buffer::caret_up)
    }

    pub fn caret_down(&mut self) -> Result<(), SessionError> {
        self.edit("caret_down", Buffer::caret_down)
    }

    pub fn caret_line_start(&mut self) -> Result<(), SessionError> {
        self.edit("caret_line_start", Buffer::caret_line_start)
    }

    pub fn caret_line_end(&mut self) -> Result<(), SessionError> {
        self.edit("caret_line_end", Buffer::caret_line_end)
    }

    /// Move the caret to `caret`, clamped into the document
    pub fn set_caret(&mut self, caret: crate::caret::Caret) -> Result<(), SessionError> {
        self.edit("set_caret", |buffer| buffer.with_caret(caret))
    }

    /// Select between two char offsets in the document
    pub fn select(&mut self, start: usize, end: usize) -> Result<(), SessionError> {
        self.edit("select", |buffer| buffer.select(start, end))
    }

    pub fn select_left(&mut self) -> Result<(), SessionError> {
        self.edit("select_left", Buffer::select_left)
    }

    pub fn select_right(&mut self) -> Result<(), SessionError> {
        self.edit("select_right", Buffer::select_right)
    }

    /// Route an action to the matching operation
    pub fn dispatch(&mut self, action: Action) -> Result<(), SessionError> {
        match action {
            Action::Init(name) => self.init(&name),
            Action::Load { name, source } => {
                self.load(&name, source);
                Ok(())
            }
            Action::Input(text) => self.input(&text),
            Action::NewLine => self.new_line(),
            Action::DeleteBackwards => self.delete_backwards(),
            Action::DeleteForwards => self.delete_forwards(),
            Action::CaretLeft => self.caret_left(),
            Action::CaretRight => self.caret_right(),
            Action::CaretUp => self.caret_up(),
            Action::CaretDown => self.caret_down(),
            Action::CaretLineStart => self.caret_line_start(),
            Action::CaretLineEnd => self.caret_line_end(),
            Action::Select { start, end } => self.select(start, end),
            Action::SelectLeft => self.select_left(),
            Action::SelectRight => self.select_right(),
        }
    }

    fn edit(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&Buffer) -> Buffer,
    ) -> Result<(), SessionError> {
        match &mut self.state {
            SessionState::Open { buffer, .. } => {
                let before = buffer.caret();
                let next = f(&*buffer);
                *buffer = next;
                tracing::trace!(op = operation, "caret {} → {}", before, buffer.caret());
                Ok(())
            }
            other => {
                let err = SessionError::NotOpen {
                    operation,
                    state: other.status(),
                };
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Project the current state for rendering. Recomputed on every call.
    pub fn view(&self) -> View {
        match &self.state {
            SessionState::Uninitialized => View::Uninitialized,
            SessionState::Loading => View::Loading,
            SessionState::Error { message } => View::Error {
                message: message.clone(),
            },
            SessionState::Open { name, buffer } => View::Open(OpenView {
                name: name.clone(),
                screen: self.project(buffer),
                export: Export::new(name.clone(), buffer.clone()),
            }),
        }
    }

    fn project(&self, buffer: &Buffer) -> Screen {
        let screen = Screen::project(buffer, self.visible_lines);
        if self.pad_screen {
            let rows = self.visible_lines.saturating_mul(2).saturating_add(1);
            screen.padded(rows)
        } else {
            screen
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Capture the state for persisting. An in-flight load is recorded as
    /// `Uninitialized` since it cannot be resumed.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = match &self.state {
            SessionState::Uninitialized | SessionState::Loading => PersistedState::Uninitialized,
            SessionState::Error { message } => PersistedState::Error {
                message: message.clone(),
            },
            SessionState::Open { name, buffer } => PersistedState::Open {
                name: name.clone(),
                lines: buffer.lines().to_vec(),
                caret: buffer.caret(),
            },
        };
        SessionSnapshot::new(state)
    }

    /// Replace the state with a persisted one. Any in-flight load is dropped.
    /// A restored `Uninitialized` state opens a blank buffer named
    /// `blank_name`.
    pub fn restore(&mut self, snapshot: SessionSnapshot, blank_name: &str) {
        if let Some(id) = self.current_load.take() {
            tracing::debug!("Restore supersedes load {:?}", id);
        }
        self.state = match snapshot.state {
            PersistedState::Uninitialized => {
                tracing::info!("Opened blank buffer {:?}", blank_name);
                SessionState::Open {
                    name: blank_name.to_string(),
                    buffer: Buffer::empty(),
                }
            }
            PersistedState::Error { message } => SessionState::Error { message },
            PersistedState::Open { name, lines, caret } => SessionState::Open {
                name,
                buffer: Buffer::from_lines(lines, caret),
            },
        };
        tracing::info!("Restored session in {} state", self.status());
    }
}
