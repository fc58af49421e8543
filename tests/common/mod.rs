//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use scratch::persist::PersistedState;
use scratch::{
    Buffer, Caret, FileLoader, LoadError, Loader, Session, SessionSnapshot, Source, View,
};

pub const WAIT: Duration = Duration::from_secs(5);

/// Create a buffer with given text and caret position
pub fn buffer_at(text: &str, line: usize, character: usize) -> Buffer {
    Buffer::from_text(text).with_caret(Caret::new(line, character))
}

/// Buffer content joined with `\n`
pub fn buffer_to_string(buffer: &Buffer) -> String {
    buffer.to_text()
}

/// A session that has been through `init("Blank")`
pub fn blank_session() -> Session {
    let mut session = Session::new(Arc::new(FileLoader::default()));
    session.init("Blank").unwrap();
    session
}

/// An open session on `text` with the caret at `(line, character)`
pub fn open_session(text: &str, line: usize, character: usize) -> Session {
    let mut session = Session::new(Arc::new(FileLoader::default()));
    session.restore(
        SessionSnapshot::new(PersistedState::Open {
            name: "test.txt".to_string(),
            lines: text.split('\n').map(String::from).collect(),
            caret: Caret::new(line, character),
        }),
        "Blank",
    );
    session
}

/// Session content joined with `\n`; panics if not open
pub fn session_text(session: &Session) -> String {
    session.buffer().expect("session should be open").to_text()
}

pub fn session_caret(session: &Session) -> Caret {
    session.buffer().expect("session should be open").caret()
}

/// Rendered lines of an open view
pub fn screen_lines(view: &View) -> Vec<String> {
    view.as_open().expect("view should be open").screen.lines.clone()
}

/// Loader whose fetches block until the test releases them.
///
/// Inline sources are keyed by their bytes; `release(key, result)` lets the
/// matching fetch return. Lets a test decide the order loads finish in.
#[derive(Default)]
pub struct GatedLoader {
    gates: Mutex<HashMap<Vec<u8>, Receiver<Result<Vec<u8>, LoadError>>>>,
    releases: Mutex<HashMap<Vec<u8>, Sender<Result<Vec<u8>, LoadError>>>>,
    started: Mutex<Option<Sender<Vec<u8>>>>,
}

impl GatedLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Prepare a gate for the inline source `key`
    pub fn gate(&self, key: &[u8]) {
        let (tx, rx) = mpsc::channel();
        self.gates.lock().unwrap().insert(key.to_vec(), rx);
        self.releases.lock().unwrap().insert(key.to_vec(), tx);
    }

    /// Receive the key of each fetch as it starts
    pub fn on_start(&self) -> Receiver<Vec<u8>> {
        let (tx, rx) = mpsc::channel();
        *self.started.lock().unwrap() = Some(tx);
        rx
    }

    pub fn release(&self, key: &[u8], result: Result<Vec<u8>, LoadError>) {
        let tx = self.releases.lock().unwrap().remove(key).expect("no gate for key");
        tx.send(result).unwrap();
    }
}

impl Loader for GatedLoader {
    fn fetch(&self, source: &Source) -> Result<Vec<u8>, LoadError> {
        let Source::Inline(key) = source else {
            return Err(LoadError::Io("gated loader only serves inline sources".into()));
        };
        let gate = self.gates.lock().unwrap().remove(key);
        if let Some(started) = self.started.lock().unwrap().as_ref() {
            let _ = started.send(key.clone());
        }
        match gate {
            Some(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(LoadError::Io("gate dropped".into()))),
            None => Ok(key.clone()),
        }
    }
}
