//! scratch - immutable line buffer, screen windowing and edit sessions
//!
//! A [`Buffer`] is an immutable document value: ordered lines plus a caret.
//! Every edit returns a new buffer. A [`Screen`] is a bounded window
//! projected from a buffer for rendering. A [`Session`] owns the current
//! buffer, tracks whether a document is loading, open or failed, and turns
//! actions into buffer transformations.
//!
//! ```
//! use std::sync::Arc;
//! use scratch::{FileLoader, Session, View};
//!
//! let mut session = Session::new(Arc::new(FileLoader::default()));
//! session.init("Blank").unwrap();
//! session.input("hello\nworld").unwrap();
//!
//! let View::Open(view) = session.view() else { unreachable!() };
//! assert_eq!(view.screen.lines, vec!["hello", "world"]);
//! assert_eq!(view.serializer()(), b"hello\nworld");
//! ```

pub mod actions;
pub mod buffer;
pub mod caret;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod load;
pub mod persist;
pub mod screen;
pub mod selection;
pub mod session;
pub mod tracing;
pub mod view;

// Re-export commonly used types
pub use actions::Action;
pub use buffer::{Buffer, LineJoin};
pub use caret::Caret;
pub use config::EditorConfig;
pub use load::{FileLoader, LoadError, LoadId, Loader, Source};
pub use persist::{SessionSnapshot, SessionStore};
pub use screen::Screen;
pub use selection::Selection;
pub use session::{Session, SessionError, SessionState, Status};
pub use view::{Export, OpenView, View};
