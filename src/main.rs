//! Headless driver: reads actions line by line and prints the screen after
//! each one.
//!
//! Besides the actions understood by [`Action::parse`], the driver accepts
//! `show`, `save PATH` and `quit`. Blank lines and `#` comments are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use scratch::cli::{CliArgs, StartupConfig, StartupMode};
use scratch::load::filename_for_display;
use scratch::{Action, EditorConfig, FileLoader, Session, SessionStore, Source, View};

/// How long to wait for a load before giving up on it
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    scratch::tracing::init();

    let startup = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;
    let config = EditorConfig::load();

    let loader = Arc::new(FileLoader::new(config.max_file_size_bytes()));
    let mut session = Session::from_config(loader, &config);
    if let Some(visible_lines) = startup.visible_lines {
        session.set_visible_lines(visible_lines);
    }

    let store = if startup.persist {
        match SessionStore::default_location() {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Session persistence disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    open_initial_document(&mut session, &startup, &config, store.as_ref())?;

    let input: Box<dyn BufRead> = match &startup.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", session.view())?;

    for line in input.lines() {
        let line = line?;
        match DriverCommand::parse(&line) {
            Ok(None) => continue,
            Ok(Some(DriverCommand::Quit)) => break,
            Ok(Some(DriverCommand::Show)) => {}
            Ok(Some(DriverCommand::Save(path))) => {
                if let Err(e) = save(&session.view(), path) {
                    eprintln!("error: {:#}", e);
                }
                continue;
            }
            Ok(Some(DriverCommand::Action(text))) => run_action(&mut session, text),
            Err(e) => {
                eprintln!("error: {}", e);
                continue;
            }
        }
        write!(out, "{}", session.view())?;
    }
    out.flush()?;

    if let Some(store) = &store {
        store
            .save(&session.snapshot())
            .context("saving session state")?;
    }
    Ok(())
}

/// One line of driver input
#[derive(Debug, PartialEq, Eq)]
enum DriverCommand<'a> {
    Quit,
    Show,
    Save(&'a Path),
    /// Anything else, handed to [`Action::parse`]
    Action(&'a str),
}

impl<'a> DriverCommand<'a> {
    /// `Ok(None)` for blank lines and `#` comments
    fn parse(line: &'a str) -> Result<Option<Self>, String> {
        let command = line.trim();
        if command.is_empty() || command.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(verb, rest)| (verb, rest.trim()));
        let parsed = match verb {
            "quit" => DriverCommand::Quit,
            "show" => DriverCommand::Show,
            "save" if rest.is_empty() => return Err("save: expected a path".to_string()),
            "save" => DriverCommand::Save(Path::new(rest)),
            _ => DriverCommand::Action(line),
        };
        Ok(Some(parsed))
    }
}

fn open_initial_document(
    session: &mut Session,
    startup: &StartupConfig,
    config: &EditorConfig,
    store: Option<&SessionStore>,
) -> Result<()> {
    match &startup.mode {
        StartupMode::Empty => session.init(&config.blank_name)?,
        StartupMode::File(path) => {
            session.load(&filename_for_display(path), Source::File(path.clone()));
            if !session.wait_for_load(LOAD_TIMEOUT) {
                tracing::warn!("Timed out loading {}", path.display());
            }
        }
        StartupMode::Restore => {
            let snapshot = match store {
                Some(store) if config.restore_session => store.load().unwrap_or_else(|e| {
                    tracing::warn!("Ignoring session file {}: {}", store.path().display(), e);
                    None
                }),
                _ => None,
            };
            match snapshot {
                Some(snapshot) => session.restore(snapshot, &config.blank_name),
                None => session.init(&config.blank_name)?,
            }
        }
    }

    if let Some(caret) = startup.initial_position {
        if session.buffer().is_some() {
            session.set_caret(caret)?;
        }
    }
    Ok(())
}

fn run_action(session: &mut Session, line: &str) {
    let action = match Action::parse(line) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("error: {}", e);
            return;
        }
    };
    if let Err(e) = session.dispatch(action) {
        eprintln!("error: {}", e);
        return;
    }
    if session.is_loading() && !session.wait_for_load(LOAD_TIMEOUT) {
        eprintln!("error: load timed out");
    }
}

fn save(view: &View, path: &Path) -> Result<()> {
    let open = view
        .as_open()
        .ok_or_else(|| anyhow!("nothing to save: session is {}", view.status()))?;
    open.export()
        .write_to(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(DriverCommand::parse("   "), Ok(None));
        assert_eq!(DriverCommand::parse("# setup"), Ok(None));
    }

    #[test]
    fn test_save_requires_a_path() {
        assert!(DriverCommand::parse("save").is_err());
        assert!(DriverCommand::parse("  save  ").is_err());
        assert_eq!(
            DriverCommand::parse("save out.txt"),
            Ok(Some(DriverCommand::Save(Path::new("out.txt"))))
        );
    }

    #[test]
    fn test_other_lines_pass_through_untrimmed() {
        assert_eq!(DriverCommand::parse("quit"), Ok(Some(DriverCommand::Quit)));
        assert_eq!(
            DriverCommand::parse("type  two spaces"),
            Ok(Some(DriverCommand::Action("type  two spaces")))
        );
    }
}
