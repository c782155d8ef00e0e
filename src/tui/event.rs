//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::DateResolver;
use crate::error::TodoError;
use crate::tui::app::{App, Mode};

const HELP: &str =
    "j/k:nav | gg/G:jump | Enter:status | n:new | d:delete | /:filter | Esc:clear filter | r:refresh | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Reload the task list.
    Refresh,
    /// Advance the selected task's status.
    CycleStatus,
    /// Delete the selected task.
    Delete,
    /// Store the typed line as a new task.
    AddTask,
    /// Apply the typed filter query.
    ApplyFilter,
}

/// Handle terminal events.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<R: DateResolver>(app: &mut App<'_, R>) -> Result<Option<Action>, TodoError> {
    // Poll for events with a small timeout
    if event::poll(Duration::from_millis(100))
        .map_err(|e| TodoError::Terminal(format!("Event poll failed: {e}")))?
    {
        if let Event::Key(key) =
            event::read().map_err(|e| TodoError::Terminal(format!("Event read failed: {e}")))?
        {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key(app, key));
            }
        }
    }

    Ok(None)
}

/// Apply a key press to the app.
pub fn handle_key<R: DateResolver>(app: &mut App<'_, R>, key: KeyEvent) -> Option<Action> {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match app.mode {
        Mode::Normal => handle_normal_key(app, key.code),
        Mode::Adding | Mode::Filtering => handle_input_key(app, key.code),
    }
}

fn handle_input_key<R: DateResolver>(app: &mut App<'_, R>, code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => {
            return Some(match app.mode {
                Mode::Filtering => Action::ApplyFilter,
                _ => Action::AddTask,
            });
        },
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {},
    }

    None
}

fn handle_normal_key<R: DateResolver>(app: &mut App<'_, R>, code: KeyCode) -> Option<Action> {
    match code {
        // Esc clears an active filter before it quits
        KeyCode::Esc if app.filter.query.is_some() => {
            app.cancel_pending();
            app.input.clear();
            return Some(Action::ApplyFilter);
        },

        // Quit
        KeyCode::Char('q') | KeyCode::Esc => {
            app.cancel_pending();
            return Some(Action::Quit);
        },

        // Navigation - vim style
        KeyCode::Char('j') | KeyCode::Down => {
            app.cancel_pending();
            app.select_next();
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.cancel_pending();
            app.select_previous();
        },

        // Jump to top/bottom
        KeyCode::Char('g') => {
            app.handle_g();
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.cancel_pending();
            app.select_last();
        },
        KeyCode::Home => {
            app.cancel_pending();
            app.select_first();
        },

        // Actions
        KeyCode::Enter => {
            app.cancel_pending();
            return Some(Action::CycleStatus);
        },
        KeyCode::Char('d') => {
            app.cancel_pending();
            return Some(Action::Delete);
        },
        KeyCode::Char('n') => {
            app.cancel_pending();
            app.start_adding();
        },
        KeyCode::Char('/') => {
            app.cancel_pending();
            app.start_filtering();
        },
        KeyCode::Char('r') => {
            app.cancel_pending();
            return Some(Action::Refresh);
        },

        // Help
        KeyCode::Char('?') => {
            app.cancel_pending();
            app.status = Some(HELP.to_string());
        },

        _ => {
            app.cancel_pending();
        },
    }

    None
}
