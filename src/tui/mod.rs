//! Terminal User Interface (TUI) for todoline.
//!
//! Provides an interactive table of tasks with vim-style navigation and an
//! input line for adding tasks in natural language. Built with ratatui and
//! crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, Mode};
pub use event::{handle_key, Action};

use std::io;

use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::core::{DateResolver, NaturalDateResolver};
use crate::error::TodoError;
use crate::features::nlp::CommandParser;
use crate::storage::TaskStore;

/// Run the TUI application.
///
/// New tasks are parsed relative to the moment they are submitted.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(store: &mut TaskStore) -> Result<(), TodoError> {
    // Create app state before touching the terminal
    let mut app = App::new(store, |now| {
        CommandParser::new(NaturalDateResolver::anchored(now))
    })?;

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| TodoError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TodoError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| TodoError::Terminal(format!("Failed to create terminal: {e}")))?;

    tracing::debug!(tasks = app.tasks.len(), "starting interactive shell");
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend, R: DateResolver>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, R>,
) -> Result<(), TodoError> {
    loop {
        // Draw UI
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| TodoError::Terminal(format!("Failed to draw: {e}")))?;

        // Handle events
        let Some(action) = event::handle_events(app)? else {
            continue;
        };

        let outcome = match action {
            Action::Quit => break,
            Action::Refresh => app.refresh(),
            Action::CycleStatus => app.cycle_selected(),
            Action::Delete => app.delete_selected(),
            Action::AddTask => app.submit_new_task(Local::now().naive_local()),
            Action::ApplyFilter => app.apply_filter(),
        };

        // Storage failures are shown, not fatal
        if let Err(e) = outcome {
            tracing::warn!(error = %e, ?action, "action failed");
            app.status = Some(format!("Error: {e}"));
        }
    }

    Ok(())
}
