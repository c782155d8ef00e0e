//! Application state for the TUI.

use chrono::NaiveDateTime;

use crate::cli::commands::EMPTY_TITLE;
use crate::core::DateResolver;
use crate::error::TodoError;
use crate::features::nlp::CommandParser;
use crate::storage::TaskStore;
use crate::tasks::{NewTask, Task, TaskFilter};

/// What keystrokes currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys navigate and act on the selected task.
    Normal,
    /// Keys are typed into a new task line.
    Adding,
    /// Keys are typed into the filter query.
    Filtering,
}

/// Application state.
pub struct App<'a, R> {
    store: &'a mut TaskStore,
    /// Builds the parser for a line submitted at the given moment.
    parser_at: fn(NaiveDateTime) -> CommandParser<R>,
    /// Tasks currently shown.
    pub tasks: Vec<Task>,
    /// Currently selected index.
    pub selected: usize,
    /// Criteria for the shown tasks.
    pub filter: TaskFilter,
    /// Current input mode.
    pub mode: Mode,
    /// Text typed in `Adding` or `Filtering` mode.
    pub input: String,
    /// Status message to display.
    pub status: Option<String>,
    /// Pending 'g' key for 'gg' command.
    pub pending_g: bool,
}

impl<'a, R: DateResolver> App<'a, R> {
    /// Create a new app instance showing every task.
    ///
    /// # Errors
    ///
    /// Returns an error if loading tasks fails.
    pub fn new(
        store: &'a mut TaskStore,
        parser_at: fn(NaiveDateTime) -> CommandParser<R>,
    ) -> Result<Self, TodoError> {
        let filter = TaskFilter::all();
        let tasks = store.list_tasks(&filter)?;

        Ok(Self {
            store,
            parser_at,
            tasks,
            selected: 0,
            filter,
            mode: Mode::Normal,
            input: String::new(),
            status: Some("Press ? for help".to_string()),
            pending_g: false,
        })
    }

    /// Reload tasks and keep the selection inside the list.
    fn reload(&mut self) -> Result<(), TodoError> {
        self.tasks = self.store.list_tasks(&self.filter)?;

        // Adjust selection if it's out of bounds
        if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len().saturating_sub(1);
        }

        Ok(())
    }

    /// Reload tasks from the database.
    ///
    /// # Errors
    ///
    /// Returns an error if loading tasks fails.
    pub fn refresh(&mut self) -> Result<(), TodoError> {
        self.reload()?;
        self.status = Some(format!("Refreshed {} tasks", self.tasks.len()));
        Ok(())
    }

    /// Get the currently selected task.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.pending_g = false;
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
        self.pending_g = false;
    }

    /// Jump to first task.
    pub fn select_first(&mut self) {
        self.selected = 0;
        self.pending_g = false;
    }

    /// Jump to last task.
    pub fn select_last(&mut self) {
        self.selected = self.tasks.len().saturating_sub(1);
        self.pending_g = false;
    }

    /// Advance the selected task to its next status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn cycle_selected(&mut self) -> Result<(), TodoError> {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return Ok(());
        };

        let task = self.store.cycle_status(id)?;
        self.reload()?;
        self.status = Some(format!("{}: {}", task.status, task.title));
        Ok(())
    }

    /// Delete the selected task.
    ///
    /// The selection stays on the same row, or the new last row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_selected(&mut self) -> Result<(), TodoError> {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return Ok(());
        };

        let task = self.store.delete_task(id)?;
        self.reload()?;
        self.status = Some(format!("Deleted: {}", task.title));
        Ok(())
    }

    /// Start typing a new task.
    pub fn start_adding(&mut self) {
        self.mode = Mode::Adding;
        self.input.clear();
        self.pending_g = false;
    }

    /// Start typing a filter query, prefilled with the current one.
    pub fn start_filtering(&mut self) {
        self.mode = Mode::Filtering;
        self.input = self.filter.query.clone().unwrap_or_default();
        self.pending_g = false;
    }

    /// Append a typed character to the input line.
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last character of the input line.
    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Leave the input line without acting on it.
    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
        self.status = None;
    }

    /// Parse the input line and store it as a new task.
    ///
    /// Dates in the line are read relative to `now`. The new task is
    /// selected. An empty title stores nothing and leaves a message instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be stored.
    pub fn submit_new_task(&mut self, now: NaiveDateTime) -> Result<(), TodoError> {
        let line = std::mem::take(&mut self.input);
        self.mode = Mode::Normal;

        let parsed = (self.parser_at)(now).parse(&line);
        if parsed.title.is_empty() {
            self.status = Some(EMPTY_TITLE.to_string());
            return Ok(());
        }

        let task = self.store.add_task(&NewTask::from_parsed(parsed, None))?;
        self.reload()?;
        if let Some(index) = self.tasks.iter().position(|t| t.id == task.id) {
            self.selected = index;
        }
        self.status = Some(format!("Added: {}", task.title));
        Ok(())
    }

    /// Use the input line as the filter query; an empty line clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading tasks fails.
    pub fn apply_filter(&mut self) -> Result<(), TodoError> {
        let query = std::mem::take(&mut self.input).trim().to_string();
        self.mode = Mode::Normal;

        self.filter.query = if query.is_empty() { None } else { Some(query) };
        self.selected = 0;
        self.reload()?;

        self.status = Some(match &self.filter.query {
            Some(query) => format!("Filter: {query} ({} tasks)", self.tasks.len()),
            None => "Filter cleared".to_string(),
        });
        Ok(())
    }

    /// Handle 'g' key for 'gg' command.
    pub fn handle_g(&mut self) {
        if self.pending_g {
            // Second 'g' - go to top
            self.select_first();
        } else {
            // First 'g' - wait for second
            self.pending_g = true;
            self.status = Some("g-".to_string());
        }
    }

    /// Cancel pending 'g' command.
    pub fn cancel_pending(&mut self) {
        self.pending_g = false;
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaturalDateResolver;
    use crate::tasks::Status;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 12)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn parser_at(now: NaiveDateTime) -> CommandParser<NaturalDateResolver> {
        CommandParser::new(NaturalDateResolver::anchored(now))
    }

    fn store_with(titles: &[&str]) -> TaskStore {
        let mut store = TaskStore::open_in_memory().unwrap();
        for title in titles {
            store
                .add_task(&NewTask {
                    title: (*title).to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut store = store_with(&["one", "two", "three"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 2);
        app.select_next();
        assert_eq!(app.selected, 2);
        app.handle_g();
        assert!(app.pending_g);
        app.handle_g();
        assert_eq!(app.selected, 0);
        assert!(!app.pending_g);
    }

    #[test]
    fn test_navigation_on_empty_list() {
        let mut store = store_with(&[]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.select_next();
        app.select_last();
        assert_eq!(app.selected, 0);
        assert!(app.selected_task().is_none());
        app.cycle_selected().unwrap();
        app.delete_selected().unwrap();
    }

    #[test]
    fn test_cycle_selected() {
        let mut store = store_with(&["stretch"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.cycle_selected().unwrap();
        assert_eq!(app.tasks[0].status, Status::Doing);
        assert_eq!(app.status.as_deref(), Some("Doing: stretch"));
    }

    #[test]
    fn test_delete_last_row_clamps_cursor() {
        let mut store = store_with(&["one", "two", "three"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.select_last();
        app.delete_selected().unwrap();
        assert_eq!(app.tasks.len(), 2);
        assert_eq!(app.selected, 1);

        app.delete_selected().unwrap();
        app.delete_selected().unwrap();
        assert!(app.tasks.is_empty());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_submit_new_task_parses_line() {
        let mut store = store_with(&["older"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.select_last();
        app.start_adding();
        for c in "dentist tomorrow 3pm #health".chars() {
            app.push_char(c);
        }
        app.submit_new_task(now()).unwrap();

        assert_eq!(app.mode, Mode::Normal);
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "dentist");
        assert_eq!(task.tags, vec!["health"]);
        assert_eq!(
            task.deadline,
            NaiveDate::from_ymd_opt(2024, 6, 13)
                .unwrap()
                .and_hms_opt(15, 0, 0)
        );
    }

    #[test]
    fn test_submit_empty_title_stores_nothing() {
        let mut store = store_with(&[]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.start_adding();
        for c in "#errands".chars() {
            app.push_char(c);
        }
        app.submit_new_task(now()).unwrap();

        assert!(app.tasks.is_empty());
        assert_eq!(app.status.as_deref(), Some(EMPTY_TITLE));
    }

    #[test]
    fn test_cancel_input_keeps_tasks() {
        let mut store = store_with(&["one"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.start_adding();
        app.push_char('x');
        app.cancel_input();

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.input.is_empty());
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn test_filter_and_clear() {
        let mut store = store_with(&["water plants", "submit report", "plant seeds"]);
        let mut app = App::new(&mut store, parser_at).unwrap();

        app.start_filtering();
        for c in "plant".chars() {
            app.push_char(c);
        }
        app.pop_char();
        app.push_char('t');
        app.apply_filter().unwrap();
        assert_eq!(app.tasks.len(), 2);

        app.start_filtering();
        assert_eq!(app.input, "plant");
        app.input.clear();
        app.apply_filter().unwrap();
        assert_eq!(app.tasks.len(), 3);
        assert_eq!(app.status.as_deref(), Some("Filter cleared"));
    }

    #[test]
    fn test_submit_reads_dates_from_submit_time() {
        let mut store = store_with(&[]);
        let mut app = App::new(&mut store, parser_at).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 20)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();

        app.start_adding();
        for c in "Pay rent for tomorrow".chars() {
            app.push_char(c);
        }
        app.submit_new_task(later).unwrap();

        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Pay rent");
        assert_eq!(
            task.deadline,
            NaiveDate::from_ymd_opt(2024, 6, 21)
                .unwrap()
                .and_hms_opt(23, 59, 0)
        );
    }
}
