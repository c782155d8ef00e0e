//! Command implementations for todoline.
//!
//! Each command returns the text to print; the binary prints it.

mod add;
mod completions;

pub use add::{add, EMPTY_TITLE};
pub use completions::{completion_install_instructions, completions, generate_completions};

use chrono::NaiveDateTime;

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::TodoError;
use crate::output::{format_deleted, format_tags, format_task, format_tasks};
use crate::storage::TaskStore;
use crate::tasks::{Status, TaskFilter};

/// Execute list command
///
/// # Errors
///
/// Returns an error if the query or output formatting fails.
pub fn list(
    store: &TaskStore,
    args: ListArgs,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    let filter = TaskFilter {
        status: args.status,
        tag: args.tag,
        query: None,
    };
    let tasks = store.list_tasks(&filter)?;
    format_tasks(&tasks, "Tasks", format, now)
}

/// Execute search command
///
/// # Errors
///
/// Returns an error if the query or output formatting fails.
pub fn search(
    store: &TaskStore,
    query: &str,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    let filter = TaskFilter {
        query: Some(query.to_string()),
        ..TaskFilter::default()
    };
    let tasks = store.list_tasks(&filter)?;
    format_tasks(&tasks, &format!("Search: {query}"), format, now)
}

/// Execute show command
///
/// # Errors
///
/// Returns `NotFound` if the task does not exist.
pub fn show(
    store: &TaskStore,
    id: i64,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    let task = store.get_task(id)?;
    format_task(&task, format, now)
}

/// Execute status command: set `status`, or advance the task when `None`
///
/// # Errors
///
/// Returns `NotFound` if the task does not exist.
pub fn status(
    store: &TaskStore,
    id: i64,
    status: Option<Status>,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    let task = match status {
        Some(status) => store.set_status(id, status)?,
        None => store.cycle_status(id)?,
    };
    format_task(&task, format, now)
}

/// Execute done command
///
/// # Errors
///
/// Returns `NotFound` if the task does not exist.
pub fn done(
    store: &TaskStore,
    id: i64,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    status(store, id, Some(Status::Done), format, now)
}

/// Execute delete command
///
/// # Errors
///
/// Returns `NotFound` if the task does not exist.
pub fn delete(store: &TaskStore, id: i64, format: OutputFormat) -> Result<String, TodoError> {
    let task = store.delete_task(id)?;
    format_deleted(&task, format)
}

/// Execute tags command
///
/// # Errors
///
/// Returns an error if the query or output formatting fails.
pub fn tags(store: &TaskStore, format: OutputFormat) -> Result<String, TodoError> {
    let tags = store.list_tags()?;
    format_tags(&tags, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::NewTask;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 12)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn seeded_store() -> TaskStore {
        let mut store = TaskStore::open_in_memory().unwrap();
        for (title, tags) in [
            ("Submit report", vec!["work"]),
            ("Water plants", vec!["home"]),
            ("Plan sprint", vec!["work", "meeting"]),
        ] {
            store
                .add_task(&NewTask {
                    title: title.to_string(),
                    tags: tags.into_iter().map(str::to_string).collect(),
                    ..Default::default()
                })
                .unwrap();
        }
        store
    }

    fn json(output: &str) -> serde_json::Value {
        serde_json::from_str(output).unwrap()
    }

    #[test]
    fn test_list_by_tag() {
        let store = seeded_store();
        let args = ListArgs {
            tag: Some("work".to_string()),
            ..Default::default()
        };

        let value = json(&list(&store, args, OutputFormat::Json, now()).unwrap());
        assert_eq!(value["count"], 2);
        assert_eq!(value["items"][0]["title"], "Plan sprint");
    }

    #[test]
    fn test_search() {
        let store = seeded_store();

        let value = json(&search(&store, "PLANT", OutputFormat::Json, now()).unwrap());
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["title"], "Water plants");
    }

    #[test]
    fn test_status_cycles_without_value() {
        let store = seeded_store();

        let value = json(&status(&store, 1, None, OutputFormat::Json, now()).unwrap());
        assert_eq!(value["status"], "doing");

        let value = json(&done(&store, 1, OutputFormat::Json, now()).unwrap());
        assert_eq!(value["status"], "done");

        let value = json(&status(&store, 1, None, OutputFormat::Json, now()).unwrap());
        assert_eq!(value["status"], "todo");
    }

    #[test]
    fn test_delete_then_show_is_not_found() {
        let store = seeded_store();

        let value = json(&delete(&store, 2, OutputFormat::Json).unwrap());
        assert_eq!(value["deleted"]["title"], "Water plants");

        assert!(matches!(
            show(&store, 2, OutputFormat::Pretty, now()),
            Err(TodoError::NotFound(_))
        ));
    }

    #[test]
    fn test_tags_counts() {
        let store = seeded_store();

        let value = json(&tags(&store, OutputFormat::Json).unwrap());
        assert_eq!(value["count"], 3);
        assert_eq!(value["items"][2]["name"], "work");
        assert_eq!(value["items"][2]["tasks"], 2);
    }
}
