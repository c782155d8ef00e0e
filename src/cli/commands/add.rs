//! Add command implementation.
//!
//! This module implements the `todoline add` command for natural language task entry.

use std::fmt::Write;

use chrono::NaiveDateTime;
use colored::Colorize;
use serde_json::json;

use crate::cli::args::{AddArgs, OutputFormat};
use crate::core::DateResolver;
use crate::error::TodoError;
use crate::features::nlp::CommandParser;
use crate::output::{format_parsed, humanize_deadline};
use crate::storage::TaskStore;
use crate::tasks::NewTask;

/// Message shown when parsing leaves nothing to use as a title.
pub const EMPTY_TITLE: &str = "Please provide a title for the task";

/// Execute the add command.
///
/// # Errors
///
/// Returns `InvalidInput` if the parsed title is empty, or an error if the
/// task cannot be stored.
pub fn add<R: DateResolver>(
    store: &mut TaskStore,
    parser: &CommandParser<R>,
    args: AddArgs,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    let parsed = parser.parse(&args.line());

    // If parse-only mode, just show what would be created
    if args.parse_only {
        return format_parsed(&parsed, format);
    }

    if parsed.title.is_empty() {
        return Err(TodoError::InvalidInput(EMPTY_TITLE.to_string()));
    }

    let phrase = parsed.deadline_phrase.clone();
    let task = store.add_task(&NewTask::from_parsed(parsed, args.description))?;

    match format {
        OutputFormat::Json => {
            let output = json!({
                "created": true,
                "task": task,
                "deadline_phrase": phrase,
            });
            Ok(serde_json::to_string_pretty(&output)?)
        },
        OutputFormat::Pretty => {
            let mut output = format!(
                "{} {} (ID: {})\n",
                "Created:".green().bold(),
                task.title,
                task.id.to_string().dimmed()
            );

            if let Some(deadline) = task.deadline {
                let _ = writeln!(
                    output,
                    "  {}: {} ({})",
                    "Deadline".dimmed(),
                    deadline.format("%Y-%m-%d %H:%M"),
                    humanize_deadline(deadline, now)
                );
            }

            if !task.tags.is_empty() {
                let tags = task
                    .tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(output, "  {}: {}", "Tags".dimmed(), tags.cyan());
            }

            Ok(output)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaturalDateResolver;
    use crate::tasks::TaskFilter;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 12)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn args(text: &str) -> AddArgs {
        AddArgs {
            text: vec![text.to_string()],
            description: None,
            parse_only: false,
        }
    }

    fn parser() -> CommandParser<NaturalDateResolver> {
        CommandParser::new(NaturalDateResolver::anchored(now()))
    }

    #[test]
    fn test_add_stores_parsed_task() {
        let mut store = TaskStore::open_in_memory().unwrap();

        let output = add(
            &mut store,
            &parser(),
            args("Buy groceries for tomorrow #shopping"),
            OutputFormat::Json,
            now(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["created"], true);
        assert_eq!(value["task"]["title"], "Buy groceries");
        assert_eq!(value["deadline_phrase"], "for tomorrow");

        let tasks = store.list_tasks(&TaskFilter::all()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].tags, vec!["shopping"]);
        assert_eq!(
            tasks[0].deadline.map(|d| d.date()),
            NaiveDate::from_ymd_opt(2024, 6, 13)
        );
    }

    #[test]
    fn test_add_with_description() {
        let mut store = TaskStore::open_in_memory().unwrap();
        let mut add_args = args("Call mom");
        add_args.description = Some("ask about the trip".to_string());

        let output = add(&mut store, &parser(), add_args, OutputFormat::Pretty, now()).unwrap();
        assert!(output.contains("Call mom"));

        let tasks = store.list_tasks(&TaskFilter::all()).unwrap();
        assert_eq!(tasks[0].description.as_deref(), Some("ask about the trip"));
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let mut store = TaskStore::open_in_memory().unwrap();

        let err = add(
            &mut store,
            &parser(),
            args("#errands by tomorrow"),
            OutputFormat::Pretty,
            now(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), EMPTY_TITLE);
        assert!(store.list_tasks(&TaskFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_only_stores_nothing() {
        let mut store = TaskStore::open_in_memory().unwrap();
        let mut add_args = args("Submit report by friday #work");
        add_args.parse_only = true;

        let output = add(&mut store, &parser(), add_args, OutputFormat::Json, now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "Submit report");
        assert_eq!(value["deadline"], "2024-06-14T10:30:00");
        assert_eq!(value["tags"][0], "work");

        assert!(store.list_tasks(&TaskFilter::all()).unwrap().is_empty());
    }
}
