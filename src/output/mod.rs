//! Output formatting for todoline.
//!
//! This module provides formatters for displaying tasks in various formats.
//! Pretty formatters take the current time so deadlines can be described
//! relative to it.

mod humanize;
mod json;
mod pretty;

use chrono::NaiveDateTime;

use crate::cli::args::OutputFormat;
use crate::error::TodoError;
use crate::features::nlp::ParsedCommand;
use crate::tasks::{TagCount, Task};

pub use humanize::humanize_deadline;
pub use json::*;
pub use pretty::*;

/// Format tasks based on output format
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_tasks(
    tasks: &[Task],
    title: &str,
    format: OutputFormat,
    now: NaiveDateTime,
) -> Result<String, TodoError> {
    match format {
        OutputFormat::Pretty => Ok(format_tasks_pretty(tasks, title, now)),
        OutputFormat::Json => format_tasks_json(tasks, title),
    }
}

/// Format a single task based on output format
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_task(task: &Task, format: OutputFormat, now: NaiveDateTime) -> Result<String, TodoError> {
    match format {
        OutputFormat::Pretty => Ok(format_task_pretty(task, now)),
        OutputFormat::Json => to_json(task),
    }
}

/// Format tags based on output format
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_tags(tags: &[TagCount], format: OutputFormat) -> Result<String, TodoError> {
    match format {
        OutputFormat::Pretty => Ok(format_tags_pretty(tags)),
        OutputFormat::Json => format_tags_json(tags),
    }
}

/// Format a parse-only preview based on output format
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_parsed(parsed: &ParsedCommand, format: OutputFormat) -> Result<String, TodoError> {
    match format {
        OutputFormat::Pretty => Ok(format_parsed_pretty(parsed)),
        OutputFormat::Json => to_json(parsed),
    }
}

/// Format a removed task based on output format
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_deleted(task: &Task, format: OutputFormat) -> Result<String, TodoError> {
    match format {
        OutputFormat::Pretty => Ok(format_deleted_pretty(task)),
        OutputFormat::Json => format_deleted_json(task),
    }
}
