use std::fmt::Write as _;

use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

use crate::features::nlp::ParsedCommand;
use crate::tasks::{Status, TagCount, Task};

use super::humanize_deadline;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn status_icon(status: Status) -> ColoredString {
    match status {
        Status::Todo => "[ ]".white(),
        Status::Doing => "[~]".yellow(),
        Status::Done => "[x]".green(),
    }
}

/// A task is overdue when its deadline has passed and it is not done.
#[must_use]
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    task.status != Status::Done && task.deadline.is_some_and(|d| d < now)
}

fn deadline_label(task: &Task, now: NaiveDateTime) -> Option<ColoredString> {
    let deadline = task.deadline?;
    let label = humanize_deadline(deadline, now);
    Some(if is_overdue(task, now) {
        format!("⚠ {label}").red()
    } else {
        label.yellow()
    })
}

fn tag_list(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a list of tasks as a pretty table
#[must_use]
pub fn format_tasks_pretty(tasks: &[Task], title: &str, now: NaiveDateTime) -> String {
    if tasks.is_empty() {
        return format!("{title} (0 tasks)\n  No tasks");
    }

    let mut output = format!("{title} ({} tasks)\n", tasks.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for task in tasks {
        let name = match task.status {
            Status::Done => task.title.dimmed().to_string(),
            _ => task.title.bold().to_string(),
        };

        let mut line = format!(
            "{} {} {}",
            status_icon(task.status),
            format!("{:>3}", task.id).dimmed(),
            name
        );

        if let Some(deadline) = deadline_label(task, now) {
            let _ = write!(line, "  {deadline}");
        }

        if !task.tags.is_empty() {
            let _ = write!(line, "  {}", tag_list(&task.tags).cyan());
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single task as pretty output
#[must_use]
pub fn format_task_pretty(task: &Task, now: NaiveDateTime) -> String {
    let mut output = format!("{} {}\n", status_icon(task.status), task.title.bold());
    let _ = writeln!(output, "  {}: {}", "ID".dimmed(), task.id);
    let _ = writeln!(output, "  {}: {}", "Status".dimmed(), task.status);

    if let Some(description) = &task.description {
        let _ = writeln!(output, "  {}: {description}", "Description".dimmed());
    }

    if let (Some(deadline), Some(label)) = (task.deadline, deadline_label(task, now)) {
        let _ = writeln!(
            output,
            "  {}: {} ({label})",
            "Deadline".dimmed(),
            deadline.format(DATE_FORMAT)
        );
    }

    if !task.tags.is_empty() {
        let _ = writeln!(output, "  {}: {}", "Tags".dimmed(), task.tags.join(", "));
    }

    let _ = writeln!(
        output,
        "  {}: {}",
        "Created".dimmed(),
        task.created_at.format(DATE_FORMAT)
    );

    output
}

/// Format a list of tags with their task counts
#[must_use]
pub fn format_tags_pretty(tags: &[TagCount]) -> String {
    if tags.is_empty() {
        return "Tags (0)\n  No tags".to_string();
    }

    let mut output = format!("Tags ({})\n", tags.len());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    for tag in tags {
        let noun = if tag.tasks == 1 { "task" } else { "tasks" };
        let _ = writeln!(
            output,
            "  #{}  {}",
            tag.name.cyan(),
            format!("{} {noun}", tag.tasks).dimmed()
        );
    }

    output
}

/// Format what the parser extracted, without saving anything
#[must_use]
pub fn format_parsed_pretty(parsed: &ParsedCommand) -> String {
    let mut output = format!("{}: {}\n", "Title".dimmed(), parsed.title.bold());

    match (parsed.deadline, &parsed.deadline_phrase) {
        (Some(deadline), Some(phrase)) => {
            let _ = writeln!(
                output,
                "{}: {} (from \"{phrase}\")",
                "Deadline".dimmed(),
                deadline.format(DATE_FORMAT).to_string().yellow()
            );
        },
        (Some(deadline), None) => {
            let _ = writeln!(
                output,
                "{}: {}",
                "Deadline".dimmed(),
                deadline.format(DATE_FORMAT).to_string().yellow()
            );
        },
        (None, _) => {
            let _ = writeln!(output, "{}: none", "Deadline".dimmed());
        },
    }

    if parsed.tags.is_empty() {
        let _ = writeln!(output, "{}: none", "Tags".dimmed());
    } else {
        let _ = writeln!(output, "{}: {}", "Tags".dimmed(), tag_list(&parsed.tags).cyan());
    }

    output
}

/// Confirmation line for a removed task
#[must_use]
pub fn format_deleted_pretty(task: &Task) -> String {
    format!("{} task {}: {}", "Deleted".red(), task.id, task.title)
}
