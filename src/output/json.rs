//! JSON output formatting for todoline.

use serde::Serialize;
use serde_json::json;

use crate::error::TodoError;
use crate::tasks::{TagCount, Task};

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task], list_name: &str) -> Result<String, TodoError> {
    let output = json!({
        "list": list_name,
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format tags as JSON
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_tags_json(tags: &[TagCount]) -> Result<String, TodoError> {
    let output = json!({
        "count": tags.len(),
        "items": tags
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a removed task as JSON
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn format_deleted_json(task: &Task) -> Result<String, TodoError> {
    Ok(serde_json::to_string_pretty(&json!({ "deleted": task }))?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `TodoError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TodoError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::nlp::ParsedCommand;
    use crate::tasks::Status;
    use chrono::NaiveDate;

    fn make_task(title: &str) -> Task {
        Task {
            id: 3,
            title: title.to_string(),
            description: None,
            deadline: NaiveDate::from_ymd_opt(2024, 6, 14)
                .unwrap()
                .and_hms_opt(17, 0, 0),
            created_at: NaiveDate::from_ymd_opt(2024, 6, 12)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            status: Status::Doing,
            tags: vec!["work".to_string()],
        }
    }

    #[test]
    fn test_format_tasks_json() {
        let output = format_tasks_json(&[make_task("Report")], "Tasks").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["list"], "Tasks");
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["title"], "Report");
        assert_eq!(value["items"][0]["status"], "doing");
        assert_eq!(value["items"][0]["deadline"], "2024-06-14T17:00:00");
        assert_eq!(value["items"][0]["tags"][0], "work");
    }

    #[test]
    fn test_format_tasks_json_empty() {
        let output = format_tasks_json(&[], "Tasks").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["count"], 0);
        assert!(value["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_format_tags_json() {
        let tags = vec![TagCount {
            name: "work".to_string(),
            tasks: 2,
        }];
        let value: serde_json::Value =
            serde_json::from_str(&format_tags_json(&tags).unwrap()).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["name"], "work");
        assert_eq!(value["items"][0]["tasks"], 2);
    }

    #[test]
    fn test_format_deleted_json() {
        let value: serde_json::Value =
            serde_json::from_str(&format_deleted_json(&make_task("Gone")).unwrap()).unwrap();

        assert_eq!(value["deleted"]["id"], 3);
        assert_eq!(value["deleted"]["title"], "Gone");
    }

    #[test]
    fn test_parsed_command_json() {
        let parsed = ParsedCommand {
            title: "Buy milk".to_string(),
            tags: vec!["shopping".to_string()],
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_str(&to_json(&parsed).unwrap()).unwrap();

        assert_eq!(value["title"], "Buy milk");
        assert!(value["deadline"].is_null());
        assert_eq!(value["tags"][0], "shopping");
    }
}
