//! Task types: workflow status, stored tasks, new-task input, tag counts and
//! list filters.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::features::nlp::ParsedCommand;

/// Storage format for task timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    Doing,
    Done,
}

impl Status {
    /// All statuses in cycling order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// The value stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Read a stored value; anything unknown is treated as `Todo`.
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// The status that follows this one: Todo, Doing, Done, then Todo again.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Todo => Self::Doing,
            Self::Doing => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Todo => "Todo",
            Self::Doing => "Doing",
            Self::Done => "Done",
        })
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "doing" => Ok(Self::Doing),
            "done" => Ok(Self::Done),
            other => Err(format!("Unknown status '{other}' (expected todo, doing or done)")),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A task about to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}

impl NewTask {
    /// Build a task from a parsed command and an optional description.
    ///
    /// Blank descriptions are dropped.
    #[must_use]
    pub fn from_parsed(parsed: ParsedCommand, description: Option<String>) -> Self {
        Self {
            title: parsed.title,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            deadline: parsed.deadline,
            tags: parsed.tags,
        }
    }
}

/// A tag together with the number of tasks carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub tasks: usize,
}

/// Criteria for narrowing a task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks in this status.
    pub status: Option<Status>,
    /// Only tasks carrying this tag (case-insensitive).
    pub tag: Option<String>,
    /// Case-insensitive substring of title, description or any tag.
    pub query: Option<String>,
}

impl TaskFilter {
    /// A filter that matches every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Check whether `task` satisfies every criterion that is set.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| status != task.status) {
            return false;
        }

        if let Some(tag) = &self.tag {
            let tag = tag.trim_start_matches('#');
            if !task.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            let in_tags = task.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !(in_title || in_description || in_tags) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_task(title: &str, status: Status, tags: &[&str]) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            description: Some("bring the receipt".to_string()),
            deadline: None,
            created_at: NaiveDate::from_ymd_opt(2024, 6, 12)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            status,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn test_status_cycle() {
        assert_eq!(Status::Todo.next(), Status::Doing);
        assert_eq!(Status::Doing.next(), Status::Done);
        assert_eq!(Status::Done.next(), Status::Todo);
    }

    #[test]
    fn test_status_display_and_storage() {
        assert_eq!(Status::Doing.to_string(), "Doing");
        assert_eq!(Status::Doing.as_str(), "doing");
        assert_eq!("DONE".parse::<Status>(), Ok(Status::Done));
        assert!("later".parse::<Status>().is_err());
    }

    #[test]
    fn test_unknown_stored_status_reads_as_todo() {
        assert_eq!(Status::from_db("archived"), Status::Todo);
        assert_eq!(Status::from_db("doing"), Status::Doing);
    }

    #[test]
    fn test_new_task_from_parsed_drops_blank_description() {
        let parsed = ParsedCommand {
            title: "Buy milk".to_string(),
            tags: vec!["shopping".to_string()],
            ..Default::default()
        };
        let task = NewTask::from_parsed(parsed, Some("   ".to_string()));
        assert_eq!(task.title, "Buy milk");
        assert!(task.description.is_none());
        assert_eq!(task.tags, vec!["shopping"]);
    }

    #[test]
    fn test_filter_all_matches() {
        let task = make_task("Buy milk", Status::Todo, &[]);
        assert!(TaskFilter::all().matches(&task));
    }

    #[test]
    fn test_filter_by_status() {
        let filter = TaskFilter {
            status: Some(Status::Done),
            ..Default::default()
        };
        assert!(!filter.matches(&make_task("Buy milk", Status::Todo, &[])));
        assert!(filter.matches(&make_task("Buy milk", Status::Done, &[])));
    }

    #[test]
    fn test_filter_by_tag_ignores_case_and_hash() {
        let filter = TaskFilter {
            tag: Some("#Work".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&make_task("Report", Status::Todo, &["work"])));
        assert!(!filter.matches(&make_task("Report", Status::Todo, &["home"])));
    }

    #[test]
    fn test_filter_by_query() {
        let task = make_task("Return shoes", Status::Todo, &["errands"]);
        let query = |q: &str| TaskFilter {
            query: Some(q.to_string()),
            ..Default::default()
        };
        assert!(query("SHOES").matches(&task));
        assert!(query("receipt").matches(&task));
        assert!(query("errand").matches(&task));
        assert!(!query("groceries").matches(&task));
    }
}
