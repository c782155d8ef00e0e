//! Task persistence.
//!
//! Tasks, their tags and the links between them are stored in the local
//! `SQLite` database. Timestamps are stored as local time text.

use std::path::Path;

use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::TodoError;
use crate::tasks::{NewTask, Status, TagCount, Task, TaskFilter, TIMESTAMP_FORMAT};

use super::Database;

const TASK_COLUMNS: &str = "id, title, description, deadline, created_at, status";

/// Storage for tasks and tags.
pub struct TaskStore {
    db: Database,
}

impl TaskStore {
    /// Open the task store backed by the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &Path) -> Result<Self, TodoError> {
        Ok(Self::with_database(Database::open_at(path)?))
    }

    /// Open a task store that lives only in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self, TodoError> {
        Ok(Self::with_database(Database::open_in_memory()?))
    }

    /// Create a store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Insert a task together with its tags.
    ///
    /// The task row, any new tag rows and the links are written in one
    /// transaction. Empty tag names are skipped and duplicates linked once.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is written in that case.
    pub fn add_task(&mut self, task: &NewTask) -> Result<Task, TodoError> {
        let created_at = now();
        let deadline = task.deadline.map(whole_seconds);
        let tags = normalize_tags(&task.tags);

        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| TodoError::database("Failed to start transaction", &e))?;

        tx.execute(
            "INSERT INTO tasks (title, description, deadline, created_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.title,
                task.description,
                deadline.map(format_timestamp),
                format_timestamp(created_at),
                Status::Todo.as_str(),
            ],
        )
        .map_err(|e| TodoError::database("Failed to insert task", &e))?;
        let id = tx.last_insert_rowid();

        for tag in &tags {
            tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [tag])
                .map_err(|e| TodoError::database("Failed to insert tag", &e))?;
            tx.execute(
                "INSERT OR IGNORE INTO task_tags (task_id, tag_id)
                 SELECT ?1, id FROM tags WHERE name = ?2",
                params![id, tag],
            )
            .map_err(|e| TodoError::database("Failed to link tag", &e))?;
        }

        tx.commit()
            .map_err(|e| TodoError::database("Failed to commit task", &e))?;
        tracing::debug!(id, tags = tags.len(), "added task");

        Ok(Task {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            deadline,
            created_at,
            status: Status::Todo,
            tags,
        })
    }

    /// List tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, TodoError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))
            .map_err(|e| TodoError::database("Failed to prepare query", &e))?;

        let rows = stmt
            .query_map([], row_to_task)
            .map_err(|e| TodoError::database("Failed to query tasks", &e))?;

        let mut tasks = Vec::new();
        for row in rows {
            let mut task = row.map_err(|e| TodoError::database("Failed to read task", &e))?;
            task.tags = load_tags(conn, task.id)?;
            if filter.matches(&task) {
                tasks.push(task);
            }
        }

        Ok(tasks)
    }

    /// Get a task by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no task has this ID.
    pub fn get_task(&self, id: i64) -> Result<Task, TodoError> {
        let conn = self.db.connection();

        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .optional()
            .map_err(|e| TodoError::database("Failed to query task", &e))?;

        let mut task = task.ok_or_else(|| not_found(id))?;
        task.tags = load_tags(conn, id)?;
        Ok(task)
    }

    /// Set the status of a task and return the updated task.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no task has this ID.
    pub fn set_status(&self, id: i64, status: Status) -> Result<Task, TodoError> {
        let rows = self
            .db
            .connection()
            .execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )
            .map_err(|e| TodoError::database("Failed to update status", &e))?;

        if rows == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(id, status = status.as_str(), "updated status");

        self.get_task(id)
    }

    /// Advance a task to its next status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no task has this ID.
    pub fn cycle_status(&self, id: i64) -> Result<Task, TodoError> {
        let task = self.get_task(id)?;
        self.set_status(id, task.status.next())
    }

    /// Delete a task and return what was removed.
    ///
    /// Tag links go with it; the tags themselves stay.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no task has this ID.
    pub fn delete_task(&self, id: i64) -> Result<Task, TodoError> {
        let task = self.get_task(id)?;

        let rows = self
            .db
            .connection()
            .execute("DELETE FROM tasks WHERE id = ?1", [id])
            .map_err(|e| TodoError::database("Failed to delete task", &e))?;

        if rows == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(id, "deleted task");

        Ok(task)
    }

    /// Tags in use, alphabetically, with the number of tasks carrying each.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tags(&self) -> Result<Vec<TagCount>, TodoError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                "SELECT t.name, COUNT(tt.task_id)
                 FROM tags t
                 JOIN task_tags tt ON tt.tag_id = t.id
                 GROUP BY t.id
                 ORDER BY t.name",
            )
            .map_err(|e| TodoError::database("Failed to prepare query", &e))?;

        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(TagCount {
                    name: row.get(0)?,
                    tasks: usize::try_from(count).unwrap_or_default(),
                })
            })
            .map_err(|e| TodoError::database("Failed to query tags", &e))?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row.map_err(|e| TodoError::database("Failed to read tag", &e))?);
        }

        Ok(tags)
    }
}

fn not_found(id: i64) -> TodoError {
    TodoError::NotFound(format!("task {id}"))
}

fn now() -> NaiveDateTime {
    whole_seconds(Local::now().naive_local())
}

/// Drop the fraction of a second that [`TIMESTAMP_FORMAT`] cannot store.
fn whole_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(index: usize, value: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Trim tag names, drop empty ones and keep the first of any duplicates.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !result.iter().any(|existing| existing == tag) {
            result.push(tag.to_string());
        }
    }
    result
}

fn load_tags(conn: &Connection, task_id: i64) -> Result<Vec<String>, TodoError> {
    let mut stmt = conn
        .prepare(
            "SELECT t.name FROM tags t
             JOIN task_tags tt ON tt.tag_id = t.id
             WHERE tt.task_id = ?1
             ORDER BY t.name",
        )
        .map_err(|e| TodoError::database("Failed to prepare query", &e))?;

    let rows = stmt
        .query_map([task_id], |row| row.get::<_, String>(0))
        .map_err(|e| TodoError::database("Failed to query tags", &e))?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row.map_err(|e| TodoError::database("Failed to read tag", &e))?);
    }

    Ok(tags)
}

/// Convert a database row to a `Task` without its tags.
fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let deadline: Option<String> = row.get(3)?;
    let created_at: String = row.get(4)?;
    let status: String = row.get(5)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        deadline: deadline.map(|d| parse_timestamp(3, &d)).transpose()?,
        created_at: parse_timestamp(4, &created_at)?,
        status: Status::from_db(&status),
        tags: Vec::new(),
    })
}
