//! Database migrations for todoline.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::TodoError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, TodoError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| TodoError::database("Failed to get schema version", &e))
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), TodoError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| TodoError::database("Failed to set schema version", &e))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), TodoError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::debug!(version, "running migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), TodoError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(TodoError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: tasks, tags and the table linking them.
fn migrate_v1(conn: &Connection) -> Result<(), TodoError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            deadline TEXT,
            created_at TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'todo'
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_created
        ON tasks(created_at);

        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_tags (
            task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (task_id, tag_id)
        );
        ",
    )
    .map_err(|e| TodoError::database("Migration v1 failed", &e))
}
