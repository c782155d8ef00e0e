//! Storage layer for todoline.
//!
//! `SQLite` persistence for tasks and their tags.

mod database;
mod migrations;
mod tasks;

pub use database::Database;
pub use tasks::TaskStore;
