//! Task records and the criteria used to list them.

pub mod types;

pub use types::{NewTask, Status, TagCount, Task, TaskFilter, TIMESTAMP_FORMAT};
