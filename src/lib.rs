//! todoline - a personal task tracker with natural language entry
//!
//! Tasks are typed the way they are said ("Submit report by next friday
//! #work"); the parser separates the title, the deadline and the tags, and
//! the result is kept in a local `SQLite` database.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod storage;
pub mod tasks;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TodoError;
pub use features::nlp::{parse_command, CommandParser, ParsedCommand};
