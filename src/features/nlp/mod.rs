//! Natural language parsing for task entry.
//!
//! This module turns a single line such as:
//! - "Buy groceries for tomorrow #shopping"
//! - "Submit report by next friday #work"
//! - "dentist tomorrow 3pm #health"
//!
//! into a title, an optional deadline and a list of tags.

mod parser;

pub use parser::{
    extract_keyword_deadline, extract_tags, find_deadline_window, parse_command,
    search_deadline_window, tokenize, CommandParser, Deadline, DeadlineCandidate, ParsedCommand,
    DEADLINE_KEYWORDS,
};
