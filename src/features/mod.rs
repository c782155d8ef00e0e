//! Feature implementations for todoline.
//!
//! - Natural language parsing of task commands

pub mod nlp;
