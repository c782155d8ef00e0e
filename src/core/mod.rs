//! Core abstractions for todoline.
//!
//! This module provides the date resolution capability the command parser
//! is built on.

mod datetime;

pub use datetime::{DateResolver, NaturalDateResolver};

#[cfg(test)]
pub use datetime::MockDateResolver;
