//! Natural language command parser.
//!
//! Splits strings like "Buy groceries for tomorrow #shopping" into a title,
//! an optional deadline and a list of tags.
//!
//! The pipeline runs in fixed stages, each taking the current token sequence
//! and handing back what it consumed plus the tokens left over:
//!
//! 1. [`tokenize`] splits on whitespace.
//! 2. [`extract_tags`] pulls out `#tag` tokens.
//! 3. [`extract_keyword_deadline`] looks for a date after `for`/`due`/`by`/`on`.
//! 4. [`search_deadline_window`] tries every 2..=5 token window when no
//!    keyword phrase resolved.
//! 5. Whatever is left becomes the title.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::{DateResolver, NaturalDateResolver};

/// Words that introduce a deadline phrase ("call mom for tomorrow").
pub const DEADLINE_KEYWORDS: [&str; 4] = ["for", "due", "by", "on"];

/// Longest window tried by the windowed search.
const MAX_WINDOW: usize = 5;

/// Shortest window tried by the windowed search. Single words are too
/// ambiguous to be read as dates on their own.
const MIN_WINDOW: usize = 2;

/// Result of parsing a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    /// The remaining text after tags and the deadline phrase are removed.
    pub title: String,
    /// The resolved deadline, if a date phrase was found.
    pub deadline: Option<NaiveDateTime>,
    /// Tags in the order they appeared, without the leading `#`.
    pub tags: Vec<String>,
    /// The tokens consumed by the deadline, keyword included.
    pub deadline_phrase: Option<String>,
}

impl ParsedCommand {
    /// Check if a deadline was recognised.
    #[must_use]
    pub const fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }
}

/// A contiguous run of tokens tested as a date phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineCandidate {
    /// Index of the first token in the window.
    pub start: usize,
    /// Number of tokens in the window.
    pub len: usize,
}

impl DeadlineCandidate {
    /// Index one past the last token in the window.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    /// Join the window's tokens with single spaces, or `None` when the
    /// window does not fit inside `tokens`.
    #[must_use]
    pub fn phrase(&self, tokens: &[&str]) -> Option<String> {
        tokens.get(self.start..self.end()).map(|window| window.join(" "))
    }
}

/// A deadline recognised by one of the extraction stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    /// The resolved point in time.
    pub at: NaiveDateTime,
    /// The tokens consumed, joined with single spaces.
    pub phrase: String,
}

/// Parses free-form task commands using an injected [`DateResolver`].
#[derive(Debug, Clone, Default)]
pub struct CommandParser<R> {
    resolver: R,
}

impl<R: DateResolver> CommandParser<R> {
    /// Create a parser that resolves dates with `resolver`.
    #[must_use]
    pub const fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The resolver dates are checked against.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Parse a command into title, deadline and tags.
    ///
    /// Never fails: text that cannot be interpreted ends up in the title.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use todoline::core::NaturalDateResolver;
    /// use todoline::features::nlp::CommandParser;
    ///
    /// let now = NaiveDate::from_ymd_opt(2024, 6, 12)
    ///     .and_then(|d| d.and_hms_opt(10, 30, 0))
    ///     .unwrap();
    /// let parser = CommandParser::new(NaturalDateResolver::anchored(now));
    ///
    /// let parsed = parser.parse("Buy groceries for tomorrow #shopping");
    /// assert_eq!(parsed.title, "Buy groceries");
    /// assert_eq!(parsed.tags, vec!["shopping"]);
    /// assert_eq!(parsed.deadline.map(|d| d.date().to_string()), Some("2024-06-13".to_string()));
    /// ```
    #[must_use]
    pub fn parse(&self, command: &str) -> ParsedCommand {
        debug!(command, "parsing command");

        let tokens = tokenize(command);
        let (tags, tokens) = extract_tags(&tokens);
        debug!(?tags, remaining = ?tokens, "tags extracted");

        let (deadline, tokens) = match extract_keyword_deadline(&tokens, &self.resolver) {
            Some((deadline, rest)) => (Some(deadline), rest),
            None => match search_deadline_window(&tokens, &self.resolver) {
                Some((deadline, rest)) => (Some(deadline), rest),
                None => (None, tokens),
            },
        };

        let parsed = ParsedCommand {
            title: tokens.join(" "),
            deadline: deadline.as_ref().map(|d| d.at),
            tags,
            deadline_phrase: deadline.map(|d| d.phrase),
        };
        debug!(
            title = %parsed.title,
            deadline = ?parsed.deadline,
            tags = ?parsed.tags,
            "command parsed"
        );
        parsed
    }
}

/// Parse a command with a resolver anchored at the current local time.
#[must_use]
pub fn parse_command(command: &str) -> ParsedCommand {
    CommandParser::new(NaturalDateResolver::new()).parse(command)
}

/// Split a command into whitespace-delimited tokens.
#[must_use]
pub fn tokenize(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}

/// Remove `#tag` tokens, returning the tag names and the remaining tokens.
#[must_use]
pub fn extract_tags<'a>(tokens: &[&'a str]) -> (Vec<String>, Vec<&'a str>) {
    let (tag_tokens, rest): (Vec<&str>, Vec<&str>) =
        tokens.iter().copied().partition(|token| token.starts_with('#'));

    let tags = tag_tokens
        .iter()
        .filter_map(|token| token.strip_prefix('#'))
        .map(str::to_string)
        .collect();

    (tags, rest)
}

fn is_deadline_keyword(token: &str) -> bool {
    DEADLINE_KEYWORDS
        .iter()
        .any(|keyword| token.eq_ignore_ascii_case(keyword))
}

/// Find a deadline introduced by a keyword.
///
/// Each keyword followed by at least one token is tried in order; everything
/// after it must resolve as a date. The first success consumes the keyword
/// and all tokens after it.
#[must_use]
pub fn extract_keyword_deadline<'a, R>(
    tokens: &[&'a str],
    resolver: &R,
) -> Option<(Deadline, Vec<&'a str>)>
where
    R: DateResolver + ?Sized,
{
    for (i, token) in tokens.iter().enumerate() {
        if i + 1 >= tokens.len() || !is_deadline_keyword(token) {
            continue;
        }

        let phrase = tokens[i + 1..].join(" ");
        trace!(keyword = token, phrase = %phrase, "trying keyword phrase");

        if let Some(at) = resolver.resolve(&phrase) {
            debug!(keyword = token, %at, "deadline found after keyword");
            let deadline = Deadline {
                at,
                phrase: tokens[i..].join(" "),
            };
            return Some((deadline, tokens[..i].to_vec()));
        }
    }

    None
}

/// Search every window of 2 to 5 tokens for a date phrase.
///
/// Windows are tried from the longest length down, left to right within a
/// length. A resolvable window replaces the current best when it starts at
/// or before it, so the leftmost start wins and, for equal starts, the
/// shorter window found later wins.
#[must_use]
pub fn find_deadline_window<R>(
    tokens: &[&str],
    resolver: &R,
) -> Option<(DeadlineCandidate, NaiveDateTime)>
where
    R: DateResolver + ?Sized,
{
    let longest = tokens.len().min(MAX_WINDOW);
    let mut best: Option<(DeadlineCandidate, NaiveDateTime)> = None;

    for len in (MIN_WINDOW..=longest).rev() {
        for start in 0..=tokens.len() - len {
            let candidate = DeadlineCandidate { start, len };
            let Some(phrase) = candidate.phrase(tokens) else {
                continue;
            };
            trace!(start, len, phrase = %phrase, "trying window");

            let Some(at) = resolver.resolve(&phrase) else {
                continue;
            };

            if best.map_or(true, |(current, _)| candidate.start <= current.start) {
                debug!(start, len, %at, "new best window");
                best = Some((candidate, at));
            }
        }
    }

    best
}

/// Remove the best date window found by [`find_deadline_window`].
#[must_use]
pub fn search_deadline_window<'a, R>(
    tokens: &[&'a str],
    resolver: &R,
) -> Option<(Deadline, Vec<&'a str>)>
where
    R: DateResolver + ?Sized,
{
    let (candidate, at) = find_deadline_window(tokens, resolver)?;

    let deadline = Deadline {
        at,
        phrase: candidate.phrase(tokens)?,
    };
    let rest = tokens[..candidate.start]
        .iter()
        .chain(&tokens[candidate.end()..])
        .copied()
        .collect();

    Some((deadline, rest))
}
