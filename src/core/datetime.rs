//! Natural language date and time resolution.
//!
//! The command parser asks a [`DateResolver`] whether a fragment of text is a
//! date. [`NaturalDateResolver`] is the production implementation: it reads
//! English phrases such as "tomorrow 3pm", "next friday" or "dec 15" relative
//! to a fixed anchor instant.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// Interprets a text fragment as a point in time.
///
/// Implementations must return `None` for anything they cannot read and must
/// never panic, whatever the input.
#[cfg_attr(test, mockall::automock)]
pub trait DateResolver {
    /// Resolve `phrase` to a local date and time.
    fn resolve(&self, phrase: &str) -> Option<NaiveDateTime>;
}

impl<F> DateResolver for F
where
    F: Fn(&str) -> Option<NaiveDateTime>,
{
    fn resolve(&self, phrase: &str) -> Option<NaiveDateTime> {
        self(phrase)
    }
}

/// English date resolver anchored at a reference instant.
///
/// Supports patterns like:
/// - `now`, `today`, `tonight`, `tomorrow`, `yesterday`
/// - `friday`, `next monday`, `this sat`, `last tuesday`
/// - `next week`, `last month`, `next year`
/// - `in 3 days`, `in a week`, `2 hours from now`, `5 days ago`
/// - `dec 15`, `december 15th 2025`, `15 dec`, `15th of december`
/// - `2024-12-15`, `2024-12-15T09:30`, `12/15`, `12/15/2024`
/// - any of the above with a time: `3pm`, `3:30 pm`, `15:00`, `at noon`
///
/// The whole phrase has to be understood; a single unknown word yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaturalDateResolver {
    now: NaiveDateTime,
}

impl NaturalDateResolver {
    /// Create a resolver anchored at the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self::anchored(Local::now().naive_local())
    }

    /// Create a resolver anchored at a fixed instant.
    #[must_use]
    pub const fn anchored(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// The instant relative phrases are measured from.
    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }
}

impl Default for NaturalDateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DateResolver for NaturalDateResolver {
    fn resolve(&self, phrase: &str) -> Option<NaiveDateTime> {
        resolve_phrase(phrase, self.now)
    }
}

/// What the date part of a phrase names, before a time of day is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePart {
    /// A day named relative to the anchor; keeps the anchor's time of day.
    Relative(NaiveDate),
    /// A day named explicitly; defaults to midnight.
    Calendar(NaiveDate),
    /// An exact instant such as "now" or "in 2 hours".
    Instant(NaiveDateTime),
    /// "tonight"; defaults to the night hour.
    Tonight(NaiveDate),
}

impl DatePart {
    fn at(self, time: Option<NaiveTime>, now: NaiveDateTime) -> NaiveDateTime {
        match (self, time) {
            (Self::Instant(instant), None) => instant,
            (Self::Instant(instant), Some(time)) => instant.date().and_time(time),
            (Self::Relative(date), None) => date.and_time(now.time()),
            (Self::Calendar(date), None) => date.and_time(hm(0, 0)),
            (Self::Tonight(date), None) => date.and_time(hm(21, 0)),
            (Self::Relative(date) | Self::Calendar(date) | Self::Tonight(date), Some(time)) => {
                date.and_time(time)
            },
        }
    }
}

static DAY_OF_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?,?$")
        .unwrap_or_else(|e| panic!("Invalid day-of-month regex: {e}"))
});

static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").unwrap_or_else(|e| panic!("Invalid year regex: {e}")));

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?(am|pm|a\.m\.|p\.m\.)$")
        .unwrap_or_else(|e| panic!("Invalid 12-hour time regex: {e}"))
});

static TIME_24H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .unwrap_or_else(|e| panic!("Invalid 24-hour time regex: {e}"))
});

/// Upper bound for offsets like "in N days"; larger counts are not dates.
const MAX_OFFSET: i64 = 100_000;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Resolve a phrase relative to `now`.
fn resolve_phrase(phrase: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let normalized = phrase.trim().to_lowercase();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    if words.is_empty() {
        return None;
    }

    if let [single] = words.as_slice() {
        if let Some(instant) = parse_iso_datetime(single) {
            return Some(instant);
        }
    }

    if let Some(part) = parse_date_words(&words, now) {
        return Some(part.at(None, now));
    }

    let (date_words, time) = split_time(&words)?;
    if date_words.is_empty() {
        return Some(now.date().and_time(time));
    }

    parse_date_words(date_words, now).map(|part| part.at(Some(time), now))
}

/// Split a phrase into its date words and a time of day.
///
/// The time may trail ("tomorrow at 3 pm") or lead ("3pm tomorrow").
fn split_time<'a, 'b>(words: &'a [&'b str]) -> Option<(&'a [&'b str], NaiveTime)> {
    if let Some((time, used)) = time_suffix(words) {
        let mut rest = &words[..words.len() - used];
        if let [head @ .., "at" | "@"] = rest {
            rest = head;
        }
        return Some((rest, time));
    }

    let rest = match words {
        ["at" | "@", rest @ ..] => rest,
        _ => words,
    };
    let (time, used) = time_prefix(rest)?;
    Some((&rest[used..], time))
}

/// Parse a time from the last one or two words, returning how many were used.
fn time_suffix(words: &[&str]) -> Option<(NaiveTime, usize)> {
    match words {
        [.., hour, meridiem @ ("am" | "pm" | "a.m." | "p.m.")] => {
            parse_time(&format!("{hour}{meridiem}")).map(|time| (time, 2))
        },
        [.., last] => parse_time(last).map(|time| (time, 1)),
        [] => None,
    }
}

/// Parse a time from the first one or two words, returning how many were used.
fn time_prefix(words: &[&str]) -> Option<(NaiveTime, usize)> {
    match words {
        [hour, meridiem @ ("am" | "pm" | "a.m." | "p.m."), ..] => {
            parse_time(&format!("{hour}{meridiem}")).map(|time| (time, 2))
        },
        [first, ..] => parse_time(first).map(|time| (time, 1)),
        [] => None,
    }
}

/// Parse a time string.
fn parse_time(input: &str) -> Option<NaiveTime> {
    match input {
        "morning" => return Some(hm(9, 0)),
        "noon" | "midday" => return Some(hm(12, 0)),
        "afternoon" => return Some(hm(14, 0)),
        "evening" => return Some(hm(18, 0)),
        "night" => return Some(hm(21, 0)),
        "midnight" => return Some(hm(0, 0)),
        _ => {},
    }

    if let Some(caps) = TIME_24H.captures(input) {
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        let second: u32 = caps.get(3).map_or(Some(0), |s| s.as_str().parse().ok())?;
        return NaiveTime::from_hms_opt(hour, minute, second);
    }

    let caps = TIME_12H.captures(input)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let is_pm = caps.get(3)?.as_str().starts_with('p');

    if hour == 0 || hour > 12 {
        return None;
    }
    if is_pm && hour < 12 {
        hour += 12;
    } else if !is_pm && hour == 12 {
        hour = 0;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse the date part of a phrase.
fn parse_date_words(words: &[&str], now: NaiveDateTime) -> Option<DatePart> {
    let today = now.date();

    match words {
        ["now"] | ["right", "now"] => return Some(DatePart::Instant(now)),
        ["today"] => return Some(DatePart::Relative(today)),
        ["tonight"] => return Some(DatePart::Tonight(today)),
        ["tomorrow"] => return today.succ_opt().map(DatePart::Relative),
        ["yesterday"] => return today.pred_opt().map(DatePart::Relative),
        ["day", "after", "tomorrow"] | ["the", "day", "after", "tomorrow"] => {
            return today
                .checked_add_signed(Duration::days(2))
                .map(DatePart::Relative);
        },
        ["day", "before", "yesterday"] | ["the", "day", "before", "yesterday"] => {
            return today
                .checked_sub_signed(Duration::days(2))
                .map(DatePart::Relative);
        },
        [direction @ ("next" | "last"), unit @ ("week" | "month" | "year")] => {
            let amount = if *direction == "next" { 1 } else { -1 };
            return shift(now, amount, unit);
        },
        _ => {},
    }

    if let Some(date) = parse_weekday_phrase(words, today) {
        return Some(DatePart::Relative(date));
    }

    if let Some(part) = parse_offset(words, now) {
        return Some(part);
    }

    parse_calendar_date(words, today).map(DatePart::Calendar)
}

/// Parse weekday names with an optional `this`/`next`/`last` modifier.
fn parse_weekday_phrase(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let (modifier, name) = match words {
        [name] => (None, *name),
        [modifier @ ("this" | "next" | "last"), name] => (Some(*modifier), *name),
        _ => return None,
    };

    let target = parse_weekday_name(name)?;
    let ahead = (i64::from(target.num_days_from_monday())
        - i64::from(today.weekday().num_days_from_monday())
        + 7)
        % 7;

    let offset = match modifier {
        Some("this") => ahead,
        Some("last") => {
            let behind = (7 - ahead) % 7;
            -(if behind == 0 { 7 } else { behind })
        },
        _ => {
            if ahead == 0 {
                7
            } else {
                ahead
            }
        },
    };

    today.checked_add_signed(Duration::days(offset))
}

fn parse_weekday_name(input: &str) -> Option<Weekday> {
    match input.trim_end_matches(',') {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse "in N units", "N units from now" and "N units ago".
fn parse_offset(words: &[&str], now: NaiveDateTime) -> Option<DatePart> {
    let (count, unit, sign) = match words {
        ["in", count, unit] => (*count, *unit, 1),
        [count, unit, "from", "now"] => (*count, *unit, 1),
        [count, unit, "ago"] => (*count, *unit, -1),
        _ => return None,
    };

    let amount = parse_count(count)?;
    shift(now, sign * amount, unit)
}

/// Move `now` by `amount` units.
fn shift(now: NaiveDateTime, amount: i64, unit: &str) -> Option<DatePart> {
    let today = now.date();
    match unit {
        "minute" | "minutes" | "min" | "mins" => now
            .checked_add_signed(Duration::minutes(amount))
            .map(DatePart::Instant),
        "hour" | "hours" | "hr" | "hrs" => now
            .checked_add_signed(Duration::hours(amount))
            .map(DatePart::Instant),
        "day" | "days" => today
            .checked_add_signed(Duration::days(amount))
            .map(DatePart::Relative),
        "week" | "weeks" => today
            .checked_add_signed(Duration::weeks(amount))
            .map(DatePart::Relative),
        "fortnight" | "fortnights" => today
            .checked_add_signed(Duration::weeks(amount * 2))
            .map(DatePart::Relative),
        "month" | "months" => add_months(today, amount).map(DatePart::Relative),
        "year" | "years" => add_months(today, amount * 12).map(DatePart::Relative),
        _ => None,
    }
}

fn add_months(date: NaiveDate, amount: i64) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
    if amount >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Parse a count: digits, "a"/"an", or a small English number word.
fn parse_count(input: &str) -> Option<i64> {
    let count = match input {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };

    (0..=MAX_OFFSET).contains(&count).then_some(count)
}

/// Parse an explicit calendar date.
fn parse_calendar_date(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    if let [single] = words {
        if let Ok(date) = NaiveDate::parse_from_str(single, "%Y-%m-%d") {
            return Some(date);
        }
        return parse_us_date(single, today);
    }

    let (month, day, rest) = match words {
        [first, second, rest @ ..] if parse_month_name(first).is_some() => {
            (parse_month_name(first)?, parse_day(second)?, rest)
        },
        [day, "of", month, rest @ ..] | [day, month, rest @ ..] => {
            (parse_month_name(month)?, parse_day(day)?, rest)
        },
        _ => return None,
    };

    match rest {
        [] => upcoming(today, month, day),
        [year] => NaiveDate::from_ymd_opt(parse_year(year)?, month, day),
        _ => None,
    }
}

/// This year's `month`/`day`, or next year's if it already passed.
fn upcoming(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(date)
    }
}

fn parse_day(input: &str) -> Option<u32> {
    let caps = DAY_OF_MONTH.captures(input)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn parse_year(input: &str) -> Option<i32> {
    if YEAR.is_match(input) {
        input.parse().ok()
    } else {
        None
    }
}

/// Parse month name to number.
fn parse_month_name(input: &str) -> Option<u32> {
    match input.trim_end_matches(['.', ',']) {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

/// Parse US date format (MM/DD or MM/DD/YYYY).
fn parse_us_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('/').collect();

    match parts.as_slice() {
        [month, day] => upcoming(today, month.parse().ok()?, day.parse().ok()?),
        [month, day, year] => {
            let year: i32 = year.parse().ok()?;
            let year = if year < 100 { 2000 + year } else { year };
            NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
        },
        _ => None,
    }
}

/// Parse `YYYY-MM-DDTHH:MM[:SS]` (already lowercased).
fn parse_iso_datetime(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dt%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dt%H:%M"))
        .ok()
}
