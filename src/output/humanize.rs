use chrono::NaiveDateTime;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Describe `deadline` relative to `now`, e.g. `in 3 days` or `2 hours ago`.
///
/// Anything within a minute of `now` is `just now`. Larger spans round down
/// to the coarsest whole unit: minutes, hours, days, weeks, months (30 days)
/// and years (365 days).
#[must_use]
pub fn humanize_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (deadline - now).num_seconds();
    let span = seconds.abs();

    if span < MINUTE {
        return "just now".to_string();
    }

    let (count, unit) = match span {
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < 7 * DAY => (s / DAY, "day"),
        s if s < 30 * DAY => (s / (7 * DAY), "week"),
        s if s < 365 * DAY => (s / (30 * DAY), "month"),
        s => (s / (365 * DAY), "year"),
    };
    let plural = if count == 1 { "" } else { "s" };

    if seconds > 0 {
        format!("in {count} {unit}{plural}")
    } else {
        format!("{count} {unit}{plural} ago")
    }
}
