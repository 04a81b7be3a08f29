//! Publication date normalization.
//!
//! Listing pages print dates in several shapes ("15 Mar 2024",
//! "March 5, 2024", "Published online: 15 Mar 2024"). Each configured pattern
//! is tried in order with strict whole-string matching. Anything that matches
//! nothing resolves to the harvest time, so a bad date never drops an article.
//!
//! `chrono` lets a space in a format match any run of whitespace, including
//! none, so "15Mar2024" would satisfy `%d %b %Y`. A pattern is only tried when
//! the input splits into as many whitespace-separated tokens as the pattern.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

/// Parse `raw` with the first matching pattern, or return `harvest_time`.
///
/// Patterns are `chrono` format strings. A pattern without time fields yields
/// midnight UTC on the parsed date. Surrounding whitespace in `raw` is ignored.
pub fn normalize_date<S: AsRef<str>>(
    raw: &str,
    patterns: &[S],
    harvest_time: DateTime<Utc>,
) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return harvest_time;
    }

    match patterns.iter().find_map(|p| parse_with(raw, p.as_ref())) {
        Some(parsed) => parsed,
        None => {
            debug!(%raw, "No date pattern matched; using harvest time");
            harvest_time
        }
    }
}

/// Resolve an optional raw date, defaulting absent values to `harvest_time`.
pub fn normalize_optional_date<S: AsRef<str>>(
    raw: Option<&str>,
    patterns: &[S],
    harvest_time: DateTime<Utc>,
) -> DateTime<Utc> {
    raw.map_or(harvest_time, |raw| normalize_date(raw, patterns, harvest_time))
}

fn parse_with(raw: &str, pattern: &str) -> Option<DateTime<Utc>> {
    if raw.split_whitespace().count() != pattern.split_whitespace().count() {
        return None;
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, pattern) {
        return Some(datetime.and_utc());
    }
    NaiveDate::parse_from_str(raw, pattern)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}
