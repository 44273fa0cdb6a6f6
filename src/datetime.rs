//! Date normalization into the single reference timezone.
//!
//! Source markup is uncontrolled, so unparsable dates normalize to `None`
//! rather than erroring; the time-window filter then excludes them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// All parsing and rendering happens in this zone.
pub const REFERENCE_TZ: Tz = chrono_tz::America::Denver;

/// Resolve a naive local time in the reference timezone. Ambiguous wall
/// times around DST transitions take the earlier interpretation.
pub fn local(naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    REFERENCE_TZ.from_local_datetime(&naive).earliest()
}

/// Current instant in the reference timezone.
pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&REFERENCE_TZ)
}

/// Normalize a raw date string into a canonical instant.
///
/// Attempts, in order: ISO 8601 (offset, bare date-time or bare date),
/// RFC 2822 (with or without a zone suffix), then a bare "month day"
/// pattern anchored to the current year. The first hit wins; anything else
/// is `None`.
pub fn normalize(input: &str) -> Option<DateTime<Tz>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    parse_iso(input)
        .or_else(|| parse_rfc2822(input))
        .or_else(|| parse_month_day(input, now().year()))
}

fn parse_iso(input: &str) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&REFERENCE_TZ));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return local(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return local(date.and_hms_opt(0, 0, 0)?);
    }
    None
}

fn parse_rfc2822(input: &str) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&REFERENCE_TZ));
    }
    // Legacy feeds commonly omit the zone; read those as local times.
    NaiveDateTime::parse_from_str(input, "%a, %d %b %Y %H:%M:%S")
        .ok()
        .and_then(local)
}

fn parse_month_day(input: &str, year: i32) -> Option<DateTime<Tz>> {
    let padded = format!("{input} {year}");
    let date = NaiveDate::parse_from_str(&padded, "%B %d %Y").ok()?;
    local(date.and_hms_opt(0, 0, 0)?)
}

/// Midnight at the start of the given instant's calendar day.
pub fn start_of_day(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(local)
        .unwrap_or(dt)
}

/// The last second of the given instant's calendar day.
pub fn end_of_day(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.date_naive()
        .and_hms_opt(23, 59, 59)
        .and_then(local)
        .unwrap_or(dt)
}

/// Day-group label for rendering, e.g. "Saturday, Jul 12".
pub fn day_label(dt: DateTime<Tz>) -> String {
    dt.format("%A, %b %-d").to_string()
}

/// Re-parse a day label back into a date for header ordering. The weekday
/// in the label pins the year when the window straddles a year boundary.
pub fn parse_day_label(label: &str, anchor_year: i32) -> Option<NaiveDate> {
    for year in [anchor_year, anchor_year + 1, anchor_year - 1] {
        let padded = format!("{label} {year}");
        if let Ok(date) = NaiveDate::parse_from_str(&padded, "%A, %b %d %Y") {
            return Some(date);
        }
    }
    None
}
