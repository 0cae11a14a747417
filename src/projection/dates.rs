//! Parsing of the loosely formatted dates and times the API sends.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

/// Strict day formats tried before the loose fallback, in order.
const DAY_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Date-time layouts accepted by the loose fallback.
const DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
];

/// Day-only layouts accepted by the loose fallback.
const LOOSE_DAY_FORMATS: [&str; 3] = ["%Y/%m/%d", "%d.%m.%Y", "%Y%m%d"];

const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%H:%M:%S%.f", "%H.%M"];

/// Regex matching a leading `YYYY-MM-DD` followed by anything.
#[allow(clippy::expect_used)]
static RE_LEADING_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid regex: RE_LEADING_ISO")
});

/// Regex matching a leading `DD-MM-YYYY`, `DD/MM/YYYY` or `DD.MM.YYYY`.
#[allow(clippy::expect_used)]
static RE_LEADING_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})\b").expect("valid regex: RE_LEADING_DMY")
});

/// Parse a date field.
///
/// Tries `YYYY-MM-DD`, `DD-MM-YYYY`, `DD/MM/YYYY`, then a loose fallback
/// (RFC 3339/2822, common date-time layouts, a leading date followed by
/// other text). Day-only values resolve to midnight.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DAY_FORMATS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|day| day.and_time(NaiveTime::MIN))
        .or_else(|| parse_loose(raw))
}

fn parse_loose(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATE_TIME_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok()) {
        return Some(dt);
    }
    if let Some(day) = LOOSE_DAY_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok()) {
        return Some(day.and_time(NaiveTime::MIN));
    }
    leading_date(raw).map(|day| day.and_time(NaiveTime::MIN))
}

fn leading_date(raw: &str) -> Option<NaiveDate> {
    if let Some(caps) = RE_LEADING_ISO.captures(raw) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let caps = RE_LEADING_DMY.captures(raw)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let year = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a start time such as `10:00`, `10:00:00` or `10.00`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS.iter().find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

/// Combine a date and a start time into one instant.
///
/// An empty time means midnight; a time that does not parse makes the
/// whole instant unknown.
#[must_use]
pub fn parse_date_time(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let day = parse_date(date?)?;
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        None => Some(day),
        Some(t) => parse_time(t).map(|time| day.date().and_time(time)),
    }
}
