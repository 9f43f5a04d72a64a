//! Monthly bucketing and date helpers.
//!
//! Expenses and savings are grouped into calendar months by a canonical
//! `YYYY-MM` bucket string. Everything here is pure date arithmetic; the
//! services own the persistence side of bucketing.

use chrono::{Datelike, Local, NaiveDate, Utc};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The current month bucket, e.g. `"2025-08"`, from the system date.
pub fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Today as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Current timestamp as an RFC 3339 string, used for `created_at` /
/// `updated_at` fields.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a `YYYY-MM` bucket into (year, month). `None` when malformed.
pub fn parse_month(bucket: &str) -> Option<(i32, u32)> {
    let (year, month) = bucket.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

pub fn is_valid_month(bucket: &str) -> bool {
    parse_month(bucket).is_some()
}

/// Human label for a month bucket, e.g. `"January 2025"`. Presentation only.
/// Malformed buckets are returned unchanged.
pub fn month_name(bucket: &str) -> String {
    match parse_month(bucket) {
        Some((year, month)) => format!("{} {}", MONTH_NAMES[(month - 1) as usize], year),
        None => bucket.to_string(),
    }
}

/// The bucket immediately before the given one, e.g. `"2025-01"` → `"2024-12"`.
pub fn previous_month(bucket: &str) -> Option<String> {
    let (year, month) = parse_month(bucket)?;
    let (year, month) = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    Some(format!("{year:04}-{month:02}"))
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Due date (`YYYY-MM-DD`) for a charge day within a month bucket.
///
/// Charge days beyond the month's end are clamped to its last day, so a
/// template charging on the 31st lands on Feb 28 (or 29).
pub fn due_date_for(bucket: &str, charge_day: u32) -> Option<String> {
    let (year, month) = parse_month(bucket)?;
    let day = charge_day.clamp(1, days_in_month(year, month));
    Some(format!("{bucket}-{day:02}"))
}
