//! Calendar helpers that never pass through a timezone.
//!
//! Dates arrive from forms and imports as `YYYY-MM-DD`, sometimes with a time
//! component attached. They are decomposed into integer parts and rebuilt as
//! [`NaiveDate`] values so a UTC offset can never shift the day.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::LedgerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `YYYY-MM-DD`, discarding any trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|ch: char| ch == 'T' || ch == ' ')
        .next()
        .unwrap_or(trimmed);
    let mut parts = date_part.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Same as [`parse_date`] but reports the rejected input.
pub fn parse_date_strict(raw: &str) -> Result<NaiveDate, LedgerError> {
    parse_date(raw).ok_or_else(|| LedgerError::InvalidDate(raw.trim().to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first + Duration::days(days_in_month(first.year(), first.month()) as i64 - 1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(first_next)) => (first_next - first).num_days() as u32,
        _ => 28,
    }
}

/// Moves a first-of-month anchor forward by one month.
fn next_month(anchor: NaiveDate) -> NaiveDate {
    anchor + Duration::days(days_in_month(anchor.year(), anchor.month()) as i64)
}

/// First-of-month anchors for every calendar month the inclusive range touches.
///
/// Partial months at both ends are included. A reversed range yields nothing.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    if end < start {
        return months;
    }
    let last = first_of_month(end);
    let mut current = first_of_month(start);
    while current <= last {
        months.push(current);
        current = next_month(current);
    }
    months
}
