//! Rounding and budget/impression derivation helpers.
//!
//! Every function here is total: non-finite or otherwise unusable input
//! degrades to zero instead of producing an error, so half-typed form values
//! never interrupt an edit.

use chrono::NaiveDate;

/// Multiplier applied to a programmatic flight budget to reserve ad-serving overage.
pub const TRAFFIC_BUFFER: f64 = 1.01;

/// Rounds to two decimal places; non-finite or zero input yields `0.0`.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Rounds to the nearest whole number; non-finite input yields `0`.
pub fn round_to_integer(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round() as i64
}

/// Rounds to a non-negative whole count, used for impressions and views.
pub fn round_to_count(value: f64) -> u64 {
    round_to_integer(value).max(0) as u64
}

/// Parses a user-typed number such as `"1,250.50"` or `"$24.00"`.
///
/// Blank or malformed input yields `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// `floor(budget / rate * 1000)`, or `0` when the rate is not positive.
pub fn impressions_from_budget(budget: f64, rate: f64) -> u64 {
    if !rate.is_finite() || rate <= 0.0 || !budget.is_finite() {
        return 0;
    }
    let impressions = (budget / rate * 1000.0).floor();
    if impressions <= 0.0 {
        0
    } else {
        impressions as u64
    }
}

/// `round_to_cents(impressions * rate / 1000)`, or `0.0` when the rate is not positive.
pub fn budget_from_impressions(impressions: u64, rate: f64) -> f64 {
    if !rate.is_finite() || rate <= 0.0 {
        return 0.0;
    }
    round_to_cents(impressions as f64 * rate / 1000.0)
}

/// Budget reserved for traffic on a programmatic flight.
pub fn traffic_budget(budget: f64) -> f64 {
    round_to_cents(budget * TRAFFIC_BUFFER)
}

/// Inclusive day count between two calendar dates.
pub fn active_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Sums a budget column and rounds the result to cents.
pub fn sum_cents<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    round_to_cents(values.into_iter().sum())
}
