//! Derived metrics: days in service and distance per day
//!
//! These are recomputed from the raw stored columns every time a table is
//! read. Nothing here trusts a previously written derived column.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::value::parse_date;

/// Metrics derived from a single row.
///
/// `None` is the "unparsable" sentinel: the raw fields didn't allow the
/// computation. It is never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Derived {
    /// Whole days between entry and exit (or today for an open record)
    pub days: Option<i64>,
    /// Distance per day, two decimals
    pub rate: Option<f64>,
}

impl Derived {
    #[must_use]
    pub fn days_only(days: Option<i64>) -> Self {
        Self { days, rate: None }
    }
}

/// Today's date on the local clock.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Days between `entry` and `exit`, substituting today for an absent exit.
///
/// See [`days_between_at`].
#[must_use]
pub fn days_between(entry: &str, exit: Option<&str>) -> Option<i64> {
    days_between_at(entry, exit, today())
}

/// Days between `entry` and `exit` with an explicit reference date.
///
/// An absent (or blank) `exit` means the record is still open and `today`
/// stands in for it. Returns `None` if either date fails to parse. The
/// result is negative when the exit precedes the entry.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use plantlog::derived::days_between_at;
///
/// let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// assert_eq!(days_between_at("2024-01-01", Some("2024-01-10"), today), Some(9));
/// assert_eq!(days_between_at("2024-01-01", None, today), Some(31));
/// assert_eq!(days_between_at("soon", None, today), None);
/// ```
#[must_use]
pub fn days_between_at(entry: &str, exit: Option<&str>, today: NaiveDate) -> Option<i64> {
    let entry = parse_date(entry)?;
    let exit = match exit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => parse_date(text)?,
        None => today,
    };
    Some((exit - entry).num_days())
}

/// Distance per day rounded to two decimals.
///
/// Only defined when both inputs are present and `days > 0`.
#[must_use]
pub fn rate_per_day(distance: Option<f64>, days: Option<i64>) -> Option<f64> {
    match (distance, days) {
        (Some(distance), Some(days)) if days > 0 => Some(round2(distance / days as f64)),
        _ => None,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between_closed_interval() {
        let today = day(2030, 1, 1);
        assert_eq!(
            days_between_at("2024-01-01", Some("2024-01-10"), today),
            Some(9)
        );
        assert_eq!(
            days_between_at("2024-01-10", Some("2024-01-10"), today),
            Some(0)
        );
    }

    #[test]
    fn test_days_between_open_uses_today() {
        let today = day(2024, 1, 15);
        assert_eq!(days_between_at("2024-01-10", None, today), Some(5));
        assert_eq!(days_between_at("2024-01-10", Some("  "), today), Some(5));
    }

    #[test]
    fn test_days_between_unparsable_is_sentinel() {
        let today = day(2024, 1, 15);
        assert_eq!(days_between_at("", None, today), None);
        assert_eq!(days_between_at("2024-01-10", Some("later"), today), None);
    }

    #[test]
    fn test_rate_per_day() {
        assert_eq!(rate_per_day(Some(100.0), Some(4)), Some(25.0));
        assert_eq!(rate_per_day(Some(100.0), Some(3)), Some(33.33));
        assert_eq!(rate_per_day(Some(100.0), Some(0)), None);
        assert_eq!(rate_per_day(Some(100.0), Some(-2)), None);
        assert_eq!(rate_per_day(None, Some(4)), None);
        assert_eq!(rate_per_day(Some(100.0), None), None);
    }

    #[test]
    fn test_rate_is_idempotent() {
        let first = rate_per_day(Some(1234.5), Some(7));
        let second = rate_per_day(Some(1234.5), Some(7));
        assert_eq!(first, second);
    }
}
