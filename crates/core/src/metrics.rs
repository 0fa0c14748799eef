//! Dashboard-metric arithmetic: reporting-period boundaries and pass-rate
//! rounding.

use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};
use serde::Serialize;

use crate::types::Timestamp;

/// Interview dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewDashboardMetrics {
    /// Interviews scheduled within the current week.
    pub this_week_count: i64,
    /// Interviews completed within the current calendar month.
    pub this_month_completed_count: i64,
    /// Interviews passed within the current calendar month.
    pub this_month_passed_count: i64,
    /// `passed / completed * 100`, rounded to two decimals; `0.0` when no
    /// interview completed.
    pub pass_rate: f64,
}

/// Inclusive bounds of the week containing `now`: Monday 00:00:00 through
/// Sunday 23:59:59.
pub fn week_bounds(now: Timestamp) -> (Timestamp, Timestamp) {
    let week = now.date_naive().week(Weekday::Mon);
    let start = week.first_day().and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = week.last_day().and_hms_opt(23, 59, 59).unwrap_or_default();
    (
        Utc.from_utc_datetime(&start),
        Utc.from_utc_datetime(&end),
    )
}

/// Inclusive bounds of the calendar month containing `now`: first day
/// 00:00:00 through last day 23:59:59.
pub fn month_bounds(now: Timestamp) -> (Timestamp, Timestamp) {
    let first = now
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive());
    let next_month = if first.month() == 12 {
        first.with_year(first.year() + 1).and_then(|d| d.with_month(1))
    } else {
        first.with_month(first.month() + 1)
    }
    .unwrap_or(first);
    let start = first.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = next_month.and_hms_opt(0, 0, 0).unwrap_or_default();
    (
        Utc.from_utc_datetime(&start),
        Utc.from_utc_datetime(&end) - Duration::seconds(1),
    )
}

/// Pass rate as a percentage rounded to two decimals.
///
/// Defined as `0.0` when nothing completed, so callers never divide by zero.
pub fn pass_rate(passed: i64, completed: i64) -> f64 {
    if completed <= 0 {
        return 0.0;
    }
    let raw = passed as f64 / completed as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
