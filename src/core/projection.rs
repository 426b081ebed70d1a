//! Forward fill of a monthly series past its last published month.

use crate::core::series::MonthlyObservation;
use chrono::{Datelike, Months, NaiveDate};

/// Number of trailing months averaged to project unpublished months.
pub const TRAILING_WINDOW: usize = 12;

/// Mean monthly rate over the last [`TRAILING_WINDOW`] observations, or over
/// all of them when there are fewer. Zero for an empty slice.
pub fn average_rate(observations: &[MonthlyObservation]) -> f64 {
    let window = &observations[observations.len().saturating_sub(TRAILING_WINDOW)..];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|obs| obs.monthly_rate).sum::<f64>() / window.len() as f64
}

fn month_key(date: &NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// One projected observation per calendar month after `last_known`, up to and
/// including the month of `target_end`, all at `rate`.
///
/// Each date is `last_known` shifted by whole months, so the day of month is
/// kept and clamped to the month's length when it overflows.
pub fn project_forward(
    last_known: NaiveDate,
    target_end: NaiveDate,
    rate: f64,
) -> Vec<MonthlyObservation> {
    let target = month_key(&target_end);
    (1..)
        .map_while(|offset| last_known.checked_add_months(Months::new(offset)))
        .take_while(|date| month_key(date) <= target)
        .map(|date| MonthlyObservation::projected(date, rate))
        .collect()
}
