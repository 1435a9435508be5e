//! Date sequence generation.

use crate::date::Date;

/// Generates a contiguous sequence of Gregorian dates.
///
/// Starting from `start`, produces exactly `n_days` consecutive dates by
/// repeatedly advancing to the next day. Month, leap-day and year
/// boundaries are handled by [`Date::next`].
///
/// # Example
///
/// ```
/// use hwmid_calendar::{Date, date_sequence};
///
/// let start = Date::new(2000, 2, 28).unwrap();
/// let dates = date_sequence(start, 3);
/// assert_eq!(dates[1], Date::new(2000, 2, 29).unwrap());
/// assert_eq!(dates[2], Date::new(2000, 3, 1).unwrap());
/// ```
pub fn date_sequence(start: Date, n_days: usize) -> Vec<Date> {
    let mut dates = Vec::with_capacity(n_days);
    if n_days == 0 {
        return dates;
    }
    dates.push(start);
    let mut current = start;
    for _ in 1..n_days {
        current = current.next();
        dates.push(current);
    }
    dates
}
