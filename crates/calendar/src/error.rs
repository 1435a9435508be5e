//! Error types for the hwmid-calendar crate.

/// Error type for all fallible operations in the hwmid-calendar crate.
///
/// This enum covers validation failures for day-of-year labels, month
/// numbers, day-within-month values, date ranges and window widths in the
/// proleptic Gregorian calendar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a day-of-year value is outside the valid range 1..=366.
    #[error("invalid day of year: {doy} (must be 1..=366)")]
    InvalidDoy {
        /// The invalid day-of-year value that was provided.
        doy: u16,
    },

    /// Returned when day 366 is requested in a year without a leap day.
    #[error("day of year 366 does not exist in non-leap year {year}")]
    NotLeapYear {
        /// The common year that was provided.
        year: i32,
    },

    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month and year.
        max_day: u8,
    },

    /// Returned when a date range ends before it starts.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Formatted start date.
        start: String,
        /// Formatted end date.
        end: String,
    },

    /// Returned when a calendar window width is zero.
    #[error("invalid window size: {win_size} (must be >= 1)")]
    InvalidWindow {
        /// The rejected window width.
        win_size: usize,
    },
}
