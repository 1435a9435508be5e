//! Gregorian date with year context.

use crate::doy::{Doy, days_in_month, days_in_year};
use crate::error::CalendarError;

/// A date in the proleptic Gregorian calendar.
///
/// The calendar day label is cached at construction, so grouping a long
/// series by day-of-year never recomputes month offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
    doy: u16,
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.doy).cmp(&(other.year, other.doy))
    }
}

impl Date {
    /// Creates a new `Date` from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month or day is invalid for `year`.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        let doy = Doy::from_month_day(year, month, day)?;
        Ok(Self {
            year,
            month,
            day,
            doy: doy.get(),
        })
    }

    /// Creates a `Date` from a year and a calendar day label.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NotLeapYear`] if `doy` is 366 and `year`
    /// is a common year.
    pub fn from_year_doy(year: i32, doy: Doy) -> Result<Self, CalendarError> {
        let (month, day) = doy.month_day(year)?;
        Ok(Self {
            year,
            month,
            day,
            doy: doy.get(),
        })
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month (1..=31).
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the calendar day label of this date.
    pub fn doy(self) -> Doy {
        // Date always holds a label in 1..=366, guaranteed by the constructors.
        Doy::new(self.doy).expect("Date always holds a valid doy")
    }

    /// Returns `(month, day)` as a tuple.
    pub fn month_day(self) -> (u8, u8) {
        (self.month, self.day)
    }

    /// Returns the next date, rolling over month and year boundaries.
    pub fn next(self) -> Self {
        let month_len = days_in_month(self.year, self.month).unwrap_or(31);
        if self.day < month_len {
            Self {
                day: self.day + 1,
                doy: self.doy + 1,
                ..self
            }
        } else if self.month < 12 {
            Self {
                month: self.month + 1,
                day: 1,
                doy: self.doy + 1,
                ..self
            }
        } else {
            Self {
                year: self.year + 1,
                month: 1,
                day: 1,
                doy: 1,
            }
        }
    }

    /// Number of days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(self, other: Date) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Days elapsed since 0000-01-01 in the proleptic Gregorian calendar.
    fn ordinal(self) -> i64 {
        let y = i64::from(self.year) - 1;
        let before = if self.year > 0 {
            365 * (y + 1) + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + 1
        } else {
            let mut total = 0_i64;
            let mut yr = self.year;
            while yr < 0 {
                total -= i64::from(days_in_year(yr));
                yr += 1;
            }
            total
        };
        before + i64::from(self.doy) - 1
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
