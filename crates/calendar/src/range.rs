//! Inclusive date ranges.

use crate::date::Date;
use crate::error::CalendarError;

/// An inclusive range of dates, e.g. a climatological reference period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering January 1 of `start_year` through
    /// December 31 of `end_year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] if `start_year > end_year`.
    ///
    /// # Example
    ///
    /// ```
    /// use hwmid_calendar::{Date, DateRange};
    ///
    /// let period = DateRange::years(1981, 2010).unwrap();
    /// assert!(period.contains(Date::new(1995, 7, 1).unwrap()));
    /// assert!(!period.contains(Date::new(2011, 1, 1).unwrap()));
    /// ```
    pub fn years(start_year: i32, end_year: i32) -> Result<Self, CalendarError> {
        Self::new(Date::new(start_year, 1, 1)?, Date::new(end_year, 12, 31)?)
    }

    /// Returns the first date of the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last date of the range.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns `true` if `date` lies within the range (inclusive).
    #[inline]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` if `other` lies entirely within this range.
    pub fn covers(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of days in the range.
    pub fn n_days(&self) -> usize {
        (self.start.days_until(self.end) + 1) as usize
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_rejected() {
        let a = Date::new(2010, 1, 1).unwrap();
        let b = Date::new(1981, 1, 1).unwrap();
        assert!(matches!(
            DateRange::new(a, b),
            Err(CalendarError::InvalidRange { .. })
        ));
    }

    #[test]
    fn single_day_range() {
        let d = Date::new(2000, 2, 29).unwrap();
        let r = DateRange::new(d, d).unwrap();
        assert!(r.contains(d));
        assert_eq!(r.n_days(), 1);
    }

    #[test]
    fn years_bounds_inclusive() {
        let r = DateRange::years(1981, 2010).unwrap();
        assert!(r.contains(Date::new(1981, 1, 1).unwrap()));
        assert!(r.contains(Date::new(2010, 12, 31).unwrap()));
        assert!(!r.contains(Date::new(1980, 12, 31).unwrap()));
        assert_eq!(r.n_days(), 30 * 365 + 7);
    }

    #[test]
    fn covers() {
        let outer = DateRange::years(1950, 2020).unwrap();
        let inner = DateRange::years(1981, 2010).unwrap();
        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));
    }

    #[test]
    fn display() {
        let r = DateRange::years(1950, 1979).unwrap();
        assert_eq!(r.to_string(), "1950-01-01..=1979-12-31");
    }
}
