//! Calendar day label (day-of-year) newtype and Gregorian month tables.

use crate::error::CalendarError;

/// Number of distinct calendar day labels (366, including the leap day slot).
pub const N_LABELS: usize = 366;

/// Calendar day label: day-of-year in the Gregorian calendar (1..=366).
///
/// Label 366 only occurs on December 31 of leap years, but the label space
/// always spans the full range so that per-label tables have a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Doy(u16);

/// Number of days in each month of a common year (index 0 unused).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Day-of-year on which each month starts in a common year (index 0 unused).
pub(crate) const MONTH_START_DOY: [u16; 13] =
    [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Day-of-year on which each month starts in a leap year (index 0 unused).
pub(crate) const MONTH_START_DOY_LEAP: [u16; 13] =
    [0, 1, 32, 61, 92, 122, 153, 183, 214, 245, 275, 306, 336];

/// Returns `true` if `year` is a leap year in the proleptic Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in `year` (365 or 366).
pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Returns the number of days in `month` of `year`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
pub fn days_in_month(year: i32, month: u8) -> Result<u8, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth { month });
    }
    if month == 2 && is_leap_year(year) {
        Ok(29)
    } else {
        Ok(DAYS_PER_MONTH[month as usize])
    }
}

fn month_starts(leap: bool) -> &'static [u16; 13] {
    if leap {
        &MONTH_START_DOY_LEAP
    } else {
        &MONTH_START_DOY
    }
}

impl Doy {
    /// First label (January 1).
    pub const FIRST: Doy = Doy(1);

    /// Last label (December 31 of a leap year).
    pub const LAST: Doy = Doy(366);

    /// Creates a new `Doy` from a day-of-year value.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoy`] if `doy` is not in 1..=366.
    pub fn new(doy: u16) -> Result<Self, CalendarError> {
        if !(1..=366).contains(&doy) {
            return Err(CalendarError::InvalidDoy { doy });
        }
        Ok(Self(doy))
    }

    /// Creates a new `Doy` from a (month, day) pair within `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    /// Returns [`CalendarError::InvalidDay`] if `day` is not valid for the
    /// given month of `year`.
    pub fn from_month_day(year: i32, month: u8, day: u8) -> Result<Self, CalendarError> {
        let max_day = days_in_month(year, month)?;
        if !(1..=max_day).contains(&day) {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        let start = month_starts(is_leap_year(year))[month as usize];
        Ok(Self(start + day as u16 - 1))
    }

    /// Iterates over every label 1..=366 in ascending order.
    pub fn all() -> impl Iterator<Item = Doy> {
        (1..=366u16).map(Doy)
    }

    /// Returns the inner day-of-year value (1..=366).
    pub fn get(self) -> u16 {
        self.0
    }

    /// Returns the 0-based index suitable for array indexing (0..=365).
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the `(month, day)` pair for this label within `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NotLeapYear`] for label 366 in a common year.
    pub fn month_day(self, year: i32) -> Result<(u8, u8), CalendarError> {
        let leap = is_leap_year(year);
        if self.0 == 366 && !leap {
            return Err(CalendarError::NotLeapYear { year });
        }
        let starts = month_starts(leap);
        let month = (1..=12u8)
            .rev()
            .find(|&m| starts[m as usize] <= self.0)
            .unwrap_or(1);
        let day = (self.0 - starts[month as usize] + 1) as u8;
        Ok((month, day))
    }
}

impl std::fmt::Display for Doy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
