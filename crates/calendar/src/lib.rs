//! # hwmid-calendar
//!
//! Pure date arithmetic for the proleptic Gregorian calendar, keyed by
//! calendar day labels (day-of-year, 1..=366).
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(year, month, day)"] -->|"Date::new()"| B["Date"]
//!     B -->|".doy()"| C["Doy (1..=366)"]
//!     B -->|".next()"| B
//!     B -->|"date_sequence()"| D["Vec of Date"]
//!     C -->|"CalendarWindow::new()"| E["circular window of labels"]
//!     B -->|"DateRange::new()"| F["inclusive reference period"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use hwmid_calendar::{CalendarWindow, Date, DateRange, Doy, date_sequence};
//!
//! let date = Date::new(2000, 12, 31).unwrap();
//! assert_eq!(date.doy().get(), 366);
//!
//! let dates = date_sequence(Date::new(2000, 1, 1).unwrap(), 366);
//! assert_eq!(dates.last(), Some(&date));
//!
//! let window = CalendarWindow::new(Doy::LAST, 31).unwrap();
//! assert!(window.contains(Doy::FIRST));
//!
//! let period = DateRange::years(1981, 2010).unwrap();
//! assert!(period.contains(Date::new(1995, 7, 1).unwrap()));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Calendar day label newtype and month tables |
//! | `date` | Gregorian date with year context |
//! | `range` | Inclusive date ranges |
//! | `sequence` | Date sequence generation |
//! | `window` | Circular windows over calendar day labels |
//! | `error` | Error types |

mod date;
mod doy;
mod error;
mod range;
mod sequence;
mod window;

pub use date::Date;
pub use doy::{Doy, N_LABELS, days_in_month, days_in_year, is_leap_year};
pub use error::CalendarError;
pub use range::DateRange;
pub use sequence::date_sequence;
pub use window::CalendarWindow;
