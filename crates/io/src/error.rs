//! Error types for hwmid-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the hwmid-io crate.
///
/// Covers file-system failures, CSV parsing problems, date and value
/// conversion issues, and series-construction errors raised while turning
/// rows into a [`hwmid_index::DailySeries`].
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the CSV reader or writer.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Returned when a required column is not present in the header.
    #[error("column '{name}' not found in {source_name}")]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Input that was inspected.
        source_name: String,
    },

    /// Returned when a date cell cannot be parsed.
    #[error("invalid date '{value}' on line {line}: {reason}")]
    InvalidDate {
        /// One-based line number in the input.
        line: u64,
        /// Offending cell content.
        value: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a value cell is neither a number nor a missing marker.
    #[error("invalid value '{value}' on line {line}")]
    InvalidValue {
        /// One-based line number in the input.
        line: u64,
        /// Offending cell content.
        value: String,
    },

    /// Returned when dates are repeated or out of order.
    #[error("dates not strictly increasing on line {line}: {previous} then {current}")]
    UnorderedDates {
        /// One-based line number in the input.
        line: u64,
        /// Formatted previous date.
        previous: String,
        /// Formatted offending date.
        current: String,
    },

    /// Wraps an error originating from the hwmid-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Wraps an error raised while building the daily series.
    #[error("series error: {reason}")]
    Series {
        /// Description of the underlying series failure.
        reason: String,
    },

    /// Returned when the report cannot be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// Wraps a file-system error.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<hwmid_calendar::CalendarError> for IoError {
    fn from(e: hwmid_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl From<hwmid_index::HwmidError> for IoError {
    fn from(e: hwmid_index::HwmidError) -> Self {
        IoError::Series {
            reason: e.to_string(),
        }
    }
}
