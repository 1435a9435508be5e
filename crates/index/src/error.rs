//! Error types for the hwmid-index crate.

use hwmid_calendar::CalendarError;

/// Error type for all fallible operations in the hwmid-index crate.
///
/// Configuration and input-shape problems are fatal and reported before
/// any computation starts. Coverage gaps and per-day task failures are not
/// errors: they surface as undefined threshold entries instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HwmidError {
    /// Returned when the threshold quantile is outside (0, 1).
    #[error("invalid quantile: {quantile} (must be in (0, 1))")]
    InvalidQuantile {
        /// The rejected quantile.
        quantile: f64,
    },

    /// Returned when the calendar window width is zero.
    #[error("invalid window size: {win_size} (must be >= 1)")]
    InvalidWindow {
        /// The rejected window width.
        win_size: usize,
    },

    /// Returned when the minimum heatwave duration is zero.
    #[error("invalid minimum duration: {n_days} days (must be >= 1)")]
    InvalidMinDuration {
        /// The rejected duration.
        n_days: usize,
    },

    /// Returned when a worker-pool size of zero is requested.
    #[error("invalid thread count: {threads} (must be >= 1)")]
    InvalidThreads {
        /// The rejected thread count.
        threads: usize,
    },

    /// Returned when the reference period is not covered by the series.
    #[error("reference period {ref_period} is outside the series coverage {coverage}")]
    RefPeriodOutOfRange {
        /// Formatted reference period.
        ref_period: String,
        /// Formatted series coverage.
        coverage: String,
    },

    /// Returned when input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when array lengths do not match.
    #[error("length mismatch: expected {expected}, got {got} for {field}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
        /// Name of the mismatched field.
        field: String,
    },

    /// Returned when consecutive dates are not exactly one day apart.
    #[error("dates are not contiguous at index {index}: {previous} followed by {current}")]
    NonContiguousDates {
        /// Index of the offending date.
        index: usize,
        /// Formatted preceding date.
        previous: String,
        /// Formatted offending date.
        current: String,
    },

    /// Returned when a defined observation is NaN or infinite.
    #[error("non-finite value at index {index} (use a missing entry instead)")]
    NonFiniteData {
        /// Index of the offending value.
        index: usize,
    },

    /// Returned when the reference period has no defined annual maximum.
    #[error("no defined observations in reference period {ref_period}")]
    InsufficientBaseline {
        /// Formatted reference period.
        ref_period: String,
    },

    /// Returned when the worker pool cannot be constructed.
    #[error("worker pool error: {reason}")]
    Pool {
        /// Description of the failure.
        reason: String,
    },

    /// Wrapped error from the hwmid-calendar crate.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_quantile() {
        let e = HwmidError::InvalidQuantile { quantile: 1.5 };
        assert_eq!(e.to_string(), "invalid quantile: 1.5 (must be in (0, 1))");
    }

    #[test]
    fn error_invalid_window() {
        let e = HwmidError::InvalidWindow { win_size: 0 };
        assert_eq!(e.to_string(), "invalid window size: 0 (must be >= 1)");
    }

    #[test]
    fn error_invalid_min_duration() {
        let e = HwmidError::InvalidMinDuration { n_days: 0 };
        assert_eq!(
            e.to_string(),
            "invalid minimum duration: 0 days (must be >= 1)"
        );
    }

    #[test]
    fn error_ref_period_out_of_range() {
        let e = HwmidError::RefPeriodOutOfRange {
            ref_period: "1981-01-01..=2010-12-31".to_string(),
            coverage: "1990-01-01..=2020-12-31".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "reference period 1981-01-01..=2010-12-31 is outside the series coverage \
             1990-01-01..=2020-12-31"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let e = HwmidError::LengthMismatch {
            expected: 366,
            got: 365,
            field: "threshold".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "length mismatch: expected 366, got 365 for threshold"
        );
    }

    #[test]
    fn error_non_contiguous() {
        let e = HwmidError::NonContiguousDates {
            index: 3,
            previous: "2000-01-03".to_string(),
            current: "2000-01-05".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "dates are not contiguous at index 3: 2000-01-03 followed by 2000-01-05"
        );
    }

    #[test]
    fn error_from_calendar() {
        let e: HwmidError = CalendarError::InvalidDoy { doy: 0 }.into();
        assert_eq!(e.to_string(), "invalid day of year: 0 (must be 1..=366)");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<HwmidError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<HwmidError>();
    }
}
