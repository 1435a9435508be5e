//! Configuration for HWMId computation.

use std::fmt;
use std::str::FromStr;

use hwmid_calendar::DateRange;

use crate::error::HwmidError;

/// How daily magnitudes are reduced to one value per calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationPolicy {
    /// Sum of all daily magnitudes in the year.
    #[default]
    Sum,
    /// Largest running cumulative magnitude reached within any single
    /// heatwave during the year.
    MaxOfCumulative,
}

impl AggregationPolicy {
    /// Returns the configuration name of the policy.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationPolicy::Sum => "sum",
            AggregationPolicy::MaxOfCumulative => "max_of_cumulative",
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AggregationPolicy::Sum),
            "max_of_cumulative" | "max-of-cumulative" => Ok(AggregationPolicy::MaxOfCumulative),
            other => Err(format!("unknown aggregation policy: {other:?}")),
        }
    }
}

/// Configuration for the HWMId pipeline.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use hwmid_calendar::DateRange;
/// use hwmid_index::{AggregationPolicy, HwmidConfig};
///
/// let config = HwmidConfig::new()
///     .with_quantile(0.9)
///     .with_win_size(31)
///     .with_n_days(3)
///     .with_ref_period(DateRange::years(1950, 1979).unwrap())
///     .with_aggregation_policy(AggregationPolicy::MaxOfCumulative);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct HwmidConfig {
    quantile: f64,
    win_size: usize,
    n_days: usize,
    ref_period: DateRange,
    aggregation_policy: AggregationPolicy,
    threads: Option<usize>,
}

impl HwmidConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `quantile = 0.90`, `win_size = 31`, `n_days = 3`,
    /// `ref_period = 1981-01-01..=2010-12-31`, `aggregation_policy = Sum`,
    /// threads taken from the global rayon pool.
    pub fn new() -> Self {
        Self {
            quantile: 0.90,
            win_size: 31,
            n_days: 3,
            ref_period: DateRange::years(1981, 2010).expect("1981..=2010 is a valid range"),
            aggregation_policy: AggregationPolicy::Sum,
            threads: None,
        }
    }

    /// Sets the threshold quantile.
    pub fn with_quantile(mut self, quantile: f64) -> Self {
        self.quantile = quantile;
        self
    }

    /// Sets the calendar window width in days.
    pub fn with_win_size(mut self, win_size: usize) -> Self {
        self.win_size = win_size;
        self
    }

    /// Sets the minimum number of consecutive exceedance days.
    pub fn with_n_days(mut self, n_days: usize) -> Self {
        self.n_days = n_days;
        self
    }

    /// Sets the climatological reference period.
    pub fn with_ref_period(mut self, ref_period: DateRange) -> Self {
        self.ref_period = ref_period;
        self
    }

    /// Sets the yearly aggregation policy.
    pub fn with_aggregation_policy(mut self, policy: AggregationPolicy) -> Self {
        self.aggregation_policy = policy;
        self
    }

    /// Sets a dedicated worker-pool size for the threshold table.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    // --- Accessors ---

    /// Returns the threshold quantile.
    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    /// Returns the calendar window width.
    pub fn win_size(&self) -> usize {
        self.win_size
    }

    /// Returns the minimum heatwave duration in days.
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Returns the reference period.
    pub fn ref_period(&self) -> DateRange {
        self.ref_period
    }

    /// Returns the yearly aggregation policy.
    pub fn aggregation_policy(&self) -> AggregationPolicy {
        self.aggregation_policy
    }

    /// Returns the dedicated worker-pool size, if any.
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Validates this configuration.
    ///
    /// Checks that the quantile is finite and in the open interval (0, 1),
    /// and that the window width, minimum duration and thread count are
    /// all at least one. Reference-period coverage is checked against the
    /// series at pipeline entry.
    pub fn validate(&self) -> Result<(), HwmidError> {
        if !self.quantile.is_finite() || self.quantile <= 0.0 || self.quantile >= 1.0 {
            return Err(HwmidError::InvalidQuantile {
                quantile: self.quantile,
            });
        }
        if self.win_size < 1 {
            return Err(HwmidError::InvalidWindow {
                win_size: self.win_size,
            });
        }
        if self.n_days < 1 {
            return Err(HwmidError::InvalidMinDuration {
                n_days: self.n_days,
            });
        }
        if self.threads == Some(0) {
            return Err(HwmidError::InvalidThreads { threads: 0 });
        }
        Ok(())
    }
}

impl Default for HwmidConfig {
    fn default() -> Self {
        Self::new()
    }
}
