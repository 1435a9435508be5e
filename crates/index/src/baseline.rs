//! Magnitude normalization scale from reference-period annual maxima.

use std::collections::BTreeMap;

use hwmid_calendar::DateRange;
use hwmid_stats::{max_skip_missing, quantiles_skip_missing};
use tracing::{debug, info, warn};

use crate::error::HwmidError;
use crate::series::DailySeries;

/// Lower percentile of the annual-maxima distribution.
const LOW_PERCENTILE: f64 = 0.25;
/// Upper percentile of the annual-maxima distribution.
const HIGH_PERCENTILE: f64 = 0.75;

/// Maximum defined value of each calendar year within `ref_period`.
///
/// Years whose reference observations are all missing map to `None`.
pub fn annual_maxima(series: &DailySeries, ref_period: DateRange) -> BTreeMap<i32, Option<f64>> {
    series.group_reduce(
        Some(ref_period),
        |d| d.year(),
        |vals| max_skip_missing(vals.iter().copied()),
    )
}

/// The `(low, high)` pair used to normalize daily magnitudes.
///
/// `low` and `high` are the 25th and 75th percentiles of the reference
/// period's annual maxima.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineScale {
    low: f64,
    high: f64,
}

impl BaselineScale {
    /// Creates a scale from explicit bounds.
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Computes the scale from the annual maxima of `series` within `ref_period`.
    ///
    /// Every year intersecting the period contributes its maximum; years
    /// without a defined value are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`HwmidError::InsufficientBaseline`] if no year in the period
    /// has a defined observation.
    #[tracing::instrument(skip(series), fields(n = series.len()))]
    pub fn from_reference(series: &DailySeries, ref_period: DateRange) -> Result<Self, HwmidError> {
        let maxima = annual_maxima(series, ref_period);
        debug!(n_years = maxima.len(), "annual maxima computed");

        let qs = quantiles_skip_missing(
            maxima.values().copied(),
            &[LOW_PERCENTILE, HIGH_PERCENTILE],
        )
        .ok_or_else(|| HwmidError::InsufficientBaseline {
            ref_period: ref_period.to_string(),
        })?;
        let (low, high) = (qs[0], qs[1]);

        let scale = Self::new(low, high);
        if scale.is_degenerate() {
            warn!(low, high, "degenerate baseline: magnitudes above low are undefined");
        }
        info!(low, high, "baseline scale computed");
        Ok(scale)
    }

    /// Returns the 25th percentile of the annual maxima.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Returns the 75th percentile of the annual maxima.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns `high - low`.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns `true` when the scale has no width, so normalization is undefined.
    pub fn is_degenerate(&self) -> bool {
        self.range() <= 0.0
    }
}
