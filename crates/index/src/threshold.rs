//! Calendar-day threshold estimation.
//!
//! For each calendar day label, the threshold is a quantile of all
//! reference-period observations whose label falls in a circular window
//! around that day. The 366 estimations are independent and are fanned out
//! through a [`DayDispatcher`].

use std::collections::BTreeMap;

use hwmid_calendar::{CalendarWindow, DateRange, Doy, N_LABELS};
use hwmid_stats::quantile_skip_missing;
use tracing::{debug, info, warn};

use crate::dispatch::DayDispatcher;
use crate::error::HwmidError;
use crate::series::DailySeries;

/// Estimates the threshold for a single calendar day.
///
/// Restricts `series` to `ref_period`, then to dates whose label lies in the
/// window of `win_size` labels around `day`, and takes the type-7 quantile
/// `quantile` of the defined values in that sample. Missing values are
/// excluded, not zero-filled.
///
/// Returns `Ok(None)` when the windowed reference sample holds no defined
/// value; this is an expected coverage gap, not an error.
///
/// # Errors
///
/// Returns [`HwmidError::Calendar`] if `win_size` is zero.
pub fn estimate_threshold(
    series: &DailySeries,
    day: Doy,
    win_size: usize,
    quantile: f64,
    ref_period: DateRange,
) -> Result<Option<f64>, HwmidError> {
    let window = CalendarWindow::new(day, win_size)?;
    let sample = series
        .select(|d| ref_period.contains(d) && window.contains(d.doy()))
        .map(|(_, v)| v);
    Ok(quantile_skip_missing(sample, quantile))
}

/// Threshold value for every calendar day label 1..=366.
///
/// An entry is `None` when its window had no defined reference observation
/// or when its estimation failed; failures keep their reason in
/// [`ThresholdCurve::failures`].
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCurve {
    values: Vec<Option<f64>>,
    failures: BTreeMap<Doy, String>,
}

impl ThresholdCurve {
    /// Builds the full curve by estimating every label through `dispatcher`.
    ///
    /// One label's failure never aborts the others; the failed entry is left
    /// undefined and its reason recorded.
    ///
    /// # Errors
    ///
    /// - [`HwmidError::InvalidWindow`] if `win_size` is zero.
    /// - [`HwmidError::InvalidQuantile`] if `quantile` is outside (0, 1).
    /// - [`HwmidError::RefPeriodOutOfRange`] if `ref_period` is not inside
    ///   the series coverage.
    #[tracing::instrument(skip(series, dispatcher), fields(n = series.len()))]
    pub fn build<D: DayDispatcher>(
        series: &DailySeries,
        win_size: usize,
        quantile: f64,
        ref_period: DateRange,
        dispatcher: &D,
    ) -> Result<Self, HwmidError> {
        if win_size < 1 {
            return Err(HwmidError::InvalidWindow { win_size });
        }
        if !quantile.is_finite() || quantile <= 0.0 || quantile >= 1.0 {
            return Err(HwmidError::InvalidQuantile { quantile });
        }
        series.check_ref_period(ref_period)?;

        let outcomes = dispatcher
            .dispatch(|day| estimate_threshold(series, day, win_size, quantile, ref_period));

        let mut values = Vec::with_capacity(N_LABELS);
        let mut failures = BTreeMap::new();
        for (doy, outcome) in Doy::all().zip(outcomes) {
            match outcome {
                Ok(Ok(value)) => values.push(value),
                Ok(Err(e)) => {
                    failures.insert(doy, e.to_string());
                    values.push(None);
                }
                Err(failure) => {
                    failures.insert(doy, failure.reason);
                    values.push(None);
                }
            }
        }

        let curve = Self { values, failures };
        for (doy, reason) in &curve.failures {
            warn!(doy = doy.get(), %reason, "threshold estimation failed");
        }
        let n_undefined = curve.n_undefined();
        if n_undefined > 0 {
            warn!(
                n_undefined,
                "threshold undefined for some calendar days (no reference data in window)"
            );
        }
        info!(n_undefined, "threshold curve built");
        debug!(first = ?curve.get(Doy::FIRST), last = ?curve.get(Doy::LAST), "curve endpoints");
        Ok(curve)
    }

    /// Wraps precomputed per-label values (entry `i` is label `i + 1`).
    ///
    /// # Errors
    ///
    /// Returns [`HwmidError::LengthMismatch`] unless exactly 366 values are given.
    pub fn from_values(values: Vec<Option<f64>>) -> Result<Self, HwmidError> {
        if values.len() != N_LABELS {
            return Err(HwmidError::LengthMismatch {
                expected: N_LABELS,
                got: values.len(),
                field: "threshold".to_string(),
            });
        }
        Ok(Self {
            values,
            failures: BTreeMap::new(),
        })
    }

    /// Returns the threshold for `doy`, or `None` if undefined.
    #[inline]
    pub fn get(&self, doy: Doy) -> Option<f64> {
        self.values[doy.index()]
    }

    /// Returns all 366 entries (index 0 = label 1).
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterates over `(label, threshold)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (Doy, Option<f64>)> + '_ {
        Doy::all().zip(self.values.iter().copied())
    }

    /// Number of undefined entries.
    pub fn n_undefined(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Labels whose estimation failed, with the failure reason.
    pub fn failures(&self) -> &BTreeMap<Doy, String> {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SequentialDispatcher;
    use approx::assert_relative_eq;
    use hwmid_calendar::Date;

    /// Two common years where every day's value equals its label.
    fn label_series() -> DailySeries {
        let start = Date::new(2001, 1, 1).unwrap();
        let values = (0..730).map(|i| Some((i % 365 + 1) as f64)).collect();
        DailySeries::from_start(start, values).unwrap()
    }

    fn doy(d: u16) -> Doy {
        Doy::new(d).unwrap()
    }

    #[test]
    fn estimate_uses_window_and_quantile() {
        let s = label_series();
        let period = s.coverage();
        // Window of 5 around label 100: values 98..=102, twice.
        let median = estimate_threshold(&s, doy(100), 5, 0.5, period).unwrap().unwrap();
        assert_relative_eq!(median, 100.0, epsilon = 1e-10);
        let low = estimate_threshold(&s, doy(100), 5, 0.01, period).unwrap().unwrap();
        assert!(low >= 98.0 && low < 98.5);
    }

    #[test]
    fn estimate_restricted_to_ref_period() {
        let start = Date::new(2001, 1, 1).unwrap();
        let values = (0..730)
            .map(|i| Some(if i < 365 { 10.0 } else { 50.0 }))
            .collect();
        let s = DailySeries::from_start(start, values).unwrap();
        let first_year = DateRange::years(2001, 2001).unwrap();
        let t = estimate_threshold(&s, doy(200), 31, 0.9, first_year).unwrap();
        assert_eq!(t, Some(10.0));
    }

    #[test]
    fn estimate_all_missing_is_undefined() {
        let start = Date::new(2001, 1, 1).unwrap();
        let values = (0..365)
            .map(|i| if (150..250).contains(&i) { None } else { Some(1.0) })
            .collect();
        let s = DailySeries::from_start(start, values).unwrap();
        let t = estimate_threshold(&s, doy(200), 11, 0.9, s.coverage()).unwrap();
        assert_eq!(t, None);
    }

    #[test]
    fn label_366_without_leap_year_borrows_neighbours() {
        let s = label_series();
        // No date carries label 366 but the window reaches 351..=365 and 1..=15.
        let t = estimate_threshold(&s, Doy::LAST, 31, 0.5, s.coverage()).unwrap();
        assert!(t.is_some());
    }

    #[test]
    fn curve_has_366_entries() {
        let s = label_series();
        let curve = ThresholdCurve::build(&s, 31, 0.9, s.coverage(), &SequentialDispatcher).unwrap();
        assert_eq!(curve.values().len(), 366);
        assert_eq!(curve.n_undefined(), 0);
        assert!(curve.failures().is_empty());
        let labels: Vec<u16> = curve.iter().map(|(d, _)| d.get()).collect();
        assert_eq!(labels, (1..=366).collect::<Vec<_>>());
    }

    #[test]
    fn curve_rejects_bad_parameters() {
        let s = label_series();
        assert!(matches!(
            ThresholdCurve::build(&s, 0, 0.9, s.coverage(), &SequentialDispatcher),
            Err(HwmidError::InvalidWindow { win_size: 0 })
        ));
        assert!(matches!(
            ThresholdCurve::build(&s, 31, 1.0, s.coverage(), &SequentialDispatcher),
            Err(HwmidError::InvalidQuantile { .. })
        ));
    }

    #[test]
    fn curve_rejects_ref_period_outside_series() {
        let s = label_series();
        let period = DateRange::years(2000, 2002).unwrap();
        assert!(matches!(
            ThresholdCurve::build(&s, 31, 0.9, period, &SequentialDispatcher),
            Err(HwmidError::RefPeriodOutOfRange { .. })
        ));
    }

    #[test]
    fn huge_window_pools_the_whole_reference_period() {
        let s = label_series();
        let full = estimate_threshold(&s, doy(1), 366, 0.5, s.coverage()).unwrap();
        assert_relative_eq!(full.unwrap(), 183.0, epsilon = 1e-10);
        for win_size in [10_000_000, usize::MAX] {
            let t = estimate_threshold(&s, doy(183), win_size, 0.5, s.coverage()).unwrap();
            assert_eq!(t, full, "win_size {win_size}");
        }
    }

    #[test]
    fn from_values_requires_366() {
        assert!(ThresholdCurve::from_values(vec![Some(1.0); 366]).is_ok());
        assert!(matches!(
            ThresholdCurve::from_values(vec![Some(1.0); 365]),
            Err(HwmidError::LengthMismatch {
                expected: 366,
                got: 365,
                ..
            })
        ));
    }
}
