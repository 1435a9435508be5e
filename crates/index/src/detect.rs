//! Exceedance detection and run-length declustering.
//!
//! A day exceeds when its value is strictly above the threshold for its
//! calendar day label. An undefined value or threshold never exceeds.
//! Declustering keeps every day of each exceedance run at least `n_days`
//! long and drops shorter runs entirely.

use tracing::{debug, info};

use crate::error::HwmidError;
use crate::series::DailySeries;
use crate::threshold::ThresholdCurve;

/// A maximal run of qualifying days, by position in the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatwaveRun {
    /// Index of the first day of the run.
    pub start: usize,
    /// Number of days in the run.
    pub len: usize,
}

impl HeatwaveRun {
    /// Index one past the last day of the run.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Output of [`detect_heatwaves`].
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    exceedance: Vec<bool>,
    qualifying: Vec<bool>,
    values: Vec<Option<f64>>,
    runs: Vec<HeatwaveRun>,
}

impl Detection {
    /// Raw exceedance flag per day.
    pub fn exceedance(&self) -> &[bool] {
        &self.exceedance
    }

    /// Qualifying flag per day (member of some heatwave).
    pub fn qualifying(&self) -> &[bool] {
        &self.qualifying
    }

    /// Raw value on qualifying days, `None` elsewhere.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Heatwave events in chronological order.
    pub fn runs(&self) -> &[HeatwaveRun] {
        &self.runs
    }
}

/// Flags each day whose value is strictly above its calendar-day threshold.
pub fn exceedance_mask(series: &DailySeries, curve: &ThresholdCurve) -> Vec<bool> {
    series
        .dates()
        .iter()
        .zip(series.values())
        .map(|(d, v)| match (*v, curve.get(d.doy())) {
            (Some(value), Some(threshold)) => value > threshold,
            _ => false,
        })
        .collect()
}

/// Marks every day covered by a window of `n_days` consecutive exceedances.
///
/// A sliding count of width `n_days` moves over `exceedance`; each position
/// where the count equals `n_days` marks all days in that window. The union
/// keeps runs longer than `n_days` whole.
///
/// # Panics
///
/// Panics if `n_days` is zero.
pub fn qualifying_mask(exceedance: &[bool], n_days: usize) -> Vec<bool> {
    assert!(n_days >= 1, "n_days must be at least 1");
    let n = exceedance.len();
    let mut qualifying = vec![false; n];
    if n < n_days {
        return qualifying;
    }

    let mut count = exceedance[..n_days].iter().filter(|&&e| e).count();
    for anchor in 0..=n - n_days {
        if anchor > 0 {
            count -= usize::from(exceedance[anchor - 1]);
            count += usize::from(exceedance[anchor + n_days - 1]);
        }
        if count == n_days {
            qualifying[anchor..anchor + n_days].fill(true);
        }
    }
    qualifying
}

/// Keeps the value on qualifying days and marks every other day missing.
pub fn decluster(values: &[Option<f64>], qualifying: &[bool]) -> Vec<Option<f64>> {
    values
        .iter()
        .zip(qualifying)
        .map(|(&v, &q)| if q { v } else { None })
        .collect()
}

/// Splits a mask into its maximal runs of `true`.
pub fn heatwave_runs(mask: &[bool]) -> Vec<HeatwaveRun> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &flag) in mask.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(HeatwaveRun { start: s, len: i - s });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(HeatwaveRun {
            start: s,
            len: mask.len() - s,
        });
    }
    runs
}

/// Detects heatwave days in `series` against `curve`.
///
/// # Errors
///
/// Returns [`HwmidError::InvalidMinDuration`] if `n_days` is zero.
#[tracing::instrument(skip(series, curve), fields(n = series.len()))]
pub fn detect_heatwaves(
    series: &DailySeries,
    curve: &ThresholdCurve,
    n_days: usize,
) -> Result<Detection, HwmidError> {
    if n_days < 1 {
        return Err(HwmidError::InvalidMinDuration { n_days });
    }
    let exceedance = exceedance_mask(series, curve);
    let qualifying = qualifying_mask(&exceedance, n_days);
    let values = decluster(series.values(), &qualifying);
    let runs = heatwave_runs(&qualifying);

    let n_exceed = exceedance.iter().filter(|&&e| e).count();
    let n_qualifying = qualifying.iter().filter(|&&q| q).count();
    debug!(n_exceed, n_qualifying, "declustered exceedances");
    info!(n_events = runs.len(), "heatwaves detected");

    Ok(Detection {
        exceedance,
        qualifying,
        values,
        runs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwmid_calendar::Date;

    fn mask(bits: &[u8]) -> Vec<bool> {
        bits.iter().map(|&b| b == 1).collect()
    }

    #[test]
    fn short_run_dropped_long_run_kept() {
        let q = qualifying_mask(&mask(&[0, 1, 1, 0, 1, 1, 1, 0]), 3);
        assert_eq!(q, mask(&[0, 0, 0, 0, 1, 1, 1, 0]));
    }

    #[test]
    fn runs_longer_than_n_days_kept_whole() {
        let q = qualifying_mask(&mask(&[1, 1, 1, 1, 1, 0, 1, 1]), 3);
        assert_eq!(q, mask(&[1, 1, 1, 1, 1, 0, 0, 0]));
    }

    #[test]
    fn n_days_one_keeps_every_exceedance() {
        let e = mask(&[0, 1, 0, 1, 1, 0, 1]);
        assert_eq!(qualifying_mask(&e, 1), e);
    }

    #[test]
    fn run_of_n_days_minus_one_dropped() {
        let q = qualifying_mask(&mask(&[1, 1, 0, 1, 1]), 3);
        assert!(q.iter().all(|&x| !x));
    }

    #[test]
    fn series_shorter_than_n_days() {
        assert_eq!(qualifying_mask(&mask(&[1, 1]), 3), vec![false, false]);
    }

    #[test]
    fn run_at_end_of_series() {
        let q = qualifying_mask(&mask(&[0, 0, 1, 1, 1]), 3);
        assert_eq!(q, mask(&[0, 0, 1, 1, 1]));
        assert_eq!(heatwave_runs(&q), vec![HeatwaveRun { start: 2, len: 3 }]);
    }

    #[test]
    fn runs_split_on_gaps() {
        let runs = heatwave_runs(&mask(&[1, 1, 0, 0, 1, 0, 1, 1, 1]));
        assert_eq!(
            runs,
            vec![
                HeatwaveRun { start: 0, len: 2 },
                HeatwaveRun { start: 4, len: 1 },
                HeatwaveRun { start: 6, len: 3 },
            ]
        );
        assert_eq!(runs[2].end(), 9);
        assert!(heatwave_runs(&[]).is_empty());
    }

    #[test]
    fn decluster_masks_non_qualifying() {
        let values = [Some(1.0), Some(2.0), None, Some(4.0)];
        let out = decluster(&values, &mask(&[0, 1, 1, 1]));
        assert_eq!(out, vec![None, Some(2.0), None, Some(4.0)]);
    }

    #[test]
    fn undefined_threshold_never_exceeds() {
        let start = Date::new(2001, 1, 1).unwrap();
        let s = DailySeries::from_start(start, vec![Some(100.0), None, Some(100.0)]).unwrap();
        let mut thresholds = vec![Some(0.0); 366];
        thresholds[0] = None;
        let curve = ThresholdCurve::from_values(thresholds).unwrap();
        assert_eq!(exceedance_mask(&s, &curve), vec![false, false, true]);
    }

    #[test]
    fn equal_to_threshold_is_not_exceedance() {
        let start = Date::new(2001, 1, 1).unwrap();
        let s = DailySeries::from_start(start, vec![Some(5.0), Some(5.1)]).unwrap();
        let curve = ThresholdCurve::from_values(vec![Some(5.0); 366]).unwrap();
        assert_eq!(exceedance_mask(&s, &curve), vec![false, true]);
    }

    #[test]
    fn detect_combines_stages() {
        let start = Date::new(2001, 1, 1).unwrap();
        let raw = [0.0, 9.0, 9.0, 0.0, 9.0, 8.0, 7.0, 0.0];
        let s = DailySeries::from_start(start, raw.iter().map(|&v| Some(v)).collect()).unwrap();
        let curve = ThresholdCurve::from_values(vec![Some(5.0); 366]).unwrap();

        let det = detect_heatwaves(&s, &curve, 3).unwrap();
        assert_eq!(det.exceedance(), mask(&[0, 1, 1, 0, 1, 1, 1, 0]).as_slice());
        assert_eq!(det.qualifying(), mask(&[0, 0, 0, 0, 1, 1, 1, 0]).as_slice());
        assert_eq!(
            det.values(),
            &[None, None, None, None, Some(9.0), Some(8.0), Some(7.0), None]
        );
        assert_eq!(det.runs(), &[HeatwaveRun { start: 4, len: 3 }]);
    }

    #[test]
    fn detect_rejects_zero_n_days() {
        let start = Date::new(2001, 1, 1).unwrap();
        let s = DailySeries::from_start(start, vec![Some(1.0)]).unwrap();
        let curve = ThresholdCurve::from_values(vec![Some(0.0); 366]).unwrap();
        assert!(matches!(
            detect_heatwaves(&s, &curve, 0),
            Err(HwmidError::InvalidMinDuration { n_days: 0 })
        ));
    }
}
