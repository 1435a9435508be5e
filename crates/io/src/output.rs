//! JSON report structures for HWMId results.

use std::collections::BTreeMap;
use std::path::Path;

use hwmid_index::{DailySeries, HwmidConfig, HwmidResult, ThresholdCurve};
use serde::Serialize;
use tracing::info;

use crate::error::IoError;

/// Top-level report of one HWMId computation.
#[derive(Debug, Serialize)]
pub struct HwmidReport {
    /// Configuration summary.
    pub config: ConfigSummary,
    /// Magnitude normalization scale.
    pub baseline: BaselineSummary,
    /// Threshold per calendar day label, `null` where undefined.
    pub threshold: Vec<ThresholdEntry>,
    /// Per-day values, qualifying flag and magnitude.
    pub daily: Vec<DailyEntry>,
    /// HWMId per calendar year, `null` where undefined.
    pub yearly: Vec<YearlyEntry>,
    /// Detected heatwaves.
    pub events: Vec<EventEntry>,
    /// label -> reason, for threshold estimations that failed.
    pub failures: BTreeMap<u16, String>,
}

/// Report of a threshold-only computation.
#[derive(Debug, Serialize)]
pub struct ThresholdReport {
    /// Configuration summary.
    pub config: ConfigSummary,
    /// Threshold per calendar day label, `null` where undefined.
    pub threshold: Vec<ThresholdEntry>,
    /// label -> reason, for threshold estimations that failed.
    pub failures: BTreeMap<u16, String>,
}

/// Summary of the configuration used.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// Threshold quantile in (0, 1).
    pub quantile: f64,
    /// Calendar window width in day labels.
    pub win_size: usize,
    /// Minimum heatwave duration in days.
    pub n_days: usize,
    /// First day of the reference period.
    pub ref_start: String,
    /// Last day of the reference period.
    pub ref_end: String,
    /// Yearly aggregation policy name.
    pub aggregation_policy: String,
}

/// Baseline scale with its degeneracy flag.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineSummary {
    /// 25th percentile of reference annual maxima.
    pub low: f64,
    /// 75th percentile of reference annual maxima.
    pub high: f64,
    /// `true` when `high <= low`.
    pub degenerate: bool,
}

/// Threshold of one calendar day label.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdEntry {
    /// Day-of-year label, 1..=366.
    pub doy: u16,
    /// Threshold, `null` where undefined.
    pub value: Option<f64>,
}

/// One day of the input series with its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    /// ISO date.
    pub date: String,
    /// Observation, `null` where missing.
    pub value: Option<f64>,
    /// Whether the day belongs to a heatwave.
    pub qualifying: bool,
    /// Daily magnitude, `null` where undefined.
    pub magnitude: Option<f64>,
}

/// HWMId of one calendar year.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyEntry {
    /// Calendar year.
    pub year: i32,
    /// Yearly index, `null` where undefined.
    pub hwmid: Option<f64>,
}

/// One detected heatwave.
#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    /// First day, ISO date.
    pub start: String,
    /// Last day, ISO date.
    pub end: String,
    /// Length in days.
    pub duration: usize,
    /// Sum of daily magnitudes, `null` where undefined.
    pub cumulative_magnitude: Option<f64>,
    /// Largest daily magnitude, `null` where undefined.
    pub peak_magnitude: Option<f64>,
}

impl ConfigSummary {
    /// Summarises `config` for a report.
    pub fn from_config(config: &HwmidConfig) -> Self {
        Self {
            quantile: config.quantile(),
            win_size: config.win_size(),
            n_days: config.n_days(),
            ref_start: config.ref_period().start().to_string(),
            ref_end: config.ref_period().end().to_string(),
            aggregation_policy: config.aggregation_policy().to_string(),
        }
    }
}

fn threshold_entries(curve: &ThresholdCurve) -> Vec<ThresholdEntry> {
    curve
        .iter()
        .map(|(doy, value)| ThresholdEntry {
            doy: doy.get(),
            value,
        })
        .collect()
}

fn failure_entries(curve: &ThresholdCurve) -> BTreeMap<u16, String> {
    curve
        .failures()
        .iter()
        .map(|(doy, reason)| (doy.get(), reason.clone()))
        .collect()
}

impl ThresholdReport {
    /// Builds the report for a threshold curve.
    pub fn new(config: &HwmidConfig, curve: &ThresholdCurve) -> Self {
        Self {
            config: ConfigSummary::from_config(config),
            threshold: threshold_entries(curve),
            failures: failure_entries(curve),
        }
    }
}

impl HwmidReport {
    /// Builds the report for `result`, computed from `series` under `config`.
    pub fn new(series: &DailySeries, config: &HwmidConfig, result: &HwmidResult) -> Self {
        let daily = series
            .dates()
            .iter()
            .zip(series.values())
            .zip(result.qualifying().iter().zip(result.magnitude()))
            .map(|((date, &value), (&qualifying, &magnitude))| DailyEntry {
                date: date.to_string(),
                value,
                qualifying,
                magnitude,
            })
            .collect();

        let yearly = result
            .yearly()
            .iter()
            .map(|(&year, &hwmid)| YearlyEntry { year, hwmid })
            .collect();

        let events = result
            .events()
            .iter()
            .map(|e| EventEntry {
                start: e.start.to_string(),
                end: e.end.to_string(),
                duration: e.duration,
                cumulative_magnitude: e.cumulative_magnitude,
                peak_magnitude: e.peak_magnitude,
            })
            .collect();

        let baseline = result.baseline();
        Self {
            config: ConfigSummary::from_config(config),
            baseline: BaselineSummary {
                low: baseline.low(),
                high: baseline.high(),
                degenerate: baseline.is_degenerate(),
            },
            threshold: threshold_entries(result.threshold()),
            daily,
            yearly,
            events,
            failures: failure_entries(result.threshold()),
        }
    }
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String, IoError> {
    serde_json::to_string_pretty(report).map_err(|e| IoError::Serialization {
        reason: e.to_string(),
    })
}

/// Serialize a report and write it to `path`.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<(), IoError> {
    let json = to_json(report)?;
    std::fs::write(path, json).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "report written");
    Ok(())
}
