//! Result types for the HWMId pipeline.

use std::collections::BTreeMap;

use hwmid_calendar::Date;

use crate::baseline::BaselineScale;
use crate::config::AggregationPolicy;
use crate::detect::HeatwaveRun;
use crate::threshold::ThresholdCurve;

/// One heatwave: a maximal run of qualifying days.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatwaveEvent {
    /// First day of the event.
    pub start: Date,
    /// Last day of the event (inclusive).
    pub end: Date,
    /// Number of days in the event.
    pub duration: usize,
    /// Sum of the daily magnitudes over the event, `None` if any is undefined.
    pub cumulative_magnitude: Option<f64>,
    /// Largest daily magnitude in the event, `None` if any is undefined.
    pub peak_magnitude: Option<f64>,
}

impl HeatwaveEvent {
    /// Builds an event from a run over `dates` and the daily `magnitude`.
    pub(crate) fn from_run(run: HeatwaveRun, dates: &[Date], magnitude: &[Option<f64>]) -> Self {
        let days = &magnitude[run.start..run.end()];
        let cumulative_magnitude = days.iter().try_fold(0.0, |acc, m| m.map(|x| acc + x));
        let peak_magnitude = days
            .iter()
            .try_fold(f64::NEG_INFINITY, |acc: f64, m| m.map(|x| acc.max(x)));
        Self {
            start: dates[run.start],
            end: dates[run.end() - 1],
            duration: run.len,
            cumulative_magnitude,
            peak_magnitude,
        }
    }
}

/// Everything produced by one HWMId computation.
#[derive(Debug, Clone)]
pub struct HwmidResult {
    threshold: ThresholdCurve,
    baseline: BaselineScale,
    qualifying: Vec<bool>,
    magnitude: Vec<Option<f64>>,
    yearly: BTreeMap<i32, Option<f64>>,
    events: Vec<HeatwaveEvent>,
    policy: AggregationPolicy,
}

impl HwmidResult {
    pub(crate) fn new(
        threshold: ThresholdCurve,
        baseline: BaselineScale,
        qualifying: Vec<bool>,
        magnitude: Vec<Option<f64>>,
        yearly: BTreeMap<i32, Option<f64>>,
        events: Vec<HeatwaveEvent>,
        policy: AggregationPolicy,
    ) -> Self {
        Self {
            threshold,
            baseline,
            qualifying,
            magnitude,
            yearly,
            events,
            policy,
        }
    }

    /// Threshold for every calendar day label.
    pub fn threshold(&self) -> &ThresholdCurve {
        &self.threshold
    }

    /// Magnitude normalization scale.
    pub fn baseline(&self) -> &BaselineScale {
        &self.baseline
    }

    /// Qualifying (heatwave) flag per input day.
    pub fn qualifying(&self) -> &[bool] {
        &self.qualifying
    }

    /// Daily magnitude, same length and order as the input series.
    ///
    /// Zero on non-qualifying days; `None` only under a degenerate baseline.
    pub fn magnitude(&self) -> &[Option<f64>] {
        &self.magnitude
    }

    /// HWMId per calendar year present in the input.
    pub fn yearly(&self) -> &BTreeMap<i32, Option<f64>> {
        &self.yearly
    }

    /// Detected heatwaves in chronological order.
    pub fn events(&self) -> &[HeatwaveEvent] {
        &self.events
    }

    /// Aggregation policy used for [`HwmidResult::yearly`].
    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }
}
