//! End-to-end orchestration: series in, HWMId out.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::aggregate_yearly;
use crate::baseline::BaselineScale;
use crate::config::HwmidConfig;
use crate::detect::detect_heatwaves;
use crate::dispatch::{DayDispatcher, RayonDispatcher, SequentialDispatcher};
use crate::error::HwmidError;
use crate::magnitude::magnitude_series;
use crate::result::{HeatwaveEvent, HwmidResult};
use crate::series::DailySeries;
use crate::threshold::ThresholdCurve;

/// Checks the configuration and that the reference period lies within the
/// series coverage.
fn check_inputs(series: &DailySeries, config: &HwmidConfig) -> Result<(), HwmidError> {
    config.validate()?;
    series.check_ref_period(config.ref_period())
}

/// Computes HWMId for one series, fanning the threshold table out on rayon.
///
/// A dedicated pool is used when [`HwmidConfig::threads`] is set.
///
/// # Errors
///
/// See [`compute_hwmid_with`]; also returns [`HwmidError::Pool`] if the
/// worker pool cannot be built.
pub fn compute_hwmid(series: &DailySeries, config: &HwmidConfig) -> Result<HwmidResult, HwmidError> {
    config.validate()?;
    let dispatcher = RayonDispatcher::from_threads(config.threads())?;
    compute_hwmid_with(series, config, &dispatcher)
}

/// Computes HWMId for one series using an explicit day dispatcher.
///
/// Pipeline order: **threshold curve -> baseline scale -> detection and
/// declustering -> daily magnitude -> yearly aggregation**.
///
/// # Errors
///
/// - Any configuration error from [`HwmidConfig::validate`].
/// - [`HwmidError::RefPeriodOutOfRange`] if the reference period is not
///   inside the series coverage.
/// - [`HwmidError::InsufficientBaseline`] if the reference period holds no
///   defined observation.
#[tracing::instrument(skip(series, config, dispatcher), fields(n = series.len()))]
pub fn compute_hwmid_with<D: DayDispatcher>(
    series: &DailySeries,
    config: &HwmidConfig,
    dispatcher: &D,
) -> Result<HwmidResult, HwmidError> {
    check_inputs(series, config)?;
    let ref_period = config.ref_period();

    // --- Step 1: Threshold curve ---
    let threshold = ThresholdCurve::build(
        series,
        config.win_size(),
        config.quantile(),
        ref_period,
        dispatcher,
    )?;

    // --- Step 2: Baseline scale ---
    let baseline = BaselineScale::from_reference(series, ref_period)?;

    // --- Step 3: Detection ---
    let detection = detect_heatwaves(series, &threshold, config.n_days())?;

    // --- Step 4: Magnitude ---
    let magnitude = magnitude_series(detection.values(), &baseline);

    // --- Step 5: Yearly aggregation ---
    let yearly = aggregate_yearly(
        series.dates(),
        &magnitude,
        detection.qualifying(),
        config.aggregation_policy(),
    )?;

    let events: Vec<HeatwaveEvent> = detection
        .runs()
        .iter()
        .map(|&run| HeatwaveEvent::from_run(run, series.dates(), &magnitude))
        .collect();

    let n_undefined_years = yearly.values().filter(|v| v.is_none()).count();
    if n_undefined_years > 0 {
        warn!(n_undefined_years, "HWMId undefined for some years");
    }
    info!(
        n_years = yearly.len(),
        n_events = events.len(),
        policy = %config.aggregation_policy(),
        "HWMId computed"
    );

    Ok(HwmidResult::new(
        threshold,
        baseline,
        detection.qualifying().to_vec(),
        magnitude,
        yearly,
        events,
        config.aggregation_policy(),
    ))
}

/// Applies the pipeline independently to each series, in parallel.
///
/// Each series gets its own result: an error in one never affects another.
/// Within each series the threshold table runs sequentially, since the
/// series themselves already occupy the pool.
///
/// # Errors
///
/// The outer error reports an invalid configuration or a pool that cannot
/// be built; per-series errors are returned in the vector.
#[tracing::instrument(skip(series, config), fields(n_series = series.len()))]
pub fn compute_many(
    series: &[DailySeries],
    config: &HwmidConfig,
) -> Result<Vec<Result<HwmidResult, HwmidError>>, HwmidError> {
    config.validate()?;
    let run = || {
        series
            .par_iter()
            .map(|s| compute_hwmid_with(s, config, &SequentialDispatcher))
            .collect::<Vec<_>>()
    };
    let results = match config.threads() {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| HwmidError::Pool {
                reason: e.to_string(),
            })?
            .install(run),
        None => run(),
    };
    let n_failed = results.iter().filter(|r| r.is_err()).count();
    if n_failed > 0 {
        warn!(n_failed, "some series failed");
    }
    info!(n_series = results.len(), n_failed, "batch computed");
    Ok(results)
}
