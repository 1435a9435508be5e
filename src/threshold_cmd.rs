//! Threshold command: calendar-day threshold curve only.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hwmid_index::{RayonDispatcher, ThresholdCurve};
use hwmid_io::{ThresholdReport, read_csv, to_json, write_json};

use crate::cli::ThresholdArgs;
use crate::{config, convert};

/// Compute and write the threshold curve.
pub fn run(args: ThresholdArgs) -> Result<()> {
    let _cmd = info_span!("threshold").entered();

    let mut cfg = config::load(args.common.config.as_deref())?;
    convert::apply_common_overrides(&mut cfg.index, &mut cfg.io, &args.common);
    let hwmid_cfg = convert::build_hwmid_config(&cfg.index)?;

    let input = cfg.io.input.as_ref().ok_or_else(|| {
        anyhow::anyhow!("no input path: set [io].input in config or use --input")
    })?;
    let series = read_csv(input, &convert::build_reader_config(&cfg.io))
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;

    series
        .check_ref_period(hwmid_cfg.ref_period())
        .context("invalid reference period")?;

    let dispatcher = RayonDispatcher::from_threads(hwmid_cfg.threads())?;
    info!(n_threads = dispatcher.n_threads(), "building threshold curve");
    let curve = ThresholdCurve::build(
        &series,
        hwmid_cfg.win_size(),
        hwmid_cfg.quantile(),
        hwmid_cfg.ref_period(),
        &dispatcher,
    )
    .context("threshold computation failed")?;

    let report = ThresholdReport::new(&hwmid_cfg, &curve);
    match cfg.io.output {
        Some(ref path) => write_json(path, &report)
            .with_context(|| format!("failed to write report: {}", path.display()))?,
        None => println!("{}", to_json(&report)?),
    }

    Ok(())
}
