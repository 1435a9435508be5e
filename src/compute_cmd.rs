//! Compute command: CSV series in, HWMId report out.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hwmid_index::compute_hwmid;
use hwmid_io::{HwmidReport, read_csv, to_json, write_json};

use crate::cli::ComputeArgs;
use crate::{config, convert};

/// Run the full HWMId pipeline.
pub fn run(args: ComputeArgs) -> Result<()> {
    let _cmd = info_span!("compute").entered();

    // 1. Load TOML and apply CLI overrides
    let mut cfg = config::load(args.common.config.as_deref())?;
    convert::apply_common_overrides(&mut cfg.index, &mut cfg.io, &args.common);
    if let Some(n) = args.n_days {
        cfg.index.n_days = n;
    }
    if let Some(p) = args.policy {
        cfg.index.aggregation_policy = p;
    }
    let hwmid_cfg = convert::build_hwmid_config(&cfg.index)?;

    // 2. Read series
    let input = cfg.io.input.as_ref().ok_or_else(|| {
        anyhow::anyhow!("no input path: set [io].input in config or use --input")
    })?;
    let reader_cfg = convert::build_reader_config(&cfg.io);
    let series = read_csv(input, &reader_cfg)
        .with_context(|| format!("failed to read CSV: {}", input.display()))?;
    info!(
        path = %input.display(),
        n_days = series.len(),
        coverage = %series.coverage(),
        "series loaded"
    );

    // 3. Compute
    let result = compute_hwmid(&series, &hwmid_cfg).context("HWMId computation failed")?;
    for (year, value) in result.yearly() {
        match value {
            Some(v) => info!(year, hwmid = v, "yearly HWMId"),
            None => info!(year, "yearly HWMId undefined"),
        }
    }

    // 4. Write report
    let report = HwmidReport::new(&series, &hwmid_cfg, &result);
    match cfg.io.output {
        Some(ref path) => write_json(path, &report)
            .with_context(|| format!("failed to write report: {}", path.display()))?,
        None => println!("{}", to_json(&report)?),
    }

    Ok(())
}
