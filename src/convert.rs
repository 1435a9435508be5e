//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, anyhow};

use hwmid_calendar::DateRange;
use hwmid_index::{AggregationPolicy, HwmidConfig};
use hwmid_io::ReaderConfig;

use crate::cli::CommonArgs;
use crate::config::{IndexToml, IoToml};

/// Parses an aggregation policy name.
pub fn parse_policy(s: &str) -> Result<AggregationPolicy> {
    s.parse::<AggregationPolicy>().map_err(|e| anyhow!(e))
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> ReaderConfig {
    let mut cfg = ReaderConfig::default()
        .with_date_column(&io.date_column)
        .with_value_column(&io.value_column)
        .with_date_format(&io.date_format)
        .with_fill_gaps(io.fill_gaps);
    for marker in &io.missing_markers {
        cfg = cfg.with_missing_marker(marker);
    }
    cfg
}

/// Applies command-line overrides shared by every subcommand.
pub fn apply_common_overrides(index: &mut IndexToml, io: &mut IoToml, args: &CommonArgs) {
    if let Some(ref p) = args.input {
        io.input = Some(p.clone());
    }
    if let Some(ref p) = args.output {
        io.output = Some(p.clone());
    }
    if let Some(q) = args.quantile {
        index.quantile = q;
    }
    if let Some(w) = args.win_size {
        index.win_size = w;
    }
    if let Some(y) = args.ref_start {
        index.ref_start = y;
    }
    if let Some(y) = args.ref_end {
        index.ref_end = y;
    }
    if args.threads.is_some() {
        index.threads = args.threads;
    }
}

/// Builds and validates an [`HwmidConfig`] from the TOML index section.
pub fn build_hwmid_config(index: &IndexToml) -> Result<HwmidConfig> {
    let ref_period = DateRange::years(index.ref_start, index.ref_end).with_context(|| {
        format!(
            "invalid reference period {}..={}",
            index.ref_start, index.ref_end
        )
    })?;
    let config = HwmidConfig::new()
        .with_quantile(index.quantile)
        .with_win_size(index.win_size)
        .with_n_days(index.n_days)
        .with_ref_period(ref_period)
        .with_aggregation_policy(parse_policy(&index.aggregation_policy)?)
        .with_threads(index.threads);
    config.validate().context("invalid [index] configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert() {
        let cfg = build_hwmid_config(&IndexToml::default()).unwrap();
        assert_eq!(cfg.win_size(), 31);
        assert_eq!(cfg.aggregation_policy(), AggregationPolicy::Sum);
        assert_eq!(cfg.ref_period(), DateRange::years(1981, 2010).unwrap());
    }

    #[test]
    fn bad_values_rejected() {
        let reversed = IndexToml {
            ref_start: 2010,
            ref_end: 1981,
            ..IndexToml::default()
        };
        assert!(build_hwmid_config(&reversed).is_err());

        let bad_policy = IndexToml {
            aggregation_policy: "mean".to_string(),
            ..IndexToml::default()
        };
        assert!(build_hwmid_config(&bad_policy).is_err());

        let bad_quantile = IndexToml {
            quantile: 1.5,
            ..IndexToml::default()
        };
        assert!(build_hwmid_config(&bad_quantile).is_err());
    }

    #[test]
    fn overrides_win() {
        let mut index = IndexToml::default();
        let mut io = IoToml::default();
        let args = CommonArgs {
            config: None,
            input: Some("in.csv".into()),
            output: None,
            quantile: Some(0.95),
            win_size: None,
            ref_start: Some(1961),
            ref_end: Some(1990),
            threads: Some(2),
        };
        apply_common_overrides(&mut index, &mut io, &args);
        assert_eq!(io.input, Some("in.csv".into()));
        assert_eq!(index.quantile, 0.95);
        assert_eq!(index.win_size, 31);
        assert_eq!((index.ref_start, index.ref_end), (1961, 1990));
        assert_eq!(index.threads, Some(2));
    }
}
