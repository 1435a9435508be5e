use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Heat Wave Magnitude Index (daily) calculator.
#[derive(Parser)]
#[command(
    name = "hwmid",
    version,
    about = "Heat Wave Magnitude Index (daily) from daily maximum temperature"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the HWMId report.
    Compute(ComputeArgs),
    /// Compute only the calendar-day threshold curve.
    Threshold(ThresholdArgs),
}

/// Options shared by both subcommands.
#[derive(clap::Args)]
pub struct CommonArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override input CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override threshold quantile, in (0, 1).
    #[arg(short, long)]
    pub quantile: Option<f64>,

    /// Override calendar window width in days.
    #[arg(long = "win-size")]
    pub win_size: Option<usize>,

    /// Override first year of the reference period.
    #[arg(long = "ref-start")]
    pub ref_start: Option<i32>,

    /// Override last year of the reference period.
    #[arg(long = "ref-end")]
    pub ref_end: Option<i32>,

    /// Override worker thread count for the threshold table.
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Arguments for the `compute` subcommand.
#[derive(clap::Args)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Override minimum heatwave duration in days.
    #[arg(short = 'n', long = "n-days")]
    pub n_days: Option<usize>,

    /// Override yearly aggregation policy (sum | max_of_cumulative).
    #[arg(short, long)]
    pub policy: Option<String>,
}

/// Arguments for the `threshold` subcommand.
#[derive(clap::Args)]
pub struct ThresholdArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
