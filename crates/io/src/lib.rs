//! # hwmid-io
//!
//! Read a daily temperature series from CSV and write HWMId results as a
//! JSON report. Bridges text files into the [`hwmid_index::DailySeries`]
//! model and back out.

mod error;
mod output;
mod reader;

pub use error::IoError;
pub use output::{
    BaselineSummary, ConfigSummary, DailyEntry, EventEntry, HwmidReport, ThresholdEntry,
    ThresholdReport, YearlyEntry, to_json, write_json,
};
pub use reader::{ReaderConfig, parse_csv, read_csv};
