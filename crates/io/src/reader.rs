//! CSV reader configuration and daily-series loading.

use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use hwmid_calendar::Date;
use hwmid_index::DailySeries;
use tracing::{debug, info, warn};

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a daily series from a delimited text file.
///
/// Use the builder methods (`with_*`) to customise column names, the date
/// format and missing-value handling. The [`Default`] implementation reads
/// a comma-separated file with `date` and `tmax` columns and ISO dates.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Header name of the date column.
    date_column: String,
    /// Header name of the value column.
    value_column: String,
    /// `chrono` format string for the date column.
    date_format: String,
    /// Field delimiter.
    delimiter: u8,
    /// Cell contents treated as missing (case-insensitive).
    missing_markers: Vec<String>,
    /// Whether absent dates are inserted as missing values.
    fill_gaps: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            value_column: "tmax".into(),
            date_format: "%Y-%m-%d".into(),
            delimiter: b',',
            missing_markers: vec!["".into(), "na".into(), "nan".into(), "null".into()],
            fill_gaps: true,
        }
    }
}

impl ReaderConfig {
    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the value column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Set the `chrono` date format string.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Add a cell content to treat as missing.
    pub fn with_missing_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_markers.push(marker.into().to_lowercase());
        self
    }

    /// Enable or disable inserting missing values for absent dates.
    pub fn with_fill_gaps(mut self, fill: bool) -> Self {
        self.fill_gaps = fill;
        self
    }

    /// Returns the date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Returns the value column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Returns the date format string.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Returns whether absent dates are filled with missing values.
    pub fn fill_gaps(&self) -> bool {
        self.fill_gaps
    }

    fn is_missing(&self, cell: &str) -> bool {
        let lower = cell.to_lowercase();
        self.missing_markers.iter().any(|m| *m == lower)
    }
}

// ---------------------------------------------------------------------------
// read_csv
// ---------------------------------------------------------------------------

/// Read a daily series from a CSV file.
///
/// Rows must be in strictly increasing date order. Empty cells, `NA`, `NaN`
/// and any configured markers become missing values, as do numbers that
/// parse to NaN or infinity.
///
/// # Errors
///
/// Returns [`IoError`] if the file is absent, a column is missing, a cell
/// cannot be parsed, dates are unordered, or (without gap filling) the
/// dates are not contiguous.
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<DailySeries, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let series = parse_csv(file, config, &path.display().to_string())?;
    info!(path = %path.display(), n_days = series.len(), "series loaded");
    Ok(series)
}

/// Parse a daily series from any CSV source.
///
/// `source_name` only labels error messages.
///
/// # Errors
///
/// See [`read_csv`].
pub fn parse_csv<R: Read>(
    reader: R,
    config: &ReaderConfig,
    source_name: &str,
) -> Result<DailySeries, IoError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, &config.date_column, source_name)?;
    let value_idx = column_index(&headers, &config.value_column, source_name)?;

    let mut dates: Vec<Date> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();
    let mut n_gap_days = 0_usize;

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = record.position().map_or(row as u64 + 2, |p| p.line());
        let date = parse_date(record.get(date_idx).unwrap_or(""), line, config)?;
        let value = parse_value(record.get(value_idx).unwrap_or(""), line, config)?;

        if let Some(&previous) = dates.last() {
            let step = previous.days_until(date);
            if step < 1 {
                return Err(IoError::UnorderedDates {
                    line,
                    previous: previous.to_string(),
                    current: date.to_string(),
                });
            }
            if step > 1 && config.fill_gaps {
                let mut fill = previous.next();
                while fill < date {
                    dates.push(fill);
                    values.push(None);
                    n_gap_days += 1;
                    fill = fill.next();
                }
            }
        }
        dates.push(date);
        values.push(value);
    }

    if n_gap_days > 0 {
        warn!(n_gap_days, source = source_name, "absent dates filled as missing");
    }
    let n_missing = values.iter().filter(|v| v.is_none()).count();
    debug!(n_rows = dates.len(), n_missing, "rows parsed");

    Ok(DailySeries::new(dates, values)?)
}

fn column_index(headers: &StringRecord, name: &str, source_name: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
            source_name: source_name.to_string(),
        })
}

fn parse_date(cell: &str, line: u64, config: &ReaderConfig) -> Result<Date, IoError> {
    let naive =
        NaiveDate::parse_from_str(cell, &config.date_format).map_err(|e| IoError::InvalidDate {
            line,
            value: cell.to_string(),
            reason: e.to_string(),
        })?;
    // chrono guarantees month in 1..=12 and day in 1..=31.
    Ok(Date::new(naive.year(), naive.month() as u8, naive.day() as u8)?)
}

fn parse_value(cell: &str, line: u64, config: &ReaderConfig) -> Result<Option<f64>, IoError> {
    if config.is_missing(cell) {
        return Ok(None);
    }
    let v: f64 = cell.parse().map_err(|_| IoError::InvalidValue {
        line,
        value: cell.to_string(),
    })?;
    Ok(v.is_finite().then_some(v))
}
