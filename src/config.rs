use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level HWMId configuration file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct HwmidToml {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Index computation settings.
    #[serde(default)]
    pub index: IndexToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub missing_markers: Vec<String>,
    #[serde(default = "default_true")]
    pub fill_gaps: bool,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            date_column: default_date_column(),
            value_column: default_value_column(),
            date_format: default_date_format(),
            missing_markers: Vec::new(),
            fill_gaps: true,
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}
fn default_value_column() -> String {
    "tmax".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexToml {
    #[serde(default = "default_quantile")]
    pub quantile: f64,
    #[serde(default = "default_win_size")]
    pub win_size: usize,
    #[serde(default = "default_n_days")]
    pub n_days: usize,
    #[serde(default = "default_ref_start")]
    pub ref_start: i32,
    #[serde(default = "default_ref_end")]
    pub ref_end: i32,
    #[serde(default = "default_aggregation_policy")]
    pub aggregation_policy: String,
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Default for IndexToml {
    fn default() -> Self {
        Self {
            quantile: default_quantile(),
            win_size: default_win_size(),
            n_days: default_n_days(),
            ref_start: default_ref_start(),
            ref_end: default_ref_end(),
            aggregation_policy: default_aggregation_policy(),
            threads: None,
        }
    }
}

fn default_quantile() -> f64 {
    0.90
}
fn default_win_size() -> usize {
    31
}
fn default_n_days() -> usize {
    3
}
fn default_ref_start() -> i32 {
    1981
}
fn default_ref_end() -> i32 {
    2010
}
fn default_aggregation_policy() -> String {
    "sum".to_string()
}

/// Loads the TOML file at `path`, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<HwmidToml> {
    let Some(path) = path else {
        return Ok(HwmidToml::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: HwmidToml = toml::from_str("").unwrap();
        assert_eq!(cfg.io.value_column, "tmax");
        assert!(cfg.io.fill_gaps);
        assert_eq!(cfg.index.win_size, 31);
        assert_eq!(cfg.index.ref_start, 1981);
        assert_eq!(cfg.index.aggregation_policy, "sum");
    }

    #[test]
    fn sections_parse() {
        let cfg: HwmidToml = toml::from_str(
            r#"
            [io]
            input = "station.csv"
            value_column = "tx"
            missing_markers = ["-99.9"]

            [index]
            quantile = 0.95
            n_days = 5
            ref_start = 1950
            ref_end = 1979
            aggregation_policy = "max_of_cumulative"
            threads = 4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.io.input, Some(PathBuf::from("station.csv")));
        assert_eq!(cfg.io.missing_markers, vec!["-99.9".to_string()]);
        assert_eq!(cfg.index.n_days, 5);
        assert_eq!(cfg.index.threads, Some(4));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<HwmidToml>("[index]\nwindow = 31\n").is_err());
        assert!(toml::from_str::<HwmidToml>("[plot]\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hwmid.toml");
        std::fs::write(&path, "[index]\nwin_size = 15\n").unwrap();
        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.index.win_size, 15);
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
        assert_eq!(load(None).unwrap().index.n_days, 3);
    }
}
