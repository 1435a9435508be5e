//! Heat Wave Magnitude Index (daily), HWMId, for a single daily series.
//!
//! Turns a daily maximum-temperature series into a calendar-day threshold
//! curve, a declustered mask of heatwave days, a normalized daily magnitude
//! and one index value per calendar year (Russo et al.).
//!
//! # Quick start
//!
//! ```
//! use hwmid_calendar::{Date, DateRange};
//! use hwmid_index::{DailySeries, HwmidConfig, SequentialDispatcher, compute_hwmid_with};
//!
//! let start = Date::new(2001, 1, 1).unwrap();
//! let values = (0..3 * 365)
//!     .map(|i| Some(20.0 + 5.0 * ((i % 365) as f64 / 58.0).sin() + (i / 365) as f64))
//!     .collect();
//! let series = DailySeries::from_start(start, values).unwrap();
//!
//! let config = HwmidConfig::new().with_ref_period(DateRange::years(2001, 2003).unwrap());
//! let result = compute_hwmid_with(&series, &config, &SequentialDispatcher).unwrap();
//!
//! assert_eq!(result.threshold().values().len(), 366);
//! assert_eq!(result.magnitude().len(), series.len());
//! assert_eq!(result.yearly().len(), 3);
//! ```
//!
//! # Architecture
//!
//! ```text
//! compute_hwmid()
//!   ├─ validate config, reference coverage
//!   ├─ ThresholdCurve::build()     (threshold.rs, 366 tasks via DayDispatcher)
//!   ├─ BaselineScale::from_reference()  (baseline.rs)
//!   ├─ detect_heatwaves()          (detect.rs)
//!   ├─ magnitude_series()          (magnitude.rs)
//!   └─ aggregate_yearly()          (aggregate.rs)
//! ```
//!
//! Missing observations are `None` throughout. They are skipped by the
//! threshold and baseline reductions, never exceed a threshold, and an
//! undefined threshold entry is treated as non-exceedance.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod result;
pub mod series;

pub(crate) mod aggregate;
pub(crate) mod baseline;
pub(crate) mod detect;
pub(crate) mod magnitude;
pub(crate) mod pipeline;
pub(crate) mod threshold;

pub use aggregate::aggregate_yearly;
pub use baseline::{BaselineScale, annual_maxima};
pub use config::{AggregationPolicy, HwmidConfig};
pub use detect::{
    Detection, HeatwaveRun, decluster, detect_heatwaves, exceedance_mask, heatwave_runs,
    qualifying_mask,
};
pub use dispatch::{DayDispatcher, RayonDispatcher, SequentialDispatcher, TaskFailure};
pub use error::HwmidError;
pub use magnitude::{daily_magnitude, magnitude_series};
pub use pipeline::{compute_hwmid, compute_hwmid_with, compute_many};
pub use result::{HeatwaveEvent, HwmidResult};
pub use series::DailySeries;
pub use threshold::{ThresholdCurve, estimate_threshold};
