//! Daily heatwave magnitude.

use tracing::warn;

use crate::baseline::BaselineScale;

/// Normalized magnitude of one day.
///
/// `value` is the declustered value: `Some` on qualifying days, `None`
/// elsewhere. Returns `(value - low) / (high - low)` when `value > low` and
/// `0` otherwise, including on non-qualifying days. Returns `None` when the
/// division is needed but the scale is degenerate.
///
/// The excess is measured from the baseline low, not from the calendar-day
/// threshold.
///
/// # Example
///
/// ```
/// use hwmid_index::{BaselineScale, daily_magnitude};
///
/// let scale = BaselineScale::new(30.0, 35.0);
/// assert_eq!(daily_magnitude(Some(32.5), &scale), Some(0.5));
/// assert_eq!(daily_magnitude(Some(29.0), &scale), Some(0.0));
/// assert_eq!(daily_magnitude(None, &scale), Some(0.0));
/// ```
pub fn daily_magnitude(value: Option<f64>, scale: &BaselineScale) -> Option<f64> {
    match value {
        Some(v) if v > scale.low() => {
            if scale.is_degenerate() {
                None
            } else {
                Some((v - scale.low()) / scale.range())
            }
        }
        _ => Some(0.0),
    }
}

/// Applies [`daily_magnitude`] to every day of a declustered series.
pub fn magnitude_series(declustered: &[Option<f64>], scale: &BaselineScale) -> Vec<Option<f64>> {
    let magnitudes: Vec<Option<f64>> = declustered
        .iter()
        .map(|&v| daily_magnitude(v, scale))
        .collect();
    let n_undefined = magnitudes.iter().filter(|m| m.is_none()).count();
    if n_undefined > 0 {
        warn!(
            n_undefined,
            low = scale.low(),
            high = scale.high(),
            "daily magnitude undefined on qualifying days (degenerate baseline)"
        );
    }
    magnitudes
}
