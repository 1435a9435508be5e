//! Statistical helper functions for the HWMId pipeline.
//!
//! Missing observations are represented as `None`. Reductions skip them,
//! and a reduction over no defined values yields `None` rather than zero.

/// R's default quantile algorithm (type=7), also numpy's `linear` method.
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Collects the defined, finite values and sorts them ascending.
pub fn sorted_defined<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sorted: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Type-7 quantile over the defined values, skipping missing entries.
///
/// Returns `None` when no value is defined.
///
/// # Example
///
/// ```
/// use hwmid_stats::quantile_skip_missing;
///
/// let data = [Some(1.0), None, Some(3.0), Some(2.0)];
/// assert_eq!(quantile_skip_missing(data, 0.5), Some(2.0));
/// assert_eq!(quantile_skip_missing([None, None], 0.5), None);
/// ```
pub fn quantile_skip_missing<I>(values: I, p: f64) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sorted = sorted_defined(values);
    if sorted.is_empty() {
        return None;
    }
    Some(quantile_type7(&sorted, p))
}

/// Several type-7 quantiles over the defined values, sorting only once.
///
/// Returns `None` when no value is defined.
pub fn quantiles_skip_missing<I>(values: I, ps: &[f64]) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sorted = sorted_defined(values);
    if sorted.is_empty() {
        return None;
    }
    Some(ps.iter().map(|&p| quantile_type7(&sorted, p)).collect())
}

/// Maximum over the defined values. Returns `None` when none is defined.
pub fn max_skip_missing<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .reduce(f64::max)
}

/// Sum over the values, propagating `None` if any value is undefined.
///
/// An empty input sums to `Some(0.0)`.
pub fn sum_strict<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))
}
