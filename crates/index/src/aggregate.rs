//! Reduction of daily magnitudes to one HWMId value per calendar year.

use std::collections::BTreeMap;

use hwmid_calendar::Date;
use hwmid_stats::sum_strict;
use tracing::debug;

use crate::config::AggregationPolicy;
use crate::error::HwmidError;

/// Aggregates daily magnitudes per calendar year of each day's date.
///
/// - [`AggregationPolicy::Sum`]: sum of the year's daily magnitudes.
/// - [`AggregationPolicy::MaxOfCumulative`]: a running sum accumulates
///   along each run of `qualifying` days and resets to zero on every
///   other day; the year's value is the largest running sum reached on any
///   of its days. A run spanning New Year keeps accumulating.
///
/// Every year present in `dates` gets an entry. An undefined daily
/// magnitude makes its year undefined.
///
/// # Errors
///
/// Returns [`HwmidError::LengthMismatch`] if the slices differ in length.
pub fn aggregate_yearly(
    dates: &[Date],
    magnitude: &[Option<f64>],
    qualifying: &[bool],
    policy: AggregationPolicy,
) -> Result<BTreeMap<i32, Option<f64>>, HwmidError> {
    for (len, field) in [(magnitude.len(), "magnitude"), (qualifying.len(), "qualifying")] {
        if len != dates.len() {
            return Err(HwmidError::LengthMismatch {
                expected: dates.len(),
                got: len,
                field: field.to_string(),
            });
        }
    }

    let contributions: Vec<Option<f64>> = match policy {
        AggregationPolicy::Sum => magnitude.to_vec(),
        AggregationPolicy::MaxOfCumulative => running_event_sums(magnitude, qualifying),
    };

    let mut by_year: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();
    for (date, value) in dates.iter().zip(contributions) {
        by_year.entry(date.year()).or_default().push(value);
    }

    let yearly: BTreeMap<i32, Option<f64>> = by_year
        .into_iter()
        .map(|(year, vals)| {
            let reduced = match policy {
                AggregationPolicy::Sum => sum_strict(vals),
                AggregationPolicy::MaxOfCumulative => max_strict(vals),
            };
            (year, reduced)
        })
        .collect();
    debug!(%policy, n_years = yearly.len(), "yearly aggregation done");
    Ok(yearly)
}

/// Running sum of magnitude within each qualifying run, zero outside runs.
///
/// An undefined magnitude leaves the rest of its run undefined.
fn running_event_sums(magnitude: &[Option<f64>], qualifying: &[bool]) -> Vec<Option<f64>> {
    let mut running = Some(0.0);
    magnitude
        .iter()
        .zip(qualifying)
        .map(|(&m, &q)| {
            running = if q {
                running.zip(m).map(|(acc, x)| acc + x)
            } else {
                Some(0.0)
            };
            running
        })
        .collect()
}

/// Maximum that propagates `None`; an empty input yields `Some(0.0)`.
fn max_strict(values: Vec<Option<f64>>) -> Option<f64> {
    values
        .into_iter()
        .try_fold(0.0_f64, |acc, v| v.map(|x| acc.max(x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hwmid_calendar::date_sequence;

    fn bits(b: &[u8]) -> Vec<bool> {
        b.iter().map(|&x| x == 1).collect()
    }

    #[test]
    fn sum_policy_adds_all_days() {
        let dates = date_sequence(Date::new(2001, 12, 29).unwrap(), 6);
        let mag = [Some(0.5), Some(0.25), Some(0.0), Some(1.0), Some(2.0), Some(0.0)];
        let q = bits(&[1, 1, 0, 1, 1, 0]);
        let yearly = aggregate_yearly(&dates, &mag, &q, AggregationPolicy::Sum).unwrap();
        assert_relative_eq!(yearly[&2001].unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(yearly[&2002].unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn max_of_cumulative_takes_strongest_event() {
        let dates = date_sequence(Date::new(2001, 6, 1).unwrap(), 8);
        // Two events: 0.2+0.4+0.6 = 1.2 and 0.5+0.5 = 1.0.
        let mag = [
            Some(0.2),
            Some(0.4),
            Some(0.6),
            Some(0.0),
            Some(0.5),
            Some(0.5),
            Some(0.0),
            Some(0.0),
        ];
        let q = bits(&[1, 1, 1, 0, 1, 1, 0, 0]);
        let max_cum =
            aggregate_yearly(&dates, &mag, &q, AggregationPolicy::MaxOfCumulative).unwrap();
        assert_relative_eq!(max_cum[&2001].unwrap(), 1.2, epsilon = 1e-12);

        let sum = aggregate_yearly(&dates, &mag, &q, AggregationPolicy::Sum).unwrap();
        assert_relative_eq!(sum[&2001].unwrap(), 2.2, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_resets_between_runs() {
        let dates = date_sequence(Date::new(2001, 6, 1).unwrap(), 5);
        // Qualifying days with zero magnitude still continue the run.
        let mag = [Some(1.0), Some(0.0), Some(1.0), Some(0.0), Some(1.5)];
        let q = bits(&[1, 1, 1, 0, 1]);
        let yearly =
            aggregate_yearly(&dates, &mag, &q, AggregationPolicy::MaxOfCumulative).unwrap();
        assert_relative_eq!(yearly[&2001].unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn event_spanning_new_year_keeps_accumulating() {
        let dates = date_sequence(Date::new(2001, 12, 30).unwrap(), 4);
        let mag = [Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        let q = vec![true; 4];
        let yearly =
            aggregate_yearly(&dates, &mag, &q, AggregationPolicy::MaxOfCumulative).unwrap();
        assert_relative_eq!(yearly[&2001].unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(yearly[&2002].unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn quiet_year_is_zero_under_both_policies() {
        let dates = date_sequence(Date::new(2001, 1, 1).unwrap(), 365);
        let mag = vec![Some(0.0); 365];
        let q = vec![false; 365];
        for policy in [AggregationPolicy::Sum, AggregationPolicy::MaxOfCumulative] {
            let yearly = aggregate_yearly(&dates, &mag, &q, policy).unwrap();
            assert_eq!(yearly.get(&2001), Some(&Some(0.0)));
        }
    }

    #[test]
    fn undefined_magnitude_makes_year_undefined() {
        let dates = date_sequence(Date::new(2001, 12, 30).unwrap(), 4);
        let mag = [Some(0.0), None, Some(0.0), Some(0.0)];
        let q = bits(&[0, 1, 0, 0]);
        for policy in [AggregationPolicy::Sum, AggregationPolicy::MaxOfCumulative] {
            let yearly = aggregate_yearly(&dates, &mag, &q, policy).unwrap();
            assert_eq!(yearly[&2001], None);
            assert_eq!(yearly[&2002], Some(0.0));
        }
    }

    #[test]
    fn length_mismatch_rejected() {
        let dates = date_sequence(Date::new(2001, 1, 1).unwrap(), 3);
        let result = aggregate_yearly(&dates, &[Some(0.0); 2], &[false; 3], AggregationPolicy::Sum);
        assert!(matches!(
            result,
            Err(HwmidError::LengthMismatch { field, .. }) if field == "magnitude"
        ));
    }
}
