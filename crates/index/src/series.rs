//! Daily series container and the selection / grouping capabilities the
//! pipeline consumes.

use std::collections::BTreeMap;

use hwmid_calendar::{Date, DateRange, date_sequence};

use crate::error::HwmidError;

/// A contiguous daily series of observations for a single location.
///
/// Each value is either defined (`Some`) or missing (`None`). Dates are
/// strictly consecutive days, so positional runs correspond to runs of
/// calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<Date>,
    values: Vec<Option<f64>>,
}

impl DailySeries {
    /// Creates a new `DailySeries` after validating inputs.
    ///
    /// # Errors
    ///
    /// - [`HwmidError::EmptyData`] if `values` is empty.
    /// - [`HwmidError::LengthMismatch`] if `dates` and `values` differ in length.
    /// - [`HwmidError::NonContiguousDates`] if consecutive dates are not one day apart.
    /// - [`HwmidError::NonFiniteData`] if a defined value is NaN or infinite.
    pub fn new(dates: Vec<Date>, values: Vec<Option<f64>>) -> Result<Self, HwmidError> {
        if values.is_empty() {
            return Err(HwmidError::EmptyData);
        }
        if dates.len() != values.len() {
            return Err(HwmidError::LengthMismatch {
                expected: values.len(),
                got: dates.len(),
                field: "dates".to_string(),
            });
        }
        for (i, pair) in dates.windows(2).enumerate() {
            if pair[0].days_until(pair[1]) != 1 {
                return Err(HwmidError::NonContiguousDates {
                    index: i + 1,
                    previous: pair[0].to_string(),
                    current: pair[1].to_string(),
                });
            }
        }
        if let Some(index) = values
            .iter()
            .position(|v| v.is_some_and(|x| !x.is_finite()))
        {
            return Err(HwmidError::NonFiniteData { index });
        }
        Ok(Self { dates, values })
    }

    /// Creates a series whose dates start at `start` and run one per day.
    ///
    /// # Errors
    ///
    /// Same as [`DailySeries::new`].
    pub fn from_start(start: Date, values: Vec<Option<f64>>) -> Result<Self, HwmidError> {
        let dates = date_sequence(start, values.len());
        Self::new(dates, values)
    }

    /// Returns the date of each time step.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the observation of each time step.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Returns the number of time steps.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no time steps.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the inclusive date range covered by the series.
    pub fn coverage(&self) -> DateRange {
        let first = self.dates[0];
        let last = self.dates[self.dates.len() - 1];
        DateRange::new(first, last).expect("dates are validated ascending")
    }

    /// Checks that `ref_period` lies entirely within the series coverage.
    ///
    /// # Errors
    ///
    /// Returns [`HwmidError::RefPeriodOutOfRange`] otherwise.
    pub fn check_ref_period(&self, ref_period: DateRange) -> Result<(), HwmidError> {
        let coverage = self.coverage();
        if !coverage.covers(&ref_period) {
            return Err(HwmidError::RefPeriodOutOfRange {
                ref_period: ref_period.to_string(),
                coverage: coverage.to_string(),
            });
        }
        Ok(())
    }

    /// Iterates over `(date, value)` pairs whose date satisfies `predicate`.
    pub fn select<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = (Date, Option<f64>)> + 'a
    where
        P: Fn(Date) -> bool + 'a,
    {
        self.dates
            .iter()
            .zip(self.values.iter())
            .filter(move |&(&d, _)| predicate(d))
            .map(|(&d, &v)| (d, v))
    }

    /// Iterates over the `(date, value)` pairs within `range`.
    pub fn select_range(
        &self,
        range: DateRange,
    ) -> impl Iterator<Item = (Date, Option<f64>)> + '_ {
        self.select(move |d| range.contains(d))
    }

    /// Groups the selected observations by `key` and reduces each group.
    ///
    /// Groups are returned in ascending key order. The reducer receives the
    /// group's values, missing entries included.
    pub fn group_reduce<K, F, R, T>(
        &self,
        range: Option<DateRange>,
        key: F,
        reduce: R,
    ) -> BTreeMap<K, T>
    where
        K: Ord,
        F: Fn(Date) -> K,
        R: Fn(&[Option<f64>]) -> T,
    {
        let mut groups: BTreeMap<K, Vec<Option<f64>>> = BTreeMap::new();
        for (date, value) in self.select(move |d| range.is_none_or(|r| r.contains(d))) {
            groups.entry(key(date)).or_default().push(value);
        }
        groups
            .into_iter()
            .map(|(k, vals)| (k, reduce(&vals)))
            .collect()
    }

    /// Returns the calendar year of each time step.
    pub fn years(&self) -> Vec<i32> {
        self.dates.iter().map(|d| d.year()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    #[test]
    fn from_start_builds_contiguous_dates() {
        let s = DailySeries::from_start(date(2000, 2, 28), vec![Some(1.0); 3]).unwrap();
        assert_eq!(s.dates()[1], date(2000, 2, 29));
        assert_eq!(s.coverage().end(), date(2000, 3, 1));
    }

    #[test]
    fn empty_rejected() {
        assert!(matches!(
            DailySeries::new(vec![], vec![]),
            Err(HwmidError::EmptyData)
        ));
    }

    #[test]
    fn length_mismatch_rejected() {
        let result = DailySeries::new(vec![date(2000, 1, 1)], vec![Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(HwmidError::LengthMismatch { .. })));
    }

    #[test]
    fn gap_rejected() {
        let result = DailySeries::new(
            vec![date(2000, 1, 1), date(2000, 1, 3)],
            vec![Some(1.0), Some(2.0)],
        );
        assert!(matches!(
            result,
            Err(HwmidError::NonContiguousDates { index: 1, .. })
        ));
    }

    #[test]
    fn nan_rejected() {
        let result = DailySeries::from_start(date(2000, 1, 1), vec![Some(1.0), Some(f64::NAN)]);
        assert!(matches!(
            result,
            Err(HwmidError::NonFiniteData { index: 1 })
        ));
    }

    #[test]
    fn missing_values_allowed() {
        let s = DailySeries::from_start(date(2000, 1, 1), vec![None, Some(2.0), None]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.values()[0], None);
    }

    #[test]
    fn ref_period_must_lie_within_coverage() {
        let s = DailySeries::from_start(date(2001, 1, 1), vec![Some(1.0); 730]).unwrap();
        assert!(s.check_ref_period(DateRange::years(2001, 2002).unwrap()).is_ok());
        assert!(s.check_ref_period(DateRange::years(2002, 2002).unwrap()).is_ok());
        match s.check_ref_period(DateRange::years(2000, 2001).unwrap()) {
            Err(HwmidError::RefPeriodOutOfRange {
                ref_period,
                coverage,
            }) => {
                assert_eq!(ref_period, "2000-01-01..=2001-12-31");
                assert_eq!(coverage, "2001-01-01..=2002-12-31");
            }
            other => panic!("expected RefPeriodOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn select_range_inclusive() {
        let s = DailySeries::from_start(date(1999, 12, 30), (0..5).map(|i| Some(i as f64)).collect())
            .unwrap();
        let year_2000 = DateRange::years(2000, 2000).unwrap();
        let picked: Vec<Option<f64>> = s.select_range(year_2000).map(|(_, v)| v).collect();
        assert_eq!(picked, vec![Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn group_reduce_by_year() {
        let values: Vec<Option<f64>> = (0..731).map(|i| Some(i as f64)).collect();
        let s = DailySeries::from_start(date(2000, 1, 1), values).unwrap();
        let counts = s.group_reduce(None, |d| d.year(), |v| v.len());
        assert_eq!(counts.get(&2000), Some(&366));
        assert_eq!(counts.get(&2001), Some(&365));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn group_reduce_respects_range() {
        let values: Vec<Option<f64>> = (0..731).map(|i| Some(i as f64)).collect();
        let s = DailySeries::from_start(date(2000, 1, 1), values).unwrap();
        let only_2001 = DateRange::years(2001, 2001).unwrap();
        let counts = s.group_reduce(Some(only_2001), |d| d.year(), |v| v.len());
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![2001]);
    }
}
