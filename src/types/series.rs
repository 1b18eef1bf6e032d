//! Monthly precipitation series with first-class missing values.

use crate::precip::error::PrecipDataError;
use crate::types::calendar::{AnyMonth, Month};

/// An ordered monthly series of optional values (precipitation in millimetres).
///
/// Months are strictly increasing. Missing observations are `None`; `NaN` inputs are
/// normalised to `None` on construction so downstream code only has one notion of missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    index: Vec<Month>,
    values: Vec<Option<f64>>,
}

impl MonthlySeries {
    /// Builds a series from a month index and matching values.
    ///
    /// # Errors
    ///
    /// Returns [`PrecipDataError::LengthMismatch`] if the two vectors differ in length,
    /// [`PrecipDataError::InvalidMonth`] if a month number is outside 1 to 12 and
    /// [`PrecipDataError::NotIncreasing`] if a month does not come strictly after its predecessor.
    pub fn new(index: Vec<Month>, values: Vec<Option<f64>>) -> Result<Self, PrecipDataError> {
        if index.len() != values.len() {
            return Err(PrecipDataError::LengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }
        if let Some(&bad) = index.iter().find(|m| !(1..=12).contains(&m.month())) {
            return Err(PrecipDataError::InvalidMonth(bad));
        }
        if let Some(w) = index.windows(2).find(|w| w[1] <= w[0]) {
            return Err(PrecipDataError::NotIncreasing {
                previous: w[0],
                current: w[1],
            });
        }
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(Self { index, values })
    }

    /// Builds a contiguous series starting at `start`, one value per consecutive month.
    ///
    /// An out of range `start` such as month 13 is carried into the following year.
    ///
    /// ```
    /// use era5_spi::{Month, MonthlySeries};
    ///
    /// let series = MonthlySeries::contiguous(Month::new(11, 2020), vec![Some(10.0), None, Some(3.5)]);
    /// assert_eq!(series.index()[2], Month::new(1, 2021));
    /// assert_eq!(series.missing_count(), 1);
    /// ```
    pub fn contiguous(start: Month, values: Vec<Option<f64>>) -> Self {
        let index = std::iter::successors(Some(start.normalised()), |m| Some(m.succ()))
            .take(values.len())
            .collect();
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self { index, values }
    }

    pub fn index(&self) -> &[Month] {
        &self.index
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.index
            .binary_search(&month)
            .ok()
            .and_then(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<f64>)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// True when every month follows its predecessor with no calendar gap.
    pub fn is_contiguous(&self) -> bool {
        self.index.windows(2).all(|w| w[0].succ() == w[1])
    }

    /// The sub-series between `start` and `end` (inclusive). Returns `None` if either
    /// bound cannot be resolved to a month.
    pub fn slice(&self, start: impl AnyMonth, end: impl AnyMonth) -> Option<MonthlySeries> {
        let start = start.get_month_range()?.start;
        let end = end.get_month_range()?.end;
        let from = self.index.partition_point(|m| *m < start);
        let to = self.index.partition_point(|m| *m <= end);
        let (index, values) = if from < to {
            (
                self.index[from..to].to_vec(),
                self.values[from..to].to_vec(),
            )
        } else {
            (Vec::new(), Vec::new())
        };
        Some(MonthlySeries { index, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::calendar::Year;

    #[test]
    fn test_new_rejects_unsorted_months() {
        let result = MonthlySeries::new(
            vec![Month::new(2, 2020), Month::new(1, 2020)],
            vec![Some(1.0), Some(2.0)],
        );
        assert!(matches!(
            result,
            Err(PrecipDataError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn test_new_rejects_month_out_of_range() {
        let result = MonthlySeries::new(
            vec![Month::new(12, 2020), Month::new(13, 2020), Month::new(1, 2021)],
            vec![Some(1.0), Some(2.0), Some(3.0)],
        );
        assert!(matches!(
            result,
            Err(PrecipDataError::InvalidMonth(Month(2020, 13)))
        ));

        let result = MonthlySeries::new(vec![Month::new(0, 2020)], vec![Some(1.0)]);
        assert!(matches!(result, Err(PrecipDataError::InvalidMonth(_))));
    }

    #[test]
    fn test_contiguous_normalises_start() {
        let series = MonthlySeries::contiguous(Month::new(13, 2020), vec![Some(1.0); 2]);
        assert_eq!(series.index(), &[Month::new(1, 2021), Month::new(2, 2021)]);

        let series = MonthlySeries::contiguous(Month::new(0, 2020), vec![Some(1.0)]);
        assert_eq!(series.index(), &[Month::new(12, 2019)]);
        assert!(crate::compute_spi(&series, &[1]).unwrap().to_frame().is_ok());
    }

    #[test]
    fn test_new_rejects_duplicate_months() {
        let result = MonthlySeries::new(
            vec![Month::new(2, 2020), Month::new(2, 2020)],
            vec![Some(1.0), Some(2.0)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = MonthlySeries::new(vec![Month::new(2, 2020)], vec![]);
        assert!(matches!(
            result,
            Err(PrecipDataError::LengthMismatch {
                index: 1,
                values: 0
            })
        ));
    }

    #[test]
    fn test_nan_becomes_missing() {
        let series = MonthlySeries::new(
            vec![Month::new(1, 2020), Month::new(2, 2020)],
            vec![Some(f64::NAN), Some(4.0)],
        )
        .unwrap();
        assert_eq!(series.values(), &[None, Some(4.0)]);
        assert_eq!(series.get(Month::new(2, 2020)), Some(4.0));
        assert_eq!(series.get(Month::new(3, 2020)), None);
    }

    #[test]
    fn test_contiguity() {
        let series = MonthlySeries::contiguous(Month::new(1, 2020), vec![Some(1.0); 14]);
        assert!(series.is_contiguous());
        assert_eq!(series.index().last(), Some(&Month::new(2, 2021)));

        let gappy = MonthlySeries::new(
            vec![Month::new(1, 2020), Month::new(3, 2020)],
            vec![Some(1.0), Some(2.0)],
        )
        .unwrap();
        assert!(!gappy.is_contiguous());
    }

    #[test]
    fn test_slice_by_year() {
        let series = MonthlySeries::contiguous(Month::new(7, 2021), vec![Some(1.0); 24]);
        let year = series.slice(Year(2022), Year(2022)).unwrap();
        assert_eq!(year.len(), 12);
        assert_eq!(year.index()[0], Month::new(1, 2022));

        let empty = series.slice(Year(2030), Year(2031)).unwrap();
        assert!(empty.is_empty());
    }
}
