//! Contains the `SpiLazyFrame` structure for lazy period filtering of SPI tables.

use crate::types::calendar::AnyMonth;
use crate::Era5SpiError;
use polars::prelude::{col, lit, Expr, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding an SPI table.
///
/// The frame has the layout produced by [`crate::SpiTable::to_frame`]: `date`, `year`
/// (`i32`), `month` (`u32`) and one `spi_{scale}` column per scale. Filtering stays lazy
/// until `.collect()` is called on [`SpiLazyFrame::frame`].
///
/// Instances are typically obtained via [`crate::SpiTable::lazy`].
#[derive(Clone)]
pub struct SpiLazyFrame {
    /// The underlying Polars LazyFrame containing the SPI data.
    pub frame: LazyFrame,
}

impl SpiLazyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Filters rows with an arbitrary Polars predicate, returning a new frame.
    ///
    /// ```
    /// # use era5_spi::{compute_spi, Month, MonthlySeries};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let rain = (0..36).map(|i| Some(30.0 + (i % 5) as f64 * 12.0)).collect();
    /// # let series = MonthlySeries::contiguous(Month::new(1, 2020), rain);
    /// let table = compute_spi(&series, &[1])?;
    ///
    /// // Months drier than one standard deviation below normal
    /// let dry = table.lazy()?.filter(col("spi_1").lt(lit(-1.0))).frame.collect()?;
    /// println!("{}", dry);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> SpiLazyFrame {
        SpiLazyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps rows between `start` and `end` (inclusive). The range may span year boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`Era5SpiError::DateParsingError`] if `start` or `end` cannot be resolved to a month.
    pub fn get_range(
        &self,
        start: impl AnyMonth,
        end: impl AnyMonth,
    ) -> Result<SpiLazyFrame, Era5SpiError> {
        let start = start
            .get_month_range()
            .ok_or(Era5SpiError::DateParsingError)?
            .start;
        let end = end
            .get_month_range()
            .ok_or(Era5SpiError::DateParsingError)?
            .end;

        // (year > start_year) OR (year == start_year AND month >= start_month)
        let after_start = col("year").gt(lit(start.year())).or(col("year")
            .eq(lit(start.year()))
            .and(col("month").gt_eq(lit(start.month()))));

        // (year < end_year) OR (year == end_year AND month <= end_month)
        let before_end = col("year").lt(lit(end.year())).or(col("year")
            .eq(lit(end.year()))
            .and(col("month").lt_eq(lit(end.month()))));

        Ok(self.filter(after_start.and(before_end)))
    }

    /// Keeps the row of a single month. For a multi-month input such as a year, its first
    /// month is used.
    pub fn get_at(&self, month: impl AnyMonth) -> Result<SpiLazyFrame, Era5SpiError> {
        let month = month
            .get_month_range()
            .ok_or(Era5SpiError::DateParsingError)?
            .start;
        Ok(self.filter(
            col("year")
                .eq(lit(month.year()))
                .and(col("month").eq(lit(month.month()))),
        ))
    }

    /// Keeps every row inside `period`, e.g. a whole [`crate::Year`].
    pub fn get_for_period(&self, period: impl AnyMonth) -> Result<SpiLazyFrame, Era5SpiError> {
        let range = period
            .get_month_range()
            .ok_or(Era5SpiError::DateParsingError)?;
        self.get_range(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_spi, Month, MonthlySeries, Year};

    fn test_frame() -> SpiLazyFrame {
        let rain = (0..72)
            .map(|i| Some(45.0 + ((i * 13) % 29) as f64 + 20.0 * ((i % 12) as f64).sin()))
            .collect();
        let series = MonthlySeries::contiguous(Month::new(1, 2018), rain);
        compute_spi(&series, &[1, 3, 6]).unwrap().lazy().unwrap()
    }

    #[test]
    fn test_get_for_period_year() -> Result<(), Box<dyn std::error::Error>> {
        let df = test_frame().get_for_period(Year(2022))?.frame.collect()?;
        assert_eq!(df.height(), 12);

        let years = df.column("year")?.i32()?;
        assert!(years.into_iter().all(|y| y == Some(2022)));
        Ok(())
    }

    #[test]
    fn test_get_range_across_year_boundary() -> Result<(), Box<dyn std::error::Error>> {
        let df = test_frame()
            .get_range(Month::new(11, 2019), Month::new(2, 2020))?
            .frame
            .collect()?;
        assert_eq!(df.height(), 4);

        let months = df.column("month")?.u32()?;
        assert_eq!(months.get(0), Some(11));
        assert_eq!(months.get(3), Some(2));
        Ok(())
    }

    #[test]
    fn test_get_at_single_month() -> Result<(), Box<dyn std::error::Error>> {
        let df = test_frame().get_at(Month::new(5, 2018))?.frame.collect()?;
        assert_eq!(df.height(), 1);
        // SPI-6 needs six months of history
        assert_eq!(df.column("spi_6")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(matches!(
            test_frame().get_at(Month::new(13, 2018)),
            Err(Era5SpiError::DateParsingError)
        ));
    }

    #[test]
    fn test_future_range_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let df = test_frame()
            .get_range(Year(2300), Year(2300))?
            .frame
            .collect()?;
        assert_eq!(df.height(), 0);
        Ok(())
    }
}
