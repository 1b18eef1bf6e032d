//! Multi-scale SPI computation and the resulting month-indexed table.

use crate::spi::error::SpiError;
use crate::spi::rolling::rolling_sum;
use crate::spi::spi_frame::SpiLazyFrame;
use crate::spi::standardize::{standardize_series, GammaStandardizer, Standardize};
use crate::types::calendar::Month;
use crate::types::series::MonthlySeries;
use log::{info, warn};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Whether a scale's distribution fit succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleOutcome {
    Fitted,
    /// The fit was skipped or failed; every value of the column is missing.
    Degraded(SpiError),
}

/// SPI values for one accumulation scale, aligned with [`SpiTable::index`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpiColumn {
    pub scale: usize,
    pub values: Vec<Option<f64>>,
    pub outcome: ScaleOutcome,
}

impl SpiColumn {
    /// Column name used in frames and CSV output, e.g. `spi_3`.
    pub fn name(&self) -> String {
        format!("spi_{}", self.scale)
    }

    pub fn is_fitted(&self) -> bool {
        self.outcome == ScaleOutcome::Fitted
    }
}

/// SPI series for several scales sharing the month index of the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiTable {
    index: Vec<Month>,
    columns: Vec<SpiColumn>,
}

impl SpiTable {
    pub fn index(&self) -> &[Month] {
        &self.index
    }

    /// Columns in ascending scale order.
    pub fn columns(&self) -> &[SpiColumn] {
        &self.columns
    }

    pub fn column(&self, scale: usize) -> Option<&SpiColumn> {
        self.columns.iter().find(|c| c.scale == scale)
    }

    pub fn scales(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.scale).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Value of `scale` at `month`; `None` when the month, the scale or the value is missing.
    pub fn get(&self, month: Month, scale: usize) -> Option<f64> {
        let row = self.index.binary_search(&month).ok()?;
        self.column(scale)?.values[row]
    }

    /// Collects the table into a polars `DataFrame` with columns
    /// `date`, `year`, `month` and one nullable `spi_{scale}` column per scale.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if a month cannot be turned into a date or the
    /// frame cannot be assembled.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let dates = self
            .index
            .iter()
            .map(|m| {
                m.first_day().ok_or_else(|| {
                    PolarsError::ComputeError(format!("invalid month {m}").into())
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;
        let years: Vec<i32> = self.index.iter().map(|m| m.year()).collect();
        let months: Vec<u32> = self.index.iter().map(|m| m.month()).collect();

        let mut columns = vec![
            Column::new("date".into(), dates),
            Column::new("year".into(), years),
            Column::new("month".into(), months),
        ];
        for spi in &self.columns {
            columns.push(Column::new(spi.name().into(), spi.values.clone()));
        }
        DataFrame::new(columns)
    }

    /// The table as an [`SpiLazyFrame`] for period filtering.
    pub fn lazy(&self) -> PolarsResult<SpiLazyFrame> {
        Ok(SpiLazyFrame::new(self.to_frame()?.lazy()))
    }
}

/// Computes SPI for every scale in `scales` with the default gamma backend.
///
/// Each scale is accumulated with [`rolling_sum`] and standardized independently.
/// A scale whose fit is not possible (too few values, degenerate sample) yields an
/// all-missing column with a [`ScaleOutcome::Degraded`] outcome; it never fails the call.
///
/// # Errors
///
/// Returns [`SpiError::InvalidScale`] if a scale is zero.
///
/// # Examples
///
/// ```
/// use era5_spi::{compute_spi, Month, MonthlySeries};
///
/// let rain: Vec<Option<f64>> = (0..48)
///     .map(|i| Some(40.0 + 25.0 * ((i % 12) as f64 / 2.0).sin() + (i % 7) as f64))
///     .collect();
/// let series = MonthlySeries::contiguous(Month::new(1, 2000), rain);
///
/// let table = compute_spi(&series, &[1, 3, 6]).unwrap();
/// assert_eq!(table.len(), 48);
/// assert_eq!(table.scales(), vec![1, 3, 6]);
/// assert!(table.get(Month::new(2, 2000), 3).is_none());
/// assert!(table.get(Month::new(3, 2000), 3).is_some());
/// ```
pub fn compute_spi(series: &MonthlySeries, scales: &[usize]) -> Result<SpiTable, SpiError> {
    compute_spi_with(series, scales, &GammaStandardizer)
}

/// Like [`compute_spi`], with a caller supplied standardization backend.
pub fn compute_spi_with<S: Standardize + ?Sized>(
    series: &MonthlySeries,
    scales: &[usize],
    standardizer: &S,
) -> Result<SpiTable, SpiError> {
    if let Some(&zero) = scales.iter().find(|&&s| s == 0) {
        return Err(SpiError::InvalidScale(zero));
    }
    let scales: BTreeSet<usize> = scales.iter().copied().collect();

    let columns = scales
        .into_iter()
        .map(|scale| spi_for_scale(series, scale, standardizer))
        .collect();

    Ok(SpiTable {
        index: series.index().to_vec(),
        columns,
    })
}

fn spi_for_scale<S: Standardize + ?Sized>(
    series: &MonthlySeries,
    scale: usize,
    standardizer: &S,
) -> SpiColumn {
    let accumulated = rolling_sum(series.values(), scale);
    match standardize_series(&accumulated, standardizer) {
        Ok(values) => {
            info!(
                "SPI-{} computed for {} of {} months",
                scale,
                values.iter().filter(|v| v.is_some()).count(),
                values.len()
            );
            SpiColumn {
                scale,
                values,
                outcome: ScaleOutcome::Fitted,
            }
        }
        Err(e) => {
            warn!("SPI-{} left empty: {}", scale, e);
            SpiColumn {
                scale,
                values: vec![None; series.len()],
                outcome: ScaleOutcome::Degraded(e),
            }
        }
    }
}
