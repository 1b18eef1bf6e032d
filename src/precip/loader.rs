use crate::precip::error::PrecipDataError;
use crate::spi::table::SpiTable;
use crate::types::calendar::Month;
use crate::types::series::MonthlySeries;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub const TIME_COLUMN: &str = "time";
pub const RAIN_COLUMN: &str = "rain_mm";

/// ERA5 reports precipitation in metres of water.
pub fn metres_to_mm(metres: f64) -> f64 {
    metres * 1000.0
}

/// Reads a monthly precipitation CSV with `time` and `rain_mm` columns.
///
/// `time` may be a bare date (`1981-01-01`) or a timestamp (`1981-01-01T00:00:00.000000000`,
/// `1981-01-01 00:00:00`); only the month is kept. Rows are sorted by time before the series
/// is built and empty `rain_mm` cells become missing values.
///
/// # Errors
///
/// Returns [`PrecipDataError`] if the file cannot be parsed, a column is missing, a date is
/// malformed or two rows fall in the same month.
pub fn read_precip_csv(path: &Path) -> Result<MonthlySeries, PrecipDataError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| PrecipDataError::CsvRead(path.to_path_buf(), e))?;

    let times = df
        .column(TIME_COLUMN)
        .map_err(|e| missing_column(path, TIME_COLUMN, e))?
        .cast(&DataType::String)
        .map_err(|e| column_type(path, TIME_COLUMN, e))?;
    let rain = df
        .column(RAIN_COLUMN)
        .map_err(|e| missing_column(path, RAIN_COLUMN, e))?
        .cast(&DataType::Float64)
        .map_err(|e| column_type(path, RAIN_COLUMN, e))?;

    let times = times.str().map_err(|e| column_type(path, TIME_COLUMN, e))?;
    let rain = rain.f64().map_err(|e| column_type(path, RAIN_COLUMN, e))?;

    let mut rows = times
        .into_iter()
        .zip(rain)
        .enumerate()
        .map(|(row, (time, value))| {
            let month = parse_month(time.unwrap_or_default()).ok_or_else(|| {
                PrecipDataError::DateParse {
                    row,
                    value: time.unwrap_or_default().to_string(),
                }
            })?;
            Ok((month, value))
        })
        .collect::<Result<Vec<(Month, Option<f64>)>, PrecipDataError>>()?;
    rows.sort_by_key(|(month, _)| *month);

    let (index, values) = rows.into_iter().unzip();
    let series = MonthlySeries::new(index, values)?;
    info!(
        "Loaded {} months of precipitation from {:?} ({} missing)",
        series.len(),
        path,
        series.missing_count()
    );
    Ok(series)
}

/// Month of a `YYYY-MM-DD` date, ignoring anything after the day.
fn parse_month(value: &str) -> Option<Month> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(Month::from_date)
}

/// Writes an SPI table as CSV (`date,year,month,spi_1,...`).
pub fn write_spi_csv(table: &SpiTable, path: &Path) -> Result<(), PrecipDataError> {
    let mut df = table.to_frame().map_err(PrecipDataError::FrameBuild)?;
    let mut file =
        File::create(path).map_err(|e| PrecipDataError::OutputCreate(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| PrecipDataError::CsvWrite(path.to_path_buf(), e))?;
    info!("Wrote {} SPI rows to {:?}", df.height(), path);
    Ok(())
}

fn missing_column(path: &Path, column: &str, source: PolarsError) -> PrecipDataError {
    PrecipDataError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
        source,
    }
}

fn column_type(path: &Path, column: &str, source: PolarsError) -> PrecipDataError {
    PrecipDataError::ColumnType {
        path: path.to_path_buf(),
        column: column.to_string(),
        source,
    }
}
