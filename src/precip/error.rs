use crate::types::calendar::Month;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrecipDataError {
    #[error("Index ({index}) and value ({values}) lengths differ")]
    LengthMismatch { index: usize, values: usize },

    #[error("Month number out of range in {0}")]
    InvalidMonth(Month),

    #[error("Months must be strictly increasing, found {current} after {previous}")]
    NotIncreasing { previous: Month, current: Month },

    #[error("Failed to read precipitation CSV '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{column}' not found in '{path}'")]
    MissingColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' in '{path}' has an unexpected type")]
    ColumnType {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Could not parse date '{value}' on row {row}")]
    DateParse { row: usize, value: String },

    #[error("Failed to build SPI frame")]
    FrameBuild(#[source] PolarsError),

    #[error("Failed to create output file '{0}'")]
    OutputCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to write CSV '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),
}
