use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaestraError {
    #[error("No hourly records to convert")]
    Empty,

    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Failed to create met file '{0}'")]
    OutputCreate(PathBuf, #[source] std::io::Error),

    #[error("Failed to write met file header")]
    HeaderWrite(#[source] std::io::Error),

    #[error("Failed to build met data frame")]
    FrameBuild(#[source] PolarsError),

    #[error("Failed to write met data rows")]
    DataWrite(#[source] PolarsError),
}
