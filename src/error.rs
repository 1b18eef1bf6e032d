use crate::era5::error::DownloadError;
use crate::maestra::error::MaestraError;
use crate::precip::error::PrecipDataError;
use crate::spi::error::SpiError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Era5SpiError {
    #[error(transparent)]
    Spi(#[from] SpiError),

    #[error(transparent)]
    PrecipData(#[from] PrecipDataError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Maestra(#[from] MaestraError),

    #[error("Could not resolve the requested month or period")]
    DateParsingError,

    #[error("Failed to create data directory '{0}'")]
    DataDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine data directory")]
    DataDirResolution(#[source] std::io::Error),
}
