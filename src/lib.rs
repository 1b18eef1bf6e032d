mod era5;
mod error;
mod maestra;
mod precip;
mod spi;
mod types;
mod utils;

pub use error::Era5SpiError;

pub use spi::error::SpiError;
pub use spi::gamma::{fit_gamma, GammaParams, MIN_SAMPLE_SIZE};
pub use spi::report::{yearly_report, DroughtCategory};
pub use spi::rolling::rolling_sum;
pub use spi::spi_frame::SpiLazyFrame;
pub use spi::standardize::{probit, standardize_series, GammaStandardizer, Standardize};
pub use spi::table::{compute_spi, compute_spi_with, ScaleOutcome, SpiColumn, SpiTable};

pub use types::area::{Area, LatLon, DEFAULT_HALF_WIDTH_DEG};
pub use types::calendar::{AnyMonth, Month, StartEndMonth, Year};
pub use types::series::MonthlySeries;

pub use precip::error::PrecipDataError;
pub use precip::loader::{metres_to_mm, read_precip_csv, write_spi_csv};

pub use era5::batch::{chunkify, default_workers, download_batch, BatchReport, DownloadTask};
pub use era5::client::{CdsClient, CdsConfig, Retrieve, DEFAULT_CDS_URL, DEFAULT_POLL_INTERVAL};
pub use era5::downloader::Era5Downloader;
pub use era5::error::DownloadError;
pub use era5::files::{
    monthly_file_name, parse_year_month, sort_monthly_files, yearly_precip_file_name,
};
pub use era5::request::{DataFormat, Dataset, DownloadFormat, Era5Request, Variable};

pub use maestra::error::MaestraError;
pub use maestra::met::{
    decimal_to_dms, deaccumulate, hemisphere, normalise_longitude, relative_humidity,
    saturation_vapour_pressure, Axis, Dms, HourlyMet, MaestraMet,
};
pub use maestra::writer::{write_met, write_met_file};
