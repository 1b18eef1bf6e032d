//! High level entry point for fetching the ERA5 files used by this crate.

use crate::era5::batch::{default_workers, download_batch, BatchReport, DownloadTask};
use crate::era5::client::{CdsClient, CdsConfig, Retrieve};
use crate::era5::files::{monthly_file_name, yearly_precip_file_name};
use crate::era5::request::{Dataset, Era5Request};
use crate::error::Era5SpiError;
use crate::types::area::{Area, LatLon, DEFAULT_HALF_WIDTH_DEG};
use crate::types::calendar::Year;
use crate::utils::{ensure_dir_exists, get_data_dir};
use bon::bon;
use std::path::{Path, PathBuf};

/// Downloads ERA5 met and precipitation files into one output folder.
///
/// Existing files are never downloaded again, so an interrupted run can simply be repeated.
///
/// # Examples
///
/// ```no_run
/// # use era5_spi::{CdsConfig, Era5Downloader, Era5SpiError, LatLon};
/// # async fn run() -> Result<(), Era5SpiError> {
/// let downloader = Era5Downloader::with_output_folder(
///     CdsConfig::from_env()?,
///     "/tmp/era5".into(),
/// )
/// .await?;
///
/// let report = downloader
///     .precipitation_years()
///     .location(LatLon(51.1536, -0.8582))
///     .start_year(1981)
///     .end_year(2024)
///     .call()
///     .await?;
/// println!("{} files downloaded", report.downloaded.len());
/// # Ok(())
/// # }
/// ```
pub struct Era5Downloader<R: Retrieve = CdsClient> {
    retriever: R,
    output_folder: PathBuf,
    workers: usize,
}

impl Era5Downloader<CdsClient> {
    /// Creates a downloader talking to the CDS API, storing files in `output_folder`.
    ///
    /// # Errors
    ///
    /// Returns [`Era5SpiError::DataDirCreation`] if the folder cannot be created.
    pub async fn with_output_folder(
        config: CdsConfig,
        output_folder: PathBuf,
    ) -> Result<Self, Era5SpiError> {
        Self::with_retriever(CdsClient::new(config), output_folder).await
    }

    /// Like [`Era5Downloader::with_output_folder`], using `<cache dir>/era5_spi`.
    pub async fn new(config: CdsConfig) -> Result<Self, Era5SpiError> {
        let output_folder = get_data_dir().map_err(Era5SpiError::DataDirResolution)?;
        Self::with_output_folder(config, output_folder).await
    }
}

#[bon]
impl<R: Retrieve> Era5Downloader<R> {
    pub async fn with_retriever(retriever: R, output_folder: PathBuf) -> Result<Self, Era5SpiError> {
        ensure_dir_exists(&output_folder)
            .await
            .map_err(|e| Era5SpiError::DataDirCreation(output_folder.clone(), e))?;
        Ok(Self {
            retriever,
            output_folder,
            workers: default_workers(),
        })
    }

    /// Sets how many downloads run at the same time.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// Downloads hourly ERA5-Land met forcing, one `ERA5_YYYY_MM.nc` per month of `years`.
    ///
    /// Without `half_width_deg` only the grid cell nearest to `location` is requested.
    #[builder]
    pub async fn met_months(
        &self,
        location: LatLon,
        years: Vec<i32>,
        half_width_deg: Option<f64>,
    ) -> Result<BatchReport, Era5SpiError> {
        let area = Area::around(location, half_width_deg.unwrap_or(0.0));
        let tasks = years
            .into_iter()
            .flat_map(|year| Year(year).months())
            .map(|month| DownloadTask {
                dataset: Dataset::Era5LandHourly,
                request: Era5Request::hourly_month(month, area),
                target: self.output_folder.join(monthly_file_name(month)),
            })
            .collect();
        Ok(download_batch(&self.retriever, tasks, self.workers).await)
    }

    /// Downloads monthly-mean total precipitation, one `era5_precip_YYYY.grib` per year in
    /// `start_year..=end_year`.
    ///
    /// The requested box spans `half_width_deg` (default 0.125°) around `location`.
    #[builder]
    pub async fn precipitation_years(
        &self,
        location: LatLon,
        start_year: i32,
        end_year: i32,
        half_width_deg: Option<f64>,
    ) -> Result<BatchReport, Era5SpiError> {
        if end_year < start_year {
            return Err(Era5SpiError::DateParsingError);
        }
        let area = Area::around(location, half_width_deg.unwrap_or(DEFAULT_HALF_WIDTH_DEG));
        let tasks = (start_year..=end_year)
            .map(|year| DownloadTask {
                dataset: Dataset::Era5SingleLevelsMonthlyMeans,
                request: Era5Request::monthly_precipitation(year, area),
                target: self.output_folder.join(yearly_precip_file_name(Year(year))),
            })
            .collect();
        Ok(download_batch(&self.retriever, tasks, self.workers).await)
    }
}
