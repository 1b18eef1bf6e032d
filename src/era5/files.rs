//! Naming and ordering of downloaded ERA5 files.

use crate::types::calendar::{Month, Year};
use regex::Regex;
use std::path::{Path, PathBuf};

const MONTHLY_FILE_PATTERN: &str = r"ERA5_(\d{4})_(\d{2})\.nc";

/// `ERA5_YYYY_MM.nc`, one file of hourly met data per month.
pub fn monthly_file_name(month: Month) -> String {
    format!("ERA5_{:04}_{:02}.nc", month.year(), month.month())
}

/// `era5_precip_YYYY.grib`, the twelve monthly precipitation means of one year.
pub fn yearly_precip_file_name(year: Year) -> String {
    format!("era5_precip_{year}.grib")
}

/// Recovers the month from a file named by [`monthly_file_name`].
///
/// Only the file name is inspected.
///
/// ```
/// use era5_spi::{parse_year_month, Month};
/// use std::path::Path;
///
/// assert_eq!(parse_year_month(Path::new("/data/ERA5_2016_07.nc")), Some(Month::new(7, 2016)));
/// assert_eq!(parse_year_month(Path::new("/data/ERA5_merged.nc")), None);
/// ```
pub fn parse_year_month(path: &Path) -> Option<Month> {
    let name = path.file_name()?.to_str()?;
    let captures = Regex::new(MONTHLY_FILE_PATTERN).ok()?.captures(name)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let month = captures.get(2)?.as_str().parse().ok()?;
    Some(Month::new(month, year))
}

/// Orders monthly files chronologically.
///
/// Files whose name doesn't match the monthly pattern sort before all others.
pub fn sort_monthly_files(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| parse_year_month(p).map_or((0, 0), |m| (m.year(), m.month())));
}
