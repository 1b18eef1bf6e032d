//! Request bodies for the CDS retrieve API.

use crate::types::area::Area;
use crate::types::calendar::{Month, Year};
use serde::Serialize;
use std::fmt;

/// CDS datasets used for ERA5 retrievals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// ERA5-Land hourly data, used for MAESTRA met forcing.
    Era5LandHourly,
    /// ERA5 single-level monthly means, used for SPI precipitation.
    Era5SingleLevelsMonthlyMeans,
}

impl Dataset {
    pub fn id(self) -> &'static str {
        match self {
            Dataset::Era5LandHourly => "reanalysis-era5-land",
            Dataset::Era5SingleLevelsMonthlyMeans => "reanalysis-era5-single-levels-monthly-means",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// ERA5-Land variables, serialised with their CDS names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    #[serde(rename = "2m_dewpoint_temperature")]
    DewpointTemperature2m,
    #[serde(rename = "2m_temperature")]
    Temperature2m,
    SurfaceSolarRadiationDownwards,
    #[serde(rename = "10m_u_component_of_wind")]
    UComponentOfWind10m,
    #[serde(rename = "10m_v_component_of_wind")]
    VComponentOfWind10m,
    SurfacePressure,
    TotalPrecipitation,
    LeafAreaIndexHighVegetation,
}

impl Variable {
    /// The variables needed to build a MAESTRA met file.
    pub const MET_FORCING: [Variable; 8] = [
        Variable::DewpointTemperature2m,
        Variable::Temperature2m,
        Variable::SurfaceSolarRadiationDownwards,
        Variable::UComponentOfWind10m,
        Variable::VComponentOfWind10m,
        Variable::SurfacePressure,
        Variable::TotalPrecipitation,
        Variable::LeafAreaIndexHighVegetation,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Netcdf,
    Grib,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    Unarchived,
    Zip,
}

/// Body of a CDS retrieve request.
///
/// ```
/// use era5_spi::{Area, Era5Request, LatLon};
///
/// let area = Area::around(LatLon(51.1536, -0.8582), 0.125);
/// let request = Era5Request::monthly_precipitation(2020, area);
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["product_type"][0], "monthly_averaged_reanalysis");
/// assert_eq!(json["month"].as_array().unwrap().len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Era5Request {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_type: Vec<String>,
    pub variable: Vec<Variable>,
    pub year: Vec<String>,
    pub month: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub day: Vec<String>,
    pub time: Vec<String>,
    pub data_format: DataFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_format: Option<DownloadFormat>,
    pub area: Area,
}

impl Era5Request {
    /// Every hour of every day of one month of ERA5-Land met forcing, as NetCDF.
    ///
    /// Days 29 to 31 are always requested; the service drops the ones a month doesn't have.
    pub fn hourly_month(month: Month, area: Area) -> Self {
        Self {
            product_type: Vec::new(),
            variable: Variable::MET_FORCING.to_vec(),
            year: vec![month.year().to_string()],
            month: vec![format!("{:02}", month.month())],
            day: (1..=31).map(|d| format!("{d:02}")).collect(),
            time: (0..24).map(|h| format!("{h:02}:00")).collect(),
            data_format: DataFormat::Netcdf,
            download_format: Some(DownloadFormat::Unarchived),
            area,
        }
    }

    /// The twelve monthly-mean total precipitation fields of one year, as GRIB.
    pub fn monthly_precipitation(year: i32, area: Area) -> Self {
        Self {
            product_type: vec!["monthly_averaged_reanalysis".to_string()],
            variable: vec![Variable::TotalPrecipitation],
            year: vec![Year(year).to_string()],
            month: (1..=12).map(|m| format!("{m:02}")).collect(),
            day: Vec::new(),
            time: vec!["00:00".to_string()],
            data_format: DataFormat::Grib,
            download_format: None,
            area,
        }
    }
}
