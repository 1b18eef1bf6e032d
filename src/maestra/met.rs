use crate::maestra::error::MaestraError;
use chrono::{Datelike, NaiveDateTime};
use polars::prelude::*;
use std::fmt;

const KELVIN_OFFSET: f64 = 273.15;
const SECONDS_PER_HOUR: f64 = 3600.0;
/// Conversion from W m-2 of shortwave to umol m-2 s-1 of PAR.
const PAR_PER_WATT: f64 = 2.3;

/// One point's hourly ERA5-Land fields, as decoded from NetCDF.
///
/// `tp` (m) and `ssrd` (J m-2) are accumulations, the temperatures are in Kelvin and `sp` in
/// Pa. `longitude` may be on the 0–360 grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyMet {
    pub times: Vec<NaiveDateTime>,
    pub t2m: Vec<f64>,
    pub d2m: Vec<f64>,
    pub sp: Vec<f64>,
    pub tp: Vec<f64>,
    pub u10: Vec<f64>,
    pub v10: Vec<f64>,
    pub ssrd: Vec<f64>,
    pub latitude: f64,
    pub longitude: f64,
}

impl HourlyMet {
    /// Number of hourly records, after checking every column has the same non-zero length.
    pub fn record_count(&self) -> Result<usize, MaestraError> {
        let expected = self.times.len();
        if expected == 0 {
            return Err(MaestraError::Empty);
        }
        let columns: [(&'static str, &[f64]); 7] = [
            ("t2m", &self.t2m),
            ("d2m", &self.d2m),
            ("sp", &self.sp),
            ("tp", &self.tp),
            ("u10", &self.u10),
            ("v10", &self.v10),
            ("ssrd", &self.ssrd),
        ];
        for (column, values) in columns {
            if values.len() != expected {
                return Err(MaestraError::LengthMismatch {
                    column,
                    expected,
                    found: values.len(),
                });
            }
        }
        Ok(expected)
    }
}

/// Derived MAESTRA columns, one row per hour.
#[derive(Debug, Clone, PartialEq)]
pub struct MaestraMet {
    pub doy: Vec<u32>,
    /// Air temperature, °C.
    pub tair: Vec<f64>,
    /// Relative humidity, %.
    pub rh: Vec<f64>,
    /// Precipitation, mm per hour.
    pub ppt: Vec<f64>,
    /// Wind speed, m s-1.
    pub wind: Vec<f64>,
    /// Shortwave radiation, W m-2.
    pub rad: Vec<f64>,
    /// Surface pressure, Pa.
    pub press: Vec<f64>,
    /// PAR, umol m-2 s-1.
    pub par: Vec<f64>,
}

pub const COLUMN_NAMES: [&str; 8] = ["DOY", "TAIR", "RH%", "PPT", "WIND", "RAD", "PRESS", "PAR"];

impl MaestraMet {
    pub fn from_hourly(met: &HourlyMet) -> Result<Self, MaestraError> {
        met.record_count()?;

        let tp_mm: Vec<f64> = met.tp.iter().map(|m| m * 1000.0).collect();
        let rad: Vec<f64> = deaccumulate(&met.ssrd)
            .into_iter()
            .map(|joules| joules / SECONDS_PER_HOUR)
            .collect();

        Ok(Self {
            doy: met.times.iter().map(|t| t.ordinal()).collect(),
            tair: met.t2m.iter().map(|t| t - KELVIN_OFFSET).collect(),
            rh: met
                .t2m
                .iter()
                .zip(&met.d2m)
                .map(|(&t, &d)| relative_humidity(t, d))
                .collect(),
            ppt: deaccumulate(&tp_mm),
            wind: met
                .u10
                .iter()
                .zip(&met.v10)
                .map(|(u, v)| u.hypot(*v))
                .collect(),
            par: rad.iter().map(|r| r * PAR_PER_WATT).collect(),
            rad,
            press: met.sp.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.doy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doy.is_empty()
    }

    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let [doy, tair, rh, ppt, wind, rad, press, par] = COLUMN_NAMES;
        DataFrame::new(vec![
            Column::new(doy.into(), self.doy.clone()),
            Column::new(tair.into(), self.tair.clone()),
            Column::new(rh.into(), self.rh.clone()),
            Column::new(ppt.into(), self.ppt.clone()),
            Column::new(wind.into(), self.wind.clone()),
            Column::new(rad.into(), self.rad.clone()),
            Column::new(press.into(), self.press.clone()),
            Column::new(par.into(), self.par.clone()),
        ])
    }
}

/// Magnus formula, hPa for a temperature in °C.
pub fn saturation_vapour_pressure(celsius: f64) -> f64 {
    6.112 * ((17.67 * celsius) / (celsius + 243.5)).exp()
}

/// Relative humidity (%) from air and dewpoint temperature in Kelvin, clipped to 0–100.
pub fn relative_humidity(air_k: f64, dewpoint_k: f64) -> f64 {
    let es = saturation_vapour_pressure(air_k - KELVIN_OFFSET);
    let ea = saturation_vapour_pressure(dewpoint_k - KELVIN_OFFSET);
    (ea / es * 100.0).clamp(0.0, 100.0)
}

/// Step differences of an accumulated field, the first step being zero.
///
/// Negative steps, where the accumulation restarts, become zero.
pub fn deaccumulate(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    std::iter::once(first)
        .chain(values.iter().copied())
        .zip(values)
        .map(|(previous, current)| (current - previous).max(0.0))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.degrees, self.minutes, self.seconds)
    }
}

/// Splits the magnitude of a decimal angle into whole degrees, minutes and rounded seconds.
///
/// ```
/// use era5_spi::decimal_to_dms;
///
/// let dms = decimal_to_dms(51.1536);
/// assert_eq!((dms.degrees, dms.minutes, dms.seconds), (51, 9, 13));
/// ```
pub fn decimal_to_dms(decimal: f64) -> Dms {
    let magnitude = decimal.abs();
    let degrees = magnitude.trunc();
    let minutes = ((magnitude - degrees) * 60.0).trunc();
    let seconds = (((magnitude - degrees) * 60.0 - minutes) * 60.0).round_ties_even();
    Dms {
        degrees: degrees as u32,
        minutes: minutes as u32,
        seconds: seconds as u32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// `N`/`S` for latitudes, `E`/`W` for longitudes. Zero counts as north and east.
pub fn hemisphere(value: f64, axis: Axis) -> char {
    match (axis, value >= 0.0) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    }
}

/// Maps a 0–360 longitude onto −180–180.
pub fn normalise_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn two_hours() -> HourlyMet {
        let day = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap();
        HourlyMet {
            times: vec![
                day.and_hms_opt(0, 0, 0).unwrap(),
                day.and_hms_opt(1, 0, 0).unwrap(),
            ],
            t2m: vec![283.15, 285.15],
            d2m: vec![281.15, 286.15],
            sp: vec![101_325.0, 101_300.0],
            tp: vec![0.0005, 0.0015],
            u10: vec![3.0, 0.0],
            v10: vec![4.0, -2.0],
            ssrd: vec![1000.0, 361_000.0],
            latitude: 51.2,
            longitude: 359.1,
        }
    }

    #[test]
    fn test_derived_columns() -> Result<(), MaestraError> {
        let met = MaestraMet::from_hourly(&two_hours())?;

        assert_eq!(met.doy, vec![32, 32]);
        assert_relative_eq!(met.tair[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(met.ppt[0], 0.0);
        assert_relative_eq!(met.ppt[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(met.wind[0], 5.0);
        assert_relative_eq!(met.wind[1], 2.0);
        assert_relative_eq!(met.rad[1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(met.par[1], 230.0, epsilon = 1e-9);
        assert_eq!(met.press, vec![101_325.0, 101_300.0]);
        // Dewpoint above air temperature saturates
        assert_eq!(met.rh[1], 100.0);
        assert!(met.rh[0] > 80.0 && met.rh[0] < 90.0);
        Ok(())
    }

    #[test]
    fn test_relative_humidity_reference() {
        // 20 °C air, 10 °C dewpoint
        assert_relative_eq!(relative_humidity(293.15, 283.15), 52.51, epsilon = 0.01);
        assert_relative_eq!(relative_humidity(293.15, 293.15), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deaccumulate_clips_resets() {
        assert_eq!(deaccumulate(&[1.0, 3.0, 6.0, 0.5, 1.5]), vec![0.0, 2.0, 3.0, 0.0, 1.0]);
        assert!(deaccumulate(&[]).is_empty());
    }

    #[test]
    fn test_length_checks() {
        assert!(matches!(HourlyMet::default().record_count(), Err(MaestraError::Empty)));

        let mut met = two_hours();
        met.ssrd.pop();
        assert!(matches!(
            MaestraMet::from_hourly(&met),
            Err(MaestraError::LengthMismatch { column: "ssrd", expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_coordinates() {
        let lon = normalise_longitude(359.1418);
        assert_relative_eq!(lon, -0.8582, epsilon = 1e-9);
        assert_eq!(normalise_longitude(180.0), 180.0);
        assert_eq!(hemisphere(lon, Axis::Longitude), 'W');
        assert_eq!(hemisphere(0.0, Axis::Latitude), 'N');
        assert_eq!(hemisphere(-33.9, Axis::Latitude), 'S');
        assert_eq!(decimal_to_dms(lon).to_string(), "0 51 30");
    }
}
