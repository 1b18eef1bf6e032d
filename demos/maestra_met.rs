//! demos/maestra_met.rs
//!
//! Turns hourly ERA5-Land values exported to CSV (`valid_time,t2m,d2m,sp,tp,u10,v10,ssrd`)
//! into a MAESTRA met file.
//!
//! cargo run --example maestra_met -- era5_hourly.csv met.dat

use chrono::NaiveDateTime;
use era5_spi::{write_met_file, HourlyMet};
use polars::prelude::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| "era5_hourly.csv".into()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| "met.dat".into()));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(input))?
        .finish()?;

    let times = df
        .column("valid_time")?
        .str()?
        .into_iter()
        .map(|t| NaiveDateTime::parse_from_str(t.unwrap_or_default(), "%Y-%m-%d %H:%M:%S"))
        .collect::<Result<Vec<_>, _>>()?;
    let values = |name: &str| -> PolarsResult<Vec<f64>> {
        Ok(df
            .column(name)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    };

    let met = HourlyMet {
        times,
        t2m: values("t2m")?,
        d2m: values("d2m")?,
        sp: values("sp")?,
        tp: values("tp")?,
        u10: values("u10")?,
        v10: values("v10")?,
        ssrd: values("ssrd")?,
        latitude: 51.2,
        longitude: 359.1,
    };

    write_met_file(&met, &output)?;
    println!("MAESTRA met file written to {}", output.display());
    Ok(())
}
