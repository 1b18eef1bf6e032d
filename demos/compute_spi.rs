//! demos/compute_spi.rs
//!
//! Computes SPI-1/3/6/12 from a monthly precipitation CSV (`time,rain_mm`), prints the
//! report for 2022 and writes every scale next to the input file.
//!
//! cargo run --example compute_spi -- era5_precip_51.1536_-0.8582.csv

use era5_spi::{compute_spi, read_precip_csv, write_spi_csv, yearly_report, DroughtCategory, Year};
use polars::prelude::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("era5_precip_51.1536_-0.8582.csv"));

    let series = read_precip_csv(&input)?;
    let table = compute_spi(&series, &[1, 3, 6, 12])?;

    for column in table.columns() {
        if !column.is_fitted() {
            println!("SPI-{} could not be fitted: {:?}", column.scale, column.outcome);
        }
    }

    print!("{}", yearly_report(&table));

    let year_2022 = table
        .lazy()?
        .get_for_period(Year(2022))?
        .frame
        .collect()?;
    println!("{}", year_2022);

    let droughts = table
        .lazy()?
        .filter(col("spi_3").lt_eq(lit(-1.0)))
        .frame
        .select([col("date"), col("spi_3")])
        .collect()?;
    println!("Months in 3-month drought ({}):", DroughtCategory::ModeratelyDry);
    println!("{}", droughts);

    let output = input.with_extension("spi.csv");
    write_spi_csv(&table, &output)?;
    println!("SPI written to {}", output.display());
    Ok(())
}
