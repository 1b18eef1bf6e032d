//! demos/plot_spi.rs
//!
//! Plots SPI-3 and SPI-12 from a monthly precipitation CSV.
//!
//! cargo run --example plot_spi --features demos -- era5_precip_51.1536_-0.8582.csv

use era5_spi::{compute_spi, read_precip_csv};
use plotlars::{Axis, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let input = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("era5_precip_51.1536_-0.8582.csv"));

    let series = read_precip_csv(&input)?;
    let spi = compute_spi(&series, &[3, 12])?.to_frame()?;

    println!("Generating SPI plot...");
    plot_spi(&spi);
    println!("Plot shown in browser.");
    Ok(())
}

fn plot_spi(data: &DataFrame) {
    TimeSeriesPlot::builder()
        .data(data)
        .x("date")
        .y("spi_3")
        .additional_series(vec!["spi_12"])
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0)])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(Text::from("Standardized Precipitation Index").size(18))
        .legend(&Legend::new().x(0.05).y(0.1))
        .x_title("date")
        .y_title("SPI")
        .y_axis(
            &Axis::new()
                .show_grid(false)
                .zero_line_color(Rgb(0, 0, 0)),
        )
        .build()
        .plot();
}
