//! demos/download_met.rs
//!
//! Downloads a year of hourly ERA5-Land met forcing, one NetCDF file per month, then lists
//! the files in merge order.
//!
//! cargo run --example download_met

use era5_spi::{sort_monthly_files, CdsConfig, Era5Downloader, LatLon};
use std::error::Error;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let downloader = Era5Downloader::new(CdsConfig::from_env()?)
        .await?
        .workers(4);

    let report = downloader
        .met_months()
        .location(LatLon(51.2, -0.9))
        .years(vec![2016])
        .call()
        .await?;
    println!(
        "{} downloaded, {} skipped, {} failed",
        report.downloaded.len(),
        report.skipped.len(),
        report.failed.len()
    );

    let mut files: Vec<PathBuf> = std::fs::read_dir(downloader.output_folder())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "nc"))
        .collect();
    sort_monthly_files(&mut files);
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}
