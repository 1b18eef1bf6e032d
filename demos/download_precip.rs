//! demos/download_precip.rs
//!
//! Downloads ERA5 monthly total precipitation around Alice Holt for 1981-2024.
//! Needs `CDSAPI_KEY` (and optionally `CDSAPI_URL`) in the environment.
//!
//! cargo run --example download_precip

use era5_spi::{CdsConfig, Era5Downloader, Era5SpiError, LatLon};

#[tokio::main]
async fn main() -> Result<(), Era5SpiError> {
    let downloader = Era5Downloader::new(CdsConfig::from_env()?).await?;
    let alice_holt = LatLon(51.1536, -0.8582);

    let report = downloader
        .precipitation_years()
        .location(alice_holt)
        .start_year(1981)
        .end_year(2024)
        .call()
        .await?;

    println!(
        "{} downloaded, {} already present in {}",
        report.downloaded.len(),
        report.skipped.len(),
        downloader.output_folder().display()
    );
    for (path, error) in &report.failed {
        println!("failed {}: {}", path.display(), error);
    }
    Ok(())
}
