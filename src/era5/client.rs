//! Minimal client for the CDS retrieve API (v1).
//!
//! A retrieval is a job: the request is submitted, the job is polled until it finishes and the
//! result file is streamed to disk. Retries and rate limiting are left to the caller.

use crate::era5::error::DownloadError;
use crate::era5::request::{Dataset, Era5Request};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

pub const DEFAULT_CDS_URL: &str = "https://cds.climate.copernicus.eu/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

const URL_VAR: &str = "CDSAPI_URL";
const KEY_VAR: &str = "CDSAPI_KEY";

/// Anything that can fetch one ERA5 request into a file.
#[async_trait]
pub trait Retrieve: Send + Sync {
    /// Downloads the result of `request` on `dataset` to `target`.
    ///
    /// On error `target` must not exist afterwards.
    async fn retrieve(
        &self,
        dataset: Dataset,
        request: &Era5Request,
        target: &Path,
    ) -> Result<(), DownloadError>;
}

/// Endpoint and personal access token of a CDS account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdsConfig {
    pub url: String,
    pub key: String,
}

impl CdsConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Reads `CDSAPI_KEY` and, optionally, `CDSAPI_URL` (defaults to [`DEFAULT_CDS_URL`]).
    pub fn from_env() -> Result<Self, DownloadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DownloadError> {
        let key = lookup(KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .ok_or(DownloadError::MissingConfig(KEY_VAR))?;
        let url = lookup(URL_VAR).unwrap_or_else(|| DEFAULT_CDS_URL.to_string());
        Ok(Self::new(url, key))
    }

    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    #[serde(rename = "jobID")]
    job_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct JobResults {
    asset: Option<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    value: AssetValue,
}

#[derive(Debug, Deserialize)]
struct AssetValue {
    href: String,
}

pub struct CdsClient {
    config: CdsConfig,
    http: Client,
    poll_interval: Duration,
}

impl CdsClient {
    pub fn new(config: CdsConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn submit(&self, dataset: Dataset, request: &Era5Request) -> Result<String, DownloadError> {
        let url = format!(
            "{}/retrieve/v1/processes/{}/execution",
            self.config.base_url(),
            dataset
        );
        let body = json!({ "inputs": request });
        let status: JobStatus = self
            .send_json(self.authorized(self.http.post(&url)).json(&body), &url)
            .await?;
        info!("Submitted {} request as job {}", dataset, status.job_id);
        Ok(status.job_id)
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<(), DownloadError> {
        let url = format!("{}/retrieve/v1/jobs/{}", self.config.base_url(), job_id);
        loop {
            let job: JobStatus = self
                .send_json(self.authorized(self.http.get(&url)), &url)
                .await?;
            debug!("Job {} is {}", job_id, job.status);
            match job.status.as_str() {
                "successful" => return Ok(()),
                "failed" | "rejected" | "dismissed" => {
                    return Err(DownloadError::JobFailed {
                        job_id: job_id.to_string(),
                        status: job.status.clone(),
                    })
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }

    async fn result_href(&self, job_id: &str) -> Result<String, DownloadError> {
        let url = format!("{}/retrieve/v1/jobs/{}/results", self.config.base_url(), job_id);
        let results: JobResults = self
            .send_json(self.authorized(self.http.get(&url)), &url)
            .await?;
        results
            .asset
            .map(|asset| asset.value.href)
            .ok_or_else(|| DownloadError::MissingAsset(job_id.to_string()))
    }

    /// Streams `href` into a temporary file next to `target`, then renames it into place.
    async fn download_to(&self, href: &str, target: &Path) -> Result<u64, DownloadError> {
        let dir = target_dir(target)?;
        let temp = NamedTempFile::new_in(&dir).map_err(|e| DownloadError::TempFile(dir.clone(), e))?;
        let io_error = |e: std::io::Error| DownloadError::DownloadIo(target.to_path_buf(), e);

        let response = self.send(self.http.get(href), href).await?;
        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);

        let mut file = tokio::fs::File::from_std(temp.as_file().try_clone().map_err(io_error)?);
        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(io_error)?;
        file.flush().await.map_err(io_error)?;
        drop(file);

        temp.persist(target)
            .map_err(|e| DownloadError::Persist(target.to_path_buf(), e.error))?;
        Ok(written)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("PRIVATE-TOKEN", &self.config.key)
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<Response, DownloadError> {
        let response = builder
            .send()
            .await
            .map_err(|e| DownloadError::NetworkRequest(url.to_string(), e))?;

        match response.error_for_status() {
            Ok(resp) => Ok(resp),
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                Err(if let Some(status) = e.status() {
                    DownloadError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    DownloadError::NetworkRequest(url.to_string(), e)
                })
            }
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        url: &str,
    ) -> Result<T, DownloadError> {
        self.send(builder, url)
            .await?
            .json()
            .await
            .map_err(|e| DownloadError::InvalidResponse {
                url: url.to_string(),
                source: e,
            })
    }
}

#[async_trait]
impl Retrieve for CdsClient {
    async fn retrieve(
        &self,
        dataset: Dataset,
        request: &Era5Request,
        target: &Path,
    ) -> Result<(), DownloadError> {
        let job_id = self.submit(dataset, request).await?;
        self.wait_for_job(&job_id).await?;
        let href = self.result_href(&job_id).await?;
        let bytes = self.download_to(&href, target).await?;
        info!("Downloaded {} bytes to {:?}", bytes, target);
        Ok(())
    }
}

fn target_dir(target: &Path) -> Result<PathBuf, DownloadError> {
    match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(DownloadError::InvalidTarget(target.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::area::{Area, LatLon};
    use crate::types::calendar::Month;
    use mockito::{Matcher, Server};
    use tempfile::tempdir;

    fn request() -> Era5Request {
        Era5Request::hourly_month(Month::new(1, 2016), Area::point(LatLon(51.2, -0.9)))
    }

    fn client(server: &Server) -> CdsClient {
        CdsClient::new(CdsConfig::new(server.url(), "secret-key"))
            .with_poll_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retrieve_full_job_flow() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = Server::new_async().await;

        let submit = server
            .mock("POST", "/retrieve/v1/processes/reanalysis-era5-land/execution")
            .match_header("PRIVATE-TOKEN", "secret-key")
            .match_body(Matcher::PartialJson(json!({
                "inputs": { "data_format": "netcdf", "month": ["01"] }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jobID": "job-1", "status": "accepted"}"#)
            .create_async()
            .await;
        let status = server
            .mock("GET", "/retrieve/v1/jobs/job-1")
            .match_header("PRIVATE-TOKEN", "secret-key")
            .with_header("content-type", "application/json")
            .with_body(r#"{"jobID": "job-1", "status": "successful"}"#)
            .create_async()
            .await;
        let results = server
            .mock("GET", "/retrieve/v1/jobs/job-1/results")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "asset": { "value": {
                        "href": format!("{}/download/job-1.nc", server.url()),
                        "file:size": 12
                    }}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let download = server
            .mock("GET", "/download/job-1.nc")
            .with_body(b"fake netcdf!")
            .create_async()
            .await;

        let dir = tempdir()?;
        let target = dir.path().join("ERA5_2016_01.nc");
        client(&server)
            .retrieve(Dataset::Era5LandHourly, &request(), &target)
            .await?;

        assert_eq!(std::fs::read(&target)?, b"fake netcdf!");
        // Only the finished file remains in the directory
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);

        submit.assert_async().await;
        status.assert_async().await;
        results.assert_async().await;
        download.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_job_leaves_no_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/retrieve/v1/processes/reanalysis-era5-land/execution")
            .with_status(201)
            .with_body(r#"{"jobID": "job-2", "status": "accepted"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/retrieve/v1/jobs/job-2")
            .with_body(r#"{"jobID": "job-2", "status": "failed"}"#)
            .create_async()
            .await;

        let dir = tempdir()?;
        let target = dir.path().join("ERA5_2016_01.nc");
        let result = client(&server)
            .retrieve(Dataset::Era5LandHourly, &request(), &target)
            .await;

        match result {
            Err(DownloadError::JobFailed { job_id, status }) => {
                assert_eq!(job_id, "job-2");
                assert_eq!(status, "failed");
            }
            other => panic!("Expected JobFailed, got {other:?}"),
        }
        assert!(!target.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_is_http_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/retrieve/v1/processes/reanalysis-era5-land/execution")
            .with_status(401)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let result = client(&server)
            .retrieve(Dataset::Era5LandHourly, &request(), &dir.path().join("x.nc"))
            .await;

        match result {
            Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 401),
            other => panic!("Expected HttpStatus, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_asset() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/retrieve/v1/processes/reanalysis-era5-land/execution")
            .with_body(r#"{"jobID": "job-3", "status": "accepted"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/retrieve/v1/jobs/job-3")
            .with_body(r#"{"jobID": "job-3", "status": "successful"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/retrieve/v1/jobs/job-3/results")
            .with_body("{}")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let result = client(&server)
            .retrieve(Dataset::Era5LandHourly, &request(), &dir.path().join("x.nc"))
            .await;
        assert!(matches!(result, Err(DownloadError::MissingAsset(id)) if id == "job-3"));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = CdsConfig::from_lookup(|name| match name {
            "CDSAPI_KEY" => Some("abc".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config, CdsConfig::new(DEFAULT_CDS_URL, "abc"));

        let missing = CdsConfig::from_lookup(|_| None);
        assert!(matches!(missing, Err(DownloadError::MissingConfig("CDSAPI_KEY"))));
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let config = CdsConfig::new("https://example.org/api/", "k");
        assert_eq!(config.base_url(), "https://example.org/api");
    }
}
