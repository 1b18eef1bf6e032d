use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not decode the response from {url}")]
    InvalidResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Job {job_id} ended with status '{status}'")]
    JobFailed { job_id: String, status: String },

    #[error("Results of job {0} contain no download link")]
    MissingAsset(String),

    #[error("Failed to create temporary download file in '{0}'")]
    TempFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to write downloaded data to '{0}'")]
    DownloadIo(PathBuf, #[source] std::io::Error),

    #[error("Failed to move download into place at '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Target '{0}' has no parent directory")]
    InvalidTarget(PathBuf),

    #[error("Environment variable {0} is not set")]
    MissingConfig(&'static str),
}
