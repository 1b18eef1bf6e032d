pub mod batch;
pub mod client;
pub mod downloader;
pub mod error;
pub mod files;
pub mod request;
