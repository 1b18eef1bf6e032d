//! Concurrent download of many ERA5 requests.

use crate::era5::client::Retrieve;
use crate::era5::error::DownloadError;
use crate::era5::request::{Dataset, Era5Request};
use futures_util::future::join_all;
use log::{info, warn};
use std::path::PathBuf;

/// One request and the file it should end up in.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    pub dataset: Dataset,
    pub request: Era5Request,
    pub target: PathBuf,
}

/// What happened to every task of a batch. Order within each list is unspecified.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, DownloadError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

enum TaskOutcome {
    Downloaded,
    Skipped,
    Failed(DownloadError),
}

/// One worker per available core, keeping one free; at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Deals `items` round-robin into at most `n` non-empty chunks.
///
/// ```
/// use era5_spi::chunkify;
///
/// let chunks = chunkify((0..7).collect(), 3);
/// assert_eq!(chunks, vec![vec![0, 3, 6], vec![1, 4], vec![2, 5]]);
/// ```
pub fn chunkify<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let n = n.max(1);
    let mut chunks: Vec<Vec<T>> = (0..n).map(|_| Vec::new()).collect();
    for (i, item) in items.into_iter().enumerate() {
        chunks[i % n].push(item);
    }
    chunks.retain(|c| !c.is_empty());
    chunks
}

/// Runs `tasks` split over `workers` concurrent chunks, each chunk downloading in sequence.
///
/// Tasks whose target already exists are skipped. A failing task is logged and recorded in
/// the report; it never stops the other tasks.
pub async fn download_batch<R: Retrieve + ?Sized>(
    retriever: &R,
    tasks: Vec<DownloadTask>,
    workers: usize,
) -> BatchReport {
    let total = tasks.len();
    let chunks = chunkify(tasks, workers);
    info!("Downloading {} files with {} workers", total, chunks.len());

    let results = join_all(
        chunks
            .into_iter()
            .map(|chunk| download_chunk(retriever, chunk)),
    )
    .await;

    let mut report = BatchReport::default();
    for (target, outcome) in results.into_iter().flatten() {
        match outcome {
            TaskOutcome::Downloaded => report.downloaded.push(target),
            TaskOutcome::Skipped => report.skipped.push(target),
            TaskOutcome::Failed(e) => report.failed.push((target, e)),
        }
    }
    info!(
        "Batch finished: {} downloaded, {} skipped, {} failed",
        report.downloaded.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}

async fn download_chunk<R: Retrieve + ?Sized>(
    retriever: &R,
    chunk: Vec<DownloadTask>,
) -> Vec<(PathBuf, TaskOutcome)> {
    let mut outcomes = Vec::with_capacity(chunk.len());
    for task in chunk {
        if tokio::fs::try_exists(&task.target).await.unwrap_or(false) {
            info!("Skipping {:?}, already exists.", task.target);
            outcomes.push((task.target, TaskOutcome::Skipped));
            continue;
        }

        info!("Downloading {:?}...", task.target);
        let outcome = match retriever
            .retrieve(task.dataset, &task.request, &task.target)
            .await
        {
            Ok(()) => TaskOutcome::Downloaded,
            Err(e) => {
                warn!("Failed {:?}: {}", task.target, e);
                TaskOutcome::Failed(e)
            }
        };
        outcomes.push((task.target, outcome));
    }
    outcomes
}
