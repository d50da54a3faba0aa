//! Producer/worker/aggregator pipeline for a full scan.
//!
//! One generator task feeds a bounded queue; a pool of verifier workers
//! pulls handles, decides joint availability, and forwards the passing ones
//! into a second bounded queue; a single aggregator collects them. All
//! coordination is done through channel closure and task joins; nothing
//! polls, and the progress display is purely an observer.
//!
//! Shutdown ordering: the generator drops its sender when the range is
//! exhausted, workers drain the queue and exit on channel close, the last
//! worker dropping its result sender closes the aggregation queue, and the
//! aggregator returns the collected set once it drains.

use crate::error::HandleCheckError;
use crate::generate::HandleSpace;
use crate::progress::ProgressTracker;
use crate::types::{ScanConfig, ScanReport};
use crate::verifier::HandleVerifier;
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

/// Coordinates one scan run from enumeration to aggregation.
///
/// # Example
///
/// ```rust,no_run
/// use handle_check_lib::{
///     default_platforms, HandleSpace, HandleVerifier, ProgressTracker, ScanConfig, ScanPipeline,
/// };
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ScanConfig::default().with_length(2);
///     let verifier = HandleVerifier::from_specs(&default_platforms(), config.probe_timeout)?;
///     let space = HandleSpace::new(&config.alphabet, config.length)?;
///     let progress = Arc::new(ProgressTracker::new(space.total()));
///
///     let report = ScanPipeline::new(config, verifier).run(progress).await?;
///     println!("{} handles free everywhere", report.available.len());
///     Ok(())
/// }
/// ```
pub struct ScanPipeline {
    config: ScanConfig,
    verifier: Arc<HandleVerifier>,
}

impl ScanPipeline {
    /// Create a pipeline over a configured verifier.
    pub fn new(config: ScanConfig, verifier: HandleVerifier) -> Self {
        Self {
            config,
            verifier: Arc::new(verifier),
        }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run the scan to completion and return the aggregated report.
    ///
    /// The caller owns the [`ProgressTracker`] so it can attach a display
    /// loop (or nothing at all); every worker increments it exactly once per
    /// handle, pass or fail.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid alphabet, length, or index
    /// range, and `Internal` if a pipeline task panics.
    pub async fn run(
        &self,
        progress: Arc<ProgressTracker>,
    ) -> Result<ScanReport, HandleCheckError> {
        if self.config.queue_capacity == 0 {
            return Err(HandleCheckError::config("queue capacity must be at least 1"));
        }
        let space = HandleSpace::new(&self.config.alphabet, self.config.length)?;
        let (start, end) = space.resolve_range(self.config.start_index, self.config.end_index)?;
        let total = end - start;
        let started = Instant::now();

        let (handle_tx, handle_rx) = mpsc::channel::<String>(self.config.queue_capacity);
        let (result_tx, mut result_rx) = mpsc::channel::<String>(self.config.queue_capacity);
        let handle_rx = Arc::new(Mutex::new(handle_rx));

        tracing::debug!(
            total,
            start,
            end,
            workers = self.config.concurrency,
            "starting scan pipeline"
        );

        // Generator: pure and cheap, blocks only on a full queue. Dropping
        // the sender at the end of the range signals exhaustion downstream.
        let generator = tokio::spawn(async move {
            for handle in space.iter_range(start, end) {
                if handle_tx.send(handle).await.is_err() {
                    // Workers are gone; nothing left to feed.
                    break;
                }
            }
        });

        // Verifier workers: pull from the shared queue, verify, forward
        // passing handles. The queue lock is released before any network
        // call runs.
        let mut workers = Vec::with_capacity(self.config.concurrency);
        for worker_id in 0..self.config.concurrency {
            let queue = Arc::clone(&handle_rx);
            let results = result_tx.clone();
            let verifier = Arc::clone(&self.verifier);
            let progress = Arc::clone(&progress);

            workers.push(tokio::spawn(async move {
                loop {
                    let handle = queue.lock().await.recv().await;
                    let Some(handle) = handle else { break };

                    let result = verifier.verify(&handle).await;
                    progress.increment();

                    if result.available && results.send(result.handle).await.is_err() {
                        break;
                    }
                }
                tracing::trace!(worker_id, "verifier worker drained");
            }));
        }
        // The workers hold the only remaining senders; once they all exit,
        // the aggregation queue closes.
        drop(result_tx);

        // Aggregator: single consumer, receipt order, no deduplication
        // needed since the generator emits each handle exactly once.
        let aggregator = tokio::spawn(async move {
            let mut available = Vec::new();
            while let Some(handle) = result_rx.recv().await {
                available.push(handle);
            }
            available
        });

        generator
            .await
            .map_err(|e| HandleCheckError::internal(format!("generator task failed: {}", e)))?;
        tracing::debug!("generation complete, draining verifier queue");

        try_join_all(workers)
            .await
            .map_err(|e| HandleCheckError::internal(format!("verifier worker failed: {}", e)))?;
        tracing::debug!("verification drained, flushing aggregator");

        let available = aggregator
            .await
            .map_err(|e| HandleCheckError::internal(format!("aggregator task failed: {}", e)))?;

        let report = ScanReport {
            available,
            processed: progress.processed(),
            total,
            duration: started.elapsed(),
        };
        tracing::debug!(
            processed = report.processed,
            found = report.available.len(),
            "scan pipeline complete"
        );
        Ok(report)
    }
}
