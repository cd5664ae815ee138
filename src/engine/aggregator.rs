use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::warn;

use super::error::EngineError;

/// Outcomes buffered between write tasks and the counting consumer
pub const OUTCOME_BUFFER: usize = 1000;

/// Per-file counters, final once every dispatched write has reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOutcome {
    pub processed: u64,
    pub errors: u64,
}

impl FileOutcome {
    pub fn total(&self) -> u64 {
        self.processed + self.errors
    }
}

/// Collects exactly one outcome per dispatched write task
///
/// A single consumer task drains a bounded channel of outcomes, so the
/// counters are never touched concurrently. [`ResultAggregator::finish`]
/// joins every dispatched task before reading the final counts.
pub struct ResultAggregator {
    outcomes: mpsc::Sender<bool>,
    consumer: JoinHandle<FileOutcome>,
    tracker: TaskTracker,
    dispatched: u64,
    rejected: u64,
}

impl ResultAggregator {
    /// Start the consumer for one file
    pub fn spawn(buffer: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<bool>(buffer.max(1));

        let consumer = tokio::spawn(async move {
            let mut outcome = FileOutcome::default();
            while let Some(ok) = rx.recv().await {
                if ok {
                    outcome.processed += 1;
                } else {
                    outcome.errors += 1;
                }
            }
            outcome
        });

        Self {
            outcomes: tx,
            consumer,
            tracker: TaskTracker::new(),
            dispatched: 0,
            rejected: 0,
        }
    }

    /// Spawn a write task whose boolean result is counted
    pub fn dispatch<F>(&mut self, task: F)
    where
        F: Future<Output = bool> + Send + 'static,
    {
        let outcomes = self.outcomes.clone();
        self.dispatched += 1;
        self.tracker.spawn(async move {
            let ok = task.await;
            // Receiver lives until finish() has joined every task.
            let _ = outcomes.send(ok).await;
        });
    }

    /// Count a line that failed before reaching dispatch
    pub fn record_error(&mut self) {
        self.rejected += 1;
    }

    /// Number of write tasks dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Wait for every dispatched task, then return the final counts
    ///
    /// A task that never reported (it panicked) is counted as an error.
    pub async fn finish(self) -> Result<FileOutcome, EngineError> {
        let ResultAggregator {
            outcomes,
            consumer,
            tracker,
            dispatched,
            rejected,
        } = self;

        tracker.close();
        tracker.wait().await;
        drop(outcomes);

        let mut outcome = consumer
            .await
            .map_err(|e| EngineError::Aggregation(e.to_string()))?;

        let lost = dispatched.saturating_sub(outcome.total());
        if lost > 0 {
            warn!(lost, "Write tasks ended without reporting an outcome");
        }
        outcome.errors += lost + rejected;

        Ok(outcome)
    }
}
