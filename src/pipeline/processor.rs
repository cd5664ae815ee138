use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::engine::{
    ConcurrencyLimiter, EngineError, ErrorRateEvaluator, Evaluation, FileOutcome, OUTCOME_BUFFER,
    ResultAggregator, WriteTask,
};
use crate::io::{GzipLineStream, IoError, mark_processed, parse_line};
use crate::storage::ShardTable;

/// Where a file ended up
///
/// `Opening → Scanning → Draining → Evaluated → Marked`, or `SkippedFatal`
/// straight from `Opening` when the file cannot be opened or decompressed.
/// A file whose marker rename failed stays `Evaluated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Opening,
    Scanning,
    Draining,
    Evaluated,
    Marked,
    SkippedFatal,
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub state: FileState,
    pub outcome: Option<FileOutcome>,
    pub evaluation: Option<Evaluation>,
    pub marked_path: Option<PathBuf>,
}

impl FileReport {
    fn skipped(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: FileState::SkippedFatal,
            outcome: None,
            evaluation: None,
            marked_path: None,
        }
    }
}

/// Loads one file: decompress, parse, route, dispatch bounded writes,
/// drain, evaluate and mark
pub struct FileProcessor {
    shards: Arc<ShardTable>,
    limiter: ConcurrencyLimiter,
    evaluator: ErrorRateEvaluator,
    dry_run: bool,
}

impl FileProcessor {
    /// Create a processor with the default gate capacity and threshold
    pub fn new(shards: Arc<ShardTable>) -> Self {
        Self {
            shards,
            limiter: ConcurrencyLimiter::default(),
            evaluator: ErrorRateEvaluator::default(),
            dry_run: false,
        }
    }

    pub fn with_limiter(mut self, limiter: ConcurrencyLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_evaluator(mut self, evaluator: ErrorRateEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Log would-be writes instead of sending them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Process one file end to end
    ///
    /// Never fails: open/decompress errors skip the file (left unmarked),
    /// everything after that ends with a marker rename attempt.
    pub async fn process(&self, path: &Path) -> FileReport {
        let file = path.display().to_string();
        info!(file, "Processing file");
        enter(&file, FileState::Opening);

        let lines = match GzipLineStream::open(path).await {
            Ok(lines) => lines,
            Err(e) => {
                error!(file, error = %e, "Cannot read file, skipping");
                return FileReport::skipped(path);
            }
        };

        enter(&file, FileState::Scanning);
        let outcome = match self.scan(&file, lines).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(file, error = %e, "Cannot finish file, leaving unmarked");
                return FileReport::skipped(path);
            }
        };
        debug!(file, processed = outcome.processed, errors = outcome.errors, "Drained");

        let evaluation = self.evaluator.report(&file, &outcome);
        enter(&file, FileState::Evaluated);

        let marked_path = match mark_processed(path).await {
            Ok(marked) => {
                enter(&file, FileState::Marked);
                Some(marked)
            }
            Err(e) => {
                error!(file, error = %e, "Cannot mark file as processed");
                None
            }
        };

        FileReport {
            path: path.to_path_buf(),
            state: if marked_path.is_some() {
                FileState::Marked
            } else {
                FileState::Evaluated
            },
            outcome: Some(outcome),
            evaluation: Some(evaluation),
            marked_path,
        }
    }

    /// Scan lines and dispatch writes, then drain every outcome
    ///
    /// Parse and routing failures are counted without dispatching. A read
    /// error ends the scan early; writes already in flight are still drained.
    async fn scan<S>(&self, file: &str, mut lines: S) -> Result<FileOutcome, EngineError>
    where
        S: Stream<Item = Result<String, IoError>> + Unpin,
    {
        let mut aggregator = ResultAggregator::spawn(OUTCOME_BUFFER);

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!(file, error = %e, "Read failed, stopping scan");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let record = match parse_line(&line) {
                Ok(record) => record,
                Err(e) => {
                    debug!(file, error = %e, "Skipping unparseable line");
                    aggregator.record_error();
                    continue;
                }
            };

            let backend = match self.shards.route(record.device_type()) {
                Ok(backend) => Arc::clone(backend),
                Err(_) => {
                    warn!(file, device_type = record.device_type(), "Unknown device type");
                    aggregator.record_error();
                    continue;
                }
            };

            // Blocks the scan while the gate is saturated.
            let permit = self.limiter.acquire().await?;
            aggregator.dispatch(WriteTask::new(record, backend, self.dry_run).execute(permit));
        }

        debug!(file, dispatched = aggregator.dispatched(), "Scan finished");
        enter(file, FileState::Draining);
        aggregator.finish().await
    }
}

fn enter(file: &str, state: FileState) {
    debug!(file, ?state, "File state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceType;
    use crate::storage::MemoryBackend;
    use futures::stream;

    fn setup() -> (FileProcessor, Arc<MemoryBackend>, Arc<MemoryBackend>) {
        let idfa = Arc::new(MemoryBackend::new("mem-idfa"));
        let gaid = Arc::new(MemoryBackend::new("mem-gaid"));
        let shards = ShardTable::new()
            .with_shard(DeviceType::Idfa, idfa.clone())
            .with_shard(DeviceType::Gaid, gaid.clone());
        (FileProcessor::new(Arc::new(shards)), idfa, gaid)
    }

    type Lines = stream::Iter<std::vec::IntoIter<Result<String, IoError>>>;

    fn lines(items: &[&str]) -> Lines {
        stream::iter(
            items
                .iter()
                .map(|l| Ok(l.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn routes_records_to_their_shards() {
        let (processor, idfa, gaid) = setup();
        let input = lines(&[
            "idfa\t1\t1.0\t2.0\t1,2",
            "gaid\t2\t3.0\t4.0\t3",
            "idfa\t3\t5.0\t6.0\t",
        ]);

        let outcome = processor.scan("test", input).await.unwrap();

        assert_eq!(outcome, FileOutcome { processed: 3, errors: 0 });
        assert_eq!(idfa.len(), 2);
        assert_eq!(gaid.len(), 1);
        assert!(gaid.get("gaid:2").is_some());
    }

    #[tokio::test]
    async fn line_failures_are_counted_and_scan_continues() {
        let (processor, idfa, _) = setup();
        let input = lines(&[
            "idfa\t1rfw452y52g2gq4g\tbad\t42.42\t1,2,3",
            "\t\t55.55\t42.42\t1",
            "too\tfew",
            "adid\tknown-but-unrouted\t1\t1\t1",
            "ios\tunknown\t1\t1\t1",
            "idfa\tID1\t55.55\t42.42\t1,x,3",
        ]);

        let outcome = processor.scan("test", input).await.unwrap();

        assert_eq!(outcome, FileOutcome { processed: 1, errors: 5 });
        assert_eq!(idfa.len(), 1);
    }

    #[tokio::test]
    async fn blank_lines_are_not_counted() {
        let (processor, _, _) = setup();
        let input = lines(&["", "   ", "\n", "idfa\t1\t1\t1\t1\n"]);

        let outcome = processor.scan("test", input).await.unwrap();
        assert_eq!(outcome, FileOutcome { processed: 1, errors: 0 });
    }

    #[tokio::test]
    async fn read_error_stops_scan_but_drains() {
        let (processor, idfa, _) = setup();
        let input = stream::iter(vec![
            Ok("idfa\t1\t1\t1\t1".to_string()),
            Err(IoError::Read(std::io::Error::other("corrupt deflate stream"))),
            Ok("idfa\t2\t1\t1\t1".to_string()),
        ]);

        let outcome = processor.scan("test", input).await.unwrap();

        assert_eq!(outcome, FileOutcome { processed: 1, errors: 0 });
        assert!(idfa.get("idfa:2").is_none());
    }

    #[tokio::test]
    async fn failed_writes_are_errors() {
        let (processor, idfa, _) = setup();
        idfa.set_reject_writes(true);

        let outcome = processor
            .scan("test", lines(&["idfa\t1\t1\t1\t1", "gaid\t1\t1\t1\t1"]))
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome { processed: 1, errors: 1 });
    }

    #[tokio::test]
    async fn dry_run_counts_without_writing() {
        let (processor, idfa, _) = setup();
        let processor = processor.with_dry_run(true);

        let outcome = processor.scan("test", lines(&["idfa\t1\t1\t1\t1"])).await.unwrap();

        assert_eq!(outcome.processed, 1);
        assert!(idfa.is_empty());
    }

    #[tokio::test]
    async fn gate_is_fully_released_after_drain() {
        let (processor, _, _) = setup();
        let processor = processor.with_limiter(ConcurrencyLimiter::new(2));
        let input: Vec<String> = (0..20).map(|i| format!("idfa\t{i}\t1\t1\t1")).collect();
        let refs: Vec<&str> = input.iter().map(String::as_str).collect();

        processor.scan("test", lines(&refs)).await.unwrap();

        assert_eq!(processor.limiter().available(), 2);
    }

    #[tokio::test]
    async fn missing_file_is_skipped() {
        let (processor, _, _) = setup();
        let dir = tempfile::tempdir().unwrap();

        let report = processor.process(&dir.path().join("absent.tsv.gz")).await;

        assert_eq!(report.state, FileState::SkippedFatal);
        assert!(report.outcome.is_none());
    }
}
