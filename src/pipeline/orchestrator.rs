use tracing::info;

use super::error::PipelineError;
use super::processor::{FileProcessor, FileReport, FileState};
use crate::io::{Candidate, discover, order_chronologically, stat_candidates};

/// Summary of one run, files listed in processing order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PipelineReport {
    pub files: Vec<FileReport>,
}

impl PipelineReport {
    pub fn files_seen(&self) -> usize {
        self.files.len()
    }

    pub fn files_marked(&self) -> usize {
        self.count(|r| r.state == FileState::Marked)
    }

    pub fn files_skipped(&self) -> usize {
        self.count(|r| r.state == FileState::SkippedFatal)
    }

    /// Files whose error rate reached the threshold
    pub fn files_rejected(&self) -> usize {
        self.count(|r| r.evaluation.is_some_and(|e| e.is_rejected()))
    }

    fn count(&self, predicate: impl Fn(&FileReport) -> bool) -> usize {
        self.files.iter().filter(|r| predicate(r)).count()
    }
}

/// Drives the file processor over discovered files, oldest first, one at a time
pub struct PipelineOrchestrator {
    processor: FileProcessor,
    pattern: String,
}

impl PipelineOrchestrator {
    pub fn new(processor: FileProcessor, pattern: impl Into<String>) -> Self {
        Self {
            processor,
            pattern: pattern.into(),
        }
    }

    /// Discover, order and process every matching file
    ///
    /// Only an invalid pattern fails the run; per-file problems are logged
    /// and reflected in the report.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let paths = discover(&self.pattern)?;
        let candidates = order_chronologically(stat_candidates(paths).await);
        info!(pattern = %self.pattern, files = candidates.len(), "Starting load");

        Ok(self.process_in_order(candidates).await)
    }

    /// Process already-ordered candidates strictly sequentially
    ///
    /// File N+1 is opened only after file N has drained and been marked.
    pub async fn process_in_order(&self, candidates: Vec<Candidate>) -> PipelineReport {
        let mut report = PipelineReport::default();
        for candidate in candidates {
            report.files.push(self.processor.process(&candidate.path).await);
        }

        info!(
            seen = report.files_seen(),
            marked = report.files_marked(),
            skipped = report.files_skipped(),
            rejected = report.files_rejected(),
            "Load finished"
        );
        report
    }
}
