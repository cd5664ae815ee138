use std::path::PathBuf;
use std::time::SystemTime;

use glob::MatchOptions;
use tracing::{debug, warn};

use super::error::IoError;

/// A discovered input file and its modification time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Expand a glob pattern into candidate paths
///
/// Wildcards do not match a leading dot, so files already carrying the
/// processed marker are not picked up again. Entries that cannot be read
/// while globbing are logged and skipped.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, IoError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(pattern, options)? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!(error = %e, "Skipping unreadable glob entry"),
        }
    }

    debug!(pattern, count = paths.len(), "Discovered files");
    Ok(paths)
}

/// Read modification times, dropping (and logging) files that cannot be stat'ed
pub async fn stat_candidates(paths: Vec<PathBuf>) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let modified = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.modified(),
            Err(e) => Err(e),
        };
        match modified {
            Ok(modified) => candidates.push(Candidate { path, modified }),
            Err(e) => warn!(file = %path.display(), error = %e, "Cannot stat file, skipping"),
        }
    }
    candidates
}

/// Oldest first; equal times keep their discovery order
pub fn order_chronologically(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.modified);
    candidates
}
