use tracing::{error, info};

use super::aggregator::FileOutcome;

/// Highest acceptable errors/processed ratio (exclusive)
pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.01;

/// Verdict for one file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Nothing was written; no rate is computed
    NothingProcessed,
    /// Error rate below the threshold
    Accepted { rate: f64 },
    /// Error rate at or above the threshold
    Rejected { rate: f64 },
}

impl Evaluation {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Judges a file's aggregated counts against a fixed error-rate threshold
#[derive(Debug, Clone, Copy)]
pub struct ErrorRateEvaluator {
    threshold: f64,
}

impl ErrorRateEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Pure verdict; `processed == 0` short-circuits even when errors exist
    pub fn evaluate(&self, outcome: &FileOutcome) -> Evaluation {
        if outcome.processed == 0 {
            return Evaluation::NothingProcessed;
        }

        let rate = outcome.errors as f64 / outcome.processed as f64;
        if rate < self.threshold {
            Evaluation::Accepted { rate }
        } else {
            Evaluation::Rejected { rate }
        }
    }

    /// Evaluate and log the verdict for `file`
    pub fn report(&self, file: &str, outcome: &FileOutcome) -> Evaluation {
        let evaluation = self.evaluate(outcome);
        match evaluation {
            Evaluation::NothingProcessed => {}
            Evaluation::Accepted { rate } => {
                info!(file, rate, "Acceptable error rate. Successful load");
            }
            Evaluation::Rejected { rate } => {
                error!(
                    file,
                    rate,
                    threshold = self.threshold,
                    "High error rate. Failed load"
                );
            }
        }
        evaluation
    }
}

impl Default for ErrorRateEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_THRESHOLD)
    }
}
