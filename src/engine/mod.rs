pub mod aggregator;
pub mod error;
pub mod evaluator;
pub mod limiter;
pub mod write_task;

// Re-export commonly used types
pub use aggregator::{FileOutcome, OUTCOME_BUFFER, ResultAggregator};
pub use error::EngineError;
pub use evaluator::{DEFAULT_ERROR_THRESHOLD, ErrorRateEvaluator, Evaluation};
pub use limiter::{AdmissionPermit, ConcurrencyLimiter, DEFAULT_CAPACITY};
pub use write_task::WriteTask;
