//! Prelude module for convenient imports
//!
//! Import everything you need with: `use memc_load::prelude::*;`

// Domain types
pub use crate::domain::{DeviceType, DomainError, Record, UserApps, decode, encode};

// IO types
pub use crate::io::{
    Candidate, GzipLineStream, IoError, discover, mark_processed, marked_path,
    order_chronologically, parse_line, stat_candidates,
};

// Storage types
pub use crate::storage::{KvBackend, MemcacheClient, MemoryBackend, ShardTable, StorageError};

// Engine types
pub use crate::engine::{
    AdmissionPermit, ConcurrencyLimiter, EngineError, ErrorRateEvaluator, Evaluation, FileOutcome,
    ResultAggregator, WriteTask,
};

// Pipeline types
pub use crate::pipeline::{
    FileProcessor, FileReport, FileState, PipelineError, PipelineOrchestrator, PipelineReport,
};

// App types
pub use crate::app::{AppError, CliApp, CliArgs, LoaderConfig, init_logging, run_codec_self_test};
