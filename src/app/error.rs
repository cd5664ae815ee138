use thiserror::Error;

use crate::domain::DomainError;
use crate::io::IoError;
use crate::pipeline::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] IoError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Self-test failed: {0}")]
    SelfTest(String),
}
