use thiserror::Error;

use crate::io::IoError;

/// Run-level errors; anything scoped to a single file is logged instead
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] IoError),
}
