pub mod error;
pub mod orchestrator;
pub mod processor;

// Re-export commonly used types
pub use error::PipelineError;
pub use orchestrator::{PipelineOrchestrator, PipelineReport};
pub use processor::{FileProcessor, FileReport, FileState};
