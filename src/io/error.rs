use std::io;
use thiserror::Error;

use crate::domain::DomainError;

/// IO-level errors: line parsing, file access, decompression and discovery
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Malformed line: expected at least 5 fields, found {0}")]
    MalformedLine(usize),

    #[error("Missing device type or device id")]
    MissingIdentity,

    #[error("Invalid {field} coordinate: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("Cannot open {path}: {source}")]
    FileOpen { path: String, source: io::Error },

    #[error("Cannot decompress {path}: {source}")]
    Decompress { path: String, source: io::Error },

    #[error("Read error: {0}")]
    Read(io::Error),

    #[error("Cannot rename {path}: {source}")]
    FileRename { path: String, source: io::Error },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl IoError {
    /// Line-scoped errors count against the file but never stop the scan
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedLine(_) | Self::MissingIdentity | Self::InvalidCoordinate { .. }
        )
    }
}
