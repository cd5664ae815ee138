use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Engine-level errors for write dispatch and aggregation
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] DomainError),

    #[error("Backend write error: {0}")]
    BackendWrite(#[from] StorageError),

    /// Unreachable while the limiter owns its semaphore; kept so
    /// `acquire` propagates rather than panics
    #[error("Admission gate closed")]
    LimiterClosed,

    #[error("Result aggregation failed: {0}")]
    Aggregation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(EngineError::LimiterClosed.to_string(), "Admission gate closed");
        assert_eq!(
            EngineError::Aggregation("consumer panicked".to_string()).to_string(),
            "Result aggregation failed: consumer panicked"
        );
    }

    #[test]
    fn domain_error_conversion() {
        let engine_err = EngineError::from(DomainError::Serialization("full".to_string()));

        match engine_err {
            EngineError::Serialization(DomainError::Serialization(_)) => {}
            _ => panic!("Expected Serialization variant"),
        }
    }

    #[test]
    fn storage_error_conversion() {
        let storage_err = StorageError::BackendWrite {
            addr: "a".to_string(),
            reason: "r".to_string(),
        };
        let engine_err = EngineError::from(storage_err);

        match engine_err {
            EngineError::BackendWrite(StorageError::BackendWrite { .. }) => {}
            _ => panic!("Expected BackendWrite variant"),
        }
    }
}
