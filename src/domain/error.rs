use thiserror::Error;

/// Domain-level errors for records and their wire encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),
}
