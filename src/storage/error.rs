use thiserror::Error;

/// Storage-level errors: routing and backend writes
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Write to {addr} failed: {reason}")]
    BackendWrite { addr: String, reason: String },
}

impl StorageError {
    pub(crate) fn backend_write(addr: &str, reason: impl ToString) -> Self {
        Self::BackendWrite {
            addr: addr.to_string(),
            reason: reason.to_string(),
        }
    }
}
