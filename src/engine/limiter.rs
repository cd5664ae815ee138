use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::EngineError;

/// Default number of writes allowed in flight at once
pub const DEFAULT_CAPACITY: usize = 100;

/// Counting admission gate bounding in-flight write tasks
///
/// Cloning shares the same gate.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One admission slot; released when dropped, on every exit path
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Create a gate with `capacity` slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait until a slot is free and take it
    ///
    /// Fails only if the semaphore is closed. The limiter never closes it,
    /// so the error is surfaced for the caller instead of panicking.
    pub async fn acquire(&self) -> Result<AdmissionPermit, EngineError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| EngineError::LimiterClosed)?;
        Ok(AdmissionPermit { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
