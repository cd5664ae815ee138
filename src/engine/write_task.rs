use std::sync::Arc;

use tracing::{info, warn};

use super::error::EngineError;
use super::limiter::AdmissionPermit;
use crate::domain::{Record, decode, encode};
use crate::storage::KvBackend;

/// A single serialize-and-write attempt for one record
pub struct WriteTask {
    record: Record,
    backend: Arc<dyn KvBackend>,
    dry_run: bool,
}

impl WriteTask {
    pub fn new(record: Record, backend: Arc<dyn KvBackend>, dry_run: bool) -> Self {
        Self {
            record,
            backend,
            dry_run,
        }
    }

    /// Serialize the record and write it once
    ///
    /// In dry-run mode the would-be write is logged and nothing is sent.
    pub async fn run(self) -> Result<(), EngineError> {
        let key = self.record.key();
        let packed = encode(&self.record)?;

        if self.dry_run {
            let decoded = decode(&packed)?;
            info!(
                addr = self.backend.addr(),
                key = %key,
                lat = ?decoded.lat,
                lon = ?decoded.lon,
                apps = ?decoded.apps,
                "Dry run write"
            );
            return Ok(());
        }

        self.backend.put(&key, packed).await?;
        Ok(())
    }

    /// Run while holding an admission slot; `true` on success
    ///
    /// The slot is released when this returns, whatever the outcome.
    pub async fn execute(self, permit: AdmissionPermit) -> bool {
        let _permit = permit;
        match self.run().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Write failed");
                false
            }
        }
    }
}
