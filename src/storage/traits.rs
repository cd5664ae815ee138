use async_trait::async_trait;
use bytes::Bytes;

use super::error::StorageError;

/// One key-value shard accepting single-attempt writes
///
/// Implementations own their connection handling and bound each call with
/// their own timeout. They are shared across all write tasks, so `put`
/// takes `&self`.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Address used to identify this backend in logs
    fn addr(&self) -> &str;

    /// Store `value` under `key`; last write wins
    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError>;
}
