use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::error::StorageError;
use super::traits::KvBackend;

/// Concurrent in-memory backend using DashMap
pub struct MemoryBackend {
    addr: String,
    entries: DashMap<String, Bytes>,
    reject_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend identified by `addr`
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            entries: DashMap::new(),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    fn addr(&self) -> &str {
        &self.addr
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::backend_write(&self.addr, "writes rejected"));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
