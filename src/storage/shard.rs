use std::collections::HashMap;
use std::sync::Arc;

use super::error::StorageError;
use super::traits::KvBackend;
use crate::domain::DeviceType;

/// Fixed mapping from device type to backend, built once at startup
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Default, Clone)]
pub struct ShardTable {
    shards: HashMap<DeviceType, Arc<dyn KvBackend>>,
}

impl ShardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the backend for one device type (fluent interface)
    pub fn with_shard(mut self, device_type: DeviceType, backend: Arc<dyn KvBackend>) -> Self {
        self.shards.insert(device_type, backend);
        self
    }

    /// Backend for a raw device-type tag
    ///
    /// Tags outside the recognized set, or recognized tags without a
    /// registered backend, yield [`StorageError::UnknownDeviceType`].
    pub fn route(&self, tag: &str) -> Result<&Arc<dyn KvBackend>, StorageError> {
        tag.parse::<DeviceType>()
            .ok()
            .and_then(|device_type| self.shards.get(&device_type))
            .ok_or_else(|| StorageError::UnknownDeviceType(tag.to_string()))
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

impl std::fmt::Debug for ShardTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.shards.iter().map(|(k, v)| (k.as_str(), v.addr())))
            .finish()
    }
}
