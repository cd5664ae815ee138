pub mod error;
pub mod memcache;
pub mod memory;
pub mod shard;
pub mod traits;

// Re-export commonly used types
pub use error::StorageError;
pub use memcache::{DEFAULT_MAX_IDLE_CONNS, DEFAULT_TIMEOUT, MemcacheClient};
pub use memory::MemoryBackend;
pub use shard::ShardTable;
pub use traits::KvBackend;
