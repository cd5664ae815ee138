pub mod codec;
pub mod device;
pub mod error;
pub mod record;

// Re-export commonly used types
pub use codec::{UserApps, decode, encode};
pub use device::DeviceType;
pub use error::DomainError;
pub use record::{KEY_SEPARATOR, Record};
