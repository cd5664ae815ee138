//! Wire encoding for the value stored under each device key.
//!
//! The payload is a protobuf `UserApps` message:
//!
//! ```text
//! message UserApps {
//!     repeated uint32 apps = 1;
//!     optional double lat = 2;
//!     optional double lon = 3;
//! }
//! ```

use bytes::{Bytes, BytesMut};
use prost::Message;

use super::error::DomainError;
use super::record::Record;

/// Value payload: coordinates plus the installed application ids
#[derive(Clone, PartialEq, prost::Message)]
pub struct UserApps {
    #[prost(uint32, repeated, packed = "false", tag = "1")]
    pub apps: Vec<u32>,
    #[prost(double, optional, tag = "2")]
    pub lat: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lon: Option<f64>,
}

/// Serialize the value part of a record
pub fn encode(record: &Record) -> Result<Bytes, DomainError> {
    let payload = record.payload();
    let mut buf = BytesMut::with_capacity(payload.encoded_len());
    payload
        .encode(&mut buf)
        .map_err(|e| DomainError::Serialization(e.to_string()))?;
    Ok(buf.freeze())
}

/// Deserialize a value previously produced by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<UserApps, DomainError> {
    UserApps::decode(bytes).map_err(|e| DomainError::Deserialization(e.to_string()))
}
