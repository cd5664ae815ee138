use super::codec::UserApps;
use super::error::DomainError;

/// Separator between device type and device id in backend keys
pub const KEY_SEPARATOR: char = ':';

/// One parsed input line: device identity, coordinates and installed apps
///
/// Fields are private; a record is built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    device_type: String,
    device_id: String,
    lat: f64,
    lon: f64,
    apps: Vec<u32>,
}

impl Record {
    /// Create a record, rejecting an empty device type or device id
    pub fn new(
        device_type: impl Into<String>,
        device_id: impl Into<String>,
        lat: f64,
        lon: f64,
        apps: Vec<u32>,
    ) -> Result<Self, DomainError> {
        let device_type = device_type.into();
        let device_id = device_id.into();

        if device_type.is_empty() {
            return Err(DomainError::MissingField("device_type"));
        }
        if device_id.is_empty() {
            return Err(DomainError::MissingField("device_id"));
        }

        Ok(Self {
            device_type,
            device_id,
            lat,
            lon,
            apps,
        })
    }

    /// Rebuild a record from its identity and a decoded payload
    pub fn from_payload(
        device_type: impl Into<String>,
        device_id: impl Into<String>,
        payload: UserApps,
    ) -> Result<Self, DomainError> {
        let lat = payload.lat.ok_or(DomainError::MissingField("lat"))?;
        let lon = payload.lon.ok_or(DomainError::MissingField("lon"))?;
        Self::new(device_type, device_id, lat, lon, payload.apps)
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn apps(&self) -> &[u32] {
        &self.apps
    }

    /// Backend key: `{device_type}:{device_id}`
    pub fn key(&self) -> String {
        format!("{}{}{}", self.device_type, KEY_SEPARATOR, self.device_id)
    }

    /// Payload stored under [`Record::key`]
    pub fn payload(&self) -> UserApps {
        UserApps {
            apps: self.apps.clone(),
            lat: Some(self.lat),
            lon: Some(self.lon),
        }
    }
}
