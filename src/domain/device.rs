use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Closed set of device-type tags, one backend shard each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Idfa,
    Gaid,
    Adid,
    Dvid,
}

impl DeviceType {
    pub const ALL: [DeviceType; 4] = [Self::Idfa, Self::Gaid, Self::Adid, Self::Dvid];

    /// Tag as it appears in the first field of an input line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idfa => "idfa",
            Self::Gaid => "gaid",
            Self::Adid => "adid",
            Self::Dvid => "dvid",
        }
    }
}

impl FromStr for DeviceType {
    type Err = DomainError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "idfa" => Ok(Self::Idfa),
            "gaid" => Ok(Self::Gaid),
            "adid" => Ok(Self::Adid),
            "dvid" => Ok(Self::Dvid),
            _ => Err(DomainError::UnknownDeviceType(tag.to_string())),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
