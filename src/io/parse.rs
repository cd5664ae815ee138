use tracing::warn;

use super::error::IoError;
use crate::domain::Record;

/// Separator between the five fields of an input line
pub const FIELD_DELIMITER: char = '\t';

/// Separator between application ids in the fifth field
pub const APP_DELIMITER: char = ',';

const MIN_FIELDS: usize = 5;

/// Parse one input line into a [`Record`]
///
/// Layout: `device_type \t device_id \t lat \t lon \t app[,app...]`.
/// Extra trailing fields are ignored. App ids that are not unsigned 32-bit
/// integers are dropped with a warning; the record itself still parses.
pub fn parse_line(line: &str) -> Result<Record, IoError> {
    // Tabs are significant: an empty leading field must stay a field.
    let line = line.trim_matches(|c: char| c.is_whitespace() && c != FIELD_DELIMITER);
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return Err(IoError::MalformedLine(fields.len()));
    }

    let (device_type, device_id) = (fields[0], fields[1]);
    if device_type.is_empty() || device_id.is_empty() {
        return Err(IoError::MissingIdentity);
    }

    let lat = parse_coordinate("lat", fields[2])?;
    let lon = parse_coordinate("lon", fields[3])?;
    let apps = parse_apps(fields[4], line);

    Ok(Record::new(device_type, device_id, lat, lon, apps)?)
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, IoError> {
    raw.parse::<f64>().map_err(|_| IoError::InvalidCoordinate {
        field,
        value: raw.to_string(),
    })
}

fn parse_apps(raw: &str, line: &str) -> Vec<u32> {
    raw.split(APP_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(app) => Some(app),
            Err(_) => {
                warn!(token, line, "Not all app ids are numeric, skipping token");
                None
            }
        })
        .collect()
}
