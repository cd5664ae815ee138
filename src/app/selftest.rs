use super::error::AppError;
use crate::domain::{Record, decode, encode};
use crate::io::parse_line;

/// Built-in sample lines covering two device types
pub const SAMPLE: &str = "\
idfa\t1rfw452y52g2gq4g\t55.55\t42.42\t1423,43,567,3,7,23
gaid\t7rfw452y52g2gq4g\t55.55\t42.42\t7423,424";

/// Parse, encode and decode every sample line; returns how many matched
pub fn run_codec_self_test() -> Result<usize, AppError> {
    run_lines(SAMPLE)
}

fn run_lines(input: &str) -> Result<usize, AppError> {
    let mut checked = 0;
    for line in input.lines().filter(|l| !l.trim().is_empty()) {
        let record = parse_line(line)?;
        let packed = encode(&record)?;
        let restored =
            Record::from_payload(record.device_type(), record.device_id(), decode(&packed)?)?;

        if restored != record {
            return Err(AppError::SelfTest(format!(
                "round trip mismatch for {}",
                record.key()
            )));
        }
        checked += 1;
    }
    Ok(checked)
}
