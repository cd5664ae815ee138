use std::path::{Path, PathBuf};

use super::error::IoError;

/// Prefix added to the base name of a fully handled file
pub const PROCESSED_MARKER: char = '.';

/// Path the file will have once marked: same directory, prefixed base name
pub fn marked_path(path: &Path) -> Result<PathBuf, IoError> {
    let name = path.file_name().ok_or_else(|| IoError::FileRename {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    let mut marked = std::ffi::OsString::from(PROCESSED_MARKER.to_string());
    marked.push(name);
    Ok(path.with_file_name(marked))
}

/// Rename `path` to its marked name; the content is untouched
pub async fn mark_processed(path: &Path) -> Result<PathBuf, IoError> {
    let target = marked_path(path)?;
    tokio::fs::rename(path, &target)
        .await
        .map_err(|source| IoError::FileRename {
            path: path.display().to_string(),
            source,
        })?;
    Ok(target)
}
