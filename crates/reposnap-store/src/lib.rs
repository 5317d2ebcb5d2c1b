//! Snapshot persistence: the record collection as an indented JSON array.

use std::path::Path;

use reposnap_core::error::ReposnapError;
use reposnap_core::models::RepositoryRecord;

/// Encode records as pretty-printed JSON with a trailing newline.
pub fn to_json(records: &[RepositoryRecord]) -> Result<String, ReposnapError> {
    let mut json = serde_json::to_string_pretty(records)
        .map_err(|e| ReposnapError::Serialization(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Decode a snapshot document.
pub fn from_json(content: &str) -> Result<Vec<RepositoryRecord>, ReposnapError> {
    serde_json::from_str(content).map_err(|e| ReposnapError::Serialization(e.to_string()))
}

/// Write the snapshot to `dest`, replacing whatever was there.
pub fn save(records: &[RepositoryRecord], dest: &Path) -> Result<(), ReposnapError> {
    let json = to_json(records).map_err(|e| ReposnapError::persistence(dest, e.to_string()))?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReposnapError::persistence(dest, format!("error creating config file: {e}"))
        })?;
    }
    std::fs::write(dest, json)
        .map_err(|e| ReposnapError::persistence(dest, format!("error creating config file: {e}")))?;

    tracing::debug!("wrote {} records to {}", records.len(), dest.display());
    Ok(())
}

/// Read a snapshot from `source`.
pub fn load(source: &Path) -> Result<Vec<RepositoryRecord>, ReposnapError> {
    let content = std::fs::read_to_string(source)
        .map_err(|e| ReposnapError::persistence(source, format!("error opening config file: {e}")))?;
    let records = from_json(&content).map_err(|e| {
        ReposnapError::persistence(source, format!("error decoding config file: {e}"))
    })?;

    tracing::debug!("read {} records from {}", records.len(), source.display());
    Ok(records)
}
