//! Snapshot file storage
//!
//! The snapshot is the backend's JSON payload for dormitories, rooms and beds.
//! Saving writes a sibling temp file and renames it over the original.

use std::path::Path;

use chrono::Utc;
use dorm_core::{Campus, SnapshotRecord};
use tracing::{debug, info};

use crate::{Error, Result};

/// Read and validate a snapshot.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid JSON, or violates
/// an occupancy invariant.
pub async fn load(path: &Path) -> Result<Campus> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    let record: SnapshotRecord = serde_json::from_str(&content)
        .map_err(|e| Error::Parse(format!("Invalid snapshot {}: {e}", path.display())))?;
    let campus = Campus::from_record(record, Utc::now())?;

    info!(
        path = %path.display(),
        dormitories = campus.dormitories().len(),
        held_beds = campus.holdings().len(),
        "loaded snapshot"
    );
    Ok(campus)
}

/// Write `campus` back to `path`.
///
/// # Errors
///
/// Returns error if the file or its directory cannot be written.
pub async fn save(path: &Path, campus: &Campus) -> Result<()> {
    let content = serde_json::to_string_pretty(&campus.to_record())
        .map_err(|e| Error::Parse(format!("Failed to encode snapshot: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, content)
        .await
        .map_err(|e| Error::io(&staging, e))?;
    tokio::fs::rename(&staging, path)
        .await
        .map_err(|e| Error::io(path, e))?;

    debug!(path = %path.display(), "saved snapshot");
    Ok(())
}
