//! Retention sweep - deletes readings older than the retention window
//!
//! The sweep is dispatched fire-and-forget after an ingest response is
//! determined. It opens its own short-lived connection so it never contends
//! with the shared request connection, and its failure is swallowed: a
//! missed sweep only delays cleanup until the next ingest.

use crate::storage::error::StorageResult;
use crate::storage::types::WEEK_SECS;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Delete all readings recorded more than one retention window ago
///
/// Returns the number of rows removed. Purely time-based; there is no
/// row-count cap.
pub fn sweep_expired(db_path: &Path) -> StorageResult<usize> {
    let conn = Connection::open(db_path)?;
    let cutoff = Utc::now().timestamp() - WEEK_SECS;

    let deleted = conn.execute("DELETE FROM co2 WHERE recorded < ?1", params![cutoff])?;
    Ok(deleted)
}

/// Run the retention sweep in the background, detached from the caller
///
/// Best-effort: the triggering request never waits on the sweep, and a
/// failure is logged at warn level rather than surfaced.
pub fn spawn_sweep(db_path: PathBuf) {
    tokio::task::spawn_blocking(move || match sweep_expired(&db_path) {
        Ok(0) => {}
        Ok(deleted) => {
            tracing::debug!(deleted, "retention sweep removed expired readings");
        }
        Err(e) => {
            tracing::warn!("retention sweep failed: {}", e);
        }
    });
}
