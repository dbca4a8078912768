//! Readings store - SQLite-backed persistence for sensor samples
//!
//! One long-lived connection behind an async mutex, shared by all request
//! handlers. Every multi-statement operation runs inside a transaction, so
//! concurrent requests never observe a partially-written row. The retention
//! sweep opens its own connection (see [`crate::storage::retention`]) and
//! never touches this one.

use crate::storage::error::StorageResult;
use crate::storage::types::{LatestSummary, Reading, ReadingSample, HOUR_SECS, WEEK_SECS};
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// SQLite-backed store for the `co2` readings table
pub struct ReadingStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl ReadingStore {
    /// Open (or create) the readings database at `path`
    ///
    /// Schema setup is idempotent: safe to run on every startup.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        // `recorded` defaults to the insertion time; callers never supply it.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS co2 (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recorded INTEGER NOT NULL DEFAULT (strftime('%s','now')),
                co2_ppm INTEGER,
                temp_celsius REAL,
                pressure_mbar REAL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_co2_recorded ON co2(recorded)",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Insert one reading and return the persisted row
    ///
    /// The row is read back by its assigned rowid within the same
    /// transaction: `id` and `recorded` are storage-assigned, and the
    /// response must reflect the actual stored values.
    pub async fn insert(&self, sample: &ReadingSample) -> StorageResult<Reading> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO co2 (co2_ppm, temp_celsius, pressure_mbar) VALUES (?1, ?2, ?3)",
            params![sample.co2_ppm, sample.temp_celsius, sample.pressure_mbar],
        )?;

        let reading = tx.query_row(
            "SELECT id, recorded, co2_ppm, temp_celsius, pressure_mbar FROM co2 WHERE id = ?1",
            params![tx.last_insert_rowid()],
            Reading::from_row,
        )?;

        tx.commit()?;
        Ok(reading)
    }

    /// Compute the latest reading and rolling averages as of `now` (Unix seconds)
    ///
    /// Returns `None` when no reading falls inside the trailing hour - the
    /// absence of recent data is a first-class condition, distinct from a
    /// quiet sensor. Both window scans run in one transaction so they see a
    /// consistent snapshot.
    pub async fn latest_summary(&self, now: i64) -> StorageResult<Option<LatestSummary>> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let hour = {
            let mut stmt = tx.prepare_cached(
                "SELECT id, recorded, co2_ppm, temp_celsius, pressure_mbar FROM co2
                 WHERE recorded BETWEEN ?1 AND ?2
                 ORDER BY recorded DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![now - HOUR_SECS, now], Reading::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        let week_ppm = {
            let mut stmt = tx.prepare_cached(
                "SELECT co2_ppm FROM co2 WHERE recorded BETWEEN ?1 AND ?2",
            )?;
            let rows = stmt.query_map(params![now - WEEK_SECS, now], |row| row.get::<_, i64>(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;

        let newest = match hour.first() {
            Some(reading) => reading,
            None => return Ok(None),
        };

        let hour_ppm: Vec<i64> = hour.iter().map(|r| r.co2_ppm).collect();

        Ok(Some(LatestSummary {
            co2_ppm_latest: newest.co2_ppm,
            co2_ppm_average_1h: round2(mean(&hour_ppm)),
            co2_ppm_average_1w: round2(mean(&week_ppm)),
            last_reading_time: newest.recorded,
        }))
    }

    /// Total number of stored readings
    pub async fn count(&self) -> StorageResult<i64> {
        let conn = self.conn.lock().await;
        let count = conn.query_row("SELECT COUNT(*) FROM co2", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a reading with an explicit `recorded` timestamp (tests only)
    #[cfg(test)]
    pub(crate) async fn insert_at(
        &self,
        recorded: i64,
        sample: &ReadingSample,
    ) -> StorageResult<Reading> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO co2 (recorded, co2_ppm, temp_celsius, pressure_mbar)
             VALUES (?1, ?2, ?3, ?4)",
            params![recorded, sample.co2_ppm, sample.temp_celsius, sample.pressure_mbar],
        )?;

        let reading = tx.query_row(
            "SELECT id, recorded, co2_ppm, temp_celsius, pressure_mbar FROM co2 WHERE id = ?1",
            params![tx.last_insert_rowid()],
            Reading::from_row,
        )?;

        tx.commit()?;
        Ok(reading)
    }
}

/// Arithmetic mean of integer ppm values; callers guarantee non-empty input
fn mean(values: &[i64]) -> f64 {
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

/// Round to 2 decimal places, half away from zero
///
/// All ppm values are positive, so halves round up: mean(401, 402) = 401.50.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn sample(co2_ppm: i64) -> ReadingSample {
        ReadingSample {
            co2_ppm,
            temp_celsius: 21.5,
            pressure_mbar: 1013.25,
        }
    }

    #[tokio::test]
    async fn test_insert_returns_persisted_row() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let before = Utc::now().timestamp();
        let reading = store.insert(&sample(420)).await.unwrap();
        let after = Utc::now().timestamp();

        assert_eq!(reading.id, 1);
        assert_eq!(reading.co2_ppm, 420);
        assert_eq!(reading.temp_celsius, 21.5);
        assert_eq!(reading.pressure_mbar, 1013.25);
        assert!(reading.recorded >= before && reading.recorded <= after + 1);
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let mut last_id = 0;
        for ppm in [400, 450, 500, 550] {
            let reading = store.insert(&sample(ppm)).await.unwrap();
            assert!(reading.id > last_id);
            last_id = reading.id;
        }
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("readings.db");

        {
            let store = ReadingStore::open(&path).unwrap();
            store.insert(&sample(400)).await.unwrap();
        }

        // Reopening must neither error nor lose data
        let store = ReadingStore::open(&path).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_latest_summary_empty_store() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let now = Utc::now().timestamp();
        assert!(store.latest_summary(now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_summary_ignores_stale_rows() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let now = Utc::now().timestamp();
        store.insert_at(now - 2 * HOUR_SECS, &sample(800)).await.unwrap();

        // Older rows exist, but nothing in the trailing hour
        assert!(store.latest_summary(now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_summary_average_and_latest() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        for ppm in [400, 500, 600] {
            store.insert(&sample(ppm)).await.unwrap();
        }

        let now = Utc::now().timestamp();
        let summary = store.latest_summary(now).await.unwrap().unwrap();

        // All three share a timestamp second; the tie breaks toward the
        // most recently inserted row.
        assert_eq!(summary.co2_ppm_latest, 600);
        assert_eq!(summary.co2_ppm_average_1h, 500.00);
        assert_eq!(summary.co2_ppm_average_1w, 500.00);
        assert!(summary.last_reading_time <= now + 1);
    }

    #[tokio::test]
    async fn test_average_rounds_half_up() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        store.insert(&sample(401)).await.unwrap();
        store.insert(&sample(402)).await.unwrap();

        let now = Utc::now().timestamp();
        let summary = store.latest_summary(now).await.unwrap().unwrap();
        assert_eq!(summary.co2_ppm_average_1h, 401.50);
    }

    #[tokio::test]
    async fn test_week_window_wider_than_hour_window() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let now = Utc::now().timestamp();
        // Six days old: inside the week window, outside the hour window
        store.insert_at(now - 6 * 24 * 3600, &sample(300)).await.unwrap();
        let fresh = store.insert(&sample(600)).await.unwrap();

        let summary = store.latest_summary(fresh.recorded).await.unwrap().unwrap();
        assert_eq!(summary.co2_ppm_latest, 600);
        assert_eq!(summary.co2_ppm_average_1h, 600.00);
        assert_eq!(summary.co2_ppm_average_1w, 450.00);
    }

    #[tokio::test]
    async fn test_week_average_excludes_expired_rows() {
        let dir = tempdir().unwrap();
        let store = ReadingStore::open(dir.path().join("readings.db")).unwrap();

        let now = Utc::now().timestamp();
        // Eight days old: outside the week window entirely
        store.insert_at(now - 8 * 24 * 3600, &sample(4000)).await.unwrap();
        let fresh = store.insert(&sample(500)).await.unwrap();

        let summary = store.latest_summary(fresh.recorded).await.unwrap().unwrap();
        assert_eq!(summary.co2_ppm_average_1w, 500.00);
    }

    #[test]
    fn test_round2_boundaries() {
        assert_eq!(round2(401.5), 401.5);
        // 401.625 is exactly representable; the half at the 2nd decimal
        // rounds away from zero
        assert_eq!(round2(401.625), 401.63);
        assert_eq!(round2(mean(&[400, 400, 401])), 400.33);
        assert_eq!(round2(500.0), 500.0);
    }

    #[test]
    fn test_mean_of_integers() {
        assert_eq!(mean(&[400, 500, 600]), 500.0);
        assert_eq!(mean(&[401, 402]), 401.5);
        assert_eq!(mean(&[700]), 700.0);
    }
}
