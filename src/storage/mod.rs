//! Readings storage
//!
//! SQLite persistence for sensor readings: the `co2` table schema, the
//! ingest write path with its read-back, the windowed summary query, and
//! the time-based retention sweep.

pub mod error;
pub mod retention;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use retention::{spawn_sweep, sweep_expired};
pub use store::ReadingStore;
pub use types::{
    LatestSummary, Reading, ReadingSample, CO2_PPM_MAX, CO2_PPM_MIN, HOUR_SECS,
    PRESSURE_MBAR_MAX, PRESSURE_MBAR_MIN, TEMP_CELSIUS_MAX, TEMP_CELSIUS_MIN, WEEK_SECS,
};
