//! Core data types for the readings store
//!
//! - `Reading`: a persisted sensor sample with its storage-assigned id and timestamp
//! - `ReadingSample`: the caller-supplied measurement fields of a reading
//! - `LatestSummary`: latest value plus rolling averages, derived from windowed queries
//!
//! The measurement field domains live here as constants so the ingest
//! boundary and the tests agree on a single source of truth.

use serde::{Deserialize, Serialize};

/// Lower bound for CO2 concentration (exclusive: 0 ppm is a dead sensor, not air)
pub const CO2_PPM_MIN: i64 = 1;
/// Upper bound for CO2 concentration (inclusive)
pub const CO2_PPM_MAX: i64 = 5000;
/// Temperature bounds in degrees Celsius (inclusive)
pub const TEMP_CELSIUS_MIN: f64 = -40.0;
pub const TEMP_CELSIUS_MAX: f64 = 60.0;
/// Pressure bounds in millibar (inclusive)
pub const PRESSURE_MBAR_MIN: f64 = 700.0;
pub const PRESSURE_MBAR_MAX: f64 = 1100.0;

/// Window for the short rolling average, in seconds
pub const HOUR_SECS: i64 = 60 * 60;
/// Window for the wide rolling average; also the retention horizon, in seconds
pub const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

/// Caller-supplied measurement fields of a reading
///
/// The `recorded` timestamp is deliberately absent: storage assigns it
/// at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingSample {
    /// CO2 concentration in parts per million
    pub co2_ppm: i64,
    /// Temperature in degrees Celsius
    pub temp_celsius: f64,
    /// Barometric pressure in millibar
    pub pressure_mbar: f64,
}

/// A sensor reading as persisted in the `co2` table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Storage-assigned row id, strictly increasing across insertions
    pub id: i64,
    /// Unix timestamp in seconds, assigned by storage at insertion
    pub recorded: i64,
    pub co2_ppm: i64,
    pub temp_celsius: f64,
    pub pressure_mbar: f64,
}

impl Reading {
    /// Map a row of `id, recorded, co2_ppm, temp_celsius, pressure_mbar`
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recorded: row.get(1)?,
            co2_ppm: row.get(2)?,
            temp_celsius: row.get(3)?,
            pressure_mbar: row.get(4)?,
        })
    }
}

/// Latest reading and rolling averages over the trailing windows
///
/// Derived on demand from the store; never persisted. Only exists when at
/// least one reading fell inside the trailing hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestSummary {
    /// `co2_ppm` of the most recent reading
    pub co2_ppm_latest: i64,
    /// Mean `co2_ppm` over the trailing hour, rounded to 2 decimals
    pub co2_ppm_average_1h: f64,
    /// Mean `co2_ppm` over the trailing week, rounded to 2 decimals
    pub co2_ppm_average_1w: f64,
    /// `recorded` of the most recent reading, Unix seconds
    pub last_reading_time: i64,
}
