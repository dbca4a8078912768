//! Data transfer objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON. Timestamps are
//! stored as Unix seconds but cross the wire as RFC 3339 strings.

use crate::storage::{LatestSummary, Reading, ReadingSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// SUBMIT DTOs
// ============================================

/// Reading submission request
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// CO2 concentration in parts per million
    pub co2_ppm: i64,
    /// Temperature in degrees Celsius
    pub temp_celsius: f64,
    /// Barometric pressure in millibar
    pub pressure_mbar: f64,
}

impl SubmitRequest {
    /// The measurement fields, ready for storage
    pub fn sample(&self) -> ReadingSample {
        ReadingSample {
            co2_ppm: self.co2_ppm,
            temp_celsius: self.temp_celsius,
            pressure_mbar: self.pressure_mbar,
        }
    }
}

/// The persisted reading, echoed back with its storage-assigned fields
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    /// Storage-assigned row id
    pub id: i64,
    /// Insertion time assigned by storage
    pub recorded: DateTime<Utc>,
    pub co2_ppm: i64,
    pub temp_celsius: f64,
    pub pressure_mbar: f64,
}

impl From<Reading> for ReadingResponse {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id,
            recorded: timestamp_to_datetime(reading.recorded),
            co2_ppm: reading.co2_ppm,
            temp_celsius: reading.temp_celsius,
            pressure_mbar: reading.pressure_mbar,
        }
    }
}

// ============================================
// LATEST DTOs
// ============================================

/// Latest reading and rolling averages response
#[derive(Debug, Serialize)]
pub struct LatestResponse {
    /// CO2 of the most recent reading
    pub co2_ppm_latest: i64,
    /// Mean CO2 over the trailing hour, 2 decimals
    pub co2_ppm_average_1h: f64,
    /// Mean CO2 over the trailing week, 2 decimals
    pub co2_ppm_average_1w: f64,
    /// Time of the most recent reading
    pub last_reading_time: DateTime<Utc>,
}

impl From<LatestSummary> for LatestResponse {
    fn from(summary: LatestSummary) -> Self {
        Self {
            co2_ppm_latest: summary.co2_ppm_latest,
            co2_ppm_average_1h: summary.co2_ppm_average_1h,
            co2_ppm_average_1w: summary.co2_ppm_average_1w,
            last_reading_time: timestamp_to_datetime(summary.last_reading_time),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

/// Convert stored Unix seconds to a UTC datetime
fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_response_preserves_fields() {
        let reading = Reading {
            id: 7,
            recorded: 1_700_000_000,
            co2_ppm: 420,
            temp_celsius: 21.5,
            pressure_mbar: 1013.25,
        };

        let response = ReadingResponse::from(reading);
        assert_eq!(response.id, 7);
        assert_eq!(response.co2_ppm, 420);
        assert_eq!(response.recorded.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_latest_response_serializes_rfc3339() {
        let response = LatestResponse::from(LatestSummary {
            co2_ppm_latest: 600,
            co2_ppm_average_1h: 500.0,
            co2_ppm_average_1w: 450.0,
            last_reading_time: 1_700_000_000,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["co2_ppm_latest"], 600);
        assert_eq!(json["last_reading_time"], "2023-11-14T22:13:20Z");
    }
}
