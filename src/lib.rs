//! # Airsense
//!
//! A minimal HTTP service that records periodic environmental sensor
//! readings (CO2 concentration, temperature, pressure) into a local SQLite
//! store and answers queries for the latest reading and short-term rolling
//! averages.
//!
//! ## Modules
//!
//! - [`storage`]: SQLite schema, ingest write path, windowed summary query,
//!   and the time-based retention sweep
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use airsense::storage::{ReadingSample, ReadingStore};
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ReadingStore::open("readings.db")?);
//!
//!     let reading = store
//!         .insert(&ReadingSample {
//!             co2_ppm: 420,
//!             temp_celsius: 21.5,
//!             pressure_mbar: 1013.25,
//!         })
//!         .await?;
//!
//!     println!("Stored reading #{} at {}", reading.id, reading.recorded);
//!
//!     if let Some(summary) = store.latest_summary(Utc::now().timestamp()).await? {
//!         println!("1h average: {} ppm", summary.co2_ppm_average_1h);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    LatestSummary, Reading, ReadingSample, ReadingStore, StorageError, StorageResult,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError};
