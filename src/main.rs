//! Airsense API server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Environment variables:
//! - `AIRSENSE_DB_PATH`: SQLite database file (default: platform data dir)
//! - `AIRSENSE_HOST`: Host to bind to (default: 0.0.0.0)
//! - `AIRSENSE_PORT`: Port to listen on (default: 8088)
//! - `RUST_LOG`: Log level (default: info)
//!
//! A TOML config file is also read from the platform config dir,
//! `/etc/airsense/config.toml`, or `./config.toml`; environment variables
//! override it.

use airsense::api::{serve, ApiConfig, AppState};
use airsense::config::Config;
use airsense::storage::ReadingStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airsense=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Airsense API server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_default();
    tracing::info!("Database path: {}", config.storage.db_path);

    let store = Arc::new(ReadingStore::open(&config.storage.db_path)?);
    tracing::info!("Readings store opened");

    let api_config = ApiConfig::new(config.api.host, config.api.port);
    let state = AppState::new(store, api_config.clone());

    tracing::info!("Starting server on {}", api_config.addr());
    serve(state, &api_config).await?;

    tracing::info!("Airsense API server stopped");
    Ok(())
}
