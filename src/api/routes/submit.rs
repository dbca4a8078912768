//! Submit route
//!
//! Endpoint for recording a new sensor reading.
//!
//! - POST /api/submit - Record one reading

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{ReadingResponse, SubmitRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::{
    retention, CO2_PPM_MAX, CO2_PPM_MIN, PRESSURE_MBAR_MAX, PRESSURE_MBAR_MIN,
    TEMP_CELSIUS_MAX, TEMP_CELSIUS_MIN,
};

/// POST /api/submit
///
/// Validate and persist one reading, then echo back the stored row with
/// its storage-assigned id and timestamp. The retention sweep is dispatched
/// after the response is determined and never delays it.
pub async fn submit_reading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<ReadingResponse>)> {
    validate_submit_request(&req)?;

    let reading = state.store.insert(&req.sample()).await?;

    retention::spawn_sweep(state.store.path().to_path_buf());

    Ok((StatusCode::CREATED, Json(reading.into())))
}

/// Reject any measurement outside its domain before it reaches storage
fn validate_submit_request(req: &SubmitRequest) -> ApiResult<()> {
    if req.co2_ppm < CO2_PPM_MIN || req.co2_ppm > CO2_PPM_MAX {
        return Err(ApiError::Validation(format!(
            "co2_ppm must be in ({}, {}], got {}",
            CO2_PPM_MIN - 1,
            CO2_PPM_MAX,
            req.co2_ppm
        )));
    }

    if !req.temp_celsius.is_finite()
        || req.temp_celsius < TEMP_CELSIUS_MIN
        || req.temp_celsius > TEMP_CELSIUS_MAX
    {
        return Err(ApiError::Validation(format!(
            "temp_celsius must be in [{}, {}], got {}",
            TEMP_CELSIUS_MIN, TEMP_CELSIUS_MAX, req.temp_celsius
        )));
    }

    if !req.pressure_mbar.is_finite()
        || req.pressure_mbar < PRESSURE_MBAR_MIN
        || req.pressure_mbar > PRESSURE_MBAR_MAX
    {
        return Err(ApiError::Validation(format!(
            "pressure_mbar must be in [{}, {}], got {}",
            PRESSURE_MBAR_MIN, PRESSURE_MBAR_MAX, req.pressure_mbar
        )));
    }

    Ok(())
}
