//! Latest route
//!
//! Endpoint for the latest reading and rolling averages.
//!
//! - GET /api/latest - Latest reading, 1-hour and 1-week CO2 averages

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::LatestResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/latest
///
/// An empty trailing hour is a 404, never a zero-valued body: a missing
/// sensor feed must be distinguishable from a quiet sensor.
pub async fn latest_readings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LatestResponse>> {
    let now = Utc::now().timestamp();

    match state.store.latest_summary(now).await? {
        Some(summary) => Ok(Json(summary.into())),
        None => Err(ApiError::NotFound("No recent readings.".to_string())),
    }
}
