//! Handlers proxying the external field controller API.
//!
//! List payloads pass through untyped: the dashboard renders whatever the
//! controller reports, and the controller's schema is not ours to pin down.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use farmtech_fieldapi::FieldStatus;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/v1/field/status
// ---------------------------------------------------------------------------

/// Probe result plus the configured base URL.
#[derive(Debug, Serialize)]
pub struct FieldStatusResponse {
    pub status: FieldStatus,
    pub base_url: String,
}

/// Report whether the field controller is reachable right now.
///
/// Never fails: an unreachable controller is an `offline` status, not an
/// error.
pub async fn status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let status = state.field.probe().await;
    Ok(Json(DataResponse {
        data: FieldStatusResponse {
            status,
            base_url: state.field.base_url().to_string(),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/field/producers
// ---------------------------------------------------------------------------

/// Producers as reported by the field controller.
pub async fn producers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = state.field.producers().await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/field/sensors
// ---------------------------------------------------------------------------

/// Sensors as reported by the field controller.
pub async fn sensors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = state.field.sensors().await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/field/readings
// ---------------------------------------------------------------------------

/// Readings as reported by the field controller.
pub async fn readings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = state.field.readings().await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/field/irrigation
// ---------------------------------------------------------------------------

/// Current irrigation gate decision from the field controller.
pub async fn irrigation(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = state.field.irrigation_status().await?;
    Ok(Json(DataResponse { data }))
}
