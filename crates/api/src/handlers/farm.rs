//! Handlers for the relational farm structure: producers, crops, sensors.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use farmtech_core::error::CoreError;
use farmtech_core::types::DbId;
use farmtech_db::repositories::{CropRepo, ProducerRepo, SensorRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/v1/producers
// ---------------------------------------------------------------------------

/// List all producers.
pub async fn list_producers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let producers = ProducerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: producers }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/producers/{id}
// ---------------------------------------------------------------------------

/// Get a single producer by id.
pub async fn get_producer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let producer = ProducerRepo::get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Producer",
            id,
        }))?;
    Ok(Json(DataResponse { data: producer }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/crops
// ---------------------------------------------------------------------------

/// List all crop records.
pub async fn list_crops(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let crops = CropRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: crops }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/sensors
// ---------------------------------------------------------------------------

/// List the sensor catalog.
pub async fn list_sensors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sensors = SensorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: sensors }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/sensors/installed
// ---------------------------------------------------------------------------

/// List installed sensors with their crop and producer context.
pub async fn list_installed_sensors(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let installed = SensorRepo::list_installed_detailed(&state.pool).await?;
    Ok(Json(DataResponse { data: installed }))
}
