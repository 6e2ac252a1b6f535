//! Handlers for dashboard aggregate views.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use farmtech_core::thresholds::ThresholdConfig;
use farmtech_db::repositories::{CropRepo, ProducerRepo, ReadingRepo, SensorRepo};
use farmtech_inference::ModelAvailability;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/v1/dashboard/overview
// ---------------------------------------------------------------------------

/// Landing-page metrics in one round trip.
#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub producers: i64,
    pub crops: i64,
    pub sensors: i64,
    pub installed_sensors: i64,
    pub readings: i64,
    pub vision_sessions: usize,
    pub models: Vec<ModelAvailability>,
    pub thresholds: ThresholdConfig,
}

/// Entity counts, model weight availability, and the active thresholds.
pub async fn overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let producers = ProducerRepo::count(&state.pool).await?;
    let crops = CropRepo::count(&state.pool).await?;
    let sensors = SensorRepo::count(&state.pool).await?;
    let installed_sensors = SensorRepo::count_installed(&state.pool).await?;
    let readings = ReadingRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: DashboardOverview {
            producers,
            crops,
            sensors,
            installed_sensors,
            readings,
            vision_sessions: state.sessions.count().await,
            models: state.engine.availability(),
            thresholds: *state.monitor.thresholds(),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/dashboard/charts
// ---------------------------------------------------------------------------

/// Query parameters for the chart series.
#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub limit: Option<i64>,
}

/// Raw readings for the humidity and pH time-series charts, newest first.
///
/// Rows without a humidity value are excluded so the series has no holes.
pub async fn charts(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);
    let readings = ReadingRepo::list_for_charts(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: readings }))
}
