//! Handlers for sensor reading queries.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use farmtech_db::repositories::ReadingRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;
const DEFAULT_WINDOW_HOURS: i64 = 24;
const MAX_WINDOW_HOURS: i64 = 24 * 30;

// ---------------------------------------------------------------------------
// GET /api/v1/readings
// ---------------------------------------------------------------------------

/// Query parameters for the reading list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub hours: Option<i64>,
}

/// List recent readings joined with sensor and producer context, newest
/// first.
pub async fn list_readings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let hours = params
        .hours
        .unwrap_or(DEFAULT_WINDOW_HOURS)
        .clamp(1, MAX_WINDOW_HOURS);
    let since = Utc::now() - Duration::hours(hours);

    let readings = ReadingRepo::list_recent_detailed(&state.pool, since, limit).await?;
    Ok(Json(DataResponse { data: readings }))
}

// ---------------------------------------------------------------------------
// GET /api/v1/readings/stats
// ---------------------------------------------------------------------------

/// Query parameters for reading statistics.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub hours: Option<i64>,
}

/// Aggregates over the window: totals, averages, and how many readings sat
/// under the configured humidity minimum.
pub async fn reading_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let hours = params
        .hours
        .unwrap_or(DEFAULT_WINDOW_HOURS)
        .clamp(1, MAX_WINDOW_HOURS);
    let since = Utc::now() - Duration::hours(hours);
    let humidity_min = state.monitor.thresholds().humidity_min;

    let stats = ReadingRepo::stats_since(&state.pool, since, humidity_min).await?;
    Ok(Json(DataResponse { data: stats }))
}
