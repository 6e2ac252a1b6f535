//! Handlers for planting plan calculations.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use farmtech_core::agronomy::{self, Crop};

use crate::error::AppResult;
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// POST /api/v1/agronomy/plan
// ---------------------------------------------------------------------------

/// Request body for a planting plan.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub crop: Crop,
    /// Longer diagonal of the rhombus-shaped field, in metres.
    pub diagonal_major_m: f64,
    /// Shorter diagonal, in metres.
    pub diagonal_minor_m: f64,
    /// Input dose to apply per square metre of usable area.
    pub dose_per_m2: f64,
}

/// Compute the full planting plan for a field.
///
/// Pure calculation, nothing is persisted. Validation failures (non-finite
/// or non-positive diagonals, negative dose) come back as 400s.
pub async fn create_plan(Json(req): Json<PlanRequest>) -> AppResult<impl IntoResponse> {
    let plan = agronomy::plan(
        req.crop,
        req.diagonal_major_m,
        req.diagonal_minor_m,
        req.dose_per_m2,
    )?;
    Ok(Json(DataResponse { data: plan }))
}
