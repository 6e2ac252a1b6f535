//! Handlers for irrigation need prediction.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use farmtech_inference::IrrigationFeatures;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/v1/irrigation/predict
// ---------------------------------------------------------------------------

/// Predict whether irrigation is needed for a set of sensor values.
pub async fn predict(
    State(state): State<AppState>,
    Json(features): Json<IrrigationFeatures>,
) -> AppResult<impl IntoResponse> {
    validate_features(&features)?;

    let engine = Arc::clone(&state.engine);
    let prediction = tokio::task::spawn_blocking(move || engine.predict_irrigation(&features))
        .await
        .map_err(|e| AppError::InternalError(format!("Prediction task failed: {e}")))??;

    tracing::debug!(
        should_irrigate = prediction.should_irrigate,
        probability = prediction.probability,
        "irrigation prediction served",
    );

    Ok(Json(DataResponse { data: prediction }))
}

/// Reject values outside physical sensor ranges before they reach the model.
fn validate_features(features: &IrrigationFeatures) -> AppResult<()> {
    if !(0.0..=100.0).contains(&features.humidity) {
        return Err(AppError::BadRequest(
            "humidity must be between 0 and 100".to_string(),
        ));
    }
    if !(0.0..=14.0).contains(&features.ph) {
        return Err(AppError::BadRequest(
            "ph must be between 0 and 14".to_string(),
        ));
    }
    if features.phosphorus < 0.0 || features.potassium < 0.0 {
        return Err(AppError::BadRequest(
            "phosphorus and potassium must be non-negative".to_string(),
        ));
    }
    Ok(())
}
