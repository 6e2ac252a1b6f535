//! Handlers for image analysis and vision session retrieval.
//!
//! Uploads run through the shared [`VisionEngine`]; results are parked in
//! the in-memory session store so the dashboard can re-fetch them while the
//! user inspects the annotated image.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use farmtech_core::alert::Alert;
use farmtech_inference::{Detection, DetectorVariant, ProblemSummary};
use farmtech_notify::DispatchSummary;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::sessions::{AnalysisRecord, VisionSession};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/v1/vision/models
// ---------------------------------------------------------------------------

/// Availability snapshot for every model the engine can host.
pub async fn list_models(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.engine.availability(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/vision/analyze
// ---------------------------------------------------------------------------

/// Which model an upload should run through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnalysisModel {
    Detector(DetectorVariant),
    Classifier,
}

impl AnalysisModel {
    /// Parse the `model` multipart field. Absent means the optimized
    /// detector.
    fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.unwrap_or("optimized") {
            "optimized" => Ok(Self::Detector(DetectorVariant::Optimized)),
            "baseline" => Ok(Self::Detector(DetectorVariant::Baseline)),
            "classifier" => Ok(Self::Classifier),
            other => Err(AppError::BadRequest(format!(
                "Unknown model '{other}', expected optimized, baseline, or classifier"
            ))),
        }
    }
}

/// Response body for an analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub session: VisionSession,
    /// Present only when alert dispatch was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<DispatchSummary>,
}

/// Run a vision model over an uploaded image.
///
/// Multipart fields:
/// - `image` (required): the image file
/// - `model`: `optimized` (default), `baseline`, or `classifier`
/// - `notify`: `true` to dispatch alerts for detected problems
/// - `field_location`: free-text location attached to any alerts
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut image: Option<Vec<u8>> = None;
    let mut model: Option<String> = None;
    let mut notify = false;
    let mut field_location: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                image = Some(data.to_vec());
            }
            "model" => model = Some(text_field(field).await?),
            "notify" => notify = text_field(field).await? == "true",
            "field_location" => {
                field_location = Some(text_field(field).await?).filter(|s| !s.is_empty());
            }
            _ => {}
        }
    }

    let image = image
        .ok_or_else(|| AppError::BadRequest("Multipart field 'image' is required".to_string()))?;
    let model = AnalysisModel::parse(model.as_deref())?;

    // ONNX inference is CPU-bound; keep it off the async workers.
    let engine = Arc::clone(&state.engine);
    let record = tokio::task::spawn_blocking(move || match model {
        AnalysisModel::Detector(variant) => {
            engine.detect(&image, variant).map(AnalysisRecord::Detection)
        }
        AnalysisModel::Classifier => engine.classify(&image).map(AnalysisRecord::Classification),
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Analysis task failed: {e}")))??;

    let notifications = if notify {
        Some(dispatch_problem_alerts(&state, &record, field_location).await)
    } else {
        None
    };

    let session = state.sessions.insert(record).await;

    tracing::info!(
        session_id = %session.id,
        model = ?model,
        notified = notify,
        "vision analysis stored",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AnalyzeResponse {
                session,
                notifications,
            },
        }),
    ))
}

/// Read a multipart field as trimmed UTF-8 text.
async fn text_field(field: Field<'_>) -> AppResult<String> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// Send at most one pest and one disease alert for an analysis, carrying the
/// highest-confidence detection of each kind. Classifier results never alert.
async fn dispatch_problem_alerts(
    state: &AppState,
    record: &AnalysisRecord,
    field_location: Option<String>,
) -> DispatchSummary {
    let AnalysisRecord::Detection(outcome) = record else {
        return DispatchSummary::default();
    };

    let summary = ProblemSummary::from_detections(&outcome.result().detections);
    let mut alerts = Vec::new();

    if let Some(pest) = top_detection(&summary.pests) {
        alerts.push(Alert::PestDetected {
            label: pest.label.clone(),
            confidence: f64::from(pest.confidence),
            field_location: field_location.clone(),
        });
    }
    if let Some(disease) = top_detection(&summary.diseases) {
        alerts.push(Alert::DiseaseDetected {
            label: disease.label.clone(),
            confidence: f64::from(disease.confidence),
            field_location,
        });
    }

    state.monitor.dispatcher().dispatch_all(&alerts).await
}

/// Highest-confidence detection, if any.
fn top_detection(detections: &[Detection]) -> Option<&Detection> {
    detections
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

// ---------------------------------------------------------------------------
// GET /api/v1/vision/sessions/{id}
// ---------------------------------------------------------------------------

/// Fetch a stored analysis by session id.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Vision session {id} not found")))?;
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/vision/sessions/{id}
// ---------------------------------------------------------------------------

/// Discard a stored analysis.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Vision session {id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parse_accepts_known_names_and_defaults() {
        assert_eq!(
            AnalysisModel::parse(None).unwrap(),
            AnalysisModel::Detector(DetectorVariant::Optimized)
        );
        assert_eq!(
            AnalysisModel::parse(Some("baseline")).unwrap(),
            AnalysisModel::Detector(DetectorVariant::Baseline)
        );
        assert_eq!(
            AnalysisModel::parse(Some("classifier")).unwrap(),
            AnalysisModel::Classifier
        );
        assert!(AnalysisModel::parse(Some("cnn")).is_err());
    }

    #[test]
    fn top_detection_prefers_highest_confidence() {
        use farmtech_inference::BoundingBox;

        let mk = |confidence: f32| Detection {
            label: "pest".to_string(),
            confidence,
            bbox: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
        };
        let detections = vec![mk(0.4), mk(0.9), mk(0.6)];

        let top = top_detection(&detections).unwrap();
        assert_eq!(top.confidence, 0.9);
        assert!(top_detection(&[]).is_none());
    }
}
