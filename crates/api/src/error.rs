//! Unified error handling for the API.
//!
//! Every handler returns [`AppResult`]. The [`IntoResponse`] impl maps each
//! failure onto an HTTP status plus a stable machine-readable code, with a
//! JSON body of the shape `{"error": "...", "code": "..."}`. Details that
//! would leak internals (SQL, model paths, AWS responses) are logged and
//! replaced with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use farmtech_core::error::CoreError;
use farmtech_fieldapi::FieldApiError;
use farmtech_inference::InferenceError;
use farmtech_notify::NotifyError;

/// Application-level error, convertible from every layer below the handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    FieldApi(#[from] FieldApiError),

    #[error("{0}")]
    BadRequest(String),

    /// 404 for resources not keyed by a database id (vision sessions).
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InternalError(String),
}

/// Convenience alias used by all handlers.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(ref err) => match err {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                CoreError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
                }
                CoreError::Internal(_) => {
                    tracing::error!(error = %err, "internal domain error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Inference(ref err) => match err {
                InferenceError::WeightsNotFound { model, .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "MODEL_UNAVAILABLE",
                    format!("No trained weights installed for {model}"),
                ),
                InferenceError::ImageDecode(_) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_IMAGE",
                    "Uploaded file is not a decodable image".to_string(),
                ),
                InferenceError::ModelLoadFailed { .. }
                | InferenceError::InferenceFailed { .. }
                | InferenceError::UnexpectedOutput { .. } => {
                    tracing::error!(error = %err, "inference error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INFERENCE_FAILED",
                        "Model inference failed".to_string(),
                    )
                }
            },
            AppError::Notify(err) => match err {
                NotifyError::Database(db_err) => classify_sqlx_error(db_err),
                NotifyError::TopicNotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOTIFY_UNAVAILABLE",
                    err.to_string(),
                ),
                NotifyError::Publish(_) => {
                    tracing::error!(error = %err, "notification publish error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SNS_PUBLISH_FAILED",
                        "Alert publish to SNS failed".to_string(),
                    )
                }
            },
            AppError::FieldApi(ref err) => match err {
                FieldApiError::Request(_) => (
                    StatusCode::BAD_GATEWAY,
                    "FIELD_API_UNREACHABLE",
                    "Field controller API is not responding".to_string(),
                ),
                FieldApiError::Api { status, .. } => (
                    StatusCode::BAD_GATEWAY,
                    "FIELD_API_ERROR",
                    format!("Field controller returned status {status}"),
                ),
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Map a sqlx error onto a response triple without echoing SQL to clients.
fn classify_sqlx_error(err: sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // 23505 is Postgres unique_violation; our unique constraints are
            // all named with a uq_ prefix.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
