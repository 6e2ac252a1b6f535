//! Route definitions for image analysis.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vision;
use crate::state::AppState;

/// Vision routes, mounted at `/vision`.
///
/// ```text
/// GET    /models          -> list_models
/// POST   /analyze         -> analyze
/// GET    /sessions/{id}   -> get_session
/// DELETE /sessions/{id}   -> delete_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/models", get(vision::list_models))
        .route("/analyze", post(vision::analyze))
        .route(
            "/sessions/{id}",
            get(vision::get_session).delete(vision::delete_session),
        )
}
