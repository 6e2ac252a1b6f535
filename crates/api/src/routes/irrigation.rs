//! Route definitions for irrigation prediction.

use axum::routing::post;
use axum::Router;

use crate::handlers::irrigation;
use crate::state::AppState;

/// Irrigation routes, mounted at `/irrigation`.
///
/// ```text
/// POST /predict  -> predict
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(irrigation::predict))
}
