//! Route definitions for planting plan calculations.

use axum::routing::post;
use axum::Router;

use crate::handlers::agronomy;
use crate::state::AppState;

/// Agronomy routes, mounted at `/agronomy`.
///
/// ```text
/// POST /plan  -> create_plan
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/plan", post(agronomy::create_plan))
}
