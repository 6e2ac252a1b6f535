//! Route definitions for alert monitoring.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Alert routes, mounted at `/alerts`.
///
/// ```text
/// GET  /config  -> get_config
/// POST /run     -> run_round
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/config", get(alerts::get_config))
        .route("/run", post(alerts::run_round))
}
