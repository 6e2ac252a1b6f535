//! Route definitions for sensor reading queries.

use axum::routing::get;
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

/// Reading routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /readings        -> list_readings
/// GET /readings/stats  -> reading_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/readings", get(readings::list_readings))
        .route("/readings/stats", get(readings::reading_stats))
}
