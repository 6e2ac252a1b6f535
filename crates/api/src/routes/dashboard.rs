//! Route definitions for dashboard aggregates.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Dashboard routes, mounted at `/dashboard`.
///
/// ```text
/// GET /overview  -> overview
/// GET /charts    -> charts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(dashboard::overview))
        .route("/charts", get(dashboard::charts))
}
