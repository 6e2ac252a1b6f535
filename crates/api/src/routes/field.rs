//! Route definitions for the field controller proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::field;
use crate::state::AppState;

/// Field controller routes, mounted at `/field`.
///
/// ```text
/// GET /status      -> status
/// GET /producers   -> producers
/// GET /sensors     -> sensors
/// GET /readings    -> readings
/// GET /irrigation  -> irrigation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(field::status))
        .route("/producers", get(field::producers))
        .route("/sensors", get(field::sensors))
        .route("/readings", get(field::readings))
        .route("/irrigation", get(field::irrigation))
}
