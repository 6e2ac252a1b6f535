//! Route definitions for the relational farm structure.

use axum::routing::get;
use axum::Router;

use crate::handlers::farm;
use crate::state::AppState;

/// Farm structure routes, merged at the `/api/v1` root.
///
/// ```text
/// GET /producers          -> list_producers
/// GET /producers/{id}     -> get_producer
/// GET /crops              -> list_crops
/// GET /sensors            -> list_sensors
/// GET /sensors/installed  -> list_installed_sensors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/producers", get(farm::list_producers))
        .route("/producers/{id}", get(farm::get_producer))
        .route("/crops", get(farm::list_crops))
        .route("/sensors", get(farm::list_sensors))
        .route("/sensors/installed", get(farm::list_installed_sensors))
}
