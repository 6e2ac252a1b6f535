//! Route registration.
//!
//! Each submodule wires one resource area; [`api_routes`] assembles them
//! under `/api/v1`. The health probe stays at the application root.

pub mod agronomy;
pub mod alerts;
pub mod dashboard;
pub mod farm;
pub mod field;
pub mod health;
pub mod irrigation;
pub mod readings;
pub mod vision;

use axum::Router;

use crate::state::AppState;

/// All versioned routes, mounted by `main` under `/api/v1`.
///
/// ```text
/// GET    /readings                 recent readings with farm context
/// GET    /readings/stats           window aggregates
/// GET    /producers                list producers
/// GET    /producers/{id}           one producer
/// GET    /crops                    list crop records
/// GET    /sensors                  sensor catalog
/// GET    /sensors/installed        installations with context
/// GET    /dashboard/overview       landing-page metrics
/// GET    /dashboard/charts         humidity / pH series
/// POST   /agronomy/plan            planting plan calculation
/// GET    /vision/models            model weight availability
/// POST   /vision/analyze           run a model over an upload
/// GET    /vision/sessions/{id}     fetch a stored analysis
/// DELETE /vision/sessions/{id}     discard a stored analysis
/// POST   /irrigation/predict       irrigation need prediction
/// GET    /field/status             controller reachability probe
/// GET    /field/producers          controller passthrough
/// GET    /field/sensors            controller passthrough
/// GET    /field/readings           controller passthrough
/// GET    /field/irrigation         controller irrigation gate
/// GET    /alerts/config            thresholds + channel flags
/// POST   /alerts/run               immediate monitoring round
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(readings::router())
        .merge(farm::router())
        .nest("/dashboard", dashboard::router())
        .nest("/agronomy", agronomy::router())
        .nest("/vision", vision::router())
        .nest("/irrigation", irrigation::router())
        .nest("/field", field::router())
        .nest("/alerts", alerts::router())
}
