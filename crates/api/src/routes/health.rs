use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness routes, mounted at the application root rather than `/api/v1`
/// so load balancers and uptime probes need no version knowledge.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Payload for `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` while the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Answer 200 regardless; a broken database downgrades `status` instead of
/// failing the probe, so orchestrators keep the process alive while it
/// reconnects.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = farmtech_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
