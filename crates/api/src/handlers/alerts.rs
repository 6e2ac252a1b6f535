//! Handlers for alert monitoring configuration and manual rounds.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use farmtech_core::thresholds::ThresholdConfig;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/v1/alerts/config
// ---------------------------------------------------------------------------

/// Which delivery channels are configured. The addresses themselves are
/// operator secrets and stay out of API responses.
#[derive(Debug, Serialize)]
pub struct ChannelFlags {
    pub email: bool,
    pub sms: bool,
}

/// Response body for the alert configuration view.
#[derive(Debug, Serialize)]
pub struct AlertConfigResponse {
    pub thresholds: ThresholdConfig,
    pub channels: ChannelFlags,
}

/// Effective thresholds and configured delivery channels.
pub async fn get_config(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let contacts = state.monitor.dispatcher().contacts();
    Ok(Json(DataResponse {
        data: AlertConfigResponse {
            thresholds: *state.monitor.thresholds(),
            channels: ChannelFlags {
                email: contacts.email.is_some(),
                sms: contacts.phone.is_some(),
            },
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /api/v1/alerts/run
// ---------------------------------------------------------------------------

/// Run one monitoring round now instead of waiting for the schedule.
///
/// Same code path as the daemon: evaluate the recent window, dispatch
/// whatever comes up, return the counters.
pub async fn run_round(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = state.monitor.run_round().await?;

    tracing::info!(
        readings = summary.readings,
        alerts = summary.alerts,
        emails_sent = summary.dispatch.emails_sent,
        sms_sent = summary.dispatch.sms_sent,
        "manual monitoring round finished",
    );

    Ok(Json(DataResponse { data: summary }))
}
