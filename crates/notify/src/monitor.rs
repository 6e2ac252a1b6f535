//! Sensor monitoring rounds.
//!
//! [`AlertMonitor`] implements one round of the alerting pipeline: fetch the
//! readings from the last hour, evaluate them against the configured bounds,
//! dispatch whatever comes out. The monitor daemon drives [`AlertMonitor::run`]
//! on a fixed interval; the dashboard API calls [`AlertMonitor::run_round`]
//! directly for its manual trigger.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use farmtech_core::thresholds::{self, ThresholdConfig};
use farmtech_db::repositories::ReadingRepo;
use farmtech_db::DbPool;

use crate::dispatch::{AlertDispatcher, DispatchSummary};
use crate::publisher::NotifyError;

/// How far back each round looks for readings, in hours.
const READING_WINDOW_HOURS: i64 = 1;

/// Outcome of a single monitoring round.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoundSummary {
    /// Readings found inside the window.
    pub readings: usize,
    /// Threshold violations raised by the evaluator.
    pub alerts: usize,
    /// Delivery counters for the dispatched alerts.
    pub dispatch: DispatchSummary,
}

/// Periodic evaluator + dispatcher over recent sensor readings.
pub struct AlertMonitor {
    pool: DbPool,
    thresholds: ThresholdConfig,
    dispatcher: AlertDispatcher,
}

impl AlertMonitor {
    /// Create a monitor over the given pool, bounds, and dispatcher.
    pub fn new(pool: DbPool, thresholds: ThresholdConfig, dispatcher: AlertDispatcher) -> Self {
        Self {
            pool,
            thresholds,
            dispatcher,
        }
    }

    /// The bounds this monitor evaluates against.
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// The dispatcher this monitor delivers through.
    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    /// Execute one monitoring round.
    ///
    /// Every reading in the window is re-evaluated from scratch, so an
    /// out-of-bound value keeps alerting on every round until it leaves the
    /// window or returns to range.
    pub async fn run_round(&self) -> Result<RoundSummary, NotifyError> {
        let since = Utc::now() - chrono::Duration::hours(READING_WINDOW_HOURS);

        let readings = ReadingRepo::list_since(&self.pool, since).await?;
        let snapshots: Vec<_> = readings.iter().map(|r| r.to_snapshot()).collect();
        let alerts = thresholds::evaluate(&snapshots, &self.thresholds);

        let dispatch = self.dispatcher.dispatch_all(&alerts).await;

        let summary = RoundSummary {
            readings: readings.len(),
            alerts: alerts.len(),
            dispatch,
        };

        tracing::info!(
            readings = summary.readings,
            alerts = summary.alerts,
            emails_sent = dispatch.emails_sent,
            sms_sent = dispatch.sms_sent,
            failures = dispatch.failures,
            "Monitoring round complete"
        );

        Ok(summary)
    }

    /// Run monitoring rounds on a fixed cadence until cancelled.
    ///
    /// The first round runs immediately; subsequent rounds follow the
    /// interval. A failed round is logged and the loop continues.
    pub async fn run(&self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Alert monitor cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_round().await {
                        tracing::error!(error = %e, "Monitoring round failed");
                    }
                }
            }
        }
    }
}
