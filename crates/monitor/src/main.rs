//! `farmtech-monitor` -- periodic sensor watchdog daemon.
//!
//! Polls recent readings on a fixed interval, evaluates them against the
//! configured thresholds, and dispatches alerts through the notification
//! channels. Runs until Ctrl-C or SIGTERM.
//!
//! # Environment variables
//!
//! | Variable                | Required | Default     | Description                          |
//! |-------------------------|----------|-------------|--------------------------------------|
//! | `DATABASE_URL`          | yes      | --          | Postgres connection string           |
//! | `MONITOR_INTERVAL_SECS` | no       | `900`       | Seconds between monitoring rounds    |
//! | `HUMIDITY_MIN`          | no       | `30`        | Humidity alert threshold (%)         |
//! | `PH_MIN`                | no       | `6`         | Lower pH bound                       |
//! | `PH_MAX`                | no       | `7.5`       | Upper pH bound                       |
//! | `ALERT_EMAIL`           | no       | --          | Email recipient for alerts           |
//! | `ALERT_PHONE`           | no       | --          | E.164 phone number for SMS alerts    |
//! | `SNS_TOPIC_ARN`         | no       | --          | SNS topic backing the email channel  |
//! | `AWS_REGION`            | no       | `sa-east-1` | AWS region for SNS                   |

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmtech_notify::{AlertDispatcher, AlertMonitor, NotifyConfig, SnsPublisher};

/// Default interval between monitoring rounds: the controller pushes
/// readings every 15 minutes, so the watchdog matches that cadence.
const DEFAULT_INTERVAL_SECS: u64 = 900;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmtech_monitor=info,farmtech_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        tracing::error!("DATABASE_URL environment variable is required");
        std::process::exit(1);
    });

    let interval_secs: u64 = std::env::var("MONITOR_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);
    let interval = Duration::from_secs(interval_secs);

    let config = NotifyConfig::from_env();

    tracing::info!(
        interval_secs,
        humidity_min = config.thresholds.humidity_min,
        ph_min = config.thresholds.ph_min,
        ph_max = config.thresholds.ph_max,
        email_configured = config.contacts.email.is_some(),
        sms_configured = config.contacts.phone.is_some(),
        "Starting farmtech-monitor",
    );

    let pool = match farmtech_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = farmtech_db::health_check(&pool).await {
        tracing::error!(error = %e, "Database health check failed");
        std::process::exit(1);
    }
    tracing::info!("Database health check passed");

    let publisher = SnsPublisher::from_env().await;
    let dispatcher = AlertDispatcher::new(Arc::new(publisher), config.contacts);
    let monitor = AlertMonitor::new(pool, config.thresholds, dispatcher);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    monitor.run(interval, cancel).await;

    tracing::info!("Monitor stopped");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the daemon
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
