use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmtech_api::config::ServerConfig;
use farmtech_api::sessions::VisionSessionStore;
use farmtech_api::{routes, state};
use farmtech_fieldapi::{FieldApiClient, FieldApiConfig};
use farmtech_inference::{ModelConfig, VisionEngine};
use farmtech_notify::{AlertDispatcher, AlertMonitor, NotifyConfig, SnsPublisher};

use state::AppState;

/// Default cadence for the embedded monitor loop, matching the daemon.
const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 900;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmtech_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = farmtech_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    farmtech_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    farmtech_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- CORS ---
    let cors = build_cors_layer(&config);

    // --- Notification stack ---
    let notify_config = NotifyConfig::from_env();
    let publisher = SnsPublisher::from_env().await;
    let dispatcher = AlertDispatcher::new(Arc::new(publisher), notify_config.contacts);
    let monitor = Arc::new(AlertMonitor::new(
        pool.clone(),
        notify_config.thresholds,
        dispatcher,
    ));
    tracing::info!(
        humidity_min = monitor.thresholds().humidity_min,
        ph_min = monitor.thresholds().ph_min,
        ph_max = monitor.thresholds().ph_max,
        "Alert monitor configured"
    );

    // --- Embedded monitor loop (optional) ---
    // Single-process deploys can run the scheduled rounds in here instead of
    // the standalone daemon. Keep it off when the daemon runs, or every
    // round fires twice.
    let monitor_cancel = tokio_util::sync::CancellationToken::new();
    let monitor_handle = if embedded_monitor_enabled() {
        let interval = Duration::from_secs(monitor_interval_secs());
        let loop_monitor = Arc::clone(&monitor);
        let loop_cancel = monitor_cancel.clone();
        tracing::info!(interval_secs = interval.as_secs(), "Embedded monitor enabled");
        Some(tokio::spawn(async move {
            loop_monitor.run(interval, loop_cancel).await;
        }))
    } else {
        None
    };

    // --- Vision engine and field controller client ---
    let engine = Arc::new(VisionEngine::new(ModelConfig::from_env()));
    let available = engine.availability().iter().filter(|m| m.available).count();
    tracing::info!(models_available = available, "Vision engine ready");

    let field = Arc::new(FieldApiClient::new(FieldApiConfig::from_env()));
    tracing::info!(base_url = field.base_url(), "Field controller client ready");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
        field,
        monitor,
        sessions: VisionSessionStore::new(),
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500 JSON.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Some(handle) = monitor_handle {
        monitor_cancel.cancel();
        let _ = tokio::time::timeout(
            Duration::from_secs(config.shutdown_timeout_secs),
            handle,
        )
        .await;
        tracing::info!("Embedded monitor stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Whether `MONITOR_EMBEDDED` asks for in-process scheduled rounds.
fn embedded_monitor_enabled() -> bool {
    std::env::var("MONITOR_EMBEDDED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Round cadence in seconds, from `MONITOR_INTERVAL_SECS`.
fn monitor_interval_secs() -> u64 {
    std::env::var("MONITOR_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MONITOR_INTERVAL_SECS)
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
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

/// Build the CORS middleware layer from server configuration.
///
/// Panics at startup if any configured origin is invalid; misconfiguration
/// should fail fast.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
