//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use farmtech_api::config::ServerConfig;
use farmtech_api::routes;
use farmtech_api::sessions::VisionSessionStore;
use farmtech_api::state::AppState;
use farmtech_core::thresholds::ThresholdConfig;
use farmtech_fieldapi::{FieldApiClient, FieldApiConfig};
use farmtech_inference::{ModelConfig, VisionEngine};
use farmtech_notify::{
    AlertContacts, AlertDispatcher, AlertMonitor, AlertPublisher, NotifyError,
};

/// Records publish calls instead of talking to SNS.
#[derive(Default)]
pub struct RecordingPublisher {
    pub emails: Mutex<Vec<String>>,
    pub sms: Mutex<Vec<String>>,
}

#[async_trait]
impl AlertPublisher for RecordingPublisher {
    async fn publish_email(&self, subject: &str, _message: &str) -> Result<(), NotifyError> {
        self.emails.lock().unwrap().push(subject.to_string());
        Ok(())
    }

    async fn publish_sms(&self, _phone: &str, message: &str) -> Result<(), NotifyError> {
        self.sms.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router plus a handle on the recording
/// publisher, for tests that assert on alert delivery.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The vision engine points at a
/// directory with no weights, and the field controller client points at a
/// closed local port.
pub fn build_test_app_with_publisher(pool: PgPool) -> (Router, Arc<RecordingPublisher>) {
    let config = test_config();

    let publisher = Arc::new(RecordingPublisher::default());
    let contacts = AlertContacts {
        email: Some("agro@example.com".to_string()),
        phone: Some("+5511999990001".to_string()),
    };
    let dispatcher = AlertDispatcher::new(
        Arc::clone(&publisher) as Arc<dyn AlertPublisher>,
        contacts,
    );
    let monitor = Arc::new(AlertMonitor::new(
        pool.clone(),
        ThresholdConfig::default(),
        dispatcher,
    ));

    let engine = Arc::new(VisionEngine::new(ModelConfig {
        models_dir: PathBuf::from("target/test-models-absent"),
    }));
    let field = Arc::new(FieldApiClient::new(FieldApiConfig {
        // Discard-protocol port: refused immediately on any sane test host.
        base_url: "http://127.0.0.1:9".to_string(),
    }));

    let state = AppState {
        pool,
        config: Arc::new(config),
        engine,
        field,
        monitor,
        sessions: VisionSessionStore::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    (app, publisher)
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_publisher(pool).0
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Issue a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a POST request with an empty body.
pub async fn post_empty(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a DELETE request.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
