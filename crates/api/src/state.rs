//! Shared application state threaded through every handler.

use std::sync::Arc;

use farmtech_db::DbPool;
use farmtech_fieldapi::FieldApiClient;
use farmtech_inference::VisionEngine;
use farmtech_notify::AlertMonitor;

use crate::config::ServerConfig;
use crate::sessions::VisionSessionStore;

/// Everything a handler can reach. Cloning is cheap: the pool is internally
/// shared and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    /// Lazy-loading ONNX model host for detection, classification, and
    /// irrigation prediction.
    pub engine: Arc<VisionEngine>,
    /// Client for the external field controller REST API.
    pub field: Arc<FieldApiClient>,
    /// Threshold monitor, shared with the scheduled daemon logic so manual
    /// rounds and the config endpoint see identical settings.
    pub monitor: Arc<AlertMonitor>,
    /// Completed vision analyses awaiting dashboard retrieval.
    pub sessions: VisionSessionStore,
}
