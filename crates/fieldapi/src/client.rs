//! REST client for the field controller HTTP endpoints.
//!
//! Wraps the controller's Flask API (producer/sensor/reading listings and
//! the irrigation gate) using [`reqwest`]. The controller speaks Portuguese
//! route names and keys; those stay on the wire, the Rust surface does not.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::FieldApiConfig;

/// Timeout for the short reachability probe, separate from regular calls.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client for a single field controller instance.
pub struct FieldApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the field controller REST layer.
#[derive(Debug, thiserror::Error)]
pub enum FieldApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The controller returned a non-2xx status code.
    #[error("field controller error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Reachability of the controller, as seen by the short probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    /// Responding with a success status.
    Online,
    /// Responding, but with an error status.
    Erroring,
    /// Not responding within the probe timeout.
    Offline,
}

/// Irrigation gate reported by the controller.
///
/// A missing `pode_irrigar` key means irrigation is allowed; the remaining
/// keys (rain forecast context) pass through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationStatus {
    #[serde(rename = "pode_irrigar", default = "default_can_irrigate")]
    pub can_irrigate: bool,
    #[serde(flatten)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

fn default_can_irrigate() -> bool {
    true
}

impl FieldApiClient {
    /// Create a new client for a controller instance.
    pub fn new(config: FieldApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, config: FieldApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List registered producers. Sends a `GET /produtores` request.
    pub async fn producers(&self) -> Result<serde_json::Value, FieldApiError> {
        let response = self
            .client
            .get(format!("{}/produtores", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// List registered sensors. Sends a `GET /sensores` request.
    pub async fn sensors(&self) -> Result<serde_json::Value, FieldApiError> {
        let response = self
            .client
            .get(format!("{}/sensores", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// List raw controller readings. Sends a `GET /leituras` request.
    pub async fn readings(&self) -> Result<serde_json::Value, FieldApiError> {
        let response = self
            .client
            .get(format!("{}/leituras", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Fetch the irrigation gate. Sends a `GET /status-irrigacao` request.
    pub async fn irrigation_status(&self) -> Result<IrrigationStatus, FieldApiError> {
        let response = self
            .client
            .get(format!("{}/status-irrigacao", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Short reachability probe against the producer listing.
    pub async fn probe(&self) -> FieldStatus {
        let result = self
            .client
            .get(format!("{}/produtores", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => FieldStatus::Online,
            Ok(_) => FieldStatus::Erroring,
            Err(_) => FieldStatus::Offline,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`FieldApiError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FieldApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FieldApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FieldApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
