//! Field controller endpoint configuration.

use std::env;

/// Default base URL of the field controller API.
pub const DEFAULT_FIELD_API_URL: &str = "http://localhost:5000";

/// Where the external field controller API lives.
///
/// | Variable        | Default                 | Description                      |
/// |-----------------|-------------------------|----------------------------------|
/// | `FIELD_API_URL` | `http://localhost:5000` | Base URL of the controller API   |
#[derive(Debug, Clone)]
pub struct FieldApiConfig {
    pub base_url: String,
}

impl FieldApiConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Self {
        let base_url = env::var("FIELD_API_URL")
            .unwrap_or_else(|_| DEFAULT_FIELD_API_URL.to_string());
        Self { base_url }
    }
}

impl Default for FieldApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FIELD_API_URL.to_string(),
        }
    }
}
