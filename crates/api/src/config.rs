//! Server configuration loaded from environment variables.

/// Runtime configuration for the HTTP server.
///
/// | Variable                | Default                 | Description                          |
/// |-------------------------|-------------------------|--------------------------------------|
/// | `HOST`                  | `0.0.0.0`               | Bind address                         |
/// | `PORT`                  | `3000`                  | Bind port                            |
/// | `CORS_ORIGINS`          | `http://localhost:5173` | Comma-separated allowed origins      |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                    | Per-request timeout                  |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    | Grace period for in-flight requests  |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the environment, panicking on malformed values.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("PORT must be a valid u16");
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a number");
        let shutdown_timeout_secs = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a number");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}
