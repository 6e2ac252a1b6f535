//! Model location configuration.

use std::env;
use std::path::PathBuf;

/// Default directory searched for model weights, relative to the working
/// directory of the running service.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Where on disk the pretrained weights live.
///
/// | Variable     | Default  | Description                                |
/// |--------------|----------|--------------------------------------------|
/// | `MODELS_DIR` | `models` | Root directory searched for weight files   |
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
}

impl ModelConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Self {
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODELS_DIR));
        Self { models_dir }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
        }
    }
}
