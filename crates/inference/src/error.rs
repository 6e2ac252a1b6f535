//! Error types for model loading and inference.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the inference layer.
///
/// A failed load or a failed forward pass is always an error or a degraded
/// outcome, never a fabricated result.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// None of the candidate weight files exist on disk.
    #[error("no weights found for {model}, tried {tried:?}")]
    WeightsNotFound {
        model: &'static str,
        tried: Vec<PathBuf>,
    },

    /// The weight file exists but the runtime could not load it.
    #[error("failed to load {model} from {path}: {reason}")]
    ModelLoadFailed {
        model: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// The uploaded bytes are not a decodable image.
    #[error("image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The forward pass itself failed.
    #[error("inference failed for {model}: {reason}")]
    InferenceFailed {
        model: &'static str,
        reason: String,
    },

    /// The model produced an output tensor this layer does not understand.
    #[error("unexpected output shape {shape:?} from {model}")]
    UnexpectedOutput {
        model: &'static str,
        shape: Vec<i64>,
    },
}
