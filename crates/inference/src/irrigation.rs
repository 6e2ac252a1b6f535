//! Irrigation need predictor.
//!
//! Small tabular model over the four sensor features. Converted classifiers
//! of this shape commonly emit a label tensor alongside the probability
//! tensor, so the probability output is found by type rather than position.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InferenceError;

const MODEL: &str = "irrigation-predictor";

/// Feature vector, in training column order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IrrigationFeatures {
    pub humidity: f64,
    pub ph: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

/// Predictor verdict for one feature vector.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IrrigationPrediction {
    pub should_irrigate: bool,
    /// Probability that irrigation is needed.
    pub probability: f32,
}

pub struct IrrigationPredictor {
    session: Mutex<Session>,
}

impl IrrigationPredictor {
    /// Load predictor weights from `path`.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let load_failed = |reason: String| InferenceError::ModelLoadFailed {
            model: MODEL,
            path: path.to_path_buf(),
            reason,
        };

        let session = Session::builder()
            .map_err(|e| load_failed(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| load_failed(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| load_failed(e.to_string()))?;

        debug!(model = MODEL, path = %path.display(), "irrigation predictor loaded");

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Predict irrigation need from one feature vector.
    pub fn predict(
        &self,
        features: &IrrigationFeatures,
    ) -> Result<IrrigationPrediction, InferenceError> {
        let input = vec![
            features.humidity as f32,
            features.ph as f32,
            features.phosphorus as f32,
            features.potassium as f32,
        ];

        let tensor = Tensor::from_array((vec![1i64, 4], input)).map_err(|e| {
            InferenceError::InferenceFailed {
                model: MODEL,
                reason: format!("tensor creation error: {e}"),
            }
        })?;

        let probabilities = {
            let mut session =
                self.session
                    .lock()
                    .map_err(|e| InferenceError::InferenceFailed {
                        model: MODEL,
                        reason: format!("session lock poisoned: {e}"),
                    })?;

            let outputs = session.run(ort::inputs![tensor]).map_err(|e| {
                InferenceError::InferenceFailed {
                    model: MODEL,
                    reason: e.to_string(),
                }
            })?;

            // First float output wins; integer label outputs are skipped.
            let probabilities = outputs
                .iter()
                .find_map(|(_name, value)| {
                    value
                        .try_extract_tensor::<f32>()
                        .ok()
                        .map(|(_shape, data)| data.to_vec())
                })
                .ok_or_else(|| InferenceError::InferenceFailed {
                    model: MODEL,
                    reason: "no float output tensor".to_string(),
                })?;

            if probabilities.is_empty() {
                return Err(InferenceError::UnexpectedOutput {
                    model: MODEL,
                    shape: vec![0],
                });
            }
            probabilities
        };

        Ok(decide(&probabilities))
    }
}

/// Turn the probability row into a verdict. Two-class rows are
/// `[p_no, p_yes]`; a single value is already the irrigation probability.
fn decide(probabilities: &[f32]) -> IrrigationPrediction {
    let probability = if probabilities.len() >= 2 {
        probabilities[1]
    } else {
        probabilities[0]
    };
    IrrigationPrediction {
        should_irrigate: probability >= 0.5,
        probability,
    }
}
