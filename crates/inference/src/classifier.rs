//! Crop health classifier.
//!
//! Binary CNN over whole images: 224x224 input with ImageNet
//! normalization, two logits out, softmax, argmax.

use std::path::Path;
use std::sync::Mutex;

use image::DynamicImage;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use crate::error::InferenceError;
use crate::outcome::ClassificationReport;
use crate::preprocess;

/// Square input resolution the classifier was trained at.
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// Class table the classifier was trained with.
pub const CLASSIFIER_LABELS: [&str; 2] = ["healthy", "diseased"];

const MODEL: &str = "crop-classifier";

pub struct CropClassifier {
    session: Mutex<Session>,
}

impl CropClassifier {
    /// Load classifier weights from `path`.
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

        debug!(model = MODEL, path = %path.display(), "classifier loaded");

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Classify one image.
    pub fn classify(&self, image: &DynamicImage) -> Result<ClassificationReport, InferenceError> {
        let size = CLASSIFIER_INPUT_SIZE;
        let input = preprocess::to_nchw_imagenet(image, size);

        let tensor = Tensor::from_array((
            vec![1i64, 3, i64::from(size), i64::from(size)],
            input,
        ))
        .map_err(|e| InferenceError::InferenceFailed {
            model: MODEL,
            reason: format!("tensor creation error: {e}"),
        })?;

        let logits = {
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

            let (_name, output) =
                outputs
                    .iter()
                    .next()
                    .ok_or_else(|| InferenceError::InferenceFailed {
                        model: MODEL,
                        reason: "no output tensor".to_string(),
                    })?;

            let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
                InferenceError::InferenceFailed {
                    model: MODEL,
                    reason: format!("tensor extraction failed: {e}"),
                }
            })?;

            if data.is_empty() {
                return Err(InferenceError::UnexpectedOutput {
                    model: MODEL,
                    shape: shape.to_vec(),
                });
            }
            data.to_vec()
        };

        let probabilities = softmax(&logits);
        let (index, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, p)| {
                if p > best.1 {
                    (i, p)
                } else {
                    best
                }
            });

        Ok(ClassificationReport {
            model: MODEL,
            label: CLASSIFIER_LABELS
                .get(index)
                .map(|label| (*label).to_string())
                .unwrap_or_else(|| format!("class_{index}")),
            confidence,
        })
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::MIN, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}
