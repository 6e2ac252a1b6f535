//! Computer vision and prediction models for field monitoring.
//!
//! Wraps ONNX Runtime sessions for the field problem detector, the crop
//! health classifier, and the irrigation need predictor. Weights are found
//! by ordered candidate paths under a configurable directory; when a
//! requested model cannot serve, the outcome is a typed error or an
//! explicitly degraded result, never a placeholder.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod irrigation;
pub mod outcome;
pub mod preprocess;
pub mod weights;

pub use classifier::{CropClassifier, CLASSIFIER_LABELS};
pub use config::ModelConfig;
pub use detector::{BoundingBox, Detection, Detector, DETECTOR_LABELS};
pub use engine::VisionEngine;
pub use error::InferenceError;
pub use irrigation::{IrrigationFeatures, IrrigationPrediction, IrrigationPredictor};
pub use outcome::{AnalysisOutcome, ClassificationReport, DetectionReport, ProblemSummary};
pub use weights::{DetectorVariant, ModelAvailability, ModelKind};
