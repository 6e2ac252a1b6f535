//! Vision engine facade.
//!
//! Owns lazily loaded sessions for every model and implements the detector
//! fallback: when the requested variant cannot produce a result, the other
//! variant is tried, and the substitution is surfaced as a `Degraded`
//! outcome rather than hidden.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use tracing::warn;

use crate::classifier::CropClassifier;
use crate::config::ModelConfig;
use crate::detector::Detector;
use crate::error::InferenceError;
use crate::irrigation::{IrrigationFeatures, IrrigationPrediction, IrrigationPredictor};
use crate::outcome::{AnalysisOutcome, ClassificationReport, DetectionReport};
use crate::preprocess;
use crate::weights::{self, DetectorVariant, ModelAvailability, ModelKind};

pub struct VisionEngine {
    config: ModelConfig,
    detectors: Mutex<HashMap<DetectorVariant, Arc<Detector>>>,
    classifier: Mutex<Option<Arc<CropClassifier>>>,
    irrigation: Mutex<Option<Arc<IrrigationPredictor>>>,
}

impl VisionEngine {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            detectors: Mutex::new(HashMap::new()),
            classifier: Mutex::new(None),
            irrigation: Mutex::new(None),
        }
    }

    /// Which models have resolvable weights right now.
    pub fn availability(&self) -> Vec<ModelAvailability> {
        weights::availability(&self.config.models_dir)
    }

    /// Run the detector over uploaded image bytes.
    ///
    /// Tries the requested variant first. If it cannot load or run, the
    /// other variant is attempted and a successful result comes back as
    /// `Degraded` with the substitution spelled out. An undecodable image
    /// is an error regardless of variant.
    pub fn detect(
        &self,
        image_bytes: &[u8],
        variant: DetectorVariant,
    ) -> Result<AnalysisOutcome<DetectionReport>, InferenceError> {
        let image = preprocess::decode_image(image_bytes)?;

        let primary_error = match self.detect_with(&image, variant) {
            Ok(report) => return Ok(AnalysisOutcome::Completed { result: report }),
            Err(e) => e,
        };

        let fallback = variant.fallback();
        warn!(
            requested = %variant,
            fallback = %fallback,
            error = %primary_error,
            "detector unavailable, trying fallback variant"
        );

        match self.detect_with(&image, fallback) {
            Ok(report) => Ok(AnalysisOutcome::Degraded {
                result: report,
                warning: format!(
                    "{variant} detector unavailable ({primary_error}); used {fallback} instead"
                ),
            }),
            Err(_) => Err(primary_error),
        }
    }

    fn detect_with(
        &self,
        image: &DynamicImage,
        variant: DetectorVariant,
    ) -> Result<DetectionReport, InferenceError> {
        let detector = self.detector(variant)?;
        let detections = detector.detect(image)?;
        Ok(DetectionReport {
            model: ModelKind::Detector(variant).name(),
            total: detections.len(),
            detections,
        })
    }

    /// Run the crop health classifier over uploaded image bytes.
    pub fn classify(
        &self,
        image_bytes: &[u8],
    ) -> Result<AnalysisOutcome<ClassificationReport>, InferenceError> {
        let image = preprocess::decode_image(image_bytes)?;
        let classifier = self.classifier()?;
        let report = classifier.classify(&image)?;
        Ok(AnalysisOutcome::Completed { result: report })
    }

    /// Predict irrigation need from sensor features.
    pub fn predict_irrigation(
        &self,
        features: &IrrigationFeatures,
    ) -> Result<IrrigationPrediction, InferenceError> {
        let predictor = self.irrigation_predictor()?;
        predictor.predict(features)
    }

    // -----------------------------------------------------------------------
    // Model cache
    // -----------------------------------------------------------------------

    fn resolve(&self, kind: ModelKind) -> Result<std::path::PathBuf, InferenceError> {
        kind.resolve(&self.config.models_dir)
            .ok_or_else(|| InferenceError::WeightsNotFound {
                model: kind.name(),
                tried: kind
                    .candidates()
                    .iter()
                    .map(|candidate| self.config.models_dir.join(candidate))
                    .collect(),
            })
    }

    fn detector(&self, variant: DetectorVariant) -> Result<Arc<Detector>, InferenceError> {
        let mut cache = self
            .detectors
            .lock()
            .map_err(|e| InferenceError::InferenceFailed {
                model: ModelKind::Detector(variant).name(),
                reason: format!("cache lock poisoned: {e}"),
            })?;
        if let Some(detector) = cache.get(&variant) {
            return Ok(detector.clone());
        }
        let path = self.resolve(ModelKind::Detector(variant))?;
        let detector = Arc::new(Detector::load(&path, variant)?);
        cache.insert(variant, detector.clone());
        Ok(detector)
    }

    fn classifier(&self) -> Result<Arc<CropClassifier>, InferenceError> {
        let mut cache = self
            .classifier
            .lock()
            .map_err(|e| InferenceError::InferenceFailed {
                model: ModelKind::Classifier.name(),
                reason: format!("cache lock poisoned: {e}"),
            })?;
        if let Some(classifier) = cache.as_ref() {
            return Ok(classifier.clone());
        }
        let path = self.resolve(ModelKind::Classifier)?;
        let classifier = Arc::new(CropClassifier::load(&path)?);
        *cache = Some(classifier.clone());
        Ok(classifier)
    }

    fn irrigation_predictor(&self) -> Result<Arc<IrrigationPredictor>, InferenceError> {
        let mut cache = self
            .irrigation
            .lock()
            .map_err(|e| InferenceError::InferenceFailed {
                model: ModelKind::IrrigationPredictor.name(),
                reason: format!("cache lock poisoned: {e}"),
            })?;
        if let Some(predictor) = cache.as_ref() {
            return Ok(predictor.clone());
        }
        let path = self.resolve(ModelKind::IrrigationPredictor)?;
        let predictor = Arc::new(IrrigationPredictor::load(&path)?);
        *cache = Some(predictor.clone());
        Ok(predictor)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn engine_with_empty_dir() -> (tempfile::TempDir, VisionEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = VisionEngine::new(ModelConfig {
            models_dir: dir.path().to_path_buf(),
        });
        (dir, engine)
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        bytes
    }

    #[test]
    fn missing_weights_surface_as_an_error_not_a_result() {
        let (_dir, engine) = engine_with_empty_dir();
        let err = engine
            .detect(&png_bytes(), DetectorVariant::Optimized)
            .unwrap_err();
        // Both variants are missing, so the requested variant's error wins.
        match err {
            InferenceError::WeightsNotFound { model, tried } => {
                assert_eq!(model, "detector-optimized");
                assert_eq!(tried.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn classifier_without_weights_is_an_error() {
        let (_dir, engine) = engine_with_empty_dir();
        let err = engine.classify(&png_bytes()).unwrap_err();
        assert!(matches!(err, InferenceError::WeightsNotFound { .. }));
    }

    #[test]
    fn irrigation_without_weights_is_an_error() {
        let (_dir, engine) = engine_with_empty_dir();
        let features = IrrigationFeatures {
            humidity: 40.0,
            ph: 6.5,
            phosphorus: 50.0,
            potassium: 50.0,
        };
        let err = engine.predict_irrigation(&features).unwrap_err();
        assert!(matches!(err, InferenceError::WeightsNotFound { .. }));
    }

    #[test]
    fn undecodable_upload_fails_before_any_model_is_touched() {
        let (_dir, engine) = engine_with_empty_dir();
        let err = engine
            .detect(b"definitely not an image", DetectorVariant::Baseline)
            .unwrap_err();
        assert!(matches!(err, InferenceError::ImageDecode(_)));
    }

    #[test]
    fn availability_follows_the_models_directory() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("field_60ep/weights");
        std::fs::create_dir_all(&weights).unwrap();
        std::fs::write(weights.join("best.onnx"), b"").unwrap();

        let engine = VisionEngine::new(ModelConfig {
            models_dir: PathBuf::from(dir.path()),
        });
        let report = engine.availability();
        let baseline = report
            .iter()
            .find(|row| row.model == "detector-baseline")
            .unwrap();
        assert!(baseline.available);
    }
}
