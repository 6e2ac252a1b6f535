//! Weight file location.
//!
//! Each model has an ordered list of candidate paths under the configured
//! models directory. The first path that exists wins. Nothing validates the
//! file contents here; a corrupt file fails at load time with a
//! [`ModelLoadFailed`](crate::InferenceError::ModelLoadFailed) error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Detector flavor. The optimized variant trades a larger input resolution
/// for better accuracy; the baseline variant is the smaller training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorVariant {
    Optimized,
    Baseline,
}

impl DetectorVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimized => "optimized",
            Self::Baseline => "baseline",
        }
    }

    /// Square input resolution the variant was trained at, in pixels.
    pub fn input_size(&self) -> u32 {
        match self {
            Self::Optimized => 832,
            Self::Baseline => 640,
        }
    }

    /// The variant to try when this one cannot be served.
    pub fn fallback(&self) -> Self {
        match self {
            Self::Optimized => Self::Baseline,
            Self::Baseline => Self::Optimized,
        }
    }
}

impl std::fmt::Display for DetectorVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every model this layer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Detector(DetectorVariant),
    Classifier,
    IrrigationPredictor,
}

impl ModelKind {
    /// All model kinds, in report order.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Detector(DetectorVariant::Optimized),
        ModelKind::Detector(DetectorVariant::Baseline),
        ModelKind::Classifier,
        ModelKind::IrrigationPredictor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Detector(DetectorVariant::Optimized) => "detector-optimized",
            Self::Detector(DetectorVariant::Baseline) => "detector-baseline",
            Self::Classifier => "crop-classifier",
            Self::IrrigationPredictor => "irrigation-predictor",
        }
    }

    /// Candidate weight paths relative to the models directory, best first.
    /// Detector candidates follow the training-run layout, longest run first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Detector(DetectorVariant::Optimized) => &[
                "field_200ep/weights/best.onnx",
                "field_100ep/weights/best.onnx",
            ],
            Self::Detector(DetectorVariant::Baseline) => &[
                "field_60ep/weights/best.onnx",
                "field_30ep/weights/best.onnx",
            ],
            Self::Classifier => &["crop_health.onnx"],
            Self::IrrigationPredictor => &[
                "irrigation/irrigation_model.onnx",
                "irrigation_model.onnx",
            ],
        }
    }

    /// First existing candidate under `models_dir`, if any.
    pub fn resolve(&self, models_dir: &Path) -> Option<PathBuf> {
        self.candidates()
            .iter()
            .map(|candidate| models_dir.join(candidate))
            .find(|path| path.exists())
    }
}

/// One row of the model availability report.
#[derive(Debug, Clone, Serialize)]
pub struct ModelAvailability {
    pub model: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Availability of every known model under `models_dir`.
pub fn availability(models_dir: &Path) -> Vec<ModelAvailability> {
    ModelKind::ALL
        .iter()
        .map(|kind| {
            let path = kind.resolve(models_dir);
            ModelAvailability {
                model: kind.name(),
                available: path.is_some(),
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("field_200ep/weights/best.onnx"));
        touch(&dir.path().join("field_100ep/weights/best.onnx"));

        let resolved = ModelKind::Detector(DetectorVariant::Optimized)
            .resolve(dir.path())
            .unwrap();
        assert!(resolved.ends_with("field_200ep/weights/best.onnx"));
    }

    #[test]
    fn falls_through_to_later_candidates() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("field_100ep/weights/best.onnx"));

        let resolved = ModelKind::Detector(DetectorVariant::Optimized)
            .resolve(dir.path())
            .unwrap();
        assert!(resolved.ends_with("field_100ep/weights/best.onnx"));
    }

    #[test]
    fn missing_weights_resolve_to_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModelKind::Classifier.resolve(dir.path()).is_none());
    }

    #[test]
    fn availability_reports_every_model() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("crop_health.onnx"));

        let report = availability(dir.path());
        assert_eq!(report.len(), ModelKind::ALL.len());

        let classifier = report
            .iter()
            .find(|row| row.model == "crop-classifier")
            .unwrap();
        assert!(classifier.available);
        assert!(classifier.path.is_some());

        let optimized = report
            .iter()
            .find(|row| row.model == "detector-optimized")
            .unwrap();
        assert!(!optimized.available);
        assert!(optimized.path.is_none());
    }
}
