//! Analysis outcomes.
//!
//! A degraded run is distinguishable from a clean one at the type level.
//! Callers either get a `Completed` result, a `Degraded` result carrying a
//! warning about what was substituted, or an error. There is no silent
//! placeholder path.

use serde::Serialize;

use crate::detector::Detection;

/// Result of one analysis run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    /// The requested model produced the result.
    Completed { result: T },
    /// A substitute model produced the result; `warning` says why.
    Degraded { result: T, warning: String },
}

impl<T> AnalysisOutcome<T> {
    pub fn result(&self) -> &T {
        match self {
            Self::Completed { result } | Self::Degraded { result, .. } => result,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Degraded { warning, .. } => Some(warning.as_str()),
        }
    }
}

/// Detections from one detector pass over one image.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    /// Model that actually ran, e.g. `detector-optimized`.
    pub model: &'static str,
    pub detections: Vec<Detection>,
    pub total: usize,
}

/// Classifier verdict for one image.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationReport {
    pub model: &'static str,
    pub label: String,
    pub confidence: f32,
}

/// Detections bucketed into the problem groups the alert pipeline
/// understands. Labels outside the known set land in neither bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProblemSummary {
    pub pests: Vec<Detection>,
    pub diseases: Vec<Detection>,
}

impl ProblemSummary {
    pub fn from_detections(detections: &[Detection]) -> Self {
        let mut summary = Self::default();
        for detection in detections {
            match detection.label.as_str() {
                "pest" => summary.pests.push(detection.clone()),
                "disease" => summary.diseases.push(detection.clone()),
                _ => {}
            }
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.pests.is_empty() && self.diseases.is_empty()
    }
}
