//! Field problem detector.
//!
//! Single-stage detector exported to ONNX. Predictions come out as rows of
//! `(cx, cy, w, h, objectness, class scores...)` in input-pixel space; this
//! module filters them by confidence, runs per-class greedy NMS, and maps
//! the surviving boxes back to source-image pixels.

use std::path::Path;
use std::sync::Mutex;

use image::DynamicImage;
use ort::session::Session;
use ort::value::Tensor;
use serde::Serialize;
use tracing::debug;

use crate::error::InferenceError;
use crate::preprocess;
use crate::weights::DetectorVariant;

/// Minimum combined confidence for a prediction row to be kept.
pub const CONFIDENCE_THRESHOLD: f32 = 0.1;
/// Boxes of the same class overlapping above this ratio are suppressed.
pub const IOU_THRESHOLD: f32 = 0.45;
/// Hard cap on detections per image.
pub const MAX_DETECTIONS: usize = 1000;

/// Class table the detector was trained with.
pub const DETECTOR_LABELS: [&str; 2] = ["pest", "disease"];

/// Label for a raw class index. Indices beyond the table render as
/// `class_{n}` rather than failing the whole analysis.
pub fn class_label(index: usize) -> String {
    DETECTOR_LABELS
        .get(index)
        .map(|label| (*label).to_string())
        .unwrap_or_else(|| format!("class_{index}"))
}

/// Axis-aligned box in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }
}

/// One detected object.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Candidate surviving the confidence filter, still in input-pixel space.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    bbox: BoundingBox,
    confidence: f32,
    class: usize,
}

pub struct Detector {
    /// `run` needs `&mut Session`; the Mutex lets the detector be shared
    /// behind `&self`.
    session: Mutex<Session>,
    variant: DetectorVariant,
}

impl Detector {
    /// Load detector weights from `path`.
    pub fn load(path: &Path, variant: DetectorVariant) -> Result<Self, InferenceError> {
        let model = match variant {
            DetectorVariant::Optimized => "detector-optimized",
            DetectorVariant::Baseline => "detector-baseline",
        };
        let load_failed = |reason: String| InferenceError::ModelLoadFailed {
            model,
            path: path.to_path_buf(),
            reason,
        };

        let session = Session::builder()
            .map_err(|e| load_failed(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| load_failed(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| load_failed(e.to_string()))?;

        debug!(model, path = %path.display(), "detector loaded");

        Ok(Self {
            session: Mutex::new(session),
            variant,
        })
    }

    pub fn variant(&self) -> DetectorVariant {
        self.variant
    }

    fn model_name(&self) -> &'static str {
        match self.variant {
            DetectorVariant::Optimized => "detector-optimized",
            DetectorVariant::Baseline => "detector-baseline",
        }
    }

    /// Run detection over one image, returning boxes in source pixels.
    pub fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, InferenceError> {
        let model = self.model_name();
        let size = self.variant.input_size();
        let input = preprocess::to_nchw_scaled(image, size);

        let tensor = Tensor::from_array((
            vec![1i64, 3, i64::from(size), i64::from(size)],
            input,
        ))
        .map_err(|e| InferenceError::InferenceFailed {
            model,
            reason: format!("tensor creation error: {e}"),
        })?;

        let candidates = {
            let mut session =
                self.session
                    .lock()
                    .map_err(|e| InferenceError::InferenceFailed {
                        model,
                        reason: format!("session lock poisoned: {e}"),
                    })?;

            let outputs = session.run(ort::inputs![tensor]).map_err(|e| {
                InferenceError::InferenceFailed {
                    model,
                    reason: e.to_string(),
                }
            })?;

            let (_name, output) =
                outputs
                    .iter()
                    .next()
                    .ok_or_else(|| InferenceError::InferenceFailed {
                        model,
                        reason: "no output tensor".to_string(),
                    })?;

            let (shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
                InferenceError::InferenceFailed {
                    model,
                    reason: format!("tensor extraction failed: {e}"),
                }
            })?;

            decode_predictions(model, shape, data)?
        };

        let kept = non_max_suppression(candidates, IOU_THRESHOLD, MAX_DETECTIONS);
        Ok(to_source_pixels(
            kept,
            size,
            image.width(),
            image.height(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Prediction decoding
// ---------------------------------------------------------------------------

/// Decode raw prediction rows, keeping rows whose combined confidence
/// (objectness times best class score) clears the threshold.
fn decode_predictions(
    model: &'static str,
    shape: &[i64],
    data: &[f32],
) -> Result<Vec<Candidate>, InferenceError> {
    let (rows, width) = match shape {
        [1, rows, width] if *width >= 6 => (*rows as usize, *width as usize),
        [rows, width] if *width >= 6 => (*rows as usize, *width as usize),
        _ => {
            return Err(InferenceError::UnexpectedOutput {
                model,
                shape: shape.to_vec(),
            })
        }
    };

    let mut candidates = Vec::new();
    for row in data.chunks_exact(width).take(rows) {
        let objectness = row[4];
        let (class, class_score) = row[5..]
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, score)| {
                if score > best.1 {
                    (i, score)
                } else {
                    best
                }
            });
        let confidence = objectness * class_score;
        if confidence < CONFIDENCE_THRESHOLD {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        candidates.push(Candidate {
            bbox: BoundingBox {
                x1: cx - w / 2.0,
                y1: cy - h / 2.0,
                x2: cx + w / 2.0,
                y2: cy + h / 2.0,
            },
            confidence,
            class,
        });
    }
    Ok(candidates)
}

/// Greedy per-class NMS: walk candidates by descending confidence, drop any
/// box overlapping an already-kept box of the same class.
fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|existing| {
            existing.class == candidate.class
                && iou(&existing.bbox, &candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let overlap = BoundingBox {
        x1: a.x1.max(b.x1),
        y1: a.y1.max(b.y1),
        x2: a.x2.min(b.x2),
        y2: a.y2.min(b.y2),
    };
    let intersection = overlap.area();
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

/// Map boxes from input-pixel space back to the source image, clamped to
/// its bounds.
fn to_source_pixels(
    candidates: Vec<Candidate>,
    input_size: u32,
    source_width: u32,
    source_height: u32,
) -> Vec<Detection> {
    let scale_x = source_width as f32 / input_size as f32;
    let scale_y = source_height as f32 / input_size as f32;
    candidates
        .into_iter()
        .map(|candidate| Detection {
            label: class_label(candidate.class),
            confidence: candidate.confidence,
            bbox: BoundingBox {
                x1: (candidate.bbox.x1 * scale_x).clamp(0.0, source_width as f32),
                y1: (candidate.bbox.y1 * scale_y).clamp(0.0, source_height as f32),
                x2: (candidate.bbox.x2 * scale_x).clamp(0.0, source_width as f32),
                y2: (candidate.bbox.y2 * scale_y).clamp(0.0, source_height as f32),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        BoundingBox { x1, y1, x2, y2 }
    }

    fn candidate(bbox: BoundingBox, confidence: f32, class: usize) -> Candidate {
        Candidate {
            bbox,
            confidence,
            class,
        }
    }

    #[test]
    fn labels_cover_table_and_overflow() {
        assert_eq!(class_label(0), "pest");
        assert_eq!(class_label(1), "disease");
        assert_eq!(class_label(5), "class_5");
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(20.0, 20.0, 30.0, 30.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 0.0, 15.0, 10.0);
        // Intersection 50, union 150.
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn decode_keeps_confident_rows_and_picks_argmax_class() {
        // Two rows of (cx, cy, w, h, obj, pest score, disease score).
        let data = vec![
            100.0, 100.0, 20.0, 40.0, 0.9, 0.1, 0.8, // confident disease
            50.0, 50.0, 10.0, 10.0, 0.1, 0.5, 0.2, // 0.05 combined, dropped
        ];
        let decoded = decode_predictions("detector-baseline", &[1, 2, 7], &data).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].class, 1);
        assert!((decoded[0].confidence - 0.72).abs() < 1e-6);
        assert_eq!(decoded[0].bbox, boxed(90.0, 80.0, 110.0, 120.0));
    }

    #[test]
    fn decode_rejects_unknown_shape() {
        let err = decode_predictions("detector-baseline", &[1, 4], &[0.0; 4]).unwrap_err();
        assert!(matches!(err, InferenceError::UnexpectedOutput { .. }));
    }

    #[test]
    fn nms_suppresses_same_class_overlap() {
        let candidates = vec![
            candidate(boxed(0.0, 0.0, 10.0, 10.0), 0.9, 0),
            candidate(boxed(1.0, 1.0, 11.0, 11.0), 0.8, 0),
            candidate(boxed(50.0, 50.0, 60.0, 60.0), 0.7, 0),
        ];
        let kept = non_max_suppression(candidates, IOU_THRESHOLD, MAX_DETECTIONS);
        assert_eq!(kept.len(), 2);
        assert!((kept[0].confidence - 0.9).abs() < 1e-6);
        assert!((kept[1].confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn nms_keeps_overlapping_boxes_of_different_classes() {
        let candidates = vec![
            candidate(boxed(0.0, 0.0, 10.0, 10.0), 0.9, 0),
            candidate(boxed(1.0, 1.0, 11.0, 11.0), 0.8, 1),
        ];
        let kept = non_max_suppression(candidates, IOU_THRESHOLD, MAX_DETECTIONS);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn nms_caps_detection_count() {
        let candidates = (0..5)
            .map(|i| {
                let offset = i as f32 * 100.0;
                candidate(boxed(offset, offset, offset + 10.0, offset + 10.0), 0.9, 0)
            })
            .collect();
        let kept = non_max_suppression(candidates, IOU_THRESHOLD, 3);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn boxes_scale_back_to_source_pixels() {
        let kept = vec![candidate(boxed(320.0, 320.0, 640.0, 640.0), 0.9, 0)];
        // 640 px input, 1280x320 source: x doubles, y halves.
        let detections = to_source_pixels(kept, 640, 1280, 320);
        assert_eq!(detections[0].bbox, boxed(640.0, 160.0, 1280.0, 320.0));
        assert_eq!(detections[0].label, "pest");
    }

    #[test]
    fn scaled_boxes_clamp_to_image_bounds() {
        let kept = vec![candidate(boxed(-10.0, -10.0, 700.0, 700.0), 0.9, 1)];
        let detections = to_source_pixels(kept, 640, 640, 640);
        assert_eq!(detections[0].bbox, boxed(0.0, 0.0, 640.0, 640.0));
    }
}
