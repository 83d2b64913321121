//! Decoding of raw YOLO output tensors into detection candidates.
//!
//! Kept free of ONNX Runtime types so the decode and suppression logic can
//! be exercised with synthetic tensors.

use ndarray::ArrayView2;

use crate::errors::{DetectError, Result};

/// IoU threshold for non-maximum suppression.
pub const IOU_THRESHOLD: f32 = 0.45;

/// A decoded candidate in original-image pixel coordinates, before the
/// integer clamp that produces a [`crate::models::BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RawDetection {
    fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &RawDetection) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        let union = self.width() * self.height() + other.width() * other.height() - inter;
        inter / union
    }
}

/// Decode a `(4 + num_classes, num_proposals)` YOLO prediction matrix.
///
/// Each proposal column holds `[cx, cy, w, h, class scores...]` in model
/// input space. A proposal is kept when its best class score reaches
/// `conf_threshold`; its box is scaled back to `(orig_width, orig_height)`
/// pixel space and clamped to the image. Results are ordered by descending
/// confidence, ties keeping proposal order.
pub fn decode_predictions(
    preds: ArrayView2<'_, f32>,
    conf_threshold: f32,
    input_size: u32,
    orig_dims: (u32, u32),
) -> Result<Vec<RawDetection>> {
    let num_attrs = preds.nrows();
    if num_attrs <= 4 {
        return Err(DetectError::OutputShape {
            got: preds.shape().to_vec(),
        });
    }
    let num_classes = num_attrs - 4;

    let (orig_width, orig_height) = orig_dims;
    let scale_x = orig_width as f32 / input_size as f32;
    let scale_y = orig_height as f32 / input_size as f32;

    let mut candidates = Vec::new();

    for i in 0..preds.ncols() {
        let mut class_id = 0usize;
        let mut score = f32::MIN;
        for c in 0..num_classes {
            let s = preds[[4 + c, i]];
            if s > score {
                score = s;
                class_id = c;
            }
        }

        if score < conf_threshold {
            continue;
        }

        let cx = preds[[0, i]];
        let cy = preds[[1, i]];
        let w = preds[[2, i]];
        let h = preds[[3, i]];

        candidates.push(RawDetection {
            class_id,
            confidence: score,
            x1: ((cx - w / 2.0) * scale_x).max(0.0),
            y1: ((cy - h / 2.0) * scale_y).max(0.0),
            x2: ((cx + w / 2.0) * scale_x).min(orig_width as f32),
            y2: ((cy + h / 2.0) * scale_y).min(orig_height as f32),
        });
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(candidates)
}

/// Class-aware greedy non-maximum suppression.
///
/// Expects `candidates` sorted by descending confidence; the survivors keep
/// that order.
pub fn non_max_suppression(candidates: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    let mut kept: Vec<RawDetection> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(class_id: usize, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> RawDetection {
        RawDetection { class_id, confidence, x1, y1, x2, y2 }
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = boxed(0, 0.9, 0.0, 0.0, 10.0, 10.0);
        let b = boxed(0, 0.8, 20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = boxed(0, 0.9, 5.0, 5.0, 15.0, 25.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn nms_keeps_highest_confidence_per_cluster() {
        let candidates = vec![
            boxed(0, 0.9, 0.0, 0.0, 10.0, 10.0),
            boxed(0, 0.8, 1.0, 1.0, 11.0, 11.0),
            boxed(0, 0.7, 50.0, 50.0, 60.0, 60.0),
        ];
        let kept = non_max_suppression(candidates, IOU_THRESHOLD);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.7);
    }

    #[test]
    fn nms_does_not_suppress_across_classes() {
        let candidates = vec![
            boxed(0, 0.9, 0.0, 0.0, 10.0, 10.0),
            boxed(1, 0.8, 0.0, 0.0, 10.0, 10.0),
        ];
        let kept = non_max_suppression(candidates, IOU_THRESHOLD);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn decode_rejects_malformed_output() {
        let preds = ndarray::Array2::<f32>::zeros((3, 10));
        let result = decode_predictions(preds.view(), 0.3, 640, (640, 640));
        assert!(matches!(result, Err(DetectError::OutputShape { .. })));
    }
}
