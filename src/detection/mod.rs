pub mod annotate;
pub mod model;
pub mod postprocess;

pub use model::Detector;

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use tracing::debug;

use crate::errors::Result;
use crate::models::{BoundingBox, Detection};

/// Result of one inference call: the input with overlays burned in, plus the
/// structured detections in the order the detector presented them
/// (descending confidence).
#[derive(Debug, Clone)]
pub struct DetectionOutput {
    pub annotated: RgbImage,
    pub detections: Vec<Detection>,
}

impl Detector {
    /// Run detection over a full image at the given confidence threshold.
    ///
    /// Detections whose box collapses to zero area are dropped; everything
    /// returned satisfies `x2 > x1` and `y2 > y1` with a non-empty crop.
    pub fn run_detection(&self, image: &RgbImage, conf_threshold: f32) -> Result<DetectionOutput> {
        let tensor = preprocess(image, self.input_size());
        let preds = self.predict(tensor.view())?;

        let candidates = postprocess::decode_predictions(
            preds.view(),
            conf_threshold,
            self.input_size(),
            image.dimensions(),
        )?;
        let raw_count = candidates.len();
        let kept = postprocess::non_max_suppression(candidates, postprocess::IOU_THRESHOLD);

        let mut detections = Vec::with_capacity(kept.len());
        for raw in kept {
            let Some(bbox) =
                BoundingBox::from_xyxy(raw.x1, raw.y1, raw.x2, raw.y2, image.width(), image.height())
            else {
                // Degenerate model output; suppressed but visible in logs.
                debug!(
                    class_id = raw.class_id,
                    x1 = raw.x1,
                    y1 = raw.y1,
                    x2 = raw.x2,
                    y2 = raw.y2,
                    "dropping zero-area detection"
                );
                continue;
            };
            let Some(crop) = bbox.crop(image) else {
                debug!(class_id = raw.class_id, ?bbox, "dropping detection with empty crop");
                continue;
            };

            detections.push(Detection {
                class_id: raw.class_id,
                class_name: self.class_name(raw.class_id),
                confidence: raw.confidence,
                bbox,
                crop,
            });
        }

        debug!(
            raw = raw_count,
            kept = detections.len(),
            threshold = conf_threshold,
            "detection pass complete"
        );

        let annotated = annotate::draw_detections(image, &detections);
        Ok(DetectionOutput { annotated, detections })
    }
}

/// Resize to the model's square input and convert to a normalized NCHW
/// float tensor.
pub(crate) fn preprocess(image: &RgbImage, input_size: u32) -> Array4<f32> {
    let size = input_size as usize;
    let resized = imageops::resize(image, input_size, input_size, FilterType::Triangle);

    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for channel in 0..3 {
            tensor[[0, channel, y as usize, x as usize]] = f32::from(pixel[channel]) / 255.0;
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn preprocess_produces_normalized_nchw_tensor() {
        let img = RgbImage::from_pixel(32, 32, Rgb([255, 0, 127]));
        let tensor = preprocess(&img, 16);

        assert_eq!(tensor.shape(), &[1, 3, 16, 16]);
        assert!((tensor[[0, 0, 8, 8]] - 1.0).abs() < 1e-6);
        assert!(tensor[[0, 1, 8, 8]].abs() < 1e-6);
        assert!((tensor[[0, 2, 8, 8]] - 127.0 / 255.0).abs() < 1e-2);
    }
}
