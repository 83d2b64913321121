use std::sync::Arc;

use iced::widget::image::Handle;
use image::RgbImage;

use crate::detection::Detector;
use crate::models::Detection;

/// Where the current interaction stands. One image per interaction; a new
/// upload restarts from `Running` regardless of the previous phase.
#[derive(Debug)]
pub enum Phase {
    /// No image uploaded yet.
    Idle,
    /// Image decoded, inference in flight.
    Running { original: Handle },
    /// Inference finished.
    Done {
        original: Handle,
        annotated: Handle,
        detections: Vec<Detection>,
    },
    /// Decode or inference failed; ready for a new upload.
    Failed {
        original: Option<Handle>,
        error: String,
    },
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

pub struct AppState {
    pub detector: Arc<Detector>,
    pub conf_threshold: f32,
    pub phase: Phase,
}

impl AppState {
    pub fn new(detector: Arc<Detector>, conf_threshold: f32) -> Self {
        Self {
            detector,
            conf_threshold,
            phase: Phase::default(),
        }
    }
}

/// Convert a decoded image into a widget handle.
pub fn to_handle(img: &RgbImage) -> Handle {
    let rgba = image::DynamicImage::ImageRgb8(img.clone()).to_rgba8();
    Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}
