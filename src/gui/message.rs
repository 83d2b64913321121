use std::path::PathBuf;

use image::RgbImage;

use crate::detection::DetectionOutput;

#[derive(Debug, Clone)]
pub enum Message {
    /// The user asked to pick an image file.
    OpenImage,
    /// The file dialog closed, possibly without a selection.
    ImagePicked(Option<PathBuf>),
    /// The picked file finished decoding.
    ImageDecoded(Result<RgbImage, String>),
    /// The detection pass finished.
    DetectionFinished(Result<DetectionOutput, String>),
}
