use image::{Rgb, RgbImage};
use ndarray::Array2;

/// A synthetic YOLO proposal in model input space.
#[derive(Debug, Clone, Copy)]
pub struct Proposal {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    pub class_id: usize,
    pub score: f32,
}

impl Proposal {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32, class_id: usize, score: f32) -> Self {
        Self { cx, cy, w, h, class_id, score }
    }
}

/// Builds a `(4 + num_classes, num_proposals)` prediction matrix the way a
/// YOLOv8-style export lays it out. Columns beyond `proposals.len()` are
/// left all-zero, i.e. below any sensible threshold.
pub fn raw_output(proposals: &[Proposal], num_classes: usize, num_proposals: usize) -> Array2<f32> {
    assert!(proposals.len() <= num_proposals);
    assert!(proposals.iter().all(|p| p.class_id < num_classes));

    let mut preds = Array2::<f32>::zeros((4 + num_classes, num_proposals));
    for (i, p) in proposals.iter().enumerate() {
        preds[[0, i]] = p.cx;
        preds[[1, i]] = p.cy;
        preds[[2, i]] = p.w;
        preds[[3, i]] = p.h;
        preds[[4 + p.class_id, i]] = p.score;
    }
    preds
}

/// Creates a blank white image, like an empty drawing sheet.
pub fn blank_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([255u8, 255u8, 255u8]))
}
