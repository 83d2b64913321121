//! Burning detection overlays into a copy of the input image.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Detection;

const BORDER_THICKNESS: u32 = 2;

/// Deterministic per-class color, spread around the hue wheel so adjacent
/// class ids stay visually distinct.
pub fn class_color(class_id: usize) -> Rgb<u8> {
    let hue = ((class_id * 47) % 360) as f32;
    hsv_to_rgb(hue, 0.8, 0.9)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb<u8> {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb([
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    ])
}

/// Return a copy of `image` with a colored rectangle drawn around each
/// detection. The input is left untouched; class labels live in the textual
/// summary rather than on the image.
pub fn draw_detections(image: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut annotated = image.clone();

    for det in detections {
        let color = class_color(det.class_id);
        for inset in 0..BORDER_THICKNESS {
            let width = det.bbox.width().saturating_sub(2 * inset);
            let height = det.bbox.height().saturating_sub(2 * inset);
            if width == 0 || height == 0 {
                break;
            }
            let rect = Rect::at((det.bbox.x1 + inset) as i32, (det.bbox.y1 + inset) as i32)
                .of_size(width, height);
            draw_hollow_rect_mut(&mut annotated, rect, color);
        }
    }

    annotated
}
