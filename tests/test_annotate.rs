//! Annotated-image guarantees: a full copy of the input at the same size,
//! unchanged when nothing was detected.

mod common;

use common::*;
use drawscan::detection::annotate::draw_detections;
use drawscan::{BoundingBox, Detection};

fn detection_at(img: &image::RgbImage, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
    let bbox = BoundingBox::from_xyxy(x1, y1, x2, y2, img.width(), img.height())
        .expect("test box should be valid");
    let crop = bbox.crop(img).expect("test crop should be non-empty");
    Detection {
        class_id: 0,
        class_name: "dimension".to_string(),
        confidence: 0.9,
        bbox,
        crop,
    }
}

#[test]
fn blank_image_with_no_detections_is_returned_unchanged() {
    let img = blank_image(100, 100);
    let annotated = draw_detections(&img, &[]);

    assert_eq!(annotated.dimensions(), (100, 100));
    assert_eq!(annotated.as_raw(), img.as_raw());
}

#[test]
fn annotations_do_not_modify_the_input() {
    let img = blank_image(100, 100);
    let before = img.clone();

    let det = detection_at(&img, 10.0, 10.0, 50.0, 50.0);
    let annotated = draw_detections(&img, &[det]);

    assert_eq!(img.as_raw(), before.as_raw(), "input must stay untouched");
    assert_eq!(annotated.dimensions(), img.dimensions());
    assert_ne!(annotated.as_raw(), img.as_raw(), "overlay must be burned in");
}

#[test]
fn overlay_touches_the_box_border() {
    let img = blank_image(200, 200);
    let det = detection_at(&img, 20.0, 30.0, 120.0, 130.0);
    let annotated = draw_detections(&img, &[det]);

    let border_pixel = annotated.get_pixel(20, 30);
    assert_ne!(border_pixel, img.get_pixel(20, 30));

    // Pixels well inside the box keep their original value.
    assert_eq!(annotated.get_pixel(70, 80), img.get_pixel(70, 80));
}
