use image::RgbImage;

/// Axis-aligned bounding box in original-image pixel coordinates.
/// Invariant: `x2 > x1` and `y2 > y1` (enforced by [`BoundingBox::from_xyxy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    /// Build a box from floating-point corners, clamped to the image bounds.
    /// Returns `None` when the box collapses to zero area after clamping.
    pub fn from_xyxy(x1: f32, y1: f32, x2: f32, y2: f32, img_width: u32, img_height: u32) -> Option<Self> {
        if img_width == 0 || img_height == 0 {
            return None;
        }

        let x1 = (x1.max(0.0) as u32).min(img_width - 1);
        let y1 = (y1.max(0.0) as u32).min(img_height - 1);
        let x2 = (x2.max(0.0).round() as u32).min(img_width);
        let y2 = (y2.max(0.0).round() as u32).min(img_height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(Self { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Extract the boxed region of `img` as its own image.
    /// Returns `None` if the region is empty (cannot happen for boxes built
    /// through `from_xyxy` against the same image).
    pub fn crop(&self, img: &RgbImage) -> Option<RgbImage> {
        let width = self.width().min(img.width().saturating_sub(self.x1));
        let height = self.height().min(img.height().saturating_sub(self.y1));

        if width == 0 || height == 0 {
            return None;
        }

        Some(image::imageops::crop_imm(img, self.x1, self.y1, width, height).to_image())
    }
}

/// One detected region of the input image.
#[derive(Debug, Clone)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// The boxed region extracted from the original image.
    pub crop: RgbImage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn from_xyxy_rejects_zero_area() {
        assert!(BoundingBox::from_xyxy(10.0, 10.0, 10.0, 20.0, 100, 100).is_none());
        assert!(BoundingBox::from_xyxy(10.0, 10.0, 5.0, 20.0, 100, 100).is_none());
        assert!(BoundingBox::from_xyxy(10.0, 10.0, 20.0, 10.0, 100, 100).is_none());
    }

    #[test]
    fn from_xyxy_clamps_to_image() {
        let bbox = BoundingBox::from_xyxy(-5.0, -5.0, 150.0, 150.0, 100, 100)
            .expect("clamped box should be valid");
        assert_eq!(bbox, BoundingBox { x1: 0, y1: 0, x2: 100, y2: 100 });
        assert_eq!(bbox.area(), 100 * 100);
    }

    #[test]
    fn crop_matches_box_dimensions() {
        let img = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        let bbox = BoundingBox::from_xyxy(10.0, 20.0, 40.0, 50.0, 100, 80).unwrap();
        let crop = bbox.crop(&img).expect("crop should be non-empty");
        assert_eq!(crop.dimensions(), (bbox.width(), bbox.height()));
    }
}
