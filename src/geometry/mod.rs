//! Box geometry in normalized center/size form.
//!
//! Boxes are `(x, y, w, h)` with `(x, y)` the center, all relative to the
//! image width and height.

/// Axis-aligned box given by its center and extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxGeom {
    /// Center x, relative to image width.
    pub x: f32,
    /// Center y, relative to image height.
    pub y: f32,
    /// Width, relative to image width.
    pub w: f32,
    /// Height, relative to image height.
    pub h: f32,
}

impl BoxGeom {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Intersection over union with `other`, see [`iou`].
    pub fn iou(&self, other: &BoxGeom) -> f32 {
        iou(self, other)
    }

    /// Converts to a pixel rectangle for an image of `img_width x img_height`.
    ///
    /// The top-left corner and size are truncated toward zero; no clamping to
    /// the image is applied.
    pub fn to_pixel_rect(&self, img_width: u32, img_height: u32) -> PixelRect {
        let img_w = img_width as f32;
        let img_h = img_height as f32;
        PixelRect {
            x: ((self.x - self.w / 2.0) * img_w) as i32,
            y: ((self.y - self.h / 2.0) * img_h) as i32,
            width: (self.w * img_w) as i32,
            height: (self.h * img_h) as i32,
        }
    }
}

/// Integer rectangle in pixel coordinates (top-left corner plus size).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Signed overlap of two centered 1-D intervals.
///
/// Negative when the intervals are disjoint; check the sign before using the
/// value as an area term.
#[inline]
pub fn interval_overlap(center1: f32, extent1: f32, center2: f32, extent2: f32) -> f32 {
    let left = (center1 - extent1 / 2.0).max(center2 - extent2 / 2.0);
    let right = (center1 + extent1 / 2.0).min(center2 + extent2 / 2.0);
    right - left
}

/// Intersection over union of two boxes, in `[0, 1]`.
///
/// Returns 0 when the boxes are disjoint or touch on either axis, or when the
/// union has zero area. Boxes with infinite extent (unclamped `exp(tw)`) never
/// produce NaN: when both are unbounded along an axis the ratio is taken over
/// the remaining axis.
pub fn iou(a: &BoxGeom, b: &BoxGeom) -> f32 {
    let overlap_w = interval_overlap(a.x, a.w, b.x, b.w);
    let overlap_h = interval_overlap(a.y, a.h, b.y, b.h);
    if !(overlap_w > 0.0 && overlap_h > 0.0) {
        return 0.0;
    }
    let inter = overlap_w * overlap_h;
    if inter.is_infinite() {
        return axis_ratio(overlap_w, a.w, b.w) * axis_ratio(overlap_h, a.h, b.h);
    }
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    (inter / union).min(1.0)
}

/// 1-D IoU of two overlapping intervals; 1 when both are unbounded.
fn axis_ratio(overlap: f32, extent1: f32, extent2: f32) -> f32 {
    if extent1.is_infinite() && extent2.is_infinite() {
        return 1.0;
    }
    let ratio = overlap / (extent1 + extent2 - overlap);
    if ratio.is_nan() {
        0.0
    } else {
        ratio.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{interval_overlap, iou, BoxGeom, PixelRect};

    #[test]
    fn interval_overlap_is_signed() {
        assert!((interval_overlap(0.5, 0.2, 0.5, 0.2) - 0.2).abs() < 1e-6);
        assert!((interval_overlap(0.0, 2.0, 1.0, 2.0) - 1.0).abs() < 1e-6);
        assert!(interval_overlap(0.0, 1.0, 3.0, 1.0) < 0.0);
    }

    #[test]
    fn iou_of_self_is_one() {
        let a = BoxGeom::new(0.3, 0.4, 0.2, 0.1);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_is_zero_when_disjoint_on_one_axis() {
        let a = BoxGeom::new(0.2, 0.5, 0.2, 0.5);
        let b = BoxGeom::new(0.8, 0.5, 0.2, 0.5);
        assert_eq!(iou(&a, &b), 0.0);
        let c = BoxGeom::new(0.2, 0.9, 0.2, 0.1);
        let d = BoxGeom::new(0.2, 0.1, 0.2, 0.1);
        assert_eq!(iou(&c, &d), 0.0);
    }

    #[test]
    fn iou_of_half_shifted_boxes() {
        // Two unit squares shifted by half a side: inter 0.5, union 1.5.
        let a = BoxGeom::new(0.0, 0.0, 1.0, 1.0);
        let b = BoxGeom::new(0.5, 0.0, 1.0, 1.0);
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
        assert!((b.iou(&a) - a.iou(&b)).abs() < 1e-7);
    }

    #[test]
    fn iou_of_degenerate_boxes_is_zero() {
        let a = BoxGeom::new(0.5, 0.5, 0.0, 0.0);
        assert_eq!(iou(&a, &a), 0.0);
    }

    #[test]
    fn unbounded_boxes_stay_in_unit_range() {
        let wide = BoxGeom::new(0.5, 0.5, f32::INFINITY, 0.2);
        assert_eq!(iou(&wide, &wide), 1.0);

        // Same infinite width, shifted by half the height: 1-D IoU is 1/3.
        let shifted = BoxGeom::new(0.5, 0.6, f32::INFINITY, 0.2);
        assert!((iou(&wide, &shifted) - 1.0 / 3.0).abs() < 1e-6);

        let huge = BoxGeom::new(0.5, 0.5, f32::INFINITY, f32::INFINITY);
        assert_eq!(iou(&huge, &huge), 1.0);

        let small = BoxGeom::new(0.5, 0.5, 0.2, 0.2);
        let v = iou(&huge, &small);
        assert!((0.0..=1.0).contains(&v));
        assert_eq!(v, 0.0);
    }

    #[test]
    fn pixel_rect_truncates_toward_zero() {
        let b = BoxGeom::new(0.5, 0.5, 0.25, 0.5);
        assert_eq!(
            b.to_pixel_rect(100, 40),
            PixelRect {
                x: 37,
                y: 10,
                width: 25,
                height: 20,
            }
        );
    }
}
