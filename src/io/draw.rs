//! Drawing detections onto RGB images.

use crate::types::DetectionBox;
use crate::util::{YoloPostError, YoloPostResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

/// Default rectangle color (blue).
pub const BOX_COLOR: [u8; 3] = [0, 0, 255];

const LINE_THICKNESS: i32 = 2;

/// Loads an image from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> YoloPostResult<RgbImage> {
    let img = image::open(path).map_err(|err| YoloPostError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Saves an RGB image; the format follows the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> YoloPostResult<()> {
    image.save(path).map_err(|err| YoloPostError::ImageIo {
        reason: err.to_string(),
    })
}

/// Draws a 2-pixel rectangle for every detection, clipped to the image.
///
/// Edges follow [`DetectionBox::to_pixel_rect`]; edges outside the image are
/// not drawn. Boxes of any extent, including infinite ones, cost at most one
/// image-sized outline.
pub fn draw_detections(image: &mut RgbImage, detections: &[DetectionBox], color: [u8; 3]) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    for det in detections {
        let b = det.bbox;
        let Some((x0, x1)) = clipped_span(b.x, b.w, width) else {
            continue;
        };
        let Some((y0, y1)) = clipped_span(b.y, b.h, height) else {
            continue;
        };
        for inset in 0..LINE_THICKNESS {
            let (left, right) = (x0 + inset, x1 - inset);
            let (top, bottom) = (y0 + inset, y1 - inset);
            if right < left || bottom < top {
                break;
            }
            let rect = Rect::at(left, top)
                .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
            draw_hollow_rect_mut(image, rect, Rgb(color));
        }
    }
}

/// Inclusive pixel span of a centered extent, clamped to a margin of
/// `LINE_THICKNESS` around `[0, dim)` so off-image edges stay off-image.
fn clipped_span(center: f32, extent: f32, dim: u32) -> Option<(i32, i32)> {
    let dim_f = dim as f32;
    let start = f64::from((center - extent / 2.0) * dim_f).trunc();
    let size = f64::from(extent * dim_f).trunc();
    let end = if size.is_infinite() { size } else { start + size };
    if start.is_nan() || end.is_nan() || end < start {
        return None;
    }
    let lo = -f64::from(LINE_THICKNESS);
    let hi = f64::from(dim) - 1.0 + f64::from(LINE_THICKNESS);
    Some((start.clamp(lo, hi) as i32, end.clamp(lo, hi) as i32))
}

#[cfg(test)]
mod tests {
    use super::{draw_detections, BOX_COLOR};
    use crate::geometry::BoxGeom;
    use crate::types::DetectionBox;
    use image::{Rgb, RgbImage};

    #[test]
    fn rectangle_outline_is_drawn_and_interior_untouched() {
        let mut img = RgbImage::new(20, 20);
        let det = DetectionBox {
            bbox: BoxGeom::new(0.5, 0.5, 0.5, 0.5),
            score: 0.9,
            class_index: 0,
        };
        draw_detections(&mut img, &[det], BOX_COLOR);
        assert_eq!(*img.get_pixel(5, 5), Rgb(BOX_COLOR));
        assert_eq!(*img.get_pixel(15, 10), Rgb(BOX_COLOR));
        assert_eq!(*img.get_pixel(10, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn boxes_outside_the_image_are_clipped() {
        let mut img = RgbImage::new(4, 4);
        let det = DetectionBox {
            bbox: BoxGeom::new(1.0, 1.0, 4.0, 4.0),
            score: 0.9,
            class_index: 0,
        };
        draw_detections(&mut img, &[det], BOX_COLOR);
        // Every edge lies outside the 4x4 image.
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn unbounded_boxes_draw_only_visible_edges() {
        let mut img = RgbImage::new(32, 32);
        let huge = DetectionBox {
            bbox: BoxGeom::new(0.5, 0.5, 1e9, 1e9),
            score: 0.9,
            class_index: 0,
        };
        draw_detections(&mut img, &[huge], BOX_COLOR);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));

        // Infinitely wide, half the image tall: only the horizontal edges show.
        let wide = DetectionBox {
            bbox: BoxGeom::new(0.5, 0.5, f32::INFINITY, 0.5),
            score: 0.9,
            class_index: 0,
        };
        draw_detections(&mut img, &[wide], BOX_COLOR);
        assert_eq!(*img.get_pixel(0, 8), Rgb(BOX_COLOR));
        assert_eq!(*img.get_pixel(31, 9), Rgb(BOX_COLOR));
        assert_eq!(*img.get_pixel(16, 24), Rgb(BOX_COLOR));
        assert_eq!(*img.get_pixel(0, 16), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(16, 16), Rgb([0, 0, 0]));
    }
}
