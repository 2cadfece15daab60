//! Box types passed between the decoder, suppressor and detector.

use crate::geometry::{BoxGeom, PixelRect};

/// Candidate produced by the decoder for one `(cell, anchor)` slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CandidateBox {
    /// Normalized center/size geometry.
    pub bbox: BoxGeom,
    /// Sigmoid of the raw objectness feature, in `[0, 1]`.
    pub objectness: f32,
}

/// Final detection: a candidate box assigned to one class.
///
/// A single candidate can yield several detections, one per class it survives
/// suppression for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionBox {
    /// Normalized center/size geometry.
    pub bbox: BoxGeom,
    /// Objectness times the probability of `class_index`.
    pub score: f32,
    /// Assigned class.
    pub class_index: usize,
}

impl DetectionBox {
    /// Pixel rectangle of the box for an image of `img_width x img_height`.
    pub fn to_pixel_rect(&self, img_width: u32, img_height: u32) -> PixelRect {
        self.bbox.to_pixel_rect(img_width, img_height)
    }
}

/// Counters reported by the decoder for one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Candidate boxes produced (`side * side * anchors`).
    pub candidates: usize,
    /// Candidates whose raw features contained NaN or infinity.
    pub anomalies: usize,
    /// Non-zero class probabilities left after threshold filtering.
    pub above_threshold: usize,
}

/// Detections for one image of a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDetections {
    /// Position of the image in the batch.
    pub image: usize,
    /// Detections, grouped by class in ascending class order.
    pub detections: Vec<DetectionBox>,
    pub stats: DecodeStats,
}

/// Formats detections as whitespace-separated `class x y w h` lines.
pub fn format_box_info(detections: &[DetectionBox]) -> String {
    let mut out = String::new();
    for det in detections {
        out.push_str(&format!(
            "{}  {:.6}  {:.6}  {:.6}  {:.6}  \n",
            det.class_index, det.bbox.x, det.bbox.y, det.bbox.w, det.bbox.h
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{format_box_info, DetectionBox};
    use crate::geometry::BoxGeom;

    #[test]
    fn box_info_lines_match_expected_layout() {
        let dets = [
            DetectionBox {
                bbox: BoxGeom::new(0.5, 0.25, 0.125, 1.0),
                score: 0.9,
                class_index: 3,
            },
            DetectionBox {
                bbox: BoxGeom::new(0.1, 0.2, 0.3, 0.4),
                score: 0.3,
                class_index: 12,
            },
        ];
        let text = format_box_info(&dets);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "3  0.500000  0.250000  0.125000  1.000000  ");
        assert!(lines[1].starts_with("12  0.100000"));
    }
}
