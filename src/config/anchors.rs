//! Anchor priors in grid-cell units.

use crate::util::{YoloPostError, YoloPostResult};

/// Interleaved `(w, h)` priors of the 5-anchor VOC YOLOv2 model.
pub const VOC_ANCHORS: [f32; 10] = [
    1.3221, 1.73145, 3.19275, 4.00944, 5.05587, 8.09892, 9.47112, 4.84053, 11.2364, 10.0071,
];

/// Width and height prior of one anchor, measured in grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub w: f32,
    pub h: f32,
}

impl Anchor {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Parses an interleaved `w0, h0, w1, h1, ...` list.
    pub fn from_flat(values: &[f32]) -> YoloPostResult<Vec<Anchor>> {
        if values.len() % 2 != 0 {
            return Err(YoloPostError::InvalidConfig {
                reason: "anchor list must hold (w, h) pairs",
            });
        }
        let anchors: Vec<Anchor> = values
            .chunks_exact(2)
            .map(|pair| Anchor::new(pair[0], pair[1]))
            .collect();
        if anchors.iter().any(|a| !a.is_valid()) {
            return Err(YoloPostError::InvalidConfig {
                reason: "anchor sizes must be finite and positive",
            });
        }
        Ok(anchors)
    }

    /// Anchors of the VOC YOLOv2 model.
    pub fn voc() -> Vec<Anchor> {
        VOC_ANCHORS
            .chunks_exact(2)
            .map(|pair| Anchor::new(pair[0], pair[1]))
            .collect()
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w > 0.0 && self.h > 0.0
    }
}
