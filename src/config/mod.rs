//! Decode configuration shared by the decoder, suppressor and detector.

mod anchors;

pub use anchors::{Anchor, VOC_ANCHORS};

use crate::tensor::TensorShape;
use crate::util::{YoloPostError, YoloPostResult};

/// Box parameters (`tx, ty, tw, th`) plus objectness preceding the class logits.
pub const BOX_FEATURES: usize = 5;

/// Per-run decode parameters.
///
/// The raw tensor must have `anchors.len() * (num_classes + 5)` channels and a
/// `side x side` grid.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeConfig {
    /// Grid cells per row and column.
    pub side: usize,
    /// Anchor priors; one candidate box per anchor per cell.
    pub anchors: Vec<Anchor>,
    /// Number of classes scored per box.
    pub num_classes: usize,
    /// Candidate class probabilities below this value are zeroed.
    pub score_threshold: f32,
    /// Boxes overlapping a kept box by more than this IoU are suppressed.
    pub iou_threshold: f32,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            side: 13,
            anchors: Anchor::voc(),
            num_classes: 20,
            score_threshold: 0.25,
            iou_threshold: 0.70,
        }
    }
}

impl DecodeConfig {
    /// Creates a config with the default thresholds.
    pub fn new(side: usize, anchors: Vec<Anchor>, num_classes: usize) -> Self {
        Self {
            side,
            anchors,
            num_classes,
            ..Self::default()
        }
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f32) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn num_anchors(&self) -> usize {
        self.anchors.len()
    }

    /// Raw features per anchor (`num_classes + 5`).
    pub fn features_per_anchor(&self) -> usize {
        self.num_classes + BOX_FEATURES
    }

    /// Channels the raw tensor must have.
    pub fn expected_channels(&self) -> usize {
        self.num_anchors() * self.features_per_anchor()
    }

    /// Candidate boxes produced per image (`side * side * anchors`).
    pub fn candidates_per_image(&self) -> usize {
        self.side * self.side * self.num_anchors()
    }

    /// Validates the configuration on its own.
    pub fn validate(&self) -> YoloPostResult<()> {
        if self.num_classes == 0 {
            return Err(YoloPostError::InvalidConfig {
                reason: "num_classes must be > 0",
            });
        }
        if self.anchors.is_empty() {
            return Err(YoloPostError::InvalidConfig {
                reason: "at least one anchor is required",
            });
        }
        if self.anchors.iter().any(|a| !a.is_valid()) {
            return Err(YoloPostError::InvalidConfig {
                reason: "anchor sizes must be finite and positive",
            });
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(YoloPostError::InvalidConfig {
                reason: "score_threshold must be in [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(YoloPostError::InvalidConfig {
                reason: "iou_threshold must be in [0, 1]",
            });
        }
        Ok(())
    }

    /// Validates the configuration against a tensor shape.
    pub fn validate_shape(&self, shape: TensorShape) -> YoloPostResult<()> {
        self.validate()?;
        let expected = self.expected_channels();
        if shape.channels != expected {
            return Err(YoloPostError::ChannelMismatch {
                expected,
                got: shape.channels,
                anchors: self.num_anchors(),
                features: self.features_per_anchor(),
            });
        }
        if shape.height != self.side || shape.width != self.side {
            return Err(YoloPostError::GridMismatch {
                height: shape.height,
                width: shape.width,
                side: self.side,
            });
        }
        Ok(())
    }
}
