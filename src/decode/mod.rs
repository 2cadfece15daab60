//! Grid decoding of raw region-layer activations.
//!
//! For every grid cell `(row, col)` and anchor `n` the decoder reads the
//! `5 + K` raw features `tx, ty, tw, th, t_obj, logits...` and produces one
//! candidate box:
//!
//! - `x = (col + sigmoid(tx)) / S`, `y = (row + sigmoid(ty)) / S`
//! - `w = exp(tw) * anchor.w / S`, `h = exp(th) * anchor.h / S`
//! - `objectness = sigmoid(t_obj)`
//! - class probability `c` = `objectness * softmax(logits)[c]`, or 0 below the
//!   score threshold.
//!
//! Candidates are emitted row by row, then column, then anchor, which is the
//! order suppression relies on for tie-breaking. `tw`/`th` are not clamped, so
//! large raw values give large (possibly infinite) extents.

use crate::candidate::matrix::ProbMatrix;
use crate::config::{Anchor, DecodeConfig, BOX_FEATURES};
use crate::geometry::BoxGeom;
use crate::tensor::{FeatureGrid, TensorView};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::types::{CandidateBox, DecodeStats};
use crate::util::math::{sigmoid, softmax_in_place};
use crate::util::{YoloPostError, YoloPostResult};

/// Decoded candidates of one image.
#[derive(Clone, Debug, Default)]
pub struct Candidates {
    /// One box per `(cell, anchor)` slot, in decode order.
    pub boxes: Vec<CandidateBox>,
    /// Thresholded class probabilities, one column per class.
    pub probs: ProbMatrix,
    pub stats: DecodeStats,
}

/// Decodes the box geometry of one anchor slot from its raw features.
///
/// `features` must hold at least the four box parameters.
pub fn decode_box(
    features: &[f32],
    anchor: Anchor,
    row: usize,
    col: usize,
    side: usize,
) -> BoxGeom {
    let s = side as f32;
    BoxGeom {
        x: (col as f32 + sigmoid(features[0])) / s,
        y: (row as f32 + sigmoid(features[1])) / s,
        w: features[2].exp() * anchor.w / s,
        h: features[3].exp() * anchor.h / s,
    }
}

/// Decodes image `image` of `view` into candidates.
pub fn decode_image(
    view: TensorView<'_>,
    image: usize,
    cfg: &DecodeConfig,
) -> YoloPostResult<Candidates> {
    cfg.validate_shape(view.shape())?;
    let grid = FeatureGrid::from_nchw(view, image, cfg.num_anchors(), cfg.features_per_anchor())?;
    let mut out = Candidates::default();
    let mut logits = Vec::with_capacity(cfg.num_classes);
    out.stats = decode_grid(&grid, cfg, &mut logits, &mut out.boxes, &mut out.probs)?;
    Ok(out)
}

/// Decodes a re-laid feature grid into `boxes` and `probs`.
///
/// Both outputs are cleared first; `logits` is scratch space. A slot whose
/// raw features are not all finite keeps its position with zero geometry,
/// zero objectness and zero probabilities, and is counted as an anomaly.
pub(crate) fn decode_grid(
    grid: &FeatureGrid,
    cfg: &DecodeConfig,
    logits: &mut Vec<f32>,
    boxes: &mut Vec<CandidateBox>,
    probs: &mut ProbMatrix,
) -> YoloPostResult<DecodeStats> {
    let side = cfg.side;
    let num_anchors = cfg.num_anchors();
    if grid.rows() != side || grid.cols() != side {
        return Err(YoloPostError::GridMismatch {
            height: grid.rows(),
            width: grid.cols(),
            side,
        });
    }
    if grid.anchors() != num_anchors || grid.features() != cfg.features_per_anchor() {
        return Err(YoloPostError::ChannelMismatch {
            expected: cfg.expected_channels(),
            got: grid.anchors() * grid.features(),
            anchors: num_anchors,
            features: cfg.features_per_anchor(),
        });
    }

    let _span = trace_span!("decode_grid", side = side, anchors = num_anchors).entered();

    let total = side * side * num_anchors;
    boxes.clear();
    boxes.reserve(total);
    probs.reset(total, cfg.num_classes);

    let mut stats = DecodeStats {
        candidates: total,
        ..DecodeStats::default()
    };
    for row in 0..side {
        for col in 0..side {
            for (n, anchor) in cfg.anchors.iter().enumerate() {
                let slot = boxes.len();
                let features = grid.anchor_features(row, col, n).ok_or(
                    YoloPostError::IndexOutOfBounds {
                        index: slot,
                        len: total,
                        context: "anchor slot",
                    },
                )?;

                if features.iter().any(|v| !v.is_finite()) {
                    stats.anomalies += 1;
                    boxes.push(CandidateBox::default());
                    continue;
                }

                let objectness = sigmoid(features[4]);
                boxes.push(CandidateBox {
                    bbox: decode_box(features, *anchor, row, col, side),
                    objectness,
                });

                logits.clear();
                logits.extend_from_slice(&features[BOX_FEATURES..]);
                softmax_in_place(logits)?;
                for (class, &p) in logits.iter().enumerate() {
                    let prob = objectness * p;
                    if prob >= cfg.score_threshold {
                        probs.set(slot, class, prob);
                        stats.above_threshold += 1;
                    }
                }
            }
        }
    }

    trace_event!(
        "decoded",
        candidates = stats.candidates,
        anomalies = stats.anomalies,
        above_threshold = stats.above_threshold
    );
    if stats.anomalies > 0 {
        trace_warn!("decode_grid", non_finite = stats.anomalies);
    }
    Ok(stats)
}
