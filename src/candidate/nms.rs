//! Multi-label greedy non-maximum suppression.
//!
//! Each class is suppressed on its own column of the [`ProbMatrix`]:
//! candidates are visited in descending probability order, and every kept
//! candidate zeroes the class probability of each later candidate whose IoU
//! with it exceeds the threshold. Classes never influence each other, so one
//! candidate may survive for several classes.

use crate::candidate::matrix::ProbMatrix;
use crate::candidate::order::{fill_sorted_desc, ScoredIndex};
use crate::geometry::iou;
use crate::types::{CandidateBox, DetectionBox};
use crate::util::{YoloPostError, YoloPostResult};

/// Thresholds used by suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsParams {
    /// Probabilities below this value are zeroed and never kept.
    pub score_threshold: f32,
    /// Later boxes with IoU strictly above this value are suppressed.
    pub iou_threshold: f32,
}

/// Suppresses one class column in place and returns the number of kept boxes.
///
/// `order` is scratch space reused across calls. Zero entries are never kept,
/// even with a zero score threshold. `column` must hold one entry per box.
pub fn suppress_class(
    column: &mut [f32],
    boxes: &[CandidateBox],
    order: &mut Vec<ScoredIndex>,
    params: NmsParams,
) -> YoloPostResult<usize> {
    check_candidates(boxes, column.len())?;
    Ok(suppress_column(column, boxes, order, params))
}

pub(crate) fn check_candidates(boxes: &[CandidateBox], candidates: usize) -> YoloPostResult<()> {
    if boxes.len() != candidates {
        return Err(YoloPostError::CandidateMismatch {
            boxes: boxes.len(),
            candidates,
        });
    }
    Ok(())
}

/// Greedy pass over one column; the caller guarantees `column.len() == boxes.len()`.
pub(crate) fn suppress_column(
    column: &mut [f32],
    boxes: &[CandidateBox],
    order: &mut Vec<ScoredIndex>,
    params: NmsParams,
) -> usize {
    fill_sorted_desc(order, column);

    let mut kept = 0usize;
    for i in 0..order.len() {
        let idx = order[i].index;
        let prob = column[idx];
        if prob < params.score_threshold || prob <= 0.0 {
            column[idx] = 0.0;
            continue;
        }
        kept += 1;
        let kept_box = &boxes[idx].bbox;
        for later in &order[i + 1..] {
            let other = later.index;
            if column[other] == 0.0 {
                continue;
            }
            if iou(kept_box, &boxes[other].bbox) > params.iou_threshold {
                column[other] = 0.0;
            }
        }
    }
    kept
}

/// Suppresses every class of `probs` in place, reusing `order` as scratch.
pub(crate) fn suppress_all(
    boxes: &[CandidateBox],
    probs: &mut ProbMatrix,
    order: &mut Vec<ScoredIndex>,
    params: NmsParams,
) -> YoloPostResult<usize> {
    check_candidates(boxes, probs.num_candidates())?;
    let mut kept = 0;
    for class in 0..probs.num_classes() {
        if let Some(column) = probs.column_mut(class) {
            kept += suppress_column(column, boxes, order, params);
        }
    }
    Ok(kept)
}

/// Collects every surviving `(box, class)` pair, class by class.
pub fn collect_detections(boxes: &[CandidateBox], probs: &ProbMatrix) -> Vec<DetectionBox> {
    let mut out = Vec::new();
    for class in 0..probs.num_classes() {
        let Some(column) = probs.column(class) else {
            continue;
        };
        for (candidate, &score) in boxes.iter().zip(column) {
            if score == 0.0 {
                continue;
            }
            out.push(DetectionBox {
                bbox: candidate.bbox,
                score,
                class_index: class,
            });
        }
    }
    out
}

/// Runs multi-label suppression on `probs` and returns the final detections.
///
/// `probs` is left holding the suppressed probabilities. Fails without
/// touching `probs` when its candidate count differs from `boxes.len()`.
pub fn nms_multilabel(
    boxes: &[CandidateBox],
    probs: &mut ProbMatrix,
    params: NmsParams,
) -> YoloPostResult<Vec<DetectionBox>> {
    let mut order = Vec::with_capacity(boxes.len());
    suppress_all(boxes, probs, &mut order, params)?;
    Ok(collect_detections(boxes, probs))
}

#[cfg(test)]
mod tests {
    use super::{nms_multilabel, suppress_class, NmsParams};
    use crate::candidate::matrix::ProbMatrix;
    use crate::geometry::BoxGeom;
    use crate::types::CandidateBox;
    use crate::util::YoloPostError;

    fn cand(x: f32, y: f32, w: f32, h: f32) -> CandidateBox {
        CandidateBox {
            bbox: BoxGeom::new(x, y, w, h),
            objectness: 1.0,
        }
    }

    const PARAMS: NmsParams = NmsParams {
        score_threshold: 0.25,
        iou_threshold: 0.5,
    };

    #[test]
    fn overlapping_lower_box_is_suppressed() {
        let boxes = [
            cand(0.5, 0.5, 0.2, 0.2),
            cand(0.51, 0.5, 0.2, 0.2),
            cand(0.1, 0.1, 0.1, 0.1),
        ];
        let mut column = [0.6, 0.8, 0.3];
        let mut order = Vec::new();
        let kept = suppress_class(&mut column, &boxes, &mut order, PARAMS).unwrap();
        assert_eq!(kept, 2);
        assert_eq!(column, [0.0, 0.8, 0.3]);
    }

    #[test]
    fn identical_tied_boxes_keep_larger_index() {
        let boxes = [cand(0.5, 0.5, 0.2, 0.2), cand(0.5, 0.5, 0.2, 0.2)];
        let mut column = [0.7, 0.7];
        let mut order = Vec::new();
        suppress_class(&mut column, &boxes, &mut order, PARAMS).unwrap();
        assert_eq!(column, [0.0, 0.7]);
    }

    #[test]
    fn suppressed_box_does_not_suppress_others() {
        // a overlaps b, b overlaps c, a and c are disjoint.
        let boxes = [
            cand(0.30, 0.5, 0.2, 0.2),
            cand(0.36, 0.5, 0.2, 0.2),
            cand(0.42, 0.5, 0.2, 0.2),
        ];
        let mut column = [0.9, 0.8, 0.7];
        let mut order = Vec::new();
        let kept = suppress_class(&mut column, &boxes, &mut order, PARAMS).unwrap();
        assert_eq!(kept, 2);
        assert_eq!(column, [0.9, 0.0, 0.7]);
    }

    #[test]
    fn below_threshold_entries_are_zeroed() {
        let boxes = [cand(0.2, 0.2, 0.1, 0.1), cand(0.8, 0.8, 0.1, 0.1)];
        let mut column = [0.1, 0.3];
        let mut order = Vec::new();
        suppress_class(&mut column, &boxes, &mut order, PARAMS).unwrap();
        assert_eq!(column, [0.0, 0.3]);
    }

    #[test]
    fn one_box_survives_for_two_classes() {
        let boxes = [cand(0.5, 0.5, 0.3, 0.3)];
        let mut probs = ProbMatrix::new(1, 2);
        probs.set(0, 0, 0.6);
        probs.set(0, 1, 0.4);
        let dets = nms_multilabel(&boxes, &mut probs, PARAMS).unwrap();
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].class_index, 0);
        assert_eq!(dets[1].class_index, 1);
        assert_eq!(dets[0].bbox, dets[1].bbox);
        assert!((dets[0].score - 0.6).abs() < 1e-7);
    }

    #[test]
    fn classes_are_suppressed_independently() {
        let boxes = [cand(0.5, 0.5, 0.2, 0.2), cand(0.5, 0.5, 0.2, 0.2)];
        let mut probs = ProbMatrix::new(2, 2);
        // Class 0 prefers box 0, class 1 prefers box 1.
        probs.set(0, 0, 0.9);
        probs.set(1, 0, 0.5);
        probs.set(0, 1, 0.4);
        probs.set(1, 1, 0.8);
        let dets = nms_multilabel(&boxes, &mut probs, PARAMS).unwrap();
        assert_eq!(dets.len(), 2);
        assert_eq!(probs.column(0).unwrap(), &[0.9, 0.0]);
        assert_eq!(probs.column(1).unwrap(), &[0.0, 0.8]);
    }

    #[test]
    fn mismatched_candidate_counts_are_rejected() {
        let boxes = [cand(0.5, 0.5, 0.2, 0.2)];
        let mut probs = ProbMatrix::new(2, 1);
        probs.set(1, 0, 0.9);
        let err = nms_multilabel(&boxes, &mut probs, PARAMS).err().unwrap();
        assert_eq!(
            err,
            YoloPostError::CandidateMismatch {
                boxes: 1,
                candidates: 2,
            }
        );
        assert_eq!(probs.get(1, 0), Some(0.9));

        let mut column = [0.9, 0.8];
        let mut order = Vec::new();
        assert!(suppress_class(&mut column, &boxes, &mut order, PARAMS).is_err());
        assert_eq!(column, [0.9, 0.8]);
    }
}
