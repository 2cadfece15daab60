//! Class-parallel suppression (feature-gated).
//!
//! Each rayon task owns one class column of the probability matrix as a
//! disjoint `&mut [f32]`; candidate boxes are shared read-only.

use crate::candidate::matrix::ProbMatrix;
use crate::candidate::nms::{check_candidates, collect_detections, suppress_column, NmsParams};
use crate::types::{CandidateBox, DetectionBox};
use crate::util::YoloPostResult;
use rayon::prelude::*;

/// Suppresses every class of `probs` in parallel and returns the kept count.
pub(crate) fn suppress_all_par(
    boxes: &[CandidateBox],
    probs: &mut ProbMatrix,
    params: NmsParams,
) -> YoloPostResult<usize> {
    check_candidates(boxes, probs.num_candidates())?;
    let num_candidates = probs.num_candidates();
    if num_candidates == 0 {
        return Ok(0);
    }
    Ok(probs
        .as_mut_slice()
        .par_chunks_mut(num_candidates)
        .map_init(Vec::new, |order, column| {
            suppress_column(column, boxes, order, params)
        })
        .sum())
}

/// Parallel counterpart of [`crate::nms_multilabel`]; results are identical.
pub fn nms_multilabel_par(
    boxes: &[CandidateBox],
    probs: &mut ProbMatrix,
    params: NmsParams,
) -> YoloPostResult<Vec<DetectionBox>> {
    suppress_all_par(boxes, probs, params)?;
    Ok(collect_detections(boxes, probs))
}
