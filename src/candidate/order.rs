//! Deterministic descending order of candidate probabilities.

use std::cmp::Ordering;

/// Candidate index paired with its probability for one class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredIndex {
    /// Position of the candidate in decode order.
    pub index: usize,
    /// Probability of the candidate for the class being suppressed.
    pub prob: f32,
}

/// Descending by probability; equal probabilities put the larger index first.
pub(crate) fn scored_cmp_desc(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
    b.prob
        .total_cmp(&a.prob)
        .then_with(|| b.index.cmp(&a.index))
}

/// Refills `order` from `column` and sorts it with [`scored_cmp_desc`].
pub(crate) fn fill_sorted_desc(order: &mut Vec<ScoredIndex>, column: &[f32]) {
    order.clear();
    order.extend(
        column
            .iter()
            .enumerate()
            .map(|(index, &prob)| ScoredIndex { index, prob }),
    );
    order.sort_unstable_by(scored_cmp_desc);
}
