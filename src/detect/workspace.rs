//! Reusable buffers for repeated detection calls.

use crate::candidate::matrix::ProbMatrix;
use crate::candidate::order::ScoredIndex;
use crate::config::DecodeConfig;
use crate::tensor::FeatureGrid;
use crate::types::CandidateBox;

/// Scratch buffers reused across images and calls.
///
/// Holds the cell-major feature grid, softmax scratch, decoded candidates,
/// the probability matrix and the suppression order. After a call the
/// candidates and suppressed probabilities of the last image stay readable.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub(crate) grid: FeatureGrid,
    pub(crate) logits: Vec<f32>,
    pub(crate) boxes: Vec<CandidateBox>,
    pub(crate) probs: ProbMatrix,
    pub(crate) order: Vec<ScoredIndex>,
}

impl Workspace {
    /// Creates an empty workspace; buffers grow on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace sized for `cfg`.
    pub fn for_config(cfg: &DecodeConfig) -> Self {
        let candidates = cfg.candidates_per_image();
        Self {
            grid: FeatureGrid::new(),
            logits: Vec::with_capacity(cfg.num_classes),
            boxes: Vec::with_capacity(candidates),
            probs: ProbMatrix::new(candidates, cfg.num_classes),
            order: Vec::with_capacity(candidates),
        }
    }

    /// Candidates decoded for the most recent image.
    pub fn candidates(&self) -> &[CandidateBox] {
        &self.boxes
    }

    /// Probabilities of the most recent image after suppression.
    pub fn probs(&self) -> &ProbMatrix {
        &self.probs
    }
}
