//! Candidate probabilities and their suppression.
//!
//! Includes the class-major probability matrix, deterministic ordering, and
//! multi-label non-maximum suppression.

pub(crate) mod matrix;
pub(crate) mod nms;
pub(crate) mod order;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;
