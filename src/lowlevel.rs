//! Low-level building blocks for custom post-processing pipelines.
//!
//! These expose the per-class suppression pass, the deterministic candidate
//! ordering and detection collection used inside [`crate::Detector`]. Most
//! users should prefer `Detector` or [`crate::nms_multilabel`].

pub use crate::candidate::matrix::ProbMatrix;
pub use crate::candidate::nms::{collect_detections, suppress_class, NmsParams};
pub use crate::candidate::order::ScoredIndex;
pub use crate::tensor::FeatureGrid;
