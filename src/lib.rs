//! yolopost decodes the raw output of a single-scale, anchor-based grid
//! detector (YOLOv2 region layer) into boxes and applies multi-label
//! non-maximum suppression.
//!
//! The input is the flat NCHW tensor produced by an inference engine; the
//! output is a list of normalized boxes with a class and a score per image.
//! Class-parallel suppression and image-parallel batches are available via
//! the `rayon` feature.

mod candidate;
pub mod config;
pub mod decode;
pub mod detect;
pub mod geometry;
#[cfg(any(feature = "tensor-io", feature = "image-io"))]
pub mod io;
pub mod tensor;
mod trace;
pub mod types;
pub mod util;

pub mod lowlevel;

pub use config::{Anchor, DecodeConfig, BOX_FEATURES, VOC_ANCHORS};
pub use decode::{decode_box, decode_image, Candidates};
pub use detect::{Detector, Workspace};
pub use geometry::{interval_overlap, iou, BoxGeom, PixelRect};
pub use tensor::{FeatureGrid, OwnedTensor, TensorShape, TensorView};
pub use types::{format_box_info, CandidateBox, DecodeStats, DetectionBox, ImageDetections};
pub use util::math::{sigmoid, softmax, softmax_in_place};
pub use util::{YoloPostError, YoloPostResult};

pub use candidate::matrix::ProbMatrix;
pub use candidate::nms::{nms_multilabel, NmsParams};
#[cfg(feature = "rayon")]
pub use candidate::rayon::nms_multilabel_par;
