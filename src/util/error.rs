//! Error types for yolopost.

use thiserror::Error;

/// Result alias for yolopost operations.
pub type YoloPostResult<T> = std::result::Result<T, YoloPostError>;

/// Errors that can occur when decoding or suppressing detector output.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum YoloPostError {
    /// A tensor or grid dimension is unusable.
    #[error("invalid dimensions: batch={batch}, channels={channels}, height={height}, width={width}")]
    InvalidDimensions {
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The tensor channel count does not equal `anchors * (classes + 5)`.
    #[error("channel mismatch: expected {expected} channels ({anchors} anchors x {features} features), got {got}")]
    ChannelMismatch {
        expected: usize,
        got: usize,
        anchors: usize,
        features: usize,
    },
    /// The tensor grid is not the configured `side x side` square.
    #[error("grid mismatch: tensor is {height}x{width}, configured side is {side}")]
    GridMismatch {
        height: usize,
        width: usize,
        side: usize,
    },
    /// Candidate boxes and probability rows disagree in count.
    #[error("candidate mismatch: {boxes} boxes, {candidates} probability rows")]
    CandidateMismatch { boxes: usize, candidates: usize },
    /// The decode configuration is invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// An operation that needs at least one element received none.
    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },
    /// An index is outside of a valid range.
    #[error("index out of bounds: {context} index {index} (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Reading or writing a raw tensor dump failed.
    #[error("tensor io error: {reason}")]
    TensorIo { reason: String },
    /// Loading or saving an image failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
