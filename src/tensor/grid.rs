//! Cell-major feature grid for one image.

use crate::tensor::TensorView;
use crate::util::{YoloPostError, YoloPostResult};

/// One image's activations laid out as `(row, col, anchor, feature)`.
///
/// The channel axis of the NCHW tensor is split into `anchors * features`, so
/// the feature slice of an anchor is contiguous. The buffer is reused across
/// loads.
#[derive(Clone, Debug, Default)]
pub struct FeatureGrid {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    anchors: usize,
    features: usize,
}

impl FeatureGrid {
    /// Creates an empty grid with no allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from image `image` of `view`.
    pub fn from_nchw(
        view: TensorView<'_>,
        image: usize,
        anchors: usize,
        features: usize,
    ) -> YoloPostResult<Self> {
        let mut grid = Self::new();
        grid.load_nchw(view, image, anchors, features)?;
        Ok(grid)
    }

    /// Re-lays image `image` of `view` into this grid, reusing its buffer.
    pub fn load_nchw(
        &mut self,
        view: TensorView<'_>,
        image: usize,
        anchors: usize,
        features: usize,
    ) -> YoloPostResult<()> {
        let channels = view.channels();
        let expected = anchors.checked_mul(features).unwrap_or(usize::MAX);
        if channels != expected {
            return Err(YoloPostError::ChannelMismatch {
                expected,
                got: channels,
                anchors,
                features,
            });
        }
        let src = view.image(image).ok_or(YoloPostError::IndexOutOfBounds {
            index: image,
            len: view.batch(),
            context: "image",
        })?;

        let height = view.height();
        let width = view.width();
        let plane = height * width;
        self.data.clear();
        self.data.resize(src.len(), 0.0);
        for y in 0..height {
            for x in 0..width {
                let cell = (y * width + x) * channels;
                let dst = &mut self.data[cell..cell + channels];
                for (c, value) in dst.iter_mut().enumerate() {
                    *value = src[c * plane + y * width + x];
                }
            }
        }

        self.rows = height;
        self.cols = width;
        self.anchors = anchors;
        self.features = features;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn anchors(&self) -> usize {
        self.anchors
    }

    pub fn features(&self) -> usize {
        self.features
    }

    /// Number of `(cell, anchor)` slots in the grid.
    pub fn num_slots(&self) -> usize {
        self.rows * self.cols * self.anchors
    }

    /// Returns the feature slice of `anchor` at cell `(row, col)`.
    pub fn anchor_features(&self, row: usize, col: usize, anchor: usize) -> Option<&[f32]> {
        if row >= self.rows || col >= self.cols || anchor >= self.anchors {
            return None;
        }
        let start = ((row * self.cols + col) * self.anchors + anchor) * self.features;
        self.data.get(start..start + self.features)
    }

    /// Returns the whole cell-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
