//! Tensor views over raw detector output.
//!
//! `TensorView` is a borrowed `(batch, channels, height, width)` view into a
//! contiguous channel-major buffer, as produced by the inference engine. The
//! view never copies or mutates the data; decoding re-lays one image at a time
//! into a [`FeatureGrid`] with named `row / col / anchor / feature` axes.

use crate::util::{YoloPostError, YoloPostResult};

mod grid;

pub use grid::FeatureGrid;

/// Declared `(N, C, H, W)` shape of a raw output tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorShape {
    /// Number of images in the batch.
    pub batch: usize,
    /// Channels per image.
    pub channels: usize,
    /// Grid rows.
    pub height: usize,
    /// Grid columns.
    pub width: usize,
}

impl TensorShape {
    /// Creates a shape from its four dimensions.
    pub fn new(batch: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            batch,
            channels,
            height,
            width,
        }
    }

    /// Number of elements in one image (`C * H * W`).
    pub fn image_len(&self) -> YoloPostResult<usize> {
        self.channels
            .checked_mul(self.height)
            .and_then(|v| v.checked_mul(self.width))
            .ok_or(self.invalid())
    }

    /// Number of elements in the whole tensor (`N * C * H * W`).
    pub fn len(&self) -> YoloPostResult<usize> {
        self.image_len()?
            .checked_mul(self.batch)
            .ok_or(self.invalid())
    }

    /// Returns true when the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        matches!(self.len(), Ok(0))
    }

    fn invalid(&self) -> YoloPostError {
        YoloPostError::InvalidDimensions {
            batch: self.batch,
            channels: self.channels,
            height: self.height,
            width: self.width,
        }
    }
}

/// Borrowed NCHW view into a flat `f32` buffer.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    shape: TensorShape,
    image_len: usize,
}

impl<'a> TensorView<'a> {
    /// Creates a view, checking that `data` covers the declared shape.
    ///
    /// Extra trailing elements are ignored.
    pub fn new(data: &'a [f32], shape: TensorShape) -> YoloPostResult<Self> {
        let needed = shape.len()?;
        if data.len() < needed {
            return Err(YoloPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            image_len: shape.image_len()?,
        })
    }

    /// Creates a view from explicit `(batch, channels, height, width)` dimensions.
    pub fn from_slice(
        data: &'a [f32],
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> YoloPostResult<Self> {
        Self::new(data, TensorShape::new(batch, channels, height, width))
    }

    /// Returns the declared shape.
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    pub fn batch(&self) -> usize {
        self.shape.batch
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    /// Returns the backing slice, including any trailing elements.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the contiguous `C * H * W` block for image `n`.
    pub fn image(&self, n: usize) -> Option<&'a [f32]> {
        if n >= self.shape.batch {
            return None;
        }
        let start = n.checked_mul(self.image_len)?;
        let end = start.checked_add(self.image_len)?;
        self.data.get(start..end)
    }

    /// Returns the element at `(n, c, y, x)` if it is within bounds.
    pub fn get(&self, n: usize, c: usize, y: usize, x: usize) -> Option<&'a f32> {
        let s = self.shape;
        if c >= s.channels || y >= s.height || x >= s.width {
            return None;
        }
        let plane = s.height * s.width;
        let idx = c * plane + y * s.width + x;
        self.image(n)?.get(idx)
    }
}

/// Owned NCHW tensor, used when a tensor is loaded from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor {
    data: Vec<f32>,
    shape: TensorShape,
}

impl OwnedTensor {
    /// Wraps `data`, which must hold exactly `shape.len()` elements.
    pub fn new(data: Vec<f32>, shape: TensorShape) -> YoloPostResult<Self> {
        let needed = shape.len()?;
        if data.len() != needed {
            return Err(YoloPostError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a borrowed view of the tensor.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            data: &self.data,
            shape: self.shape,
            // Checked for overflow in `new`.
            image_len: self.shape.channels * self.shape.height * self.shape.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OwnedTensor, TensorShape, TensorView};
    use crate::util::YoloPostError;

    #[test]
    fn view_indexes_channel_major() {
        let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let view = TensorView::from_slice(&data, 2, 3, 2, 2).unwrap();
        assert_eq!(view.image(1).unwrap()[0], 12.0);
        assert_eq!(view.get(0, 1, 0, 1).copied(), Some(5.0));
        assert_eq!(view.get(1, 2, 1, 1).copied(), Some(23.0));
        assert!(view.get(0, 3, 0, 0).is_none());
        assert!(view.image(2).is_none());
    }

    #[test]
    fn view_rejects_short_buffer() {
        let data = [0.0f32; 5];
        let err = TensorView::from_slice(&data, 1, 3, 1, 2).err().unwrap();
        assert_eq!(err, YoloPostError::BufferTooSmall { needed: 6, got: 5 });
    }

    #[test]
    fn shape_overflow_is_reported() {
        let shape = TensorShape::new(usize::MAX, 2, 2, 2);
        assert!(matches!(
            shape.len(),
            Err(YoloPostError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn owned_tensor_requires_exact_length() {
        let shape = TensorShape::new(1, 2, 1, 1);
        assert!(OwnedTensor::new(vec![0.0; 3], shape).is_err());
        let owned = OwnedTensor::new(vec![1.0, 2.0], shape).unwrap();
        assert_eq!(owned.view().get(0, 1, 0, 0).copied(), Some(2.0));
    }
}
