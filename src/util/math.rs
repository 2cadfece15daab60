//! Activation functions used when decoding raw detector features.
//!
//! Everything is computed in `f32`, the precision of the raw tensor, so scores
//! produced by the decoder and compared by the suppressor stay comparable.

use crate::util::{YoloPostError, YoloPostResult};

/// Logistic function, mapping any finite input into `(0, 1)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Replaces `values` with their softmax.
///
/// The maximum is subtracted before exponentiating so large logits do not
/// overflow. Returns [`YoloPostError::EmptyInput`] for an empty slice.
pub fn softmax_in_place(values: &mut [f32]) -> YoloPostResult<()> {
    let Some(&first) = values.first() else {
        return Err(YoloPostError::EmptyInput { context: "softmax" });
    };
    let largest = values.iter().copied().fold(first, f32::max);

    let mut sum = 0.0f32;
    for value in values.iter_mut() {
        let e = (*value - largest).exp();
        sum += e;
        *value = e;
    }
    for value in values.iter_mut() {
        *value /= sum;
    }
    Ok(())
}

/// Returns the softmax of `logits` as a new vector.
pub fn softmax(logits: &[f32]) -> YoloPostResult<Vec<f32>> {
    let mut out = logits.to_vec();
    softmax_in_place(&mut out)?;
    Ok(out)
}
