//! File helpers around the core pipeline.
//!
//! `tensor-io` reads and writes raw little-endian `f32` tensor dumps;
//! `image-io` draws detections onto images via the `image` crate.

#[cfg(feature = "tensor-io")]
mod tensor;

#[cfg(feature = "image-io")]
mod draw;

#[cfg(feature = "tensor-io")]
pub use tensor::{load_raw_tensor, read_raw_tensor, save_raw_tensor, write_raw_tensor};

#[cfg(feature = "image-io")]
pub use draw::{draw_detections, load_rgb_image, save_rgb_image, BOX_COLOR};
