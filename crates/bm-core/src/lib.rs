//! Foundational primitives for box-mean filtering.
//!
//! ## Pixels
//! Pixels are packed 4-channel 8-bit RGBA. Color channels are addressed by
//! index (0 = red, 1 = green, 2 = blue, 3 = alpha) so per-channel loops can
//! run over `0..3` without naming each channel.
//!
//! ## Image Buffers
//! `Image<T>` is an owned, bounds-checked, contiguous row-major buffer.
//! It is used both for rasters (`Image<Rgba>`) and for the per-channel
//! prefix-sum planes of the integral table (`Image<u64>`).

mod error;
mod image;
mod rgba;

pub use error::Error;
pub use image::Image;
pub use rgba::Rgba;
