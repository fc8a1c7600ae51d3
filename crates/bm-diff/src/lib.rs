//! Per-pixel absolute difference of two RGBA rasters.
//!
//! For each coordinate the three color channels are differenced, the output
//! pixel carries those differences with opaque alpha, and a single running
//! maximum is tracked across all channels and pixels.
//!
//! Inputs of different dimensions are compared over their intersection
//! (`min` of widths and heights); [`DiffReport::clipped`] records that the
//! comparison did not cover both inputs fully.

use bm_core::{Image, Rgba};

/// Result of an image comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    /// Per-pixel channel differences, alpha opaque, intersection-sized.
    pub image: Image<Rgba>,
    /// Largest single-channel difference observed.
    pub max_diff: u8,
    /// True iff the inputs had different dimensions and only the
    /// intersection was compared.
    pub clipped: bool,
}

pub fn absdiff(a: &Image<Rgba>, b: &Image<Rgba>) -> DiffReport {
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let clipped = a.width() != b.width() || a.height() != b.height();

    let mut image = Image::new_fill(width, height, Rgba::opaque(0, 0, 0));
    let mut max_diff = 0u8;

    for y in 0..height {
        for x in 0..width {
            let pa = a.get(x, y).expect("intersection pixel in bounds");
            let pb = b.get(x, y).expect("intersection pixel in bounds");

            let mut channels = [0u8; 3];
            for (channel, out) in channels.iter_mut().enumerate() {
                *out = pa.channel(channel).abs_diff(pb.channel(channel));
                max_diff = max_diff.max(*out);
            }

            *image.get_mut(x, y).expect("output pixel in bounds") =
                Rgba::from_color_channels(channels);
        }
    }

    DiffReport {
        image,
        max_diff,
        clipped,
    }
}
