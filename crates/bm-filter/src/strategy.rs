use bm_core::{Error, Image, Rgba};

use crate::{blur_integral, blur_naive, blur_optimized};

/// The box-filter algorithms, as a tagged set of variants.
///
/// All variants are pure functions of `(image, radius)` and produce
/// bit-identical results; selection trades construction cost against
/// per-pixel cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Direct convolution, O(width * height * radius^2).
    Naive,
    /// Summed-area table with a clamped query per pixel, O(width * height).
    Integral,
    /// Summed-area table with a constant-divisor interior fast path.
    Optimized,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Naive, Strategy::Integral, Strategy::Optimized];

    /// File-name prefix for outputs produced by this strategy.
    pub fn tag(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive_",
            Strategy::Integral => "integral_",
            Strategy::Optimized => "optimized_",
        }
    }

    pub fn apply(&self, src: &Image<Rgba>, radius: i32) -> Result<Image<Rgba>, Error> {
        match self {
            Strategy::Naive => blur_naive(src, radius),
            Strategy::Integral => blur_integral(src, radius),
            Strategy::Optimized => blur_optimized(src, radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Strategy;

    #[test]
    fn tags_are_distinct_prefixes() {
        let tags: Vec<&str> = Strategy::ALL.iter().map(|s| s.tag()).collect();
        assert_eq!(tags, vec!["naive_", "integral_", "optimized_"]);
    }
}
