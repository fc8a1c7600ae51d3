//! Umbrella crate for the `boxmean` workspace.
//!
//! Re-exports the pixel/buffer primitives, the summed-area-table machinery,
//! the box-filter strategies, and the pixel-difference engine.

pub use bm_core::*;
pub use bm_diff::*;
pub use bm_filter::*;
pub use bm_integral::*;
