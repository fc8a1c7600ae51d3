//! Summed-area tables (integral images) over RGBA rasters.
//!
//! An [`IntegralTable`] holds one inclusive 2D prefix-sum plane per color
//! channel, answering the sum of any axis-aligned rectangle in constant time
//! via four-corner inclusion–exclusion. Queries clip their window against
//! the image bounds and divide by the in-bounds pixel count, so means stay
//! correct at edges and corners where the window shrinks.

mod table;
mod window;

pub use table::{COLOR_CHANNELS, IntegralTable};
pub use window::ClampedWindow;
