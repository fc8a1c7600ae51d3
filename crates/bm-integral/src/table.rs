use bm_core::{Image, Rgba};

use crate::window::ClampedWindow;

/// Number of channels the table tracks. Alpha is excluded.
pub const COLOR_CHANNELS: usize = 3;

/// Per-channel inclusive 2D prefix sums over an RGBA raster.
///
/// Plane cell `(x, y)` holds the sum of its channel over all source pixels
/// `(i, j)` with `i <= x` and `j <= y`. The first row and column are 1D
/// prefix sums, and interior cells satisfy
/// `t[x][y] = t[x-1][y] + t[x][y-1] - t[x-1][y-1] + px[x][y]`.
///
/// Sums are `u64`: the worst case is `255 * width * height`, which fits for
/// any buffer `Image` can represent, so accumulation cannot wrap.
#[derive(Debug, Clone)]
pub struct IntegralTable {
    width: usize,
    height: usize,
    planes: [Image<u64>; COLOR_CHANNELS],
}

impl IntegralTable {
    /// Builds the table in one O(width * height) pass per channel.
    ///
    /// Cells are produced row-major, so each cell's left, above, and
    /// upper-left dependencies are already materialized. A zero-area source
    /// yields an empty table.
    pub fn build(src: &Image<Rgba>) -> Self {
        Self {
            width: src.width(),
            height: src.height(),
            planes: [
                build_plane(src, 0),
                build_plane(src, 1),
                build_plane(src, 2),
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn at(&self, channel: usize, x: usize, y: usize) -> u64 {
        *self.planes[channel]
            .get(x, y)
            .expect("table index in bounds")
    }

    /// Channel sum over the inclusive rectangle `[x0, x1] x [y0, y1]`.
    ///
    /// Inclusion–exclusion over the four corners; terms whose index would
    /// fall at -1 (rectangle touching the top or left edge) are omitted
    /// rather than read out of bounds, giving four formula shapes. The
    /// addition runs before the subtractions so the unsigned arithmetic
    /// cannot underflow.
    pub fn rect_sum(&self, channel: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        debug_assert!(x0 <= x1 && x1 < self.width);
        debug_assert!(y0 <= y1 && y1 < self.height);

        let mut sum = self.at(channel, x1, y1);
        if x0 > 0 && y0 > 0 {
            sum += self.at(channel, x0 - 1, y0 - 1);
        }
        if x0 > 0 {
            sum -= self.at(channel, x0 - 1, y1);
        }
        if y0 > 0 {
            sum -= self.at(channel, x1, y0 - 1);
        }
        sum
    }

    /// Clamped-window channel sums and the matching divisor for `(x, y)`.
    ///
    /// The divisor is the in-bounds pixel count of the window, which is what
    /// differs at borders; the summation path is the same everywhere.
    pub fn region_sum(&self, x: usize, y: usize, radius: usize) -> ([u64; COLOR_CHANNELS], u64) {
        let win = ClampedWindow::new(x, y, radius, self.width, self.height);
        let mut sums = [0u64; COLOR_CHANNELS];
        for (channel, sum) in sums.iter_mut().enumerate() {
            *sum = self.rect_sum(channel, win.x0, win.y0, win.x1, win.y1);
        }
        (sums, win.pixel_count())
    }

    /// Clamped-window mean at `(x, y)`, truncating division, alpha opaque.
    pub fn region_mean(&self, x: usize, y: usize, radius: usize) -> Rgba {
        let (sums, divisor) = self.region_sum(x, y, radius);
        Rgba::opaque(
            (sums[0] / divisor) as u8,
            (sums[1] / divisor) as u8,
            (sums[2] / divisor) as u8,
        )
    }

    /// Four-corner window sum for a center whose window is strictly inside
    /// the table: requires `radius + 1 <= x` and `x + radius < width`, and
    /// likewise for `y`. No clipping, no corner omission.
    pub fn window_sum_unclipped(&self, channel: usize, x: usize, y: usize, radius: usize) -> u64 {
        debug_assert!(x >= radius + 1 && x + radius < self.width);
        debug_assert!(y >= radius + 1 && y + radius < self.height);

        let (x0, y0) = (x - radius - 1, y - radius - 1);
        let (x1, y1) = (x + radius, y + radius);
        self.at(channel, x1, y1) + self.at(channel, x0, y0)
            - self.at(channel, x0, y1)
            - self.at(channel, x1, y0)
    }
}

fn build_plane(src: &Image<Rgba>, channel: usize) -> Image<u64> {
    let width = src.width();
    let height = src.height();
    let mut table = vec![0u64; width * height];

    if width == 0 || height == 0 {
        return Image::from_vec(width, height, table).expect("empty plane");
    }

    let px = |x: usize, y: usize| -> u64 {
        src.get(x, y).expect("source pixel in bounds").channel(channel) as u64
    };

    table[0] = px(0, 0);
    for x in 1..width {
        table[x] = table[x - 1] + px(x, 0);
    }
    for y in 1..height {
        table[y * width] = table[(y - 1) * width] + px(0, y);
    }
    for y in 1..height {
        for x in 1..width {
            table[y * width + x] = table[y * width + x - 1] + table[(y - 1) * width + x]
                - table[(y - 1) * width + x - 1]
                + px(x, y);
        }
    }

    Image::from_vec(width, height, table).expect("plane dimensions match source")
}

#[cfg(test)]
mod tests {
    use bm_core::{Image, Rgba};

    use crate::IntegralTable;

    fn gradient_image(width: usize, height: usize) -> Image<Rgba> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                data.push(Rgba::new(
                    (i % 251) as u8,
                    ((i * 7) % 253) as u8,
                    ((i * 13) % 239) as u8,
                    255,
                ));
            }
        }
        Image::from_vec(width, height, data).expect("valid image")
    }

    fn brute_force_sum(
        src: &Image<Rgba>,
        channel: usize,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> u64 {
        let mut sum = 0u64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                sum += src.get(x, y).expect("in bounds").channel(channel) as u64;
            }
        }
        sum
    }

    #[test]
    fn seed_first_row_and_column_are_prefix_sums() {
        let src = gradient_image(6, 5);
        let table = IntegralTable::build(&src);

        for channel in 0..3 {
            assert_eq!(
                table.rect_sum(channel, 0, 0, 0, 0),
                src.get(0, 0).unwrap().channel(channel) as u64
            );
            for x in 0..src.width() {
                assert_eq!(
                    table.rect_sum(channel, 0, 0, x, 0),
                    brute_force_sum(&src, channel, 0, 0, x, 0)
                );
            }
            for y in 0..src.height() {
                assert_eq!(
                    table.rect_sum(channel, 0, 0, 0, y),
                    brute_force_sum(&src, channel, 0, 0, 0, y)
                );
            }
        }
    }

    #[test]
    fn every_rectangle_matches_brute_force() {
        let src = gradient_image(5, 4);
        let table = IntegralTable::build(&src);

        for channel in 0..3 {
            for y0 in 0..src.height() {
                for y1 in y0..src.height() {
                    for x0 in 0..src.width() {
                        for x1 in x0..src.width() {
                            assert_eq!(
                                table.rect_sum(channel, x0, y0, x1, y1),
                                brute_force_sum(&src, channel, x0, y0, x1, y1),
                                "rect ({x0},{y0})..({x1},{y1}) channel {channel}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn column_major_construction_is_bit_identical() {
        let src = gradient_image(7, 6);
        let width = src.width();
        let height = src.height();
        let row_major = IntegralTable::build(&src);

        // Column-major reference: same recurrence, transposed traversal.
        // Each cell still sees its left/above/upper-left dependencies first.
        for channel in 0..3 {
            let px = |x: usize, y: usize| src.get(x, y).unwrap().channel(channel) as u64;
            let mut table = vec![0u64; width * height];
            table[0] = px(0, 0);
            for y in 1..height {
                table[y * width] = table[(y - 1) * width] + px(0, y);
            }
            for x in 1..width {
                table[x] = table[x - 1] + px(x, 0);
            }
            for x in 1..width {
                for y in 1..height {
                    table[y * width + x] = table[y * width + x - 1] + table[(y - 1) * width + x]
                        - table[(y - 1) * width + x - 1]
                        + px(x, y);
                }
            }

            // `rect_sum(0, 0, x, y)` reads exactly the `(x, y)` cell, so this
            // compares the two tables cell by cell.
            for y in 0..height {
                for x in 0..width {
                    assert_eq!(
                        row_major.rect_sum(channel, 0, 0, x, y),
                        table[y * width + x],
                        "cell ({x},{y}) channel {channel}"
                    );
                }
            }
        }
    }

    #[test]
    fn corner_divisor_counts_in_bounds_pixels_only() {
        let src = gradient_image(3, 3);
        let table = IntegralTable::build(&src);

        let (_, corner_div) = table.region_sum(0, 0, 1);
        assert_eq!(corner_div, 4);

        let (_, edge_div) = table.region_sum(1, 0, 1);
        assert_eq!(edge_div, 6);

        let (_, center_div) = table.region_sum(1, 1, 1);
        assert_eq!(center_div, 9);
    }

    #[test]
    fn region_mean_truncates_and_forces_opaque_alpha() {
        // Four pixels with red 1, 2, 3, 4 and alpha 0: sum 10, mean 10/4 = 2.
        let src = Image::from_vec(
            2,
            2,
            vec![
                Rgba::new(1, 0, 0, 0),
                Rgba::new(2, 0, 0, 0),
                Rgba::new(3, 0, 0, 0),
                Rgba::new(4, 0, 0, 0),
            ],
        )
        .expect("valid image");
        let table = IntegralTable::build(&src);

        let mean = table.region_mean(0, 0, 1);
        assert_eq!(mean, Rgba::opaque(2, 0, 0));
    }

    #[test]
    fn unclipped_window_sum_matches_clamped_query() {
        let src = gradient_image(9, 9);
        let table = IntegralTable::build(&src);

        for radius in [1usize, 2] {
            for y in (radius + 1)..(src.height() - radius) {
                for x in (radius + 1)..(src.width() - radius) {
                    let (sums, divisor) = table.region_sum(x, y, radius);
                    let nominal = (2 * radius as u64 + 1) * (2 * radius as u64 + 1);
                    assert_eq!(divisor, nominal);
                    for channel in 0..3 {
                        assert_eq!(
                            table.window_sum_unclipped(channel, x, y, radius),
                            sums[channel]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn zero_area_source_builds_empty_table() {
        let src = Image::<Rgba>::from_vec(0, 0, Vec::new()).expect("valid image");
        let table = IntegralTable::build(&src);
        assert!(table.is_empty());
        assert_eq!(table.width(), 0);
        assert_eq!(table.height(), 0);
    }
}
