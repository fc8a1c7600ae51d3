use bm_core::{Error, Image, Rgba};
use bm_integral::{ClampedWindow, IntegralTable};

fn validated_radius(radius: i32) -> Result<usize, Error> {
    if radius < 0 {
        return Err(Error::InvalidRadius { radius });
    }
    Ok(radius as usize)
}

fn mean_pixel(sums: [u64; 3], divisor: u64) -> Rgba {
    Rgba::opaque(
        (sums[0] / divisor) as u8,
        (sums[1] / divisor) as u8,
        (sums[2] / divisor) as u8,
    )
}

/// Direct convolution: sums every clamped window straight from the source.
///
/// The source is never written, so no window can observe an already-filtered
/// pixel. Cost is O(width * height * radius^2).
pub fn blur_naive(src: &Image<Rgba>, radius: i32) -> Result<Image<Rgba>, Error> {
    let radius = validated_radius(radius)?;
    if src.is_empty() {
        return Ok(src.clone());
    }

    let width = src.width();
    let height = src.height();
    let mut out = Image::new_fill(width, height, Rgba::default());

    for y in 0..height {
        for x in 0..width {
            let win = ClampedWindow::new(x, y, radius, width, height);
            let mut sums = [0u64; 3];
            for wy in win.y0..=win.y1 {
                for px in &src.row(wy)[win.x0..=win.x1] {
                    sums[0] += px.r as u64;
                    sums[1] += px.g as u64;
                    sums[2] += px.b as u64;
                }
            }
            *out.get_mut(x, y).expect("output pixel in bounds") =
                mean_pixel(sums, win.pixel_count());
        }
    }

    Ok(out)
}

/// Summed-area-table filtering: builds the table once, then answers every
/// pixel with a clamped region query. Cost is O(width * height), independent
/// of radius.
pub fn blur_integral(src: &Image<Rgba>, radius: i32) -> Result<Image<Rgba>, Error> {
    let radius = validated_radius(radius)?;
    if src.is_empty() {
        return Ok(src.clone());
    }

    let width = src.width();
    let height = src.height();
    let table = IntegralTable::build(src);
    let mut out = Image::new_fill(width, height, Rgba::default());

    for y in 0..height {
        for x in 0..width {
            *out.get_mut(x, y).expect("output pixel in bounds") =
                table.region_mean(x, y, radius);
        }
    }

    Ok(out)
}

/// Summed-area-table filtering with an interior fast path.
///
/// Pixels whose window lies strictly inside the image (`radius + 1 <= x <=
/// width - 1 - radius`, same for `y`) take a branch-free four-corner sum
/// with the constant divisor `(2 * radius + 1)^2`. Everything else falls
/// back to the clamped region query. The two regions partition the image
/// exactly: each row splits into a left border span, an interior span, and
/// a right border span, any of which may be empty.
pub fn blur_optimized(src: &Image<Rgba>, radius: i32) -> Result<Image<Rgba>, Error> {
    let radius = validated_radius(radius)?;
    if src.is_empty() {
        return Ok(src.clone());
    }

    let width = src.width();
    let height = src.height();
    let table = IntegralTable::build(src);
    let mut out = Image::new_fill(width, height, Rgba::default());

    let x_lo = (radius + 1).min(width);
    let x_hi = width.saturating_sub(radius).max(x_lo);
    let y_lo = (radius + 1).min(height);
    let y_hi = height.saturating_sub(radius).max(y_lo);

    let side = 2 * radius as u64 + 1;
    let divisor = side * side;

    for y in 0..height {
        if y < y_lo || y >= y_hi {
            for x in 0..width {
                *out.get_mut(x, y).expect("output pixel in bounds") =
                    table.region_mean(x, y, radius);
            }
            continue;
        }

        for x in 0..x_lo {
            *out.get_mut(x, y).expect("output pixel in bounds") =
                table.region_mean(x, y, radius);
        }
        for x in x_lo..x_hi {
            let sums = [
                table.window_sum_unclipped(0, x, y, radius),
                table.window_sum_unclipped(1, x, y, radius),
                table.window_sum_unclipped(2, x, y, radius),
            ];
            *out.get_mut(x, y).expect("output pixel in bounds") = mean_pixel(sums, divisor);
        }
        for x in x_hi..width {
            *out.get_mut(x, y).expect("output pixel in bounds") =
                table.region_mean(x, y, radius);
        }
    }

    Ok(out)
}
