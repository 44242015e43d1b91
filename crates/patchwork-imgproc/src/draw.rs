use patchwork_image::Image;

use crate::contours::Point;

/// Set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a one pixel wide line on an image inplace using Bresenham's algorithm.
///
/// Both end points are drawn. Pixels outside the image are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    loop {
        set_pixel(img, x0, y0, color);

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fills the interior of a polygon given by integer pixel coordinates.
///
/// Uses an even-odd scanline rule sampled at pixel centers: on each row the
/// pixels whose center lies between a pair of edge crossings are filled.
/// Edges are half-open in y so a vertex on a scanline is counted once.
/// The outline itself is not guaranteed to be covered; see [`draw_contour`].
pub fn fill_polygon<const C: usize>(img: &mut Image<u8, C>, vertices: &[Point], color: [u8; C]) {
    if vertices.len() < 3 || img.rows() == 0 || img.cols() == 0 {
        return;
    }

    let (min_y, max_y) = vertices
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let min_y = min_y.max(0);
    let max_y = max_y.min(img.rows() as i32 - 1);

    // reused per scanline
    let mut intersections: Vec<f64> = Vec::with_capacity(vertices.len());
    let n = vertices.len();

    for y in min_y..=max_y {
        intersections.clear();
        let yf = y as f64;

        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let (y1, y2) = (a.y as f64, b.y as f64);

            if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                let x = a.x as f64 + (yf - y1) / (y2 - y1) * (b.x - a.x) as f64;
                intersections.push(x);
            }
        }

        intersections.sort_unstable_by(f64::total_cmp);
        for pair in intersections.chunks_exact(2) {
            let x_start = pair[0].ceil() as i64;
            let x_end = pair[1].floor() as i64;
            for x in x_start..=x_end {
                set_pixel(img, x, y as i64, color);
            }
        }
    }
}

/// Draws a closed contour on an image inplace.
///
/// When `filled` is true the enclosed area is painted together with the
/// outline, so every traced pixel belongs to the result even for degenerate
/// contours (single pixels or one pixel wide strokes).
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::contours::Point;
/// use patchwork_imgproc::draw::draw_contour;
///
/// let mut img = Image::<u8, 1>::from_size_val(ImageSize { width: 5, height: 5 }, 0).unwrap();
/// let square = [Point::new(1, 1), Point::new(1, 3), Point::new(3, 3), Point::new(3, 1)];
///
/// draw_contour(&mut img, &square, [255], true);
/// assert_eq!(img.as_slice().iter().filter(|&&v| v == 255).count(), 9);
/// ```
pub fn draw_contour<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[Point],
    color: [u8; C],
    filled: bool,
) {
    if filled {
        fill_polygon(img, points, color);
    }

    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        draw_line(
            img,
            (a.x as i64, a.y as i64),
            (b.x as i64, b.y as i64),
            color,
        );
    }
}
