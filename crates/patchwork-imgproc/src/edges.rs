use patchwork_image::{Image, ImageError};
use rayon::prelude::*;

use crate::filter::spatial_gradient;

const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_5;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Detect edges in a grayscale image with the Canny algorithm.
///
/// The gradient is computed with a 3x3 sobel operator and its magnitude is the
/// L1 norm `|dx| + |dy|`. No smoothing is applied before the gradient.
/// Non-maximum suppression thins the response along the gradient direction
/// and hysteresis keeps the weak responses (`> low_threshold`) that are
/// 8-connected to a strong one (`> high_threshold`).
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output edge map, 255 on edges and 0 elsewhere.
/// * `low_threshold` - The lower hysteresis threshold.
/// * `high_threshold` - The upper hysteresis threshold.
///
/// # Errors
///
/// Returns an error if the image sizes differ.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::edges::canny;
///
/// let mut data = vec![0u8; 8 * 8];
/// for y in 0..8 {
///     for x in 4..8 {
///         data[y * 8 + x] = 255;
///     }
/// }
/// let src = Image::<u8, 1>::new(ImageSize { width: 8, height: 8 }, data).unwrap();
/// let mut edges = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// canny(&src, &mut edges, 50.0, 150.0).unwrap();
/// assert!(edges.as_slice().iter().any(|&v| v == 255));
/// ```
pub fn canny(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    dst.as_slice_mut().fill(0);
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };

    let src_f32 = src.cast::<f32>()?;
    let mut dx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut dy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient(&src_f32, &mut dx, &mut dy)?;

    let dx = dx.as_slice();
    let dy = dy.as_slice();
    let magnitude: Vec<f32> = dx
        .par_iter()
        .zip(dy.par_iter())
        .map(|(gx, gy)| gx.abs() + gy.abs())
        .collect();

    let mag_at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= cols as isize || y >= rows as isize {
            0.0
        } else {
            magnitude[y as usize * cols + x as usize]
        }
    };

    // non-maximum suppression and double threshold
    let mut labels = vec![NOT_EDGE; rows * cols];
    labels
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, label) in row.iter_mut().enumerate() {
                let idx = y * cols + x;
                let m = magnitude[idx];
                if m <= low {
                    continue;
                }

                let (gx, gy) = (dx[idx], dy[idx]);
                let (ax, ay) = (gx.abs(), gy.abs());
                let (xi, yi) = (x as isize, y as isize);

                let (before, after) = if ay < ax * TAN_22_5 {
                    (mag_at(xi - 1, yi), mag_at(xi + 1, yi))
                } else if ay > ax * TAN_67_5 {
                    (mag_at(xi, yi - 1), mag_at(xi, yi + 1))
                } else if (gx > 0.0) == (gy > 0.0) {
                    (mag_at(xi - 1, yi - 1), mag_at(xi + 1, yi + 1))
                } else {
                    (mag_at(xi + 1, yi - 1), mag_at(xi - 1, yi + 1))
                };

                if m > before && m >= after {
                    *label = if m > high { STRONG } else { WEAK };
                }
            }
        });

    // hysteresis
    let out = dst.as_slice_mut();
    let mut stack: Vec<usize> = Vec::new();
    for (idx, &label) in labels.iter().enumerate() {
        if label == STRONG {
            out[idx] = 255;
            stack.push(idx);
        }
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % cols) as isize, (idx / cols) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if nx < 0 || ny < 0 || nx >= cols as isize || ny >= rows as isize {
                    continue;
                }
                let n = ny as usize * cols + nx as usize;
                if labels[n] == WEAK && out[n] == 0 {
                    out[n] = 255;
                    stack.push(n);
                }
            }
        }
    }

    Ok(())
}
