use patchwork_image::{Image, ImageError};
use rayon::prelude::*;

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Apply a separable filter to a floating point image.
///
/// The horizontal kernel is applied first, then the vertical kernel. Borders
/// are handled by replicating the edge pixels.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::filter::separable_filter;
///
/// let src = Image::<f32, 1>::new(ImageSize { width: 3, height: 1 }, vec![0.0, 3.0, 0.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// separable_filter(&src, &mut dst, &[1.0 / 3.0; 3], &[1.0]).unwrap();
/// assert!((dst.as_slice()[1] - 1.0).abs() < 1e-6);
/// ```
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if kernel_x.is_empty() || kernel_x.len() % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_x.len()));
    }

    if kernel_y.is_empty() || kernel_y.len() % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_y.len()));
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;
    let src_data = src.as_slice();

    // horizontal pass
    let mut temp = vec![0.0f32; src_data.len()];
    temp.par_chunks_exact_mut(cols * C)
        .zip(src_data.par_chunks_exact(cols * C))
        .for_each(|(temp_row, src_row)| {
            for c in 0..cols {
                for ch in 0..C {
                    let mut acc = 0.0;
                    for (k, &w) in kernel_x.iter().enumerate() {
                        let x = clamp_index(c as isize + k as isize - half_x, cols);
                        acc += src_row[x * C + ch] * w;
                    }
                    temp_row[c * C + ch] = acc;
                }
            }
        });

    // vertical pass
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (k_idx, &w) in kernel_y.iter().enumerate() {
                let y = clamp_index(r as isize + k_idx as isize - half_y, rows);
                let temp_row = &temp[y * cols * C..(y + 1) * cols * C];
                if k_idx == 0 {
                    dst_row
                        .iter_mut()
                        .zip(temp_row)
                        .for_each(|(d, &t)| *d = t * w);
                } else {
                    dst_row
                        .iter_mut()
                        .zip(temp_row)
                        .for_each(|(d, &t)| *d += t * w);
                }
            }
        });

    Ok(())
}
