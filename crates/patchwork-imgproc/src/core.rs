use patchwork_image::{Image, ImageError};
use rayon::prelude::*;

use crate::parallel;

fn check_same_size<const C1: usize, const C2: usize>(
    a: &Image<u8, C1>,
    b: &Image<u8, C2>,
) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        ));
    }
    Ok(())
}

/// Apply the bitwise AND operation between two images using a mask.
///
/// Where the mask is zero the output pixel is set to zero.
///
/// # Arguments
///
/// * `src1` - The first input image.
/// * `src2` - The second input image.
/// * `dst` - The output image.
/// * `mask` - The mask selecting the pixels to combine.
///
/// # Errors
///
/// Returns an error if the sizes of the images and the mask differ.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::core::bitwise_and;
///
/// let image = Image::<u8, 3>::new(
///    ImageSize {
///        width: 2,
///        height: 2,
///    },
///    vec![0, 1, 2, 253, 254, 255, 128, 129, 130, 64, 65, 66],
/// ).unwrap();
///
/// let mask = Image::<u8, 1>::new(
///    ImageSize {
///        width: 2,
///        height: 2,
///    },
///    vec![255, 0, 255, 0],
/// ).unwrap();
///
/// let mut output = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// bitwise_and(&image, &image, &mut output, &mask).unwrap();
///
/// assert_eq!(output.as_slice(), &[0, 1, 2, 0, 0, 0, 128, 129, 130, 0, 0, 0]);
/// ```
pub fn bitwise_and<const CHANNELS: usize>(
    src1: &Image<u8, CHANNELS>,
    src2: &Image<u8, CHANNELS>,
    dst: &mut Image<u8, CHANNELS>,
    mask: &Image<u8, 1>,
) -> Result<(), ImageError> {
    check_same_size(src1, src2)?;
    check_same_size(src1, mask)?;
    check_same_size(src1, dst)?;

    dst.as_slice_mut()
        .par_chunks_exact_mut(CHANNELS)
        .zip(src1.as_slice().par_chunks_exact(CHANNELS))
        .zip(src2.as_slice().par_chunks_exact(CHANNELS))
        .zip(mask.as_slice().par_iter())
        .for_each(|(((dst_pixel, a), b), &m)| {
            if m == 0 {
                dst_pixel.fill(0);
            } else {
                for ((d, &x), &y) in dst_pixel.iter_mut().zip(a).zip(b) {
                    *d = x & y;
                }
            }
        });

    Ok(())
}

/// Invert every value of an image.
///
/// # Errors
///
/// Returns an error if the sizes of the images differ.
pub fn bitwise_not<const CHANNELS: usize>(
    src: &Image<u8, CHANNELS>,
    dst: &mut Image<u8, CHANNELS>,
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows_val(src, dst, |src_val, dst_val| {
        *dst_val = !*src_val;
    });

    Ok(())
}
