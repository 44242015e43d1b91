use crate::parallel;
use patchwork_image::{Image, ImageError};

/// Fixed point weights for Y = 0.299 * R + 0.587 * G + 0.114 * B
const RW: u16 = 77;
const GW: u16 = 150;
const BW: u16 = 29;

#[inline]
fn luma(b: u8, g: u8, r: u8) -> u8 {
    ((r as u16 * RW + g as u16 * GW + b as u16 * BW) >> 8) as u8
}

/// Convert a BGR8 image to grayscale using the formula:
///
/// Y = (77 * R + 150 * G + 29 * B) >> 8
///
/// # Arguments
///
/// * `src` - The input BGR8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::color::gray_from_bgr_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![255, 255, 255],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// gray_from_bgr_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255]);
/// ```
pub fn gray_from_bgr_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}

/// Convert a BGRA8 image to grayscale, ignoring the alpha channel.
///
/// Precondition: the input and output images must have the same size.
pub fn gray_from_bgra_u8(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}
