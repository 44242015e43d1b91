use crate::parallel;
use patchwork_image::{Image, ImageError};

fn check_size<const C1: usize, const C2: usize>(
    src: &Image<u8, C1>,
    dst: &Image<u8, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Add a fully opaque alpha channel to a BGR image.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::color::bgra_from_bgr;
///
/// let bgr = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![1, 2, 3]).unwrap();
/// let mut bgra = Image::<u8, 4>::from_size_val(bgr.size(), 0).unwrap();
///
/// bgra_from_bgr(&bgr, &mut bgra).unwrap();
/// assert_eq!(bgra.as_slice(), &[1, 2, 3, 255]);
/// ```
pub fn bgra_from_bgr(src: &Image<u8, 3>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[..3].copy_from_slice(src_pixel);
        dst_pixel[3] = 255;
    });

    Ok(())
}

/// Drop the alpha channel of a BGRA image.
pub fn bgr_from_bgra(src: &Image<u8, 4>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.copy_from_slice(&src_pixel[..3]);
    });

    Ok(())
}

/// Replicate a grayscale image across the three color channels.
pub fn bgr_from_gray(src: &Image<u8, 1>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(())
}

/// Replicate a grayscale image across the color channels with an opaque alpha.
pub fn bgra_from_gray(src: &Image<u8, 1>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[..3].fill(src_pixel[0]);
        dst_pixel[3] = 255;
    });

    Ok(())
}
