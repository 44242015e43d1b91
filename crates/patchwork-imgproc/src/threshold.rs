use num_traits::Zero;
use std::cmp::PartialOrd;

use patchwork_image::{Image, ImageError};

use crate::parallel;

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Returns
///
/// The thresholded image with the same number of channels as the input image.
///
/// # Examples
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Range check for 8-bit HSV images where the hue interval may wrap around.
///
/// The hue channel is circular over `[0, 180)`. When `lower_bound[0]` is
/// greater than `upper_bound[0]` the accepted hues are
/// `[lower_bound[0], 180) ∪ [0, upper_bound[0]]`. The saturation and value
/// channels are checked as plain inclusive ranges.
///
/// # Examples
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::threshold::in_range_hsv;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![175, 200, 10, 3, 200, 10, 90, 200, 10],
/// )
/// .unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
/// in_range_hsv(&image, &mut mask, [170, 100, 0], [5, 255, 255]).unwrap();
/// assert_eq!(mask.as_slice(), &[255, 255, 0]);
/// ```
pub fn in_range_hsv(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 1>,
    lower_bound: [u8; 3],
    upper_bound: [u8; 3],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let wraps = lower_bound[0] > upper_bound[0];

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let h = src_pixel[0];
        let hue_ok = if wraps {
            h >= lower_bound[0] || h <= upper_bound[0]
        } else {
            h >= lower_bound[0] && h <= upper_bound[0]
        };
        let rest_ok =
            (1..3).all(|c| src_pixel[c] >= lower_bound[c] && src_pixel[c] <= upper_bound[c]);
        dst_pixel[0] = if hue_ok && rest_ok { 255 } else { 0 };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use patchwork_image::{Image, ImageError, ImageSize};

    #[test]
    fn threshold_binary() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let data_expected = [0u8, 255, 0, 255, 255, 255];
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            data,
        )?;

        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;

        super::threshold_binary(&image, &mut thresholded, 100, 255)?;
        assert_eq!(thresholded.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn threshold_binary_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut thresholded = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            super::threshold_binary(&image, &mut thresholded, 0, 255),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn test_in_range_hsv_plain() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            [3, 1].into(),
            vec![60, 128, 0, 60, 20, 0, 100, 128, 0],
        )?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::in_range_hsv(&image, &mut mask, [50, 98, 0], [70, 255, 255])?;
        assert_eq!(mask.as_slice(), &[255, 0, 0]);
        Ok(())
    }
}
