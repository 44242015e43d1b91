use crate::parallel;
use patchwork_image::{Image, ImageError};

/// Convert a BGR8 image to an 8-bit HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 180) (degrees halved to fit 8 bits).
/// * S: The saturation channel in the range [0, 255].
/// * V: The value channel in the range [0, 255].
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::color::hsv_from_bgr_u8;
///
/// // pure red
/// let image = Image::<u8, 3>::new(ImageSize { width: 1, height: 1 }, vec![0, 0, 255]).unwrap();
///
/// let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
/// hsv_from_bgr_u8(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.as_slice(), &[0, 255, 255]);
/// ```
pub fn hsv_from_bgr_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let b = src_pixel[0] as f32;
        let g = src_pixel[1] as f32;
        let r = src_pixel[2] as f32;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        // ensure h is in the range [0, 360)
        let h = if h < 0.0 { h + 360.0 } else { h };

        let s = if max == 0.0 {
            0.0
        } else {
            delta / max * 255.0
        };

        dst_pixel[0] = ((h / 2.0).round() as u16 % 180) as u8;
        dst_pixel[1] = s.round() as u8;
        dst_pixel[2] = max as u8;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use patchwork_image::{Image, ImageError, ImageSize};

    #[test]
    fn hsv_from_bgr_primaries() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            // blue, green, red, gray
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 128, 128, 128],
        )?;

        let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::hsv_from_bgr_u8(&image, &mut hsv)?;

        assert_eq!(
            hsv.as_slice(),
            &[120, 255, 255, 60, 255, 255, 0, 255, 255, 0, 0, 128]
        );

        Ok(())
    }

    #[test]
    fn hsv_hue_wraps_below_zero() -> Result<(), ImageError> {
        // magenta-ish red: r max, b > g gives a negative raw hue
        let image = Image::<u8, 3>::new([1, 1].into(), vec![40, 0, 255])?;
        let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::hsv_from_bgr_u8(&image, &mut hsv)?;
        assert!(hsv.as_slice()[0] > 170);
        Ok(())
    }
}
