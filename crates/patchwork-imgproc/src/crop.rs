use patchwork_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// x-coordinate of the top-left corner.
    pub x: usize,
    /// y-coordinate of the top-left corner.
    pub y: usize,
    /// Width of the rectangle.
    pub width: usize,
    /// Height of the rectangle.
    pub height: usize,
}

/// Intersect a possibly out-of-range request with the `[0, width) x [0, height)` grid.
///
/// Returns `None` when the request is degenerate or does not overlap the grid.
///
/// # Example
///
/// ```
/// use patchwork_imgproc::crop::{clip_rect, Rect};
///
/// let rect = clip_rect(-5, 2, 10, 100, 8, 8).unwrap();
/// assert_eq!(rect, Rect { x: 0, y: 2, width: 5, height: 6 });
/// assert!(clip_rect(20, 0, 4, 4, 8, 8).is_none());
/// ```
pub fn clip_rect(
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    max_width: usize,
    max_height: usize,
) -> Option<Rect> {
    if width <= 0 || height <= 0 {
        return None;
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(width).min(max_width as i64);
    let y1 = y.saturating_add(height).min(max_height as i64);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(Rect {
        x: x0 as usize,
        y: y0 as usize,
        width: (x1 - x0) as usize,
        height: (y1 - y0) as usize,
    })
}

/// Crop an image to a specified region.
///
/// The size of `dst` gives the size of the region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns an error if the region does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            x + dst.cols(),
            y + dst.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{clip_rect, Rect};
    use patchwork_image::{Image, ImageError, ImageSize};

    #[test]
    fn test_crop() -> Result<(), ImageError> {
        let image_size = ImageSize {
            width: 2,
            height: 3,
        };

        #[rustfmt::skip]
        let image = Image::<_, 3>::new(
            image_size,
            vec![
                0u8, 1, 2, 3, 4, 5,
                6u8, 7, 8, 9, 10, 11,
                12u8, 13, 14, 15, 16, 17,
            ],
        )?;

        let data_expected = vec![9u8, 10, 11, 15, 16, 17];

        let crop_size = ImageSize {
            width: 1,
            height: 2,
        };

        let mut cropped = Image::<_, 3>::from_size_val(crop_size, 0u8)?;

        super::crop_image(&image, &mut cropped, 1, 1)?;

        assert_eq!(cropped.num_channels(), 3);
        assert_eq!(cropped.size().width, 1);
        assert_eq!(cropped.size().height, 2);
        assert_eq!(cropped.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn test_crop_out_of_bounds() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut cropped = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        assert!(super::crop_image(&image, &mut cropped, 1, 0).is_err());
        Ok(())
    }

    #[test]
    fn test_clip_rect() {
        assert_eq!(
            clip_rect(1, 1, 2, 2, 10, 10),
            Some(Rect {
                x: 1,
                y: 1,
                width: 2,
                height: 2
            })
        );
        assert_eq!(
            clip_rect(8, 8, 5, 5, 10, 10),
            Some(Rect {
                x: 8,
                y: 8,
                width: 2,
                height: 2
            })
        );
        assert_eq!(clip_rect(0, 0, 0, 5, 10, 10), None);
        assert_eq!(clip_rect(-5, 0, 5, 5, 10, 10), None);
        assert_eq!(clip_rect(0, 10, 5, 5, 10, 10), None);
    }
}
