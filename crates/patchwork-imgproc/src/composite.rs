use patchwork_image::{Image, ImageError};

use crate::crop::clip_rect;

/// Copy the pixels of `src` selected by `mask` into `dst` at offset `(x, y)`.
///
/// Only pixels whose mask value is exactly 255 are copied; every other
/// destination pixel is left untouched. The placed source rectangle is
/// intersected with `dst`, so negative offsets and overhangs are clipped.
///
/// # Arguments
///
/// * `src` - The image to paste.
/// * `mask` - Selection mask with the size of `src`.
/// * `dst` - The image to paste into.
/// * `x` - Column of `dst` where the left edge of `src` lands.
/// * `y` - Row of `dst` where the top edge of `src` lands.
///
/// # Errors
///
/// Returns an error if the mask size differs from the source size.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::composite::copy_masked;
///
/// let src = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![7, 9]).unwrap();
/// let mask = Image::<u8, 1>::new(ImageSize { width: 2, height: 1 }, vec![255, 0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(ImageSize { width: 3, height: 1 }, 1).unwrap();
///
/// copy_masked(&src, &mask, &mut dst, 1, 0).unwrap();
/// assert_eq!(dst.as_slice(), &[1, 7, 1]);
/// ```
pub fn copy_masked<const C: usize>(
    src: &Image<u8, C>,
    mask: &Image<u8, 1>,
    dst: &mut Image<u8, C>,
    x: i64,
    y: i64,
) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            mask.width(),
            mask.height(),
        ));
    }

    let Some(overlap) = clip_rect(
        x,
        y,
        src.width() as i64,
        src.height() as i64,
        dst.width(),
        dst.height(),
    ) else {
        return Ok(());
    };

    // top-left of the overlap in source coordinates
    let src_x0 = (overlap.x as i64 - x) as usize;
    let src_y0 = (overlap.y as i64 - y) as usize;

    let (src_cols, dst_cols) = (src.cols(), dst.cols());
    let src_data = src.as_slice();
    let mask_data = mask.as_slice();
    let dst_data = dst.as_slice_mut();

    for row in 0..overlap.height {
        let sy = src_y0 + row;
        let dy = overlap.y + row;
        for col in 0..overlap.width {
            let sx = src_x0 + col;
            if mask_data[sy * src_cols + sx] != 255 {
                continue;
            }
            let s = (sy * src_cols + sx) * C;
            let d = (dy * dst_cols + overlap.x + col) * C;
            dst_data[d..d + C].copy_from_slice(&src_data[s..s + C]);
        }
    }

    Ok(())
}
