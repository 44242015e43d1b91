use patchwork_image::{Image, ImageError, Raster};
use patchwork_imgproc::{
    color::{
        bgr_from_bgra, bgr_from_gray, bgra_from_bgr, bgra_from_gray, gray_from_bgr_u8,
        gray_from_bgra_u8,
    },
    composite::copy_masked,
};

use crate::mask::Mask;
use crate::PipelineError;

type Conversion<const A: usize, const B: usize> =
    fn(&Image<u8, A>, &mut Image<u8, B>) -> Result<(), ImageError>;

fn convert<const A: usize, const B: usize>(
    src: &Image<u8, A>,
    conversion: Conversion<A, B>,
) -> Result<Image<u8, B>, PipelineError> {
    let mut dst = Image::from_size_val(src.size(), 0)?;
    conversion(src, &mut dst)?;
    Ok(dst)
}

fn to_gray(raster: &Raster) -> Result<Image<u8, 1>, PipelineError> {
    match raster {
        Raster::Gray(img) => Ok(img.clone()),
        Raster::Bgr(img) => convert(img, gray_from_bgr_u8),
        Raster::Bgra(img) => convert(img, gray_from_bgra_u8),
    }
}

fn to_bgr(raster: &Raster) -> Result<Image<u8, 3>, PipelineError> {
    match raster {
        Raster::Gray(img) => convert(img, bgr_from_gray),
        Raster::Bgr(img) => Ok(img.clone()),
        Raster::Bgra(img) => convert(img, bgr_from_bgra),
    }
}

fn to_bgra(raster: &Raster) -> Result<Image<u8, 4>, PipelineError> {
    match raster {
        Raster::Gray(img) => convert(img, bgra_from_gray),
        Raster::Bgr(img) => convert(img, bgra_from_bgr),
        Raster::Bgra(img) => Ok(img.clone()),
    }
}

/// Paste the pixels of `patch` selected by `mask` onto a copy of `background`.
///
/// The offset is clamped to be non-negative. A placement starting at or past
/// the right or bottom edge leaves the background unchanged; otherwise only
/// the overlap of the placed patch with the background is written. The patch
/// is converted to the background's channel layout before copying, and the
/// background itself is never modified.
///
/// # Errors
///
/// Returns an error if the mask and the patch differ in size.
///
/// # Example
///
/// ```
/// use patchwork::compositor::overlay;
/// use patchwork::mask::Mask;
/// use patchwork::Raster;
///
/// let background = Raster::from_raw(4, 4, 3, vec![10; 4 * 4 * 3]).unwrap();
/// let patch = Raster::from_raw(2, 2, 3, vec![200; 2 * 2 * 3]).unwrap();
/// let mask = Mask::full(patch.size()).unwrap();
///
/// let composed = overlay(&background, &patch, &mask, 3, -1).unwrap();
/// assert_eq!(composed.as_bytes().iter().filter(|&&v| v == 200).count(), 2 * 3);
/// ```
pub fn overlay(
    background: &Raster,
    patch: &Raster,
    mask: &Mask,
    x: i64,
    y: i64,
) -> Result<Raster, PipelineError> {
    if mask.size() != patch.size() {
        return Err(PipelineError::InvalidParameter(format!(
            "mask size {} does not match patch size {}",
            mask.size(),
            patch.size()
        )));
    }

    let (x, y) = (x.max(0), y.max(0));
    if x >= background.width() as i64 || y >= background.height() as i64 {
        log::debug!("placement ({x}, {y}) is outside the background, nothing to paste");
        return Ok(background.clone());
    }

    let mut composed = background.clone();
    match &mut composed {
        Raster::Gray(dst) => copy_masked(&to_gray(patch)?, mask.image(), dst, x, y)?,
        Raster::Bgr(dst) => copy_masked(&to_bgr(patch)?, mask.image(), dst, x, y)?,
        Raster::Bgra(dst) => copy_masked(&to_bgra(patch)?, mask.image(), dst, x, y)?,
    }

    Ok(composed)
}
