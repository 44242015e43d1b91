use patchwork_image::{Image, Raster};
use patchwork_imgproc::{
    color::{gray_from_bgr_u8, gray_from_bgra_u8},
    threshold::threshold_binary,
};

use super::{fill_largest_contour, Mask};
use crate::config::FastMaskParams;
use crate::PipelineError;

/// The plane the fast extractor thresholds.
///
/// Alpha is used for BGRA patches that carry transparent fill, intensity
/// for everything else, fully opaque BGRA included.
fn foreground_plane(patch: &Raster, threshold: u8) -> Result<Image<u8, 1>, PipelineError> {
    match patch {
        Raster::Gray(img) => Ok(img.clone()),
        Raster::Bgr(img) => {
            let mut gray = Image::from_size_val(img.size(), 0)?;
            gray_from_bgr_u8(img, &mut gray)?;
            Ok(gray)
        }
        Raster::Bgra(img) => {
            let alpha = img.channel(3)?;
            if alpha.as_slice().iter().any(|&a| a <= threshold) {
                return Ok(alpha);
            }
            let mut gray = Image::from_size_val(img.size(), 0)?;
            gray_from_bgra_u8(img, &mut gray)?;
            Ok(gray)
        }
    }
}

/// Recover the silhouette of a patch padded with a zero fill.
///
/// Pixels whose intensity is strictly above `params.threshold` are
/// foreground. BGRA patches with transparent pixels are thresholded on alpha
/// instead. The largest external contour of that region is rasterized,
/// filled, as the mask. Foreground content that is itself near black is lost
/// on patches without transparency.
pub fn extract_fast(patch: &Raster, params: &FastMaskParams) -> Result<Mask, PipelineError> {
    let plane = foreground_plane(patch, params.threshold)?;

    let mut binary = Image::from_size_val(plane.size(), 0)?;
    threshold_binary(&plane, &mut binary, params.threshold, 255)?;

    let mask = fill_largest_contour(&binary)?;
    log::debug!(
        "fast mask over {}: coverage {:.3}",
        patch.size(),
        mask.coverage()
    );

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_image::ImageSize;

    fn square_on_black(size: usize, from: usize, to: usize) -> Result<Image<u8, 3>, PipelineError> {
        let mut img = Image::from_size_val([size, size].into(), 0)?;
        for y in from..to {
            for x in from..to {
                for c in 0..3 {
                    img.set_pixel(x, y, c, 180)?;
                }
            }
        }
        Ok(img)
    }

    #[test]
    fn fast_mask_recovers_square() -> Result<(), PipelineError> {
        let patch = Raster::from(square_on_black(20, 5, 15)?);
        let mask = extract_fast(&patch, &FastMaskParams::default())?;
        assert_eq!(mask.count(), 100);
        assert_eq!(mask.image().get_pixel(5, 5, 0)?, &255);
        assert_eq!(mask.image().get_pixel(4, 5, 0)?, &0);
        assert_eq!(mask.image().get_pixel(15, 15, 0)?, &0);
        Ok(())
    }

    #[test]
    fn fast_mask_fills_dark_interior() -> Result<(), PipelineError> {
        let mut img = square_on_black(20, 5, 15)?;
        for c in 0..3 {
            img.set_pixel(10, 10, c, 0)?;
        }
        let mask = extract_fast(&Raster::from(img), &FastMaskParams::default())?;
        assert_eq!(mask.count(), 100);
        Ok(())
    }

    #[test]
    fn fast_mask_uses_alpha() -> Result<(), PipelineError> {
        // black but opaque content on a transparent fill
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let mut img = Image::<u8, 4>::from_size_val(size, 0)?;
        for y in 2..6 {
            for x in 3..8 {
                img.set_pixel(x, y, 3, 255)?;
            }
        }
        let mask = extract_fast(&Raster::from(img), &FastMaskParams::default())?;
        assert_eq!(mask.count(), 20);
        Ok(())
    }

    #[test]
    fn fast_mask_opaque_bgra_uses_intensity() -> Result<(), PipelineError> {
        // opaque everywhere, black border around bright content
        let mut img = Image::<u8, 4>::from_size_pixel([20, 20].into(), [0, 0, 0, 255])?;
        for y in 5..15 {
            for x in 5..15 {
                for c in 0..3 {
                    img.set_pixel(x, y, c, 200)?;
                }
            }
        }
        let mask = extract_fast(&Raster::from(img), &FastMaskParams::default())?;
        assert_eq!(mask.count(), 100);
        assert_eq!(mask.image().get_pixel(4, 4, 0)?, &0);
        Ok(())
    }

    #[test]
    fn fast_mask_threshold_is_strict() -> Result<(), PipelineError> {
        let img = Image::<u8, 1>::from_size_val([4, 4].into(), 1)?;
        let mask = extract_fast(&Raster::from(img.clone()), &FastMaskParams::default())?;
        assert_eq!(mask.count(), 0);

        let mask = extract_fast(&Raster::from(img), &FastMaskParams { threshold: 0 })?;
        assert_eq!(mask.count(), 16);
        Ok(())
    }
}
