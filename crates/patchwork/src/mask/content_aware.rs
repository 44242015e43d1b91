use patchwork_image::{Image, Raster};
use patchwork_imgproc::{
    color::{bgr_from_bgra, gray_from_bgr_u8, hsv_from_bgr_u8},
    core::{bitwise_and, bitwise_not},
    edges::canny,
    histogram::compute_histogram_2d,
    morphology::{dilate, erode, Kernel, KernelShape},
    threshold::{in_range_hsv, threshold_binary},
};

use super::{fill_largest_contour, Mask};
use crate::config::ContentAwareParams;
use crate::PipelineError;

const HUE_RANGE: usize = 180;
const SAT_RANGE: usize = 256;

/// Split a patch into its BGR color and the mask of pixels that carry content.
///
/// Only BGRA patches can mark pixels as fill, through a zero alpha. Gray
/// patches have no hue to estimate a background from and are rejected.
fn color_and_valid(patch: &Raster) -> Result<(Image<u8, 3>, Image<u8, 1>), PipelineError> {
    let size = patch.size();
    let mut bgr = Image::from_size_val(size, 0)?;

    let valid = match patch {
        Raster::Gray(_) => return Err(PipelineError::UnsupportedChannelLayout(1)),
        Raster::Bgr(img) => {
            bgr = img.clone();
            Image::from_size_val(size, 255)?
        }
        Raster::Bgra(img) => {
            bgr_from_bgra(img, &mut bgr)?;
            let alpha = img.channel(3)?;
            let mut valid = Image::from_size_val(size, 0)?;
            threshold_binary(&alpha, &mut valid, 0, 255)?;
            valid
        }
    };

    Ok((bgr, valid))
}

/// Hue and saturation bounds of the background band around `(bg_h, bg_s)`.
///
/// The hue interval is circular over `[0, 180)` and may wrap, in which case
/// the lower hue bound is greater than the upper one.
fn background_band(bg_h: f32, bg_s: f32, params: &ContentAwareParams) -> ([u8; 3], [u8; 3]) {
    let h = (bg_h.round() as i32).rem_euclid(HUE_RANGE as i32);
    let dh = params.hue_tolerance as i32;

    let (h_lo, h_hi) = if 2 * dh + 1 >= HUE_RANGE as i32 {
        (0, HUE_RANGE as i32 - 1)
    } else {
        (
            (h - dh).rem_euclid(HUE_RANGE as i32),
            (h + dh).rem_euclid(HUE_RANGE as i32),
        )
    };

    let s_lo = (bg_s.round().clamp(0.0, 255.0) as u8).saturating_sub(params.sat_tolerance);

    ([h_lo as u8, s_lo, 0], [h_hi as u8, 255, 255])
}

/// Edge map closed by a dilation followed by an erosion.
fn refined_edges(
    bgr: &Image<u8, 3>,
    params: &ContentAwareParams,
) -> Result<Image<u8, 1>, PipelineError> {
    let mut gray = Image::from_size_val(bgr.size(), 0)?;
    gray_from_bgr_u8(bgr, &mut gray)?;

    let mut edges = Image::from_size_val(bgr.size(), 0)?;
    canny(&gray, &mut edges, params.canny_low, params.canny_high)?;

    let kernel = Kernel::new(KernelShape::Box {
        size: params.kernel_size,
    });

    let mut dilated = Image::from_size_val(bgr.size(), 0)?;
    dilate(&edges, &mut dilated, &kernel, params.dilate_iterations)?;
    erode(&dilated, &mut edges, &kernel, params.erode_iterations)?;

    Ok(edges)
}

/// Recover the silhouette of a patch set against an arbitrary uniform background.
///
/// The dominant hue/saturation bin of the patch is taken as the background
/// color. Pixels outside a tolerance band around it form the color mask,
/// which is intersected with a closed edge map. The largest external contour
/// of the intersection, filled, is the mask. Transparent pixels of BGRA
/// patches are ignored throughout.
///
/// # Errors
///
/// Gray patches yield [`PipelineError::UnsupportedChannelLayout`].
pub fn extract_content_aware(
    patch: &Raster,
    params: &ContentAwareParams,
) -> Result<Mask, PipelineError> {
    params.validate()?;

    let size = patch.size();
    let (bgr, valid) = color_and_valid(patch)?;

    let mut hsv = Image::from_size_val(size, 0)?;
    hsv_from_bgr_u8(&bgr, &mut hsv)?;

    let hist = compute_histogram_2d(
        &hsv,
        [0, 1],
        [params.hue_bins, params.sat_bins],
        [HUE_RANGE, SAT_RANGE],
        Some(&valid),
    )?;

    let Some(peak) = hist.argmax() else {
        log::warn!("content-aware mask: patch has no opaque pixel");
        return Mask::empty(size);
    };
    let (bg_h, bg_s) = hist.bin_center(peak);
    let (lower, upper) = background_band(bg_h, bg_s, params);
    log::debug!("estimated background hue {bg_h:.1} saturation {bg_s:.1}");

    let mut background = Image::from_size_val(size, 0)?;
    in_range_hsv(&hsv, &mut background, lower, upper)?;

    let mut color = Image::from_size_val(size, 0)?;
    bitwise_not(&background, &mut color)?;

    let edges = refined_edges(&bgr, params)?;

    let mut region = Image::from_size_val(size, 0)?;
    bitwise_and(&color, &edges, &mut region, &valid)?;

    fill_largest_contour(&region)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKGROUND: [u8; 3] = [180, 130, 40];
    const FOREGROUND: [u8; 3] = [30, 220, 240];

    fn synthetic(size: usize, from: usize, to: usize) -> Result<Image<u8, 3>, PipelineError> {
        let mut img = Image::from_size_pixel([size, size].into(), BACKGROUND)?;
        for y in from..to {
            for x in from..to {
                for (c, &v) in FOREGROUND.iter().enumerate() {
                    img.set_pixel(x, y, c, v)?;
                }
            }
        }
        Ok(img)
    }

    #[test]
    fn background_band_wraps_hue() {
        let params = ContentAwareParams::default();
        assert_eq!(
            background_band(2.8, 100.0, &params),
            ([173, 70, 0], [13, 255, 255])
        );
        assert_eq!(
            background_band(90.0, 10.0, &params),
            ([80, 0, 0], [100, 255, 255])
        );

        let wide = ContentAwareParams {
            hue_tolerance: 100,
            ..Default::default()
        };
        assert_eq!(background_band(45.0, 0.0, &wide).0[0], 0);
        assert_eq!(background_band(45.0, 0.0, &wide).1[0], 179);
    }

    #[test]
    fn separates_square_from_colored_background() -> Result<(), PipelineError> {
        let (from, to) = (20, 40);
        let patch = Raster::from(synthetic(60, from, to)?);
        let mask = extract_content_aware(&patch, &ContentAwareParams::default())?;

        let (mut fg_hit, mut bg_hit) = (0usize, 0usize);
        for y in 0..60 {
            for x in 0..60 {
                let inside = (from..to).contains(&x) && (from..to).contains(&y);
                let selected = *mask.image().get_pixel(x, y, 0)? == 255;
                match (inside, selected) {
                    (true, true) => fg_hit += 1,
                    (false, true) => bg_hit += 1,
                    _ => {}
                }
            }
        }

        let fg_total = (to - from) * (to - from);
        let bg_total = 60 * 60 - fg_total;
        assert!(fg_hit as f64 >= 0.95 * fg_total as f64, "fg {fg_hit}");
        assert!(bg_hit as f64 <= 0.05 * bg_total as f64, "bg {bg_hit}");
        Ok(())
    }

    #[test]
    fn transparent_patch_is_empty() -> Result<(), PipelineError> {
        let patch = Raster::from(Image::<u8, 4>::from_size_val([16, 16].into(), 0)?);
        let mask = extract_content_aware(&patch, &ContentAwareParams::default())?;
        assert_eq!(mask.count(), 0);
        Ok(())
    }

    #[test]
    fn gray_patch_is_unsupported() -> Result<(), PipelineError> {
        let mut img = Image::<u8, 1>::from_size_val([30, 30].into(), 90)?;
        for y in 5..25 {
            for x in 5..25 {
                img.set_pixel(x, y, 0, 230)?;
            }
        }
        assert_eq!(
            extract_content_aware(&Raster::from(img), &ContentAwareParams::default()),
            Err(PipelineError::UnsupportedChannelLayout(1))
        );
        Ok(())
    }

    #[test]
    fn invalid_params_are_rejected() -> Result<(), PipelineError> {
        let patch = Raster::from(synthetic(8, 2, 6)?);
        let params = ContentAwareParams {
            hue_bins: 0,
            ..Default::default()
        };
        assert!(matches!(
            extract_content_aware(&patch, &params),
            Err(PipelineError::InvalidParameter(_))
        ));
        Ok(())
    }
}
