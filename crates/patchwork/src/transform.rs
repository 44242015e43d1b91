//! Every function here builds a new raster and leaves its input untouched.

use patchwork_image::{Image, ImageSize, Raster};
use patchwork_imgproc::{
    color::bgra_from_bgr,
    crop::{clip_rect, crop_image},
    flip::{horizontal_flip, vertical_flip},
    interpolation::InterpolationMode,
    resize::resize_native,
    warp::{get_rotation_matrix2d, rotated_size, transform_point, warp_affine},
};

use crate::PipelineError;

/// Apply a generic per-layout expression and wrap the result back into a [`Raster`].
macro_rules! map_layout {
    ($raster:expr, $img:ident => $body:expr) => {
        match $raster {
            Raster::Gray($img) => Raster::from($body),
            Raster::Bgr($img) => Raster::from($body),
            Raster::Bgra($img) => Raster::from($body),
        }
    };
}

/// Target size of a scale by `(sx, sy)`: `round(w·sx) x round(h·sy)`.
///
/// # Errors
///
/// Factors must be finite and positive, and the result must be non-empty
/// and addressable with `channels` interleaved channels.
pub fn scaled_size(
    size: ImageSize,
    channels: usize,
    sx: f64,
    sy: f64,
) -> Result<ImageSize, PipelineError> {
    if !(sx.is_finite() && sx > 0.0 && sy.is_finite() && sy > 0.0) {
        return Err(PipelineError::InvalidParameter(format!(
            "scale factors must be positive, got ({sx}, {sy})"
        )));
    }

    let (width, height) = (
        (size.width as f64 * sx).round(),
        (size.height as f64 * sy).round(),
    );
    if width < 1.0 || height < 1.0 {
        return Err(PipelineError::InvalidParameter(format!(
            "scaling {size} by ({sx}, {sy}) produces an empty image"
        )));
    }

    let too_large = || {
        PipelineError::InvalidParameter(format!(
            "scaling {size} by ({sx}, {sy}) produces an image that is too large"
        ))
    };
    if width >= usize::MAX as f64 || height >= usize::MAX as f64 {
        return Err(too_large());
    }

    let new_size = ImageSize {
        width: width as usize,
        height: height as usize,
    };
    new_size.checked_len(channels).ok_or_else(too_large)?;

    Ok(new_size)
}

fn resize_image<const C: usize>(
    src: &Image<u8, C>,
    size: ImageSize,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, PipelineError> {
    let mut dst = Image::from_size_val(size, 0)?;
    resize_native(src, &mut dst, interpolation)?;
    Ok(dst)
}

/// Resize a raster by the factors `(sx, sy)`.
///
/// # Example
///
/// ```
/// use patchwork::transform::scale;
/// use patchwork::imgproc::interpolation::InterpolationMode;
/// use patchwork::Raster;
///
/// let patch = Raster::from_raw(50, 40, 3, vec![0; 50 * 40 * 3]).unwrap();
/// let scaled = scale(&patch, 2.0, 0.5, InterpolationMode::Bilinear).unwrap();
/// assert_eq!((scaled.width(), scaled.height()), (100, 20));
/// ```
pub fn scale(
    patch: &Raster,
    sx: f64,
    sy: f64,
    interpolation: InterpolationMode,
) -> Result<Raster, PipelineError> {
    let size = scaled_size(patch.size(), patch.num_channels(), sx, sy)?;
    Ok(map_layout!(patch, img => resize_image(img, size, interpolation)?))
}

/// Default pivot of a raster: its geometric center in pixel-center coordinates.
pub fn default_rotation_center(size: ImageSize) -> (f32, f32) {
    (
        (size.width as f32 - 1.0) / 2.0,
        (size.height as f32 - 1.0) / 2.0,
    )
}

/// Offset, in canvas pixels, between rotating about `center` and rotating
/// about the geometric center of a raster of `size`.
///
/// [`rotate`] always centers the rotated footprint in the grown canvas, so a
/// custom pivot only moves where that canvas is placed.
///
/// # Example
///
/// ```
/// use patchwork::transform::{default_rotation_center, pivot_shift};
/// use patchwork::image::ImageSize;
///
/// let size = ImageSize { width: 40, height: 40 };
/// let (dx, dy) = pivot_shift(size, 30.0, default_rotation_center(size));
/// assert!(dx.abs() < 1e-3 && dy.abs() < 1e-3);
///
/// let (dx, dy) = pivot_shift(size, 180.0, (0.0, 0.0));
/// assert!((dx + 39.0).abs() < 1e-3 && (dy + 39.0).abs() < 1e-3);
/// ```
pub fn pivot_shift(size: ImageSize, angle: f32, center: (f32, f32)) -> (f32, f32) {
    let m = get_rotation_matrix2d(center, angle, 1.0);
    let (cx, cy) = default_rotation_center(size);
    let (px, py) = transform_point(cx, cy, &m);
    (px - cx, py - cy)
}

fn rotate_image<const C: usize>(
    src: &Image<u8, C>,
    angle: f32,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, PipelineError> {
    let new_size = rotated_size(src.size(), angle);
    let center = default_rotation_center(src.size());
    let mut m = get_rotation_matrix2d(center, angle, 1.0);

    // re-center the rotated content in the grown canvas
    let (new_cx, new_cy) = default_rotation_center(new_size);
    m[2] += new_cx - center.0;
    m[5] += new_cy - center.1;

    let mut dst = Image::from_size_val(new_size, 0)?;
    warp_affine(src, &mut dst, &m, interpolation)?;
    Ok(dst)
}

/// Rotate a raster by `angle` degrees (counter-clockwise).
///
/// The output canvas grows to `ceil(w·|cos θ| + h·|sin θ|) x ceil(w·|sin θ| + h·|cos θ|)`
/// and the rotated footprint is centered on it, so no corner is clipped.
/// Pixels outside the footprint are zero in every channel. BGR input is
/// converted to BGRA first, so the fill is transparent while rotated content
/// stays opaque. Use [`pivot_shift`] to place the result for another pivot.
///
/// # Example
///
/// ```
/// use patchwork::transform::rotate;
/// use patchwork::imgproc::interpolation::InterpolationMode;
/// use patchwork::Raster;
///
/// let patch = Raster::from_raw(100, 100, 3, vec![200; 100 * 100 * 3]).unwrap();
/// let rotated = rotate(&patch, 45.0, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!((rotated.width(), rotated.height()), (142, 142));
/// assert_eq!(rotated.num_channels(), 4);
/// ```
pub fn rotate(
    patch: &Raster,
    angle: f32,
    interpolation: InterpolationMode,
) -> Result<Raster, PipelineError> {
    if !angle.is_finite() {
        return Err(PipelineError::InvalidParameter(format!(
            "rotation angle must be finite, got {angle}"
        )));
    }

    if patch.size().is_empty() {
        return Err(PipelineError::InvalidParameter(
            "cannot rotate an empty patch".to_string(),
        ));
    }

    let rotated = match patch {
        Raster::Gray(img) => Raster::from(rotate_image(img, angle, interpolation)?),
        Raster::Bgr(img) => {
            let mut bgra = Image::<u8, 4>::from_size_val(img.size(), 0)?;
            bgra_from_bgr(img, &mut bgra)?;
            Raster::from(rotate_image(&bgra, angle, interpolation)?)
        }
        Raster::Bgra(img) => Raster::from(rotate_image(img, angle, interpolation)?),
    };

    Ok(rotated)
}

fn crop_to<const C: usize>(
    src: &Image<u8, C>,
    x: usize,
    y: usize,
    size: ImageSize,
) -> Result<Image<u8, C>, PipelineError> {
    let mut dst = Image::from_size_val(size, 0)?;
    crop_image(src, &mut dst, x, y)?;
    Ok(dst)
}

/// Crop a raster to the intersection of the requested rectangle with its bounds.
///
/// # Errors
///
/// A rectangle with a non-positive side, or one that misses the raster
/// entirely, cannot be clamped and yields [`PipelineError::InvalidParameter`].
///
/// # Example
///
/// ```
/// use patchwork::transform::crop;
/// use patchwork::Raster;
///
/// let patch = Raster::from_raw(10, 10, 1, vec![0; 100]).unwrap();
/// let cropped = crop(&patch, 6, -2, 10, 5).unwrap();
/// assert_eq!((cropped.width(), cropped.height()), (4, 3));
/// ```
pub fn crop(
    patch: &Raster,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
) -> Result<Raster, PipelineError> {
    let rect = clip_rect(x, y, width, height, patch.width(), patch.height()).ok_or_else(|| {
        PipelineError::InvalidParameter(format!(
            "crop rectangle ({x}, {y}, {width}, {height}) does not intersect a {} patch",
            patch.size()
        ))
    })?;

    let size = ImageSize {
        width: rect.width,
        height: rect.height,
    };

    Ok(map_layout!(patch, img => crop_to(img, rect.x, rect.y, size)?))
}

fn flip_image<const C: usize>(
    src: &Image<u8, C>,
    horizontal: bool,
    vertical: bool,
) -> Result<Image<u8, C>, PipelineError> {
    let mut out = src.clone();
    if horizontal {
        out = horizontal_flip(&out)?;
    }
    if vertical {
        out = vertical_flip(&out)?;
    }
    Ok(out)
}

/// Mirror a raster around its vertical and/or horizontal axis.
pub fn flip(patch: &Raster, horizontal: bool, vertical: bool) -> Result<Raster, PipelineError> {
    Ok(map_layout!(patch, img => flip_image(img, horizontal, vertical)?))
}

/// Clamp a placement so the patch stays inside the canvas.
///
/// On each axis the offset is clamped to `[0, canvas − patch]`, or to 0
/// when the patch is larger than the canvas.
pub fn clamp_placement(x: i64, y: i64, canvas: ImageSize, patch: ImageSize) -> (i64, i64) {
    let max_x = canvas.width.saturating_sub(patch.width) as i64;
    let max_y = canvas.height.saturating_sub(patch.height) as i64;
    (x.clamp(0, max_x), y.clamp(0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_image::ImageError;

    fn gradient(width: usize, height: usize) -> Result<Image<u8, 3>, ImageError> {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, 100]);
            }
        }
        Image::new([width, height].into(), data)
    }

    #[test]
    fn scale_dimensions() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(50, 30)?);
        for (sx, sy) in [(2.0, 2.0), (0.5, 1.5), (1.33, 0.77), (0.01, 0.05)] {
            let out = scale(&patch, sx, sy, InterpolationMode::Bilinear)?;
            assert_eq!(out.width(), (50.0 * sx).round() as usize);
            assert_eq!(out.height(), (30.0 * sy).round() as usize);
            assert_eq!(out.num_channels(), 3);
        }
        Ok(())
    }

    #[test]
    fn scale_identity() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(17, 9)?);
        let out = scale(&patch, 1.0, 1.0, InterpolationMode::Bilinear)?;
        assert_eq!(out, patch);
        Ok(())
    }

    #[test]
    fn scale_invalid_factors() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(4, 4)?);
        for (sx, sy) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0), (0.01, 1.0), (1e300, 1.0)] {
            assert!(matches!(
                scale(&patch, sx, sy, InterpolationMode::Bilinear),
                Err(PipelineError::InvalidParameter(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn scale_overflow_is_invalid() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(50, 50)?);
        assert!(matches!(
            scale(&patch, 1e10, 1e10, InterpolationMode::Bilinear),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            scaled_size(patch.size(), 3, 1e18, 1e18),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert_eq!(
            scaled_size(patch.size(), 3, 3.0, 0.5)?,
            ImageSize {
                width: 150,
                height: 25
            }
        );
        Ok(())
    }

    #[test]
    fn rotate_grows_canvas_and_adds_alpha() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(100, 100)?);
        let out = rotate(&patch, 45.0, InterpolationMode::Bilinear)?;
        assert_eq!(out.size(), ImageSize { width: 142, height: 142 });

        let Raster::Bgra(img) = out else {
            panic!("expected a BGRA raster");
        };
        // corners are fill, center is opaque content
        assert_eq!(img.pixel(0, 0), Some(&[0u8, 0, 0, 0][..]));
        assert_eq!(img.pixel(141, 141), Some(&[0u8, 0, 0, 0][..]));
        assert_eq!(img.get_pixel(71, 71, 3)?, &255);
        Ok(())
    }

    #[test]
    fn rotate_180_is_exact_flip() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(7, 5)?);
        let rotated = rotate(&patch, 180.0, InterpolationMode::Bilinear)?;
        let flipped = flip(&patch, true, true)?;

        let (Raster::Bgra(rotated), Raster::Bgr(flipped)) = (rotated, flipped) else {
            panic!("unexpected layouts");
        };
        assert_eq!(rotated.size(), flipped.size());
        for (r, f) in rotated
            .as_slice()
            .chunks_exact(4)
            .zip(flipped.as_slice().chunks_exact(3))
        {
            assert_eq!(&r[..3], f);
            assert_eq!(r[3], 255);
        }
        Ok(())
    }

    #[test]
    fn rotate_keeps_gray_layout() -> Result<(), PipelineError> {
        let patch = Raster::from(Image::<u8, 1>::from_size_val([10, 20].into(), 9)?);
        let out = rotate(&patch, 90.0, InterpolationMode::Nearest)?;
        assert_eq!(out.num_channels(), 1);
        assert_eq!(out.size(), ImageSize { width: 20, height: 10 });
        assert!(out.as_bytes().iter().all(|&v| v == 9));
        Ok(())
    }

    #[test]
    fn pivot_shift_follows_the_pivot() {
        let size = ImageSize {
            width: 40,
            height: 40,
        };
        let (dx, dy) = pivot_shift(size, 0.0, (3.0, 7.0));
        assert!(dx.abs() < 1e-4 && dy.abs() < 1e-4);

        // (R - I)(center - pivot) with center (19.5, 19.5)
        let (dx, dy) = pivot_shift(size, 45.0, (0.0, 0.0));
        assert!((dx - 8.0772).abs() < 1e-3, "dx {dx}");
        assert!((dy + 19.5).abs() < 1e-3, "dy {dy}");

        let (dx, dy) = pivot_shift(size, 90.0, (39.0, 19.5));
        assert!((dx - 19.5).abs() < 1e-3 && (dy - 19.5).abs() < 1e-3);
    }

    #[test]
    fn crop_clips_silently() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(10, 8)?);
        let out = crop(&patch, -3, 2, 100, 3)?;
        assert_eq!(out.size(), ImageSize { width: 10, height: 3 });

        let Raster::Bgr(img) = out else {
            panic!("expected a BGR raster");
        };
        assert_eq!(img.pixel(1, 0), Some(&[4u8, 8, 100][..]));
        Ok(())
    }

    #[test]
    fn crop_degenerate_is_invalid() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(10, 8)?);
        assert!(matches!(
            crop(&patch, 0, 0, 0, 5),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            crop(&patch, 20, 0, 5, 5),
            Err(PipelineError::InvalidParameter(_))
        ));
        Ok(())
    }

    #[test]
    fn flip_twice_is_identity() -> Result<(), PipelineError> {
        let patch = Raster::from(gradient(6, 3)?);
        let once = flip(&patch, true, false)?;
        assert_ne!(once, patch);
        assert_eq!(flip(&once, true, false)?, patch);
        assert_eq!(flip(&patch, false, false)?, patch);
        Ok(())
    }

    #[test]
    fn placement_clamping() {
        let canvas = ImageSize {
            width: 200,
            height: 200,
        };
        let patch = ImageSize {
            width: 142,
            height: 142,
        };
        assert_eq!(clamp_placement(50, 50, canvas, patch), (50, 50));
        assert_eq!(clamp_placement(100, -5, canvas, patch), (58, 0));

        let big = ImageSize {
            width: 300,
            height: 10,
        };
        assert_eq!(clamp_placement(40, 400, canvas, big), (0, 190));
    }
}
