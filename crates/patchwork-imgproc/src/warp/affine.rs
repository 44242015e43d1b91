use patchwork_image::{Image, ImageDtype, ImageError, ImageSize};

use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix. A singular matrix inverts
/// to all zeros.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// Positive angles rotate counter-clockwise on screen (y pointing down).
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use patchwork_imgproc::warp::get_rotation_matrix2d;
///
/// let m = get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
/// assert!(m[0].abs() < 1e-6);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = (angle as f64).to_radians();
    let alpha = scale as f64 * angle.cos();
    let beta = scale as f64 * angle.sin();
    let (cx, cy) = (center.0 as f64, center.1 as f64);

    let tx = (1.0 - alpha) * cx - beta * cy;
    let ty = beta * cx + (1.0 - alpha) * cy;

    [
        alpha as f32,
        beta as f32,
        tx as f32,
        -beta as f32,
        alpha as f32,
        ty as f32,
    ]
}

/// Size of the smallest canvas that holds an image of `size` rotated by `angle` degrees.
///
/// Computes `ceil(w·|cos θ| + h·|sin θ|) x ceil(w·|sin θ| + h·|cos θ|)`. A
/// small tolerance keeps multiples of 90 degrees from growing by one pixel
/// due to floating point noise.
///
/// # Example
///
/// ```
/// use patchwork_image::ImageSize;
/// use patchwork_imgproc::warp::rotated_size;
///
/// let size = rotated_size(ImageSize { width: 100, height: 100 }, 45.0);
/// assert_eq!(size, ImageSize { width: 142, height: 142 });
/// ```
pub fn rotated_size(size: ImageSize, angle: f32) -> ImageSize {
    const EPS: f64 = 1e-6;
    let theta = (angle as f64).to_radians();
    let (cos, sin) = (theta.cos().abs(), theta.sin().abs());
    let (w, h) = (size.width as f64, size.height as f64);

    let new_w = (w * cos + h * sin - EPS).ceil().max(1.0);
    let new_h = (w * sin + h * cos - EPS).ceil().max(1.0);

    ImageSize {
        width: new_w as usize,
        height: new_h as usize,
    }
}

/// Applies an affine transformation to a point.
pub fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Destination pixels whose pre-image falls outside the source footprint
/// keep the value `dst` already holds, so callers choose the fill by
/// initializing `dst`.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The 2x3 affine transformation matrix mapping src to dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::interpolation::InterpolationMode;
/// use patchwork_imgproc::warp::warp_affine;
///
/// let src = Image::<_, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1f32,
/// ).unwrap();
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
///
/// let mut dst = Image::<_, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// warp_affine(&src, &mut dst, &m, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::EmptyImage);
    }

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        transform_point(x as f32, y as f32, &m_inv)
    });

    // pixel centers sit on integer coordinates, so the footprint spans half a pixel further
    let (max_x, max_y) = (src.cols() as f32 - 0.5, src.rows() as f32 - 0.5);

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        if x >= -0.5 && x < max_x && y >= -0.5 && y < max_y {
            let pixel = interpolate_pixel(src, x, y, interpolation);
            dst_pixel
                .iter_mut()
                .zip(pixel.iter())
                .for_each(|(d, &p)| *d = T::from_f32(p));
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use patchwork_image::{Image, ImageError, ImageSize};

    use super::*;

    #[test]
    fn warp_affine_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_transformed = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 3);

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..20).collect(),
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0)?;

        warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_rot90() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0f32, 2.0f32, 3.0f32],
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        warp_affine(
            &image,
            &mut image_transformed,
            &get_rotation_matrix2d((0.5, 0.5), 90.0, 1.0),
            InterpolationMode::Nearest,
        )?;

        assert_eq!(
            image_transformed.as_slice(),
            &[1.0f32, 3.0f32, 0.0f32, 2.0f32]
        );

        Ok(())
    }

    #[test]
    fn warp_affine_keeps_fill_outside_footprint() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([2, 2].into(), 200)?;
        let mut dst = Image::<u8, 1>::from_size_val([4, 4].into(), 7)?;

        // shift by two pixels right and down
        warp_affine(
            &image,
            &mut dst,
            &[1.0, 0.0, 2.0, 0.0, 1.0, 2.0],
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(*dst.get_pixel(0, 0, 0)?, 7);
        assert_eq!(*dst.get_pixel(3, 3, 0)?, 200);
        assert_eq!(*dst.get_pixel(2, 2, 0)?, 200);
        assert_eq!(*dst.get_pixel(1, 2, 0)?, 7);

        Ok(())
    }

    #[test]
    fn invert_affine_roundtrip() {
        let m = get_rotation_matrix2d((3.0, 4.0), 30.0, 2.0);
        let m_inv = invert_affine_transform(&m);
        let (u, v) = transform_point(5.0, -1.0, &m);
        let (x, y) = transform_point(u, v, &m_inv);
        approx::assert_abs_diff_eq!(x, 5.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(y, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn rotated_size_multiples_of_90() {
        let size = ImageSize {
            width: 100,
            height: 40,
        };
        assert_eq!(rotated_size(size, 0.0), size);
        assert_eq!(
            rotated_size(size, 90.0),
            ImageSize {
                width: 40,
                height: 100
            }
        );
        assert_eq!(rotated_size(size, 180.0), size);
        assert_eq!(rotated_size(size, -270.0).width, 40);
    }

    #[test]
    fn rotated_size_45() {
        let size = rotated_size(
            ImageSize {
                width: 100,
                height: 100,
            },
            45.0,
        );
        assert_eq!(size.width, 142);
        assert_eq!(size.height, 142);
    }
}
