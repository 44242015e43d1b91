use patchwork_image::{Image, ImageError};

use super::{kernels, separable_filter};

/// Compute the first order spatial derivatives with a 3x3 sobel operator.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dx` - The horizontal derivative with shape (H, W, 1).
/// * `dy` - The vertical derivative with shape (H, W, 1).
///
/// PRECONDITION: `src`, `dx` and `dy` must have the same shape.
pub fn spatial_gradient(
    src: &Image<f32, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    let (derivative, smoothing) = kernels::sobel_kernel_1d(3)?;
    separable_filter(src, dx, &derivative, &smoothing)?;
    separable_filter(src, dy, &smoothing, &derivative)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use patchwork_image::{Image, ImageError};

    #[test]
    fn test_spatial_gradient_step() -> Result<(), ImageError> {
        // vertical step edge between columns 1 and 2
        let src = Image::<f32, 1>::new(
            [4, 3].into(),
            vec![
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0, //
                0.0, 0.0, 1.0, 1.0, //
            ],
        )?;
        let mut dx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        let mut dy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        super::spatial_gradient(&src, &mut dx, &mut dy)?;

        assert_eq!(dx.get_pixel(1, 1, 0)?, &4.0);
        assert_eq!(dx.get_pixel(2, 1, 0)?, &4.0);
        assert_eq!(dx.get_pixel(0, 1, 0)?, &0.0);
        assert!(dy.as_slice().iter().all(|&v| v == 0.0));
        Ok(())
    }
}
