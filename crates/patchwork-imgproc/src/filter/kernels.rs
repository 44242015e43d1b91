use patchwork_image::ImageError;

/// Create a sobel kernel.
///
/// Returns the `(derivative, smoothing)` pair of 1-D kernels.
///
/// # Errors
///
/// Only 3-tap kernels are supported.
pub fn sobel_kernel_1d(kernel_size: usize) -> Result<(Vec<f32>, Vec<f32>), ImageError> {
    match kernel_size {
        3 => Ok((vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0])),
        n => Err(ImageError::InvalidKernelSize(n)),
    }
}
