use super::kernels::Kernel;
use patchwork_image::{Image, ImageError};
use rayon::prelude::*;

fn morph_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    offsets: &[(isize, isize)],
    init: u8,
    select: fn(u8, u8) -> u8,
) {
    dst.par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = init;
                for &(dy, dx) in offsets {
                    let py = y as isize + dy;
                    let px = x as isize + dx;
                    // out-of-bounds neighbors do not participate
                    if py < 0 || px < 0 || py >= height as isize || px >= width as isize {
                        continue;
                    }
                    acc = select(acc, src[py as usize * width + px as usize]);
                }
                *out = acc;
            }
        });
}

fn morph(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Kernel,
    iterations: usize,
    init: u8,
    select: fn(u8, u8) -> u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    if kernel.width() == 0 || kernel.width() % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel.width()));
    }

    let (width, height) = (src.width(), src.height());
    dst.as_slice_mut().copy_from_slice(src.as_slice());
    if width == 0 || height == 0 {
        return Ok(());
    }

    let offsets = kernel.offsets();
    let mut scratch = src.as_slice().to_vec();
    for _ in 0..iterations {
        scratch.copy_from_slice(dst.as_slice());
        morph_pass(
            &scratch,
            dst.as_slice_mut(),
            width,
            height,
            &offsets,
            init,
            select,
        );
    }

    Ok(())
}

/// Dilate a single channel image using a [`Kernel`].
///
/// Dilation expands white regions in the image. Each pixel is replaced by the
/// maximum value in the neighborhood defined by the kernel; neighbors outside
/// the image are ignored. The operation is repeated `iterations` times, with
/// zero iterations copying `src` into `dst`.
///
/// # Errors
///
/// Returns an error if the image sizes differ or the kernel side is not odd.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::morphology::{dilate, Kernel, KernelShape};
///
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 3 },
///     vec![0, 0, 0, 0, 255, 0, 0, 0, 0],
/// )
/// .unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// dilate(&src, &mut dst, &Kernel::new(KernelShape::Box { size: 3 }), 1).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 255));
/// ```
pub fn dilate(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError> {
    morph(src, dst, kernel, iterations, u8::MIN, u8::max)
}

/// Erode a single channel image using a [`Kernel`].
///
/// Erosion shrinks white regions in the image. Each pixel is replaced by the
/// minimum value in the neighborhood defined by the kernel; neighbors outside
/// the image are ignored, so regions touching the border are not eroded from
/// that side.
///
/// # Errors
///
/// Returns an error if the image sizes differ or the kernel side is not odd.
pub fn erode(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &Kernel,
    iterations: usize,
) -> Result<(), ImageError> {
    morph(src, dst, kernel, iterations, u8::MAX, u8::min)
}
