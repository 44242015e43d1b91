use patchwork_image::{Image, ImageSize, Raster};
use patchwork_imgproc::{
    contours::{find_external_contours, Contour},
    draw::draw_contour,
};

use crate::config::{ContentAwareParams, FastMaskParams};
use crate::PipelineError;

mod content_aware;
mod fast;

pub use content_aware::extract_content_aware;
pub use fast::extract_fast;

/// A binary selection over a patch: 255 copies the patch pixel, 0 keeps the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask(Image<u8, 1>);

impl Mask {
    /// Wrap a single channel image, mapping every non-zero value to 255.
    pub fn from_image(mut image: Image<u8, 1>) -> Self {
        image
            .as_slice_mut()
            .iter_mut()
            .for_each(|v| *v = if *v > 0 { 255 } else { 0 });
        Self(image)
    }

    /// A mask of the given size that selects nothing.
    pub fn empty(size: ImageSize) -> Result<Self, PipelineError> {
        Ok(Self(Image::from_size_val(size, 0)?))
    }

    /// A mask of the given size that selects every pixel.
    pub fn full(size: ImageSize) -> Result<Self, PipelineError> {
        Ok(Self(Image::from_size_val(size, 255)?))
    }

    /// Borrow the underlying image.
    pub fn image(&self) -> &Image<u8, 1> {
        &self.0
    }

    /// Consume the mask and return the underlying image.
    pub fn into_image(self) -> Image<u8, 1> {
        self.0
    }

    /// Size of the mask in pixels.
    pub fn size(&self) -> ImageSize {
        self.0.size()
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.0.as_slice().iter().filter(|&&v| v == 255).count()
    }

    /// Fraction of selected pixels in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        let area = self.size().area();
        if area == 0 {
            return 0.0;
        }
        self.count() as f64 / area as f64
    }
}

/// Derive a [`Mask`] from a patch.
pub trait ExtractMask {
    /// Compute the mask of `patch`. The mask has the same size as the patch.
    fn extract(&self, patch: &Raster) -> Result<Mask, PipelineError>;
}

/// The available mask extraction strategies, chosen per call.
///
/// # Example
///
/// ```
/// use patchwork::mask::{ExtractMask, MaskExtractor};
/// use patchwork::Raster;
///
/// // a 2x2 bright block on a zero fill
/// let mut data = vec![0u8; 6 * 6];
/// for y in 2..4 {
///     for x in 2..4 {
///         data[y * 6 + x] = 200;
///     }
/// }
/// let patch = Raster::from_raw(6, 6, 1, data).unwrap();
///
/// let mask = MaskExtractor::default().extract(&patch).unwrap();
/// assert_eq!(mask.count(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskExtractor {
    /// Threshold against a near-zero fill.
    Fast(FastMaskParams),
    /// Background color estimate combined with edges.
    ContentAware(ContentAwareParams),
}

impl Default for MaskExtractor {
    fn default() -> Self {
        MaskExtractor::Fast(FastMaskParams::default())
    }
}

impl MaskExtractor {
    /// The fast extractor with default parameters.
    pub fn fast() -> Self {
        MaskExtractor::Fast(FastMaskParams::default())
    }

    /// The content-aware extractor with default parameters.
    pub fn content_aware() -> Self {
        MaskExtractor::ContentAware(ContentAwareParams::default())
    }
}

impl ExtractMask for MaskExtractor {
    fn extract(&self, patch: &Raster) -> Result<Mask, PipelineError> {
        match self {
            MaskExtractor::Fast(params) => extract_fast(patch, params),
            MaskExtractor::ContentAware(params) => extract_content_aware(patch, params),
        }
    }
}

/// Rasterize the largest external contour of a binary region, filled.
///
/// Ties on area keep the contour found first in raster order. A region with
/// no foreground yields an empty mask.
pub(crate) fn fill_largest_contour(region: &Image<u8, 1>) -> Result<Mask, PipelineError> {
    let contours = find_external_contours(region, 0);

    let largest = contours.iter().fold(None::<&Contour>, |best, c| match best {
        Some(b) if b.area() >= c.area() => Some(b),
        _ => Some(c),
    });

    let mut mask = Image::from_size_val(region.size(), 0)?;
    match largest {
        Some(contour) => {
            draw_contour(&mut mask, &contour.points, [255], true);
            log::debug!(
                "mask from {} external contours, largest area {}",
                contours.len(),
                contour.area()
            );
        }
        None => log::warn!("no contour found, the patch is fully masked out"),
    }

    Ok(Mask(mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Result<Image<u8, 1>, PipelineError> {
        let mut region = Image::from_size_val([12, 8].into(), 0)?;
        // small 2x2 block and a larger 4x3 block
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            region.set_pixel(x, y, 0, 255)?;
        }
        for y in 3..6 {
            for x in 6..10 {
                region.set_pixel(x, y, 0, 255)?;
            }
        }
        Ok(region)
    }

    #[test]
    fn largest_contour_wins() -> Result<(), PipelineError> {
        let mask = fill_largest_contour(&blocks()?)?;
        assert_eq!(mask.count(), 12);
        assert_eq!(mask.image().get_pixel(1, 1, 0)?, &0);
        assert_eq!(mask.image().get_pixel(6, 3, 0)?, &255);
        assert_eq!(mask.image().get_pixel(9, 5, 0)?, &255);
        Ok(())
    }

    #[test]
    fn hole_is_filled() -> Result<(), PipelineError> {
        let mut region = Image::from_size_val([7, 7].into(), 0)?;
        for y in 1..6 {
            for x in 1..6 {
                if !(x == 3 && y == 3) {
                    region.set_pixel(x, y, 0, 255)?;
                }
            }
        }
        let mask = fill_largest_contour(&region)?;
        assert_eq!(mask.count(), 25);
        Ok(())
    }

    #[test]
    fn no_foreground_gives_empty_mask() -> Result<(), PipelineError> {
        let region = Image::from_size_val([5, 4].into(), 0)?;
        let mask = fill_largest_contour(&region)?;
        assert_eq!(mask.count(), 0);
        assert_eq!(mask.size(), region.size());
        Ok(())
    }

    #[test]
    fn mask_normalization_and_coverage() -> Result<(), PipelineError> {
        let image = Image::new([4, 1].into(), vec![0, 1, 128, 255])?;
        let mask = Mask::from_image(image);
        assert_eq!(mask.image().as_slice(), &[0, 255, 255, 255]);
        approx::assert_relative_eq!(mask.coverage(), 0.75);
        assert_eq!(Mask::full([3, 3].into())?.count(), 9);
        assert_eq!(Mask::empty([3, 3].into())?.coverage(), 0.0);
        Ok(())
    }

    #[test]
    fn strategies_share_one_contract() -> Result<(), PipelineError> {
        let patch = Raster::from(Image::<u8, 3>::from_size_val([8, 8].into(), 0)?);
        for extractor in [MaskExtractor::fast(), MaskExtractor::content_aware()] {
            let mask = extractor.extract(&patch)?;
            assert_eq!(mask.size(), patch.size());
        }
        Ok(())
    }
}
