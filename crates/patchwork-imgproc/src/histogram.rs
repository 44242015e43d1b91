use patchwork_image::{Image, ImageError};
use rayon::prelude::*;

fn bin_lut(num_bins: usize, range: usize) -> [usize; 256] {
    let mut lut = [usize::MAX; 256];
    for (i, bin) in lut.iter_mut().enumerate().take(range) {
        *bin = i * num_bins / range;
    }
    lut
}

fn merge_counts(mut a: Vec<usize>, b: Vec<usize>) -> Vec<usize> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

/// A two-dimensional histogram over two channels of an 8-bit image.
///
/// Bins are stored row-major: `counts[i * bins_b + j]` counts the pixels whose
/// first channel falls in bin `i` and second channel in bin `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2d {
    counts: Vec<usize>,
    bins: [usize; 2],
    ranges: [usize; 2],
}

impl Histogram2d {
    /// Number of bins along each axis.
    pub fn bins(&self) -> [usize; 2] {
        self.bins
    }

    /// The flat, row-major bin counts.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of pixels accumulated.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Index `(i, j)` of the most populated bin.
    ///
    /// Ties are resolved in favor of the lowest flat index. Returns `None`
    /// when the histogram is empty.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, c)) if c >= count => {}
                _ => best = Some((idx, count)),
            }
        }
        best.map(|(idx, _)| (idx / self.bins[1], idx % self.bins[1]))
    }

    /// Value at the center of bin `(i, j)` in channel units.
    pub fn bin_center(&self, bin: (usize, usize)) -> (f32, f32) {
        let width_a = self.ranges[0] as f32 / self.bins[0] as f32;
        let width_b = self.ranges[1] as f32 / self.bins[1] as f32;
        (
            (bin.0 as f32 + 0.5) * width_a,
            (bin.1 as f32 + 0.5) * width_b,
        )
    }
}

/// Compute a 2-D histogram over channels `channels[0]` and `channels[1]`.
///
/// Values at or above the channel range are ignored.
///
/// # Arguments
///
/// * `src` - The input 8-bit image.
/// * `channels` - The two channel indices to histogram.
/// * `bins` - The number of bins for each channel.
/// * `ranges` - The exclusive upper bound of each channel, e.g. 180 for hue.
/// * `mask` - Optional mask; only pixels with a non-zero mask value are counted.
///
/// # Errors
///
/// Returns an error if the bin counts or ranges are invalid, a channel index is
/// out of bounds, or the mask size differs from the image size.
///
/// # Example
///
/// ```
/// use patchwork_image::{Image, ImageSize};
/// use patchwork_imgproc::histogram::compute_histogram_2d;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![10, 200, 0, 10, 210, 0, 170, 20, 0],
/// ).unwrap();
///
/// let hist = compute_histogram_2d(&image, [0, 1], [18, 8], [180, 256], None).unwrap();
/// assert_eq!(hist.argmax(), Some((1, 6)));
/// assert_eq!(hist.total(), 3);
/// ```
pub fn compute_histogram_2d<const C: usize>(
    src: &Image<u8, C>,
    channels: [usize; 2],
    bins: [usize; 2],
    ranges: [usize; 2],
    mask: Option<&Image<u8, 1>>,
) -> Result<Histogram2d, ImageError> {
    for (&b, &r) in bins.iter().zip(ranges.iter()) {
        if b == 0 || r == 0 || r > 256 || b > r {
            return Err(ImageError::InvalidHistogramBins(b));
        }
    }

    for &ch in channels.iter() {
        if ch >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, C));
        }
    }

    if let Some(mask) = mask {
        if mask.size() != src.size() {
            return Err(ImageError::InvalidImageSize(
                src.cols(),
                src.rows(),
                mask.cols(),
                mask.rows(),
            ));
        }
    }

    let lut_a = bin_lut(bins[0], ranges[0]);
    let lut_b = bin_lut(bins[1], ranges[1]);
    let num_bins = bins[0] * bins[1];

    let accumulate = |mut local: Vec<usize>, pixel: &[u8]| {
        let a = lut_a[pixel[channels[0]] as usize];
        let b = lut_b[pixel[channels[1]] as usize];
        if a != usize::MAX && b != usize::MAX {
            local[a * bins[1] + b] += 1;
        }
        local
    };

    let counts = match mask {
        Some(mask) => src
            .as_slice()
            .par_chunks_exact(C)
            .zip(mask.as_slice().par_iter())
            .fold(
                || vec![0usize; num_bins],
                |local, (pixel, &m)| {
                    if m == 0 {
                        local
                    } else {
                        accumulate(local, pixel)
                    }
                },
            )
            .reduce(|| vec![0usize; num_bins], merge_counts),
        None => src
            .as_slice()
            .par_chunks_exact(C)
            .fold(|| vec![0usize; num_bins], accumulate)
            .reduce(|| vec![0usize; num_bins], merge_counts),
    };

    Ok(Histogram2d {
        counts,
        bins,
        ranges,
    })
}
