use patchwork_imgproc::interpolation::InterpolationMode;

use crate::PipelineError;

/// Settings shared by the geometric transforms of a [`crate::Pipeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Resampling used by Scale and Rotate.
    pub interpolation: InterpolationMode,
}

/// Parameters of the fast, threshold based mask extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FastMaskParams {
    /// Pixels strictly above this intensity (or alpha) are foreground.
    pub threshold: u8,
}

impl Default for FastMaskParams {
    fn default() -> Self {
        Self { threshold: 1 }
    }
}

/// Parameters of the content-aware mask extractor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentAwareParams {
    /// Histogram bins over hue in `[0, 180)`.
    pub hue_bins: usize,
    /// Histogram bins over saturation in `[0, 256)`.
    pub sat_bins: usize,
    /// Half width of the background hue band.
    pub hue_tolerance: u8,
    /// Saturation slack below the background saturation.
    pub sat_tolerance: u8,
    /// Lower hysteresis threshold of the edge detector.
    pub canny_low: f32,
    /// Upper hysteresis threshold of the edge detector.
    pub canny_high: f32,
    /// Dilation passes over the edge map.
    pub dilate_iterations: usize,
    /// Erosion passes after dilation.
    pub erode_iterations: usize,
    /// Side of the square structuring element, odd.
    pub kernel_size: usize,
}

impl Default for ContentAwareParams {
    fn default() -> Self {
        Self {
            hue_bins: 32,
            sat_bins: 32,
            hue_tolerance: 10,
            sat_tolerance: 30,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_iterations: 2,
            erode_iterations: 1,
            kernel_size: 3,
        }
    }
}

impl ContentAwareParams {
    /// Check that the parameters describe a usable extractor.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.hue_bins == 0 || self.hue_bins > 180 {
            return Err(PipelineError::InvalidParameter(format!(
                "hue_bins must be in 1..=180, got {}",
                self.hue_bins
            )));
        }
        if self.sat_bins == 0 || self.sat_bins > 256 {
            return Err(PipelineError::InvalidParameter(format!(
                "sat_bins must be in 1..=256, got {}",
                self.sat_bins
            )));
        }
        if !(self.canny_low >= 0.0 && self.canny_high >= self.canny_low) {
            return Err(PipelineError::InvalidParameter(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} and {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(PipelineError::InvalidParameter(format!(
                "kernel_size must be odd, got {}",
                self.kernel_size
            )));
        }
        Ok(())
    }
}
