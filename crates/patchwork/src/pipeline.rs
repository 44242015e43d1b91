use patchwork_accel::{Accelerator, AcceleratorHandle};
use patchwork_image::Raster;

use crate::compositor::overlay;
use crate::config::PipelineConfig;
use crate::mask::{ExtractMask, MaskExtractor};
use crate::transform;
use crate::PipelineError;

/// Offset of the patch origin on the canvas, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Column of the canvas where the patch's left edge lands.
    pub x: i64,
    /// Row of the canvas where the patch's top edge lands.
    pub y: i64,
}

/// A background canvas and a foreground patch going through a chain of transforms.
///
/// Every operation mutates the pipeline in place and returns it again, so
/// calls can be chained with `?`. A failed operation leaves the pipeline in
/// the state it had before the call. The pipeline is a single-owner value:
/// share it across threads only behind your own synchronization.
///
/// # Example
///
/// ```
/// use patchwork::mask::MaskExtractor;
/// use patchwork::{Pipeline, PipelineError, Raster};
///
/// # fn main() -> Result<(), PipelineError> {
/// let background = Raster::from_raw(200, 200, 3, vec![40; 200 * 200 * 3])?;
/// let foreground = Raster::from_raw(50, 50, 3, vec![220; 50 * 50 * 3])?;
///
/// let mut pipeline = Pipeline::new();
/// pipeline
///     .load_background(background)?
///     .load_foreground(foreground)?
///     .scale(2.0, 2.0)?
///     .rotate(45.0)?
///     .translate(50, 50)?;
///
/// let composed = pipeline.materialize(&MaskExtractor::fast())?;
/// assert_eq!((composed.width(), composed.height()), (200, 200));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    canvas: Option<Raster>,
    patch: Option<Raster>,
    placement: Placement,
    rotation_center: Option<(f32, f32)>,
    cache: Option<(MaskExtractor, Raster)>,
}

impl Pipeline {
    /// Create an empty pipeline with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pipeline with the given configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// The configuration of the pipeline.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The loaded background, if any.
    pub fn canvas(&self) -> Option<&Raster> {
        self.canvas.as_ref()
    }

    /// The current foreground patch, if any.
    pub fn patch(&self) -> Option<&Raster> {
        self.patch.as_ref()
    }

    /// Where the patch is placed on the canvas.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The pivot the next rotation will use, in patch coordinates.
    ///
    /// Unless set explicitly this is the geometric center of the current patch.
    pub fn rotation_center(&self) -> Option<(f32, f32)> {
        let patch = self.patch.as_ref()?;
        Some(
            self.rotation_center
                .unwrap_or_else(|| transform::default_rotation_center(patch.size())),
        )
    }

    fn require_canvas(&self) -> Result<&Raster, PipelineError> {
        self.canvas
            .as_ref()
            .ok_or(PipelineError::UninitializedState("background"))
    }

    fn require_patch(&self) -> Result<&Raster, PipelineError> {
        self.patch
            .as_ref()
            .ok_or(PipelineError::UninitializedState("foreground"))
    }

    /// Pull the placement back inside the canvas after a size change.
    fn clamp_placement(&mut self) {
        let (Some(canvas), Some(patch)) = (&self.canvas, &self.patch) else {
            return;
        };
        let Placement { x, y } = self.placement;
        let (x, y) = transform::clamp_placement(x, y, canvas.size(), patch.size());
        if (x, y) != (self.placement.x, self.placement.y) {
            log::debug!(
                "placement clamped: ({}, {}) -> ({x}, {y})",
                self.placement.x,
                self.placement.y
            );
            self.placement = Placement { x, y };
        }
    }

    fn commit_patch(&mut self, op: &str, patch: Raster) -> &mut Self {
        if let Some(old) = &self.patch {
            log::debug!(
                "{op}: {}x{}x{} -> {}x{}x{}",
                old.width(),
                old.height(),
                old.num_channels(),
                patch.width(),
                patch.height(),
                patch.num_channels()
            );
        }
        self.patch = Some(patch);
        self.clamp_placement();
        self.cache = None;
        self
    }

    /// Load the background canvas.
    ///
    /// # Errors
    ///
    /// The canvas must have three (BGR) or four (BGRA) channels.
    pub fn load_background(&mut self, canvas: Raster) -> Result<&mut Self, PipelineError> {
        if !matches!(canvas.num_channels(), 3 | 4) {
            return Err(PipelineError::UnsupportedChannelLayout(
                canvas.num_channels(),
            ));
        }

        log::debug!("loaded background {}", canvas.size());
        self.canvas = Some(canvas);
        self.clamp_placement();
        self.cache = None;
        Ok(self)
    }

    /// Load the foreground patch, resetting placement and rotation center.
    pub fn load_foreground(&mut self, patch: Raster) -> Result<&mut Self, PipelineError> {
        if patch.size().is_empty() {
            return Err(PipelineError::InvalidParameter(format!(
                "foreground must not be empty, got {}",
                patch.size()
            )));
        }

        log::debug!("loaded foreground {}", patch.size());
        self.patch = Some(patch);
        self.placement = Placement::default();
        self.rotation_center = None;
        self.cache = None;
        Ok(self)
    }

    /// Move the patch by `(dx, dy)`, keeping it inside the canvas.
    ///
    /// The placement is clamped to `[0, W − w] x [0, H − h]`, and to 0 on an
    /// axis where the patch is larger than the canvas.
    pub fn translate(&mut self, dx: i64, dy: i64) -> Result<&mut Self, PipelineError> {
        let canvas = self.require_canvas()?.size();
        let patch = self.require_patch()?.size();

        let (x, y) = transform::clamp_placement(
            self.placement.x.saturating_add(dx),
            self.placement.y.saturating_add(dy),
            canvas,
            patch,
        );

        log::debug!(
            "translate by ({dx}, {dy}): ({}, {}) -> ({x}, {y})",
            self.placement.x,
            self.placement.y
        );
        self.placement = Placement { x, y };
        self.cache = None;
        Ok(self)
    }

    /// Resize the patch by `(sx, sy)`.
    pub fn scale(&mut self, sx: f64, sy: f64) -> Result<&mut Self, PipelineError> {
        let scaled = transform::scale(self.require_patch()?, sx, sy, self.config.interpolation)?;
        Ok(self.commit_patch("scale", scaled))
    }

    /// Set the pivot of subsequent rotations, in patch coordinates.
    pub fn set_rotation_center(&mut self, cx: f32, cy: f32) -> Result<&mut Self, PipelineError> {
        self.require_patch()?;
        if !(cx.is_finite() && cy.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "rotation center must be finite, got ({cx}, {cy})"
            )));
        }
        self.rotation_center = Some((cx, cy));
        Ok(self)
    }

    /// Go back to rotating about the geometric center of the patch.
    pub fn reset_rotation_center(&mut self) -> &mut Self {
        self.rotation_center = None;
        self
    }

    /// Rotate the patch by `angle` degrees, counter-clockwise, growing it to fit.
    ///
    /// The whole rotated footprint is kept, see [`transform::rotate`]. With a
    /// pivot other than the geometric center the placement moves by
    /// [`transform::pivot_shift`], so the content turns about that pivot.
    pub fn rotate(&mut self, angle: f32) -> Result<&mut Self, PipelineError> {
        let patch = self.require_patch()?;
        let center = self
            .rotation_center
            .unwrap_or_else(|| transform::default_rotation_center(patch.size()));
        if !(center.0.is_finite() && center.1.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "rotation center must be finite, got {center:?}"
            )));
        }

        let rotated = transform::rotate(patch, angle, self.config.interpolation)?;
        let (dx, dy) = transform::pivot_shift(patch.size(), angle, center);
        self.placement = Placement {
            x: self.placement.x.saturating_add(dx.round() as i64),
            y: self.placement.y.saturating_add(dy.round() as i64),
        };
        Ok(self.commit_patch("rotate", rotated))
    }

    /// Crop the patch to a rectangle, intersected with the patch bounds.
    pub fn crop_rectangle(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Result<&mut Self, PipelineError> {
        let cropped = transform::crop(self.require_patch()?, x, y, width, height)?;
        Ok(self.commit_patch("crop", cropped))
    }

    /// Mirror the patch horizontally and/or vertically.
    pub fn flip(&mut self, horizontal: bool, vertical: bool) -> Result<&mut Self, PipelineError> {
        let flipped = transform::flip(self.require_patch()?, horizontal, vertical)?;
        Ok(self.commit_patch("flip", flipped))
    }

    /// Adjust brightness and contrast of the patch on an external accelerator.
    ///
    /// The accelerator handle is released before returning, on success and
    /// on failure alike.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ForeignBoundaryFailure`] when the accelerator
    /// fails; the patch is then left unchanged.
    pub fn adjust_brightness_contrast<A: Accelerator>(
        &mut self,
        accelerator: &A,
        brightness: i32,
        contrast: f64,
        use_accelerator: bool,
    ) -> Result<&mut Self, PipelineError> {
        let adjusted = {
            let mut handle =
                AcceleratorHandle::create(accelerator, self.require_patch()?, use_accelerator)?;
            handle.adjust_brightness_contrast(brightness, contrast)?;
            handle.fetch()?
        };
        Ok(self.commit_patch("adjust_brightness_contrast", adjusted))
    }

    /// Compose the patch onto the canvas using `extractor` for the mask.
    ///
    /// Without a foreground the canvas is returned as is. The composite is
    /// cached until the next change of state or a different extractor.
    pub fn materialize(&mut self, extractor: &MaskExtractor) -> Result<&Raster, PipelineError> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or(PipelineError::UninitializedState("background"))?;
        let Some(patch) = self.patch.as_ref() else {
            return Ok(canvas);
        };

        let entry = match self.cache.take() {
            Some((cached, composed)) if cached == *extractor => {
                log::debug!("materialize: cache hit");
                (cached, composed)
            }
            _ => {
                log::debug!("materialize: composing with {extractor:?}");
                let mask = extractor.extract(patch)?;
                let composed = overlay(
                    canvas,
                    patch,
                    &mask,
                    self.placement.x,
                    self.placement.y,
                )?;
                (*extractor, composed)
            }
        };

        let (_, composed) = self.cache.insert(entry);
        Ok(composed)
    }
}
