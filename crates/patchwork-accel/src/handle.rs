use patchwork_image::Raster;

use crate::{Accelerator, AcceleratorError};

/// A created accelerator handle that is destroyed when dropped.
///
/// Every exit path, including early returns through `?` and panics, releases
/// the handle exactly once.
///
/// # Example
///
/// ```no_run
/// use patchwork_accel::{AcceleratorHandle, ForeignAccelerator};
/// use patchwork_image::Raster;
///
/// fn brighten(
///     accel: &ForeignAccelerator,
///     raster: &Raster,
/// ) -> Result<Raster, patchwork_accel::AcceleratorError> {
///     let mut handle = AcceleratorHandle::create(accel, raster, true)?;
///     handle.adjust_brightness_contrast(20, 1.2)?;
///     handle.fetch()
/// }
/// ```
pub struct AcceleratorHandle<'a, A: Accelerator> {
    accelerator: &'a A,
    handle: Option<A::Handle>,
}

impl<'a, A: Accelerator> AcceleratorHandle<'a, A> {
    /// Upload `raster` to the accelerator.
    pub fn create(
        accelerator: &'a A,
        raster: &Raster,
        use_accelerator: bool,
    ) -> Result<Self, AcceleratorError> {
        let handle = accelerator.create(
            raster.as_bytes(),
            raster.width(),
            raster.height(),
            raster.num_channels(),
            use_accelerator,
        )?;
        log::debug!(
            "created accelerator handle for {}x{}x{}",
            raster.width(),
            raster.height(),
            raster.num_channels()
        );
        Ok(Self {
            accelerator,
            handle: Some(handle),
        })
    }

    fn handle(&self) -> Result<&A::Handle, AcceleratorError> {
        self.handle
            .as_ref()
            .ok_or_else(|| AcceleratorError::InvalidOutput("handle already released".into()))
    }

    /// Adjust brightness and contrast of the uploaded image.
    ///
    /// # Errors
    ///
    /// Returns [`AcceleratorError::Status`] when the backend reports a non-zero status.
    pub fn adjust_brightness_contrast(
        &mut self,
        brightness: i32,
        contrast: f64,
    ) -> Result<(), AcceleratorError> {
        let code =
            self.accelerator
                .adjust_brightness_contrast(self.handle()?, brightness, contrast);
        if code != 0 {
            log::warn!("adjust_brightness_contrast returned status {code}");
            return Err(AcceleratorError::Status {
                op: "adjust_brightness_contrast",
                code,
            });
        }
        Ok(())
    }

    /// Read back the processed image.
    ///
    /// # Errors
    ///
    /// An empty image from the backend is [`AcceleratorError::InvalidOutput`].
    pub fn fetch(&self) -> Result<Raster, AcceleratorError> {
        let raster = self.accelerator.fetch(self.handle()?)?;
        if raster.size().is_empty() {
            return Err(AcceleratorError::InvalidOutput(format!(
                "accelerator returned an empty image {}",
                raster.size()
            )));
        }
        Ok(raster)
    }
}

impl<A: Accelerator> Drop for AcceleratorHandle<'_, A> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.accelerator.destroy(handle);
            log::debug!("released accelerator handle");
        }
    }
}
