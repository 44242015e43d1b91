#![deny(missing_docs)]
//! Boundary to an external acceleration module.
//!
//! The module is reached through four operations on an opaque handle:
//! create, adjust, fetch and destroy. [`AcceleratorHandle`] owns a created
//! handle and releases it exactly once when dropped.

mod error;
mod ffi;
mod handle;

pub use error::AcceleratorError;
pub use ffi::{
    AdjustBrightnessContrastFn, CreateFn, DestroyFn, FetchFn, ForeignAccelerator,
    ForeignAcceleratorTable, RawHandle,
};
pub use handle::AcceleratorHandle;

use patchwork_image::Raster;

/// An image processing backend living outside of this crate.
///
/// Implementations translate each call into the backend's calling
/// convention. Status codes are returned raw; [`AcceleratorHandle`] turns
/// non-zero codes into [`AcceleratorError::Status`].
pub trait Accelerator {
    /// Opaque per-image state owned by the backend.
    type Handle;

    /// Upload an interleaved 8-bit buffer and create a handle for it.
    ///
    /// The backend takes its own copy of `buffer`.
    fn create(
        &self,
        buffer: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        use_accelerator: bool,
    ) -> Result<Self::Handle, AcceleratorError>;

    /// Release a handle. Called exactly once per created handle.
    fn destroy(&self, handle: Self::Handle);

    /// Adjust brightness and contrast in place; returns the backend status code.
    fn adjust_brightness_contrast(&self, handle: &Self::Handle, brightness: i32, contrast: f64)
        -> i32;

    /// Read back the processed image.
    fn fetch(&self, handle: &Self::Handle) -> Result<Raster, AcceleratorError>;
}
