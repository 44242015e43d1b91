#![deny(missing_docs)]
//! Image types and the opaque raster value exchanged with the compositing pipeline.

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// runtime-channel raster value used at the pipeline boundary.
pub mod raster;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
pub use crate::raster::Raster;
