#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![deny(missing_docs)]

#[doc(inline)]
pub use patchwork_accel as accel;

#[doc(inline)]
pub use patchwork_image as image;

#[doc(inline)]
pub use patchwork_imgproc as imgproc;

/// Compositing of a masked patch onto a background.
pub mod compositor;

/// Parameters for the pipeline and the mask extractors.
pub mod config;

mod error;
pub use error::PipelineError;

/// Recovery of a patch's silhouette from its fill pixels.
pub mod mask;

mod pipeline;
pub use pipeline::{Pipeline, Placement};

/// Geometric transforms on runtime-channel rasters.
pub mod transform;

pub use patchwork_image::Raster;
