#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// masked compositing of one image onto another.
pub mod composite;

/// contour extraction module.
pub mod contours;

/// image basic operations module.
pub mod core;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// edge detection module.
pub mod edges;

/// image filtering module.
pub mod filter;

/// image flipping module.
pub mod flip;

/// compute image histogram module.
pub mod histogram;

/// utilities for interpolation.
pub mod interpolation;

/// morphological operations module.
pub mod morphology;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// operations to threshold images.
pub mod threshold;

/// image geometric transformations module.
pub mod warp;
