//! Color conversions between the BGR, BGRA, grayscale and HSV layouts.
//!
//! Three-channel images are interpreted as BGR and four-channel images as BGRA.

mod alpha;
mod gray;
mod hsv;

pub use alpha::{bgr_from_bgra, bgr_from_gray, bgra_from_bgr, bgra_from_gray};
pub use gray::{gray_from_bgr_u8, gray_from_bgra_u8};
pub use hsv::hsv_from_bgr_u8;
