/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images were expected to share a size.
    #[error("Invalid image size ({0}x{1}) does not match ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for image {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when a kernel size is not supported.
    #[error("Invalid kernel size: {0}")]
    InvalidKernelSize(usize),

    /// Error when the channel count is outside of the supported layouts.
    #[error("Unsupported channel layout: {0} channels (expected 1, 3 or 4)")]
    UnsupportedChannelLayout(usize),

    /// Error when `width * height * channels` does not fit in a buffer.
    #[error("Image size {0}x{1} with {2} channels is too large")]
    ImageSizeOverflow(usize, usize, usize),

    /// Error when an operation would produce or requires a non-empty image.
    #[error("Image has zero width or height")]
    EmptyImage,
}
