use patchwork_accel::AcceleratorError;
use patchwork_image::ImageError;

/// An error type for the compositing pipeline.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PipelineError {
    /// A parameter is outside of its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation was called before the state it works on was loaded.
    #[error("No {0} has been loaded")]
    UninitializedState(&'static str),

    /// The external accelerator reported a failure.
    #[error("Accelerator failure: {0}")]
    ForeignBoundaryFailure(#[from] AcceleratorError),

    /// The raster has a channel count outside the supported layouts.
    #[error("Unsupported channel layout with {0} channels")]
    UnsupportedChannelLayout(usize),

    /// Error from the underlying raster operations.
    #[error(transparent)]
    Image(ImageError),
}

impl From<ImageError> for PipelineError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::UnsupportedChannelLayout(n) => PipelineError::UnsupportedChannelLayout(n),
            e => PipelineError::Image(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineError;
    use patchwork_accel::AcceleratorError;
    use patchwork_image::ImageError;

    #[test]
    fn image_errors_are_lifted() {
        assert_eq!(
            PipelineError::from(ImageError::UnsupportedChannelLayout(2)),
            PipelineError::UnsupportedChannelLayout(2)
        );
        assert_eq!(
            PipelineError::from(ImageError::EmptyImage),
            PipelineError::Image(ImageError::EmptyImage)
        );
    }

    #[test]
    fn accelerator_errors_are_wrapped() {
        let err: PipelineError = AcceleratorError::Status {
            op: "adjust_brightness_contrast",
            code: 3,
        }
        .into();
        assert!(matches!(err, PipelineError::ForeignBoundaryFailure(_)));
    }
}
