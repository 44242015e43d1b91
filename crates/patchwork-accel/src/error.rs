/// An error type for the accelerator boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AcceleratorError {
    /// The backend refused to create a handle.
    #[error("The accelerator failed to create a handle for a {0}x{1}x{2} image")]
    CreateFailed(usize, usize, usize),

    /// A backend operation returned a non-zero status code.
    #[error("Accelerator operation `{op}` failed with status {code}")]
    Status {
        /// Name of the failing operation.
        op: &'static str,
        /// Raw status code returned by the backend.
        code: i32,
    },

    /// The backend returned an image that cannot be represented.
    #[error("The accelerator returned an invalid image: {0}")]
    InvalidOutput(String),
}
