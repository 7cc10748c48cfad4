/// Result alias used across the crate.
pub type TryOnResult<T> = Result<T, TryOnError>;

/// Error type shared by every stage of the try-on pipeline.
///
/// Missing input (no face in a frame, no mask yet) is never an error; those paths degrade to the
/// base composite. Errors are reserved for invalid configuration, asset failures the caller asked
/// about directly, unmet capture preconditions and device denial.
#[derive(thiserror::Error, Debug)]
pub enum TryOnError {
    /// Invalid configuration or malformed input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset listing or decode failed.
    #[error("asset error: {0}")]
    Asset(String),

    /// A capture or auto-sequence precondition was not met.
    #[error("capture error: {0}")]
    Capture(String),

    /// Camera or other device access was refused. Terminal for the session.
    #[error("device error: {0}")]
    Device(String),

    /// Internal pixel/geometry evaluation failure.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TryOnError {
    /// Construct a [`TryOnError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Construct a [`TryOnError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Construct a [`TryOnError::Capture`].
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Construct a [`TryOnError::Device`].
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Construct a [`TryOnError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
