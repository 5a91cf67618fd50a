/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every failure is local to one request: callers report it once and the user re-triggers the
/// action. Nothing here is retried.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or input shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// The external generation process failed, timed out, or produced too much output.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Structural recovery or parsing of a generated snippet failed.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// A synthesized component failed while being invoked for a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Bundling or rendering of the export project failed.
    #[error("render failed: {0}")]
    Render(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`ReelError::Generation`].
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build [`ReelError::Synthesis`].
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build [`ReelError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
