/// Convenience result type used across ogcard.
pub type OgResult<T> = Result<T, OgError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Malformed request parameters never surface here: the interpreter defaults them. Logo failures
/// are recoverable and are logged by the engine instead of being returned.
#[derive(thiserror::Error, Debug)]
pub enum OgError {
    /// Invalid caller-provided data that cannot be defaulted (e.g. a zero-sized canvas).
    #[error("validation error: {0}")]
    Validation(String),

    /// The flexbox solver or text measurement failed.
    #[error("layout error: {0}")]
    Layout(String),

    /// The raster backend could not produce the card.
    #[error("render error: {0}")]
    Render(String),

    /// The rendered pixels could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// A remote or inline asset could not be fetched or decoded.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OgError {
    /// Build an [`OgError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OgError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build an [`OgError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`OgError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`OgError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}

impl From<taffy::TaffyError> for OgError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::layout(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
