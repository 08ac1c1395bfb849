/// Convenience result type used across textoverlay.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Top-level error taxonomy used by overlay APIs.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// A hex color string had an unsupported length or non-hex digits.
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    /// Invalid user-provided parameters or image data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable font could be resolved or loaded.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while rasterizing or compositing text.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::InvalidColorFormat`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColorFormat(msg.into())
    }

    /// Build an [`OverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverlayError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build an [`OverlayError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
