/// Convenience result type used across maskwright.
pub type MaskResult<T> = Result<T, MaskError>;

/// Top-level error taxonomy used by the mask pipeline.
#[derive(thiserror::Error, Debug)]
pub enum MaskError {
    /// Invalid user input: prompt, upload type or size, parameter ranges, buffer sizes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterization failed (surface too large, context unavailable).
    #[error("raster error: {0}")]
    Raster(String),

    /// Image encoding (PNG mask, JPEG downscale) failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The synthesized mask has no transparent pixels, so the edit would be a no-op.
    #[error("degenerate mask: no pixels are marked for editing")]
    DegenerateMask,

    /// The external edit backend reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MaskError {
    /// Build a [`MaskError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MaskError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MaskError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`MaskError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MaskError::Backend`] value.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
