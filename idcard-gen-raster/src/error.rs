//! Error types for idcard-gen-raster.

use thiserror::Error;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors that can occur while drawing or encoding a card surface.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Invalid surface dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse a CSS color value.
    #[error("Failed to parse color: {0}")]
    ColorParse(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// JPEG encoding error.
    #[error("JPEG encoding error: {0}")]
    JpegError(String),

    /// Failed to decode image bytes into a bitmap.
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),
}

impl From<png::EncodingError> for RasterError {
    fn from(err: png::EncodingError) -> Self {
        RasterError::PngError(err.to_string())
    }
}
