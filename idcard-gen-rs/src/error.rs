//! Error types for the card pipeline.
//!
//! The taxonomy separates what degrades from what aborts:
//! - [`ImageLoadError`] is recovered locally by the layout engine; a failed
//!   logo or photo load leaves a placeholder, never a failed render.
//! - [`RenderError`] is fatal for the render call that raised it (the raster
//!   surface itself could not be created).
//! - [`ExportError`] is fatal for the export operation; no partial file is
//!   left behind.

use idcard_gen_raster::RasterError;
use thiserror::Error;

/// A single image source failed to load or decode.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// Decoding did not complete within the bounded wait.
    #[error("image load timed out after {timeout_ms} ms: {source_uri}")]
    Timeout { source_uri: String, timeout_ms: u64 },

    /// The remote fetch failed (network error or non-success status).
    #[error("failed to fetch image: {0}")]
    Fetch(String),

    /// The bytes could not be decoded into a bitmap.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The source URI scheme is not supported.
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
}

impl ImageLoadError {
    /// Whether this failure was the bounded-wait deadline elapsing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ImageLoadError::Timeout { .. })
    }
}

/// A render call failed as a whole.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster surface could not be created or encoded.
    #[error("card surface error: {0}")]
    Canvas(#[from] RasterError),

    /// An injected scannable-code collaborator failed.
    #[error("scannable code rendering failed: {0}")]
    ScannableCode(String),
}

/// An export operation failed as a whole.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A finished raster could not be encoded for output.
    #[error("failed to encode card raster: {0}")]
    Serialize(String),

    /// The PDF document could not be assembled.
    #[error("failed to assemble PDF document: {0}")]
    Pdf(String),

    /// The output file could not be written.
    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}
