//! Card raster surface built on tiny-skia and cosmic-text.
//!
//! This crate provides the fixed-resolution pixel surface that card faces are
//! painted onto, without a browser or JavaScript runtime. It uses:
//! - `tiny-skia` for 2D rasterization
//! - `cosmic-text` for text shaping, measurement, and glyph outlines
//! - `fontdb` for font database management
//!
//! # Example
//!
//! ```rust,ignore
//! use idcard_gen_raster::{Surface, TextStyle};
//!
//! let mut surface = Surface::new(1080, 1528)?;
//! surface.fill(idcard_gen_raster::parse_css_color("#E9EAEC")?);
//! surface.fill_rect(0.0, 0.0, 1080.0, 96.0, header_color);
//! let jpeg = surface.to_jpeg(95)?;
//! ```

mod bitmap;
mod error;
mod font_config;
mod surface;
mod text;

pub use bitmap::{contain_rect, cover_crop, Bitmap, CropRegion};
pub use error::{RasterError, RasterResult};
pub use font_config::{font_config_to_fontdb, CustomFont, FontConfig, ResolvedFontConfig};
pub use surface::{parse_css_color, Surface};
pub use text::{FontFamily, FontWeight, TextAlign, TextStyle};

// The color type used throughout the drawing API.
pub use tiny_skia::Color;
