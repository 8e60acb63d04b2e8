//! Library for rendering servidor ID cards and exporting them as documents.
//!
//! The pipeline takes an immutable [`CardRecord`](card::CardRecord), paints
//! each card face onto a fixed-resolution raster surface, and packages the
//! results as a multi-page A4 PDF or as standalone JPEG files.
//!
//! # Example
//!
//! ```rust,ignore
//! use idcard_gen_rs::{CardLayoutEngine, CardRecord, DocumentExporter, PdfMode};
//!
//! let card: CardRecord = serde_json::from_str(&json)?;
//! let exporter = DocumentExporter::new(CardLayoutEngine::new());
//! exporter.export_to_pdf(&card, PdfMode::Full, Path::new("PP_ID")).await?;
//! ```

pub mod card;
pub mod error;
pub mod export;
pub mod image_loading;
pub mod layout;
pub mod theme;

pub use card::{CardRecord, CardSide, Category, Status};
pub use idcard_gen_raster::{Bitmap, FontConfig};
pub use error::{ExportError, ImageLoadError, RenderError};
pub use export::{DocumentExporter, PdfMode};
pub use image_loading::ImageLoader;
pub use layout::{CardLayoutEngine, RenderedCard, CARD_HEIGHT, CARD_WIDTH};
pub use theme::{ThemeDescriptor, VisualTheme};

#[macro_use]
extern crate lazy_static;
