//! The document exporter: renders both faces and packages the artifacts.

use crate::card::{CardRecord, CardSide};
use crate::error::ExportError;
use crate::layout::{CardLayoutEngine, RenderedCard};
use idcard_gen_pdf::{full_page_placement, side_by_side_placements, write_pdf, JpegImage, PlacedImage};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// JPEG quality used for both PDF embedding and standalone image export.
pub const JPEG_EXPORT_QUALITY: u8 = 95;

/// Pause between writing the two standalone images; FRENTE always lands
/// before VERSO.
const IMAGE_WRITE_DELAY: Duration = Duration::from_millis(250);

/// PDF page arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfMode {
    /// One card face per page, scaled to the full page box (2 pages).
    Full,
    /// Both faces side by side on a single page, aspect preserved.
    Clone,
}

/// Orchestrates rendering both card faces and packaging the results.
///
/// The two per-side renders are strictly sequential: the front face is
/// rendered and encoded before the back render begins. Nothing is cached
/// across calls; each export re-renders from the record it is given.
pub struct DocumentExporter {
    engine: CardLayoutEngine,
}

impl DocumentExporter {
    pub fn new(engine: CardLayoutEngine) -> Self {
        Self { engine }
    }

    /// The layout engine driving this exporter.
    pub fn engine(&self) -> &CardLayoutEngine {
        &self.engine
    }

    /// Render both faces and write `<basename>.pdf`.
    ///
    /// Per-image load failures inside the renders degrade to placeholders;
    /// only surface creation, encoding, or the final file write abort the
    /// export. The document is assembled fully in memory, so an abort leaves
    /// no partial file behind.
    pub async fn export_to_pdf(
        &self,
        card: &CardRecord,
        mode: PdfMode,
        basename: &Path,
    ) -> Result<PathBuf, ExportError> {
        let (front, front_jpeg) = self.render_jpeg(card, CardSide::Front).await?;
        let (back, back_jpeg) = self.render_jpeg(card, CardSide::Back).await?;

        let front_image = JpegImage {
            data: &front_jpeg,
            width_px: front.width(),
            height_px: front.height(),
        };
        let back_image = JpegImage {
            data: &back_jpeg,
            width_px: back.width(),
            height_px: back.height(),
        };

        let pages = match mode {
            PdfMode::Full => vec![
                vec![PlacedImage {
                    image: front_image,
                    placement: full_page_placement(),
                }],
                vec![PlacedImage {
                    image: back_image,
                    placement: full_page_placement(),
                }],
            ],
            PdfMode::Clone => {
                let [left, right] = side_by_side_placements(front.width(), front.height());
                vec![vec![
                    PlacedImage {
                        image: front_image,
                        placement: left,
                    },
                    PlacedImage {
                        image: back_image,
                        placement: right,
                    },
                ]]
            }
        };

        let bytes = write_pdf(&pages).map_err(|e| ExportError::Pdf(e.to_string()))?;

        let path = path_with_suffix(basename, "", "pdf");
        std::fs::write(&path, bytes)?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Render both faces and write `<basename>_FRENTE.jpg` then, after a short
    /// delay, `<basename>_VERSO.jpg`.
    pub async fn export_to_images(
        &self,
        card: &CardRecord,
        basename: &Path,
    ) -> Result<(PathBuf, PathBuf), ExportError> {
        let (_, front_jpeg) = self.render_jpeg(card, CardSide::Front).await?;
        let front_path = path_with_suffix(basename, CardSide::Front.file_suffix(), "jpg");
        std::fs::write(&front_path, front_jpeg)?;
        info!("wrote {}", front_path.display());

        tokio::time::sleep(IMAGE_WRITE_DELAY).await;

        let (_, back_jpeg) = self.render_jpeg(card, CardSide::Back).await?;
        let back_path = path_with_suffix(basename, CardSide::Back.file_suffix(), "jpg");
        std::fs::write(&back_path, back_jpeg)?;
        info!("wrote {}", back_path.display());

        Ok((front_path, back_path))
    }

    /// Render one side and encode it, completing the side fully before the
    /// caller moves on to the next.
    async fn render_jpeg(
        &self,
        card: &CardRecord,
        side: CardSide,
    ) -> Result<(RenderedCard, Vec<u8>), ExportError> {
        let rendered = self.engine.render(card, side).await?;
        let jpeg = rendered
            .to_jpeg(JPEG_EXPORT_QUALITY)
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
        Ok((rendered, jpeg))
    }
}

/// `base` + suffix + extension, preserving the base's directory.
fn path_with_suffix(base: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_suffix() {
        let base = Path::new("/tmp/out/PP_ID");
        assert_eq!(
            path_with_suffix(base, "_FRENTE", "jpg"),
            PathBuf::from("/tmp/out/PP_ID_FRENTE.jpg")
        );
        assert_eq!(
            path_with_suffix(base, "", "pdf"),
            PathBuf::from("/tmp/out/PP_ID.pdf")
        );
    }
}
