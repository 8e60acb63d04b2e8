//! A4 PDF assembly for rendered card rasters.
//!
//! Card faces arrive as JPEG-encoded rasters at a fixed pixel resolution and
//! are placed on A4 portrait pages in physical units. The placement math is
//! exposed as pure functions so the two export modes stay testable without
//! parsing PDF output:
//! - FULL: one raster per page, scaled to the full page box.
//! - CLONE: both rasters side by side on a single page, aspect preserved,
//!   centered vertically with equal margins either side.

use anyhow::{bail, Error as AnyError};
use pdf_writer::{Content, Filter, Finish, Name, PdfWriter, Rect, Ref};

/// A4 portrait width in PostScript points.
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 portrait height in PostScript points.
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Margin used between and around the two rasters in CLONE mode.
const CLONE_MARGIN_PT: f32 = 24.0;

/// XObject resource names; at most two images are placed on one page.
const IMAGE_NAMES: [&[u8]; 2] = [b"Im1", b"Im2"];

/// A JPEG-encoded raster to embed.
#[derive(Debug, Clone, Copy)]
pub struct JpegImage<'a> {
    /// Raw JPEG bytes (embedded as-is with the DCTDecode filter).
    pub data: &'a [u8],
    /// Pixel width of the encoded image.
    pub width_px: u32,
    /// Pixel height of the encoded image.
    pub height_px: u32,
}

/// Where an image lands on the page, in points, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// An image together with its page placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacedImage<'a> {
    pub image: JpegImage<'a>,
    pub placement: Placement,
}

/// FULL mode: the raster is stretched to the full page box.
pub fn full_page_placement() -> Placement {
    Placement {
        x: 0.0,
        y: 0.0,
        width: A4_WIDTH_PT,
        height: A4_HEIGHT_PT,
    }
}

/// CLONE mode: two placements side by side, scaled to fit with the raster's
/// aspect ratio preserved, centered on the page.
pub fn side_by_side_placements(px_width: u32, px_height: u32) -> [Placement; 2] {
    let src_w = px_width as f32;
    let src_h = px_height as f32;

    let avail_w = (A4_WIDTH_PT - 3.0 * CLONE_MARGIN_PT) / 2.0;
    let avail_h = A4_HEIGHT_PT - 2.0 * CLONE_MARGIN_PT;
    let scale = (avail_w / src_w).min(avail_h / src_h);

    let width = src_w * scale;
    let height = src_h * scale;
    let total_w = 2.0 * width + CLONE_MARGIN_PT;
    let left = (A4_WIDTH_PT - total_w) / 2.0;
    let y = (A4_HEIGHT_PT - height) / 2.0;

    [
        Placement {
            x: left,
            y,
            width,
            height,
        },
        Placement {
            x: left + width + CLONE_MARGIN_PT,
            y,
            width,
            height,
        },
    ]
}

/// Assemble an A4 portrait PDF from placed JPEG images, one inner Vec per page.
pub fn write_pdf(pages: &[Vec<PlacedImage>]) -> Result<Vec<u8>, AnyError> {
    if pages.is_empty() {
        bail!("PDF document must contain at least one page");
    }
    for page in pages {
        if page.len() > IMAGE_NAMES.len() {
            bail!(
                "at most {} images may be placed on one page",
                IMAGE_NAMES.len()
            );
        }
    }

    // Allocate the indirect reference IDs
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let mut next_ref = 3;
    let mut alloc = || {
        let id = Ref::new(next_ref);
        next_ref += 1;
        id
    };

    struct PageRefs {
        page_id: Ref,
        content_id: Ref,
        image_ids: Vec<Ref>,
    }
    let refs: Vec<PageRefs> = pages
        .iter()
        .map(|page| PageRefs {
            page_id: alloc(),
            content_id: alloc(),
            image_ids: page.iter().map(|_| alloc()).collect(),
        })
        .collect();

    // Start writing the PDF
    let mut writer = PdfWriter::new();
    writer.catalog(catalog_id).pages(page_tree_id);
    writer
        .pages(page_tree_id)
        .kids(refs.iter().map(|r| r.page_id))
        .count(pages.len() as i32);

    for (page_images, page_refs) in pages.iter().zip(&refs) {
        // Page with fixed A4 geometry and the image XObjects as resources
        let mut page = writer.page(page_refs.page_id);
        page.media_box(Rect::new(0.0, 0.0, A4_WIDTH_PT, A4_HEIGHT_PT));
        page.parent(page_tree_id);
        page.contents(page_refs.content_id);

        let mut resources = page.resources();
        let mut x_objects = resources.x_objects();
        for (slot, image_id) in page_refs.image_ids.iter().enumerate() {
            x_objects.pair(Name(IMAGE_NAMES[slot]), *image_id);
        }
        x_objects.finish();
        resources.finish();
        page.finish();

        // Content stream: each XObject is a unit square, so the transform
        // carries both the placement offset and the point-size scaling.
        let mut content = Content::new();
        for (slot, placed) in page_images.iter().enumerate() {
            let p = placed.placement;
            content
                .save_state()
                .transform([p.width, 0.0, 0.0, p.height, p.x, p.y])
                .x_object(Name(IMAGE_NAMES[slot]))
                .restore_state();
        }
        writer.stream(page_refs.content_id, &content.finish());

        // The JPEG streams themselves
        for (placed, image_id) in page_images.iter().zip(&page_refs.image_ids) {
            let mut image = writer.image_xobject(*image_id, placed.image.data);
            image.filter(Filter::DctDecode);
            image.width(placed.image.width_px as i32);
            image.height(placed.image.height_px as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.finish();
        }
    }

    Ok(writer.finish())
}
