//! The card raster surface.

use crate::bitmap::{contain_rect, cover_crop, Bitmap};
use crate::error::{RasterError, RasterResult};
use crate::font_config::{font_config_to_fontdb, FontConfig, ResolvedFontConfig};
use crate::text::{align_offset, FontFamily, TextStyle};
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, SwashCache,
};
use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap,
    PixmapPaint, PixmapRef, Rect, SpreadMode, Stroke, Transform,
};

/// Maximum surface dimension (same as Chrome's canvas limit).
const MAX_DIMENSION: u32 = 32767;

/// A fixed-resolution premultiplied-RGBA pixel surface.
///
/// One surface is created per card face, fully drawn, handed off for
/// encoding, and dropped. There is no shared or process-wide surface state.
pub struct Surface {
    /// Width of the surface in pixels.
    width: u32,
    /// Height of the surface in pixels.
    height: u32,
    /// Pixel buffer.
    pixmap: Pixmap,
    /// Font system for text shaping.
    font_system: FontSystem,
    /// Swash cache for glyph outline retrieval.
    swash_cache: SwashCache,
}

impl Surface {
    /// Create a new surface with the specified dimensions.
    ///
    /// Uses `FontConfig::default()` which loads system fonts and maps the
    /// sans-serif and monospace generic families.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        let db = font_config_to_fontdb(&FontConfig::default());
        Self::new_internal(width, height, db)
    }

    /// Create a new surface with the specified dimensions and font configuration.
    pub fn with_config(width: u32, height: u32, config: &FontConfig) -> RasterResult<Self> {
        let db = font_config_to_fontdb(config);
        Self::new_internal(width, height, db)
    }

    /// Create a new surface using a pre-resolved font configuration.
    ///
    /// This clones the cached font database from the [`ResolvedFontConfig`]
    /// rather than rebuilding it, avoiding repeated system font scanning when
    /// rendering several faces in a row.
    pub fn with_resolved(
        width: u32,
        height: u32,
        resolved: &ResolvedFontConfig,
    ) -> RasterResult<Self> {
        Self::new_internal(width, height, resolved.fontdb.clone())
    }

    fn new_internal(width: u32, height: u32, font_db: fontdb::Database) -> RasterResult<Self> {
        // Validate dimensions
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidDimensions { width, height });
        }

        // Create pixmap
        let pixmap =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;

        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);
        let swash_cache = SwashCache::new();

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    // --- Fills ---

    /// Fill the whole surface with a solid color.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Fill the whole surface with a top-left to bottom-right linear gradient.
    pub fn fill_diagonal_gradient(&mut self, start: Color, end: Color) {
        let stops = vec![GradientStop::new(0.0, start), GradientStop::new(1.0, end)];
        let Some(shader) = LinearGradient::new(
            tiny_skia::Point { x: 0.0, y: 0.0 },
            tiny_skia::Point {
                x: self.width as f32,
                y: self.height as f32,
            },
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        };
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width as f32, self.height as f32) {
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        log::debug!(target: "surface", "fillRect {} {} {} {}", x, y, w, h);
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap
                .fill_rect(rect, &solid_paint(color), Transform::identity(), None);
        }
    }

    /// Stroke a rectangle outline.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, line_width: f32, color: Color) {
        if let Some(path) = rect_path(x, y, w, h) {
            self.stroke_path(&path, line_width, color);
        }
    }

    /// Fill a rectangle with uniformly rounded corners.
    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color) {
        log::debug!(target: "surface", "fillRoundRect {} {} {} {} r={}", x, y, w, h, radius);
        if let Some(path) = round_rect_path(x, y, w, h, radius) {
            self.fill_path(&path, color);
        }
    }

    /// Stroke a rounded rectangle outline.
    pub fn stroke_round_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        line_width: f32,
        color: Color,
    ) {
        if let Some(path) = round_rect_path(x, y, w, h, radius) {
            self.stroke_path(&path, line_width, color);
        }
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill_path(&path, color);
        }
    }

    /// Stroke a circle outline.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.stroke_path(&path, line_width, color);
        }
    }

    fn fill_path(&mut self, path: &tiny_skia::Path, color: Color) {
        self.pixmap.fill_path(
            path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn stroke_path(&mut self, path: &tiny_skia::Path, line_width: f32, color: Color) {
        let stroke = Stroke {
            width: line_width,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            path,
            &solid_paint(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    // --- Bitmap compositing ---

    /// Draw a bitmap scaled to fill the destination box, center-cropping the
    /// source to preserve aspect ratio (object-fit: cover).
    pub fn draw_bitmap_cover(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let crop = cover_crop(bitmap.width(), bitmap.height(), w, h);
        let sub_w = crop.sw.ceil() as u32;
        let sub_h = crop.sh.ceil() as u32;
        if sub_w == 0 || sub_h == 0 {
            return;
        }

        // Extract the crop region into a sub-pixmap, then scale it into the box.
        let Some(mut sub) = Pixmap::new(sub_w, sub_h) else {
            return;
        };
        let Some(src) = PixmapRef::from_bytes(bitmap.data(), bitmap.width(), bitmap.height())
        else {
            return;
        };
        let extract = Transform::from_translate(-crop.sx.floor(), -crop.sy.floor());
        sub.draw_pixmap(0, 0, src, &PixmapPaint::default(), extract, None);

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        let transform =
            Transform::from_translate(x, y).pre_scale(w / sub_w as f32, h / sub_h as f32);
        self.pixmap
            .draw_pixmap(0, 0, sub.as_ref(), &paint, transform, None);
    }

    /// Draw a bitmap letterboxed inside the destination box, preserving aspect
    /// ratio (object-fit: contain).
    pub fn draw_bitmap_contain(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let (dx, dy, dw, dh) = contain_rect(bitmap.width(), bitmap.height(), x, y, w, h);
        self.draw_bitmap_scaled(bitmap, dx, dy, dw, dh);
    }

    fn draw_bitmap_scaled(&mut self, bitmap: &Bitmap, dx: f32, dy: f32, dw: f32, dh: f32) {
        log::debug!(target: "surface", "drawBitmap {}x{} at {} {}", bitmap.width(), bitmap.height(), dx, dy);
        let Some(pixmap) = PixmapRef::from_bytes(bitmap.data(), bitmap.width(), bitmap.height())
        else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        let transform = Transform::from_translate(dx, dy)
            .pre_scale(dw / bitmap.width() as f32, dh / bitmap.height() as f32);
        self.pixmap.draw_pixmap(0, 0, pixmap, &paint, transform, None);
    }

    // --- Text ---

    /// Measure the width of a run of text in the given style.
    pub fn measure_text(&mut self, text: &str, style: &TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let metrics = Metrics::new(style.px, style.px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = text_attrs(style);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut width: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
        }
        width
    }

    /// Fill text with its alphabetic baseline at (x, y).
    ///
    /// The style's alignment anchors the text horizontally on x. Glyphs are
    /// rendered as vector outlines with hinting disabled, so output is
    /// identical across platforms with the same fonts.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle, color: Color) {
        log::debug!(target: "surface", "fillText \"{}\" {} {}", text, x, y);
        if text.is_empty() {
            return;
        }
        let metrics = Metrics::new(style.px, style.px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = text_attrs(style);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        // Text width for alignment
        let mut text_width: f32 = 0.0;
        for run in buffer.layout_runs() {
            text_width = text_width.max(run.line_w);
        }

        let base_x = x + align_offset(text_width, style.align);
        let base_y = y;

        let paint = solid_paint(color);
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical_glyph = glyph.physical((base_x, base_y), 1.0);

                let glyph_x = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                let glyph_y = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                if let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical_glyph.cache_key)
                {
                    // Font outlines have Y pointing up, the surface has Y
                    // pointing down, so Y coordinates are negated.
                    let mut path_builder = PathBuilder::new();
                    for cmd in commands {
                        match cmd {
                            Command::MoveTo(p) => path_builder.move_to(p.x, -p.y),
                            Command::LineTo(p) => path_builder.line_to(p.x, -p.y),
                            Command::QuadTo(ctrl, end) => {
                                path_builder.quad_to(ctrl.x, -ctrl.y, end.x, -end.y)
                            }
                            Command::CurveTo(c1, c2, end) => {
                                path_builder.cubic_to(c1.x, -c1.y, c2.x, -c2.y, end.x, -end.y)
                            }
                            Command::Close => path_builder.close(),
                        }
                    }

                    if let Some(path) = path_builder.finish() {
                        let glyph_transform = Transform::from_translate(glyph_x, glyph_y);
                        self.pixmap.fill_path(
                            &path,
                            &paint,
                            FillRule::Winding,
                            glyph_transform,
                            None,
                        );
                    }
                }
            }
        }
    }

    // --- Output ---

    /// Premultiplied RGBA pixel data.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA pixel data for the whole surface.
    pub fn image_data(&self) -> Vec<u8> {
        let mut data = vec![0u8; (self.width * self.height * 4) as usize];

        for (dst, pixel) in data.chunks_exact_mut(4).zip(self.pixmap.data().chunks_exact(4)) {
            // Convert from premultiplied alpha to straight alpha
            let a = pixel[3];
            if a == 0 {
                dst.copy_from_slice(&[0, 0, 0, 0]);
            } else if a == 255 {
                dst.copy_from_slice(pixel);
            } else {
                let alpha_f = a as f32 / 255.0;
                dst[0] = (pixel[0] as f32 / alpha_f).min(255.0) as u8;
                dst[1] = (pixel[1] as f32 / alpha_f).min(255.0) as u8;
                dst[2] = (pixel[2] as f32 / alpha_f).min(255.0) as u8;
                dst[3] = a;
            }
        }

        data
    }

    /// Encode the surface as PNG data.
    pub fn to_png(&self) -> RasterResult<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header()?;

            // Convert from premultiplied to straight alpha for PNG
            let data = self.image_data();
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }

    /// Encode the surface as JPEG data at the given quality (1-100).
    ///
    /// Alpha is discarded; card faces always paint an opaque background first.
    pub fn to_jpeg(&self, quality: u8) -> RasterResult<Vec<u8>> {
        let rgba = self.image_data();
        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        for px in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }

        let mut buf = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .encode(&rgb, self.width, self.height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RasterError::JpegError(e.to_string()))?;
        Ok(buf)
    }
}

/// Parse a CSS color string into a Color.
pub fn parse_css_color(s: &str) -> RasterResult<Color> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| RasterError::ColorParse(format!("{}: {}", s, e)))?;

    let [r, g, b, a] = parsed.to_array();
    Ok(Color::from_rgba(r, g, b, a).unwrap_or(Color::BLACK))
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint {
        anti_alias: true,
        ..Default::default()
    };
    paint.set_color(color);
    paint
}

fn text_attrs(style: &TextStyle) -> Attrs<'static> {
    let family = match style.family {
        FontFamily::SansSerif => Family::SansSerif,
        FontFamily::Monospace => Family::Monospace,
    };
    // Hinting is disabled so rendering does not depend on platform hinting.
    Attrs::new()
        .family(family)
        .weight(style.weight.into())
        .letter_spacing(style.letter_spacing)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING)
}

fn rect_path(x: f32, y: f32, w: f32, h: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    pb.line_to(x + w, y);
    pb.line_to(x + w, y + h);
    pb.line_to(x, y + h);
    pb.close();
    pb.finish()
}

/// Build a uniformly rounded rectangle path with quad corners, clamping the
/// radius to half the shorter side.
fn round_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<tiny_skia::Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = radius.max(0.0).min(w / 2.0).min(h / 2.0);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    if r > 0.0 {
        pb.quad_to(x + w, y, x + w, y + r);
    }
    pb.line_to(x + w, y + h - r);
    if r > 0.0 {
        pb.quad_to(x + w, y + h, x + w - r, y + h);
    }
    pb.line_to(x + r, y + h);
    if r > 0.0 {
        pb.quad_to(x, y + h, x, y + h - r);
    }
    pb.line_to(x, y + r);
    if r > 0.0 {
        pb.quad_to(x, y, x + r, y);
    }
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let surface = Surface::new(100, 100);
        assert!(surface.is_ok());
    }

    #[test]
    fn test_invalid_dimensions() {
        let surface = Surface::new(0, 100);
        assert!(matches!(
            surface,
            Err(RasterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_parse_css_color() {
        let color = parse_css_color("#ff0000").unwrap();
        assert_eq!(color.red(), 1.0);
        assert_eq!(color.green(), 0.0);

        let color = parse_css_color("rgba(255,255,255,0.4)").unwrap();
        assert!((color.alpha() - 0.4).abs() < 0.01);

        assert!(parse_css_color("not-a-color").is_err());
    }

    #[test]
    fn test_round_rect_path_clamps_radius() {
        // Radius larger than half the short side still produces a path.
        let path = round_rect_path(0.0, 0.0, 100.0, 20.0, 50.0);
        assert!(path.is_some());
    }
}
