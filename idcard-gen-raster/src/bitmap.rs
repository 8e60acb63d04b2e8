//! Decoded bitmaps and object-fit math.

use crate::error::RasterError;

/// A decoded image held as premultiplied RGBA, ready for compositing.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Decode raw image bytes (PNG or JPEG) into a bitmap.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| RasterError::ImageDecode(e.to_string()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply(&mut data);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a bitmap from straight-alpha RGBA pixels.
    pub fn from_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> Result<Self, RasterError> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(RasterError::ImageDecode(format!(
                "pixel buffer length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        premultiply(&mut data);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Bitmap width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA pixel data.
    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Convert straight-alpha RGBA to premultiplied alpha in place.
///
/// Integer math with rounding: (color * alpha + 127) / 255.
fn premultiply(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        let a16 = a as u16;
        px[0] = ((px[0] as u16 * a16 + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a16 + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a16 + 127) / 255) as u8;
    }
}

/// Source-space crop region selected by [`cover_crop`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub sx: f32,
    pub sy: f32,
    pub sw: f32,
    pub sh: f32,
}

/// Compute the centered source crop that fills a destination box while
/// preserving aspect ratio (CSS object-fit: cover).
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: f32, dst_h: f32) -> CropRegion {
    let src_w = src_w as f32;
    let src_h = src_h as f32;
    let src_aspect = src_w / src_h;
    let dst_aspect = dst_w / dst_h;

    if src_aspect > dst_aspect {
        // Source is wider than the box: crop the sides.
        let sw = src_h * dst_aspect;
        CropRegion {
            sx: (src_w - sw) / 2.0,
            sy: 0.0,
            sw,
            sh: src_h,
        }
    } else {
        // Source is taller than the box: crop top and bottom.
        let sh = src_w / dst_aspect;
        CropRegion {
            sx: 0.0,
            sy: (src_h - sh) / 2.0,
            sw: src_w,
            sh,
        }
    }
}

/// Compute the centered destination rectangle that letterboxes a source inside
/// a destination box while preserving aspect ratio (CSS object-fit: contain).
///
/// Returns (x, y, width, height) in destination space.
pub fn contain_rect(
    src_w: u32,
    src_h: u32,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
) -> (f32, f32, f32, f32) {
    let scale = (w / src_w as f32).min(h / src_h as f32);
    let dw = src_w as f32 * scale;
    let dh = src_h as f32 * scale;
    (x + (w - dw) / 2.0, y + (h - dh) / 2.0, dw, dh)
}
