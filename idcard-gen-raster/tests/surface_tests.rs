//! Integration tests for idcard-gen-raster.

use idcard_gen_raster::{parse_css_color, Bitmap, Color, FontConfig, Surface};
use rstest::rstest;

/// Read the straight-alpha RGBA pixel at (x, y).
fn pixel_at(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    let data = surface.image_data();
    let idx = ((y * surface.width() + x) * 4) as usize;
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

/// Surfaces in tests skip the system font scan; shape tests don't need glyphs.
fn bare_surface(width: u32, height: u32) -> Surface {
    let config = FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    };
    Surface::with_config(width, height, &config).unwrap()
}

#[test]
fn test_fill_rect() {
    let mut surface = bare_surface(200, 200);

    surface.fill_rect(10.0, 10.0, 100.0, 100.0, parse_css_color("#ff0000").unwrap());

    // Inside the rectangle
    assert_eq!(pixel_at(&surface, 50, 50), [255, 0, 0, 255]);
    // Outside the rectangle
    assert_eq!(pixel_at(&surface, 150, 150), [0, 0, 0, 0]);
}

#[test]
fn test_fill_covers_whole_surface() {
    let mut surface = bare_surface(64, 64);
    surface.fill(Color::from_rgba8(10, 20, 30, 255));

    assert_eq!(pixel_at(&surface, 0, 0), [10, 20, 30, 255]);
    assert_eq!(pixel_at(&surface, 63, 63), [10, 20, 30, 255]);
}

#[test]
fn test_diagonal_gradient_endpoints() {
    let mut surface = bare_surface(100, 100);
    surface.fill_diagonal_gradient(
        Color::from_rgba8(255, 0, 0, 255),
        Color::from_rgba8(0, 0, 255, 255),
    );

    // Near the top-left corner the gradient is mostly the start color,
    // near the bottom-right mostly the end color.
    let top_left = pixel_at(&surface, 2, 2);
    let bottom_right = pixel_at(&surface, 97, 97);
    assert!(top_left[0] > 200, "top-left should be red: {:?}", top_left);
    assert!(
        bottom_right[2] > 200,
        "bottom-right should be blue: {:?}",
        bottom_right
    );
}

#[test]
fn test_fill_round_rect_leaves_corners_empty() {
    let mut surface = bare_surface(100, 100);
    surface.fill_round_rect(0.0, 0.0, 100.0, 100.0, 40.0, Color::from_rgba8(0, 255, 0, 255));

    // Center is filled
    assert_eq!(pixel_at(&surface, 50, 50), [0, 255, 0, 255]);
    // The extreme corner lies outside the 40px corner radius
    assert_eq!(pixel_at(&surface, 1, 1)[3], 0);
}

#[test]
fn test_stroke_rect_outline_only() {
    let mut surface = bare_surface(100, 100);
    surface.stroke_rect(20.0, 20.0, 60.0, 60.0, 4.0, Color::from_rgba8(0, 0, 255, 255));

    // On the outline
    assert_eq!(pixel_at(&surface, 50, 20), [0, 0, 255, 255]);
    // Interior stays empty
    assert_eq!(pixel_at(&surface, 50, 50)[3], 0);
}

#[test]
fn test_fill_circle() {
    let mut surface = bare_surface(100, 100);
    surface.fill_circle(50.0, 50.0, 30.0, Color::from_rgba8(255, 0, 255, 255));

    assert_eq!(pixel_at(&surface, 50, 50), [255, 0, 255, 255]);
    assert_eq!(pixel_at(&surface, 5, 5)[3], 0);
}

#[test]
fn test_draw_bitmap_cover_fills_box() {
    let mut surface = bare_surface(100, 100);

    // A 20x10 solid cyan bitmap covering a 40x40 box must fill it entirely
    // (the wide source is center-cropped).
    let bitmap = Bitmap::from_rgba8(20, 10, vec![0, 255, 255, 255].repeat(200)).unwrap();
    surface.draw_bitmap_cover(&bitmap, 30.0, 30.0, 40.0, 40.0);

    assert_eq!(pixel_at(&surface, 50, 50), [0, 255, 255, 255]);
    assert_eq!(pixel_at(&surface, 32, 32), [0, 255, 255, 255]);
    assert_eq!(pixel_at(&surface, 68, 68), [0, 255, 255, 255]);
    // Outside the box
    assert_eq!(pixel_at(&surface, 20, 20)[3], 0);
}

#[test]
fn test_draw_bitmap_contain_letterboxes() {
    let mut surface = bare_surface(100, 100);

    // A 20x10 bitmap contained in a 40x40 box scales to 40x20, centered
    // vertically: rows above and below stay empty.
    let bitmap = Bitmap::from_rgba8(20, 10, vec![255, 128, 0, 255].repeat(200)).unwrap();
    surface.draw_bitmap_contain(&bitmap, 30.0, 30.0, 40.0, 40.0);

    assert_eq!(pixel_at(&surface, 50, 50), [255, 128, 0, 255]);
    // Letterboxed bands inside the box remain empty
    assert_eq!(pixel_at(&surface, 50, 32)[3], 0);
    assert_eq!(pixel_at(&surface, 50, 68)[3], 0);
}

#[test]
fn test_png_roundtrip_dimensions() {
    let mut surface = bare_surface(32, 16);
    surface.fill(Color::from_rgba8(1, 2, 3, 255));

    let png_data = surface.to_png().unwrap();
    let decoded = image::load_from_memory(&png_data).unwrap();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 16);
}

#[test]
fn test_jpeg_encode() {
    let mut surface = bare_surface(32, 16);
    surface.fill(Color::from_rgba8(200, 100, 50, 255));

    let jpeg_data = surface.to_jpeg(95).unwrap();
    // JPEG SOI marker
    assert_eq!(&jpeg_data[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&jpeg_data).unwrap();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 16);
}

#[test]
fn test_identical_draws_are_pixel_identical() {
    let draw = || {
        let mut surface = bare_surface(64, 64);
        surface.fill_diagonal_gradient(
            Color::from_rgba8(30, 30, 30, 255),
            Color::from_rgba8(0, 0, 0, 255),
        );
        surface.fill_round_rect(8.0, 8.0, 48.0, 24.0, 6.0, Color::from_rgba8(220, 38, 38, 255));
        surface.pixels().to_vec()
    };

    assert_eq!(draw(), draw());
}

#[rstest]
#[case("#E9EAEC", [233, 234, 236, 255])]
#[case("#0a0a0a", [10, 10, 10, 255])]
#[case("rgba(0,0,0,0.2)", [0, 0, 0, 51])]
fn test_parse_theme_colors(#[case] spec: &str, #[case] expected: [u8; 4]) {
    let color = parse_css_color(spec).unwrap();
    let to_u8 = |v: f32| (v * 255.0).round() as u8;
    assert_eq!(
        [
            to_u8(color.red()),
            to_u8(color.green()),
            to_u8(color.blue()),
            to_u8(color.alpha())
        ],
        expected
    );
}

#[test]
fn test_measure_text_empty_is_zero() {
    let mut surface = bare_surface(10, 10);
    let style = idcard_gen_raster::TextStyle::sans(20.0);
    assert_eq!(surface.measure_text("", &style), 0.0);
}
