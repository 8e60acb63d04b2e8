//! Integration tests for the document exporter.

use idcard_gen_rs::{CardLayoutEngine, CardRecord, DocumentExporter, PdfMode, VisualTheme};
use idcard_gen_raster::FontConfig;

fn bare_exporter() -> DocumentExporter {
    DocumentExporter::new(CardLayoutEngine::with_fonts(&FontConfig {
        load_system_fonts: false,
        ..FontConfig::default()
    }))
}

fn sample_card() -> CardRecord {
    CardRecord {
        full_name: "JOÃO DA SILVA".to_string(),
        masp: "123.456-7".to_string(),
        visual_theme: VisualTheme::Black,
        ..CardRecord::default()
    }
}

fn count_token(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}

#[tokio::test]
async fn test_export_to_images_names_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let basename = dir.path().join("PP_IMG_123");

    let exporter = bare_exporter();
    let (front_path, back_path) = exporter
        .export_to_images(&sample_card(), &basename)
        .await
        .unwrap();

    assert!(front_path.to_string_lossy().ends_with("PP_IMG_123_FRENTE.jpg"));
    assert!(back_path.to_string_lossy().ends_with("PP_IMG_123_VERSO.jpg"));

    let front_bytes = std::fs::read(&front_path).unwrap();
    let back_bytes = std::fs::read(&back_path).unwrap();
    // JPEG SOI marker on both files
    assert_eq!(&front_bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(&back_bytes[..2], &[0xFF, 0xD8]);

    // FRENTE is written before VERSO
    let front_mtime = std::fs::metadata(&front_path).unwrap().modified().unwrap();
    let back_mtime = std::fs::metadata(&back_path).unwrap().modified().unwrap();
    assert!(front_mtime <= back_mtime);
}

#[tokio::test]
async fn test_export_to_pdf_full_mode_two_pages() {
    let dir = tempfile::tempdir().unwrap();
    let basename = dir.path().join("PP_ID_123");

    let exporter = bare_exporter();
    let path = exporter
        .export_to_pdf(&sample_card(), PdfMode::Full, &basename)
        .await
        .unwrap();

    assert!(path.to_string_lossy().ends_with("PP_ID_123.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(count_token(&bytes, b"/Count 2"), 1);
    assert_eq!(count_token(&bytes, b"/Subtype /Image"), 2);
}

#[tokio::test]
async fn test_export_to_pdf_clone_mode_single_page() {
    let dir = tempfile::tempdir().unwrap();
    let basename = dir.path().join("PP_A4_123");

    let exporter = bare_exporter();
    let path = exporter
        .export_to_pdf(&sample_card(), PdfMode::Clone, &basename)
        .await
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(count_token(&bytes, b"/Count 1"), 1);
    // Both faces land on the single page
    assert_eq!(count_token(&bytes, b"/Subtype /Image"), 2);
}

#[tokio::test]
async fn test_export_write_failure_is_io_error() {
    let exporter = bare_exporter();
    let missing_dir = std::path::Path::new("/nonexistent-dir/PP_ID");
    let err = exporter
        .export_to_pdf(&sample_card(), PdfMode::Full, missing_dir)
        .await
        .unwrap_err();
    assert!(matches!(err, idcard_gen_rs::ExportError::Io(_)));
}
