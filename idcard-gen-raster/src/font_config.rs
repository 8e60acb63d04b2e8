//! Font configuration for card surfaces.

use std::path::PathBuf;
use std::sync::Arc;

/// Describes the fonts available to a card surface.
///
/// The card faces use only the sans-serif family (all structural text) and the
/// monospace family (the authenticity seal), so the configuration maps those
/// two generic families onto concrete fonts in priority order.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Custom font data to register (font file bytes + optional family override).
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete fonts for "sans-serif", in priority order.
    pub sans_serif: Vec<String>,
    /// Concrete fonts for "monospace", in priority order.
    pub monospace: Vec<String>,
    /// Whether to load system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            sans_serif: vec!["Arial".into(), "Helvetica".into(), "Liberation Sans".into()],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// A custom font to register, consisting of raw font file data and an optional
/// family name override.
#[derive(Clone, Debug)]
pub struct CustomFont {
    /// Raw font file data (TTF/OTF). Arc-wrapped for cheap cloning.
    pub data: Arc<Vec<u8>>,
    /// Optional family name override. If None, the family name is read from
    /// the font's name table.
    pub family_name: Option<String>,
}

impl FontConfig {
    /// Resolve this configuration into a concrete font database.
    ///
    /// This performs the expensive work (system font scanning, directory
    /// loading, custom font registration) once. The resulting
    /// [`ResolvedFontConfig`] can be shared to create multiple surfaces
    /// without repeating the filesystem scan.
    pub fn resolve(&self) -> ResolvedFontConfig {
        ResolvedFontConfig::new(self)
    }
}

/// A [`FontConfig`] that has been resolved into a concrete font database.
///
/// Cloning a `ResolvedFontConfig` clones the underlying database in memory
/// (no filesystem scan), making it suitable for sharing across surfaces.
pub struct ResolvedFontConfig {
    pub(crate) fontdb: fontdb::Database,
}

impl ResolvedFontConfig {
    /// Resolve a [`FontConfig`] into a concrete font database.
    pub fn new(config: &FontConfig) -> Self {
        Self {
            fontdb: font_config_to_fontdb(config),
        }
    }
}

/// Convert a [`FontConfig`] into a [`fontdb::Database`].
pub fn font_config_to_fontdb(config: &FontConfig) -> fontdb::Database {
    let mut db = fontdb::Database::new();

    // Load system fonts if requested
    if config.load_system_fonts {
        db.load_system_fonts();
    }

    // Scan additional font directories
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }

    // Load custom font data
    for font in &config.custom_fonts {
        db.load_font_data(Vec::from(font.data.as_slice()));
    }

    apply_generic_families(&mut db, config);

    db
}

/// Point the generic families at the first available font from each priority
/// list.
fn apply_generic_families(db: &mut fontdb::Database, config: &FontConfig) {
    let available: Vec<String> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(|(fam, _lang)| fam.clone())
                .collect::<Vec<_>>()
        })
        .collect();

    for family in &config.sans_serif {
        if available.iter().any(|f| f == family) {
            db.set_sans_serif_family(family);
            break;
        }
    }

    for family in &config.monospace {
        if available.iter().any(|f| f == family) {
            db.set_monospace_family(family);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_config() {
        let config = FontConfig::default();
        assert!(config.custom_fonts.is_empty());
        assert!(config.load_system_fonts);
        assert!(config.font_dirs.is_empty());
        assert_eq!(config.sans_serif[0], "Arial");
    }

    #[test]
    fn test_font_config_to_fontdb_no_system_fonts() {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        let db = font_config_to_fontdb(&config);
        // With no system fonts and no custom fonts, database should have no faces
        assert_eq!(db.faces().count(), 0);
    }

    #[test]
    fn test_font_config_clone_is_cheap() {
        let data = Arc::new(vec![0u8; 1000]);
        let font = CustomFont {
            data: data.clone(),
            family_name: None,
        };
        let config = FontConfig {
            custom_fonts: vec![font],
            ..FontConfig::default()
        };
        let cloned = config.clone();
        // Arc should share the same allocation
        assert!(Arc::ptr_eq(
            &config.custom_fonts[0].data,
            &cloned.custom_fonts[0].data
        ));
    }
}
