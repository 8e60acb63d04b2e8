//! Visual themes and their resolved color palettes.

use idcard_gen_raster::{parse_css_color, Color};
use serde::{Deserialize, Serialize};

/// The named visual variant of a card.
///
/// A closed set: resolution is an exhaustive match, so adding a theme is a
/// single-point change. Any unrecognized name maps to [`VisualTheme::Clean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum VisualTheme {
    #[default]
    Clean,
    Black,
    Metal,
    Rubro,
}

impl From<String> for VisualTheme {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl VisualTheme {
    /// Total mapping from a theme name; unknown names resolve to Clean.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "black" => VisualTheme::Black,
            "metal" => VisualTheme::Metal,
            "rubro" => VisualTheme::Rubro,
            _ => VisualTheme::Clean,
        }
    }

    /// Resolve this theme into its concrete color palette.
    pub fn resolve(self) -> ThemeDescriptor {
        match self {
            VisualTheme::Clean => ThemeDescriptor {
                background: css("#E9EAEC"),
                background_edge: css("#D1D3D6"),
                header: css("#A3A5A0"),
                footer: css("#A4A7A1"),
                text_main: css("#1E293B"),
                text_name: css("#0F172A"),
                name_box: css("rgba(255,255,255,0.4)"),
                photo_border: css("#FFFFFF"),
                accent: css("#A3A5A0"),
            },
            VisualTheme::Black => ThemeDescriptor {
                background: css("#1A1A1A"),
                background_edge: css("#000000"),
                header: css("#333333"),
                footer: css("#000000"),
                text_main: css("#E5E7EB"),
                text_name: css("#FFFFFF"),
                name_box: css("rgba(255,255,255,0.1)"),
                photo_border: css("#27272A"),
                accent: css("#1A1A1A"),
            },
            VisualTheme::Metal => ThemeDescriptor {
                background: css("#71717A"),
                background_edge: css("#3F3F46"),
                header: css("#27272A"),
                footer: css("#18181B"),
                text_main: css("#F4F4F5"),
                text_name: css("#FFFFFF"),
                name_box: css("rgba(0,0,0,0.2)"),
                photo_border: css("#A1A1AA"),
                accent: css("#3F3F46"),
            },
            VisualTheme::Rubro => ThemeDescriptor {
                background: css("#7F1D1D"),
                background_edge: css("#450A0A"),
                header: css("#991B1B"),
                footer: css("#1A0000"),
                text_main: css("#FEF2F2"),
                text_name: css("#FFFFFF"),
                name_box: css("rgba(0,0,0,0.3)"),
                photo_border: css("#7F1D1D"),
                accent: css("#7F1D1D"),
            },
        }
    }
}

/// Resolved color palette for one theme; immutable, constructed per render.
#[derive(Debug, Clone, Copy)]
pub struct ThemeDescriptor {
    /// Front background gradient start.
    pub background: Color,
    /// Front background gradient end.
    pub background_edge: Color,
    /// Header band fill.
    pub header: Color,
    /// Footer band fill.
    pub footer: Color,
    /// Structural front text (title, labels, badge).
    pub text_main: Color,
    /// The holder name.
    pub text_name: Color,
    /// Name box fill (translucent).
    pub name_box: Color,
    /// Photo box border.
    pub photo_border: Color,
    /// Back-side accent sidebar.
    pub accent: Color,
}

/// The palette values are static CSS colors from the browser variants; a
/// parse failure can only mean a typo here, so fall back to black like the
/// surface's own color parsing does.
fn css(spec: &str) -> Color {
    parse_css_color(spec).unwrap_or(Color::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_resolves_to_clean() {
        assert_eq!(VisualTheme::from_name(""), VisualTheme::Clean);
        assert_eq!(VisualTheme::from_name("sparkle"), VisualTheme::Clean);
        assert_eq!(VisualTheme::from_name("BLACK"), VisualTheme::Black);
        assert_eq!(VisualTheme::from_name(" metal "), VisualTheme::Metal);
    }

    #[test]
    fn test_each_theme_has_distinct_background() {
        let backgrounds: Vec<_> = [
            VisualTheme::Clean,
            VisualTheme::Black,
            VisualTheme::Metal,
            VisualTheme::Rubro,
        ]
        .iter()
        .map(|t| {
            let c = t.resolve().background;
            (c.red().to_bits(), c.green().to_bits(), c.blue().to_bits())
        })
        .collect();

        for (i, a) in backgrounds.iter().enumerate() {
            for b in &backgrounds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_name_box_is_translucent() {
        for theme in [
            VisualTheme::Clean,
            VisualTheme::Black,
            VisualTheme::Metal,
            VisualTheme::Rubro,
        ] {
            assert!(theme.resolve().name_box.alpha() < 1.0);
        }
    }
}
