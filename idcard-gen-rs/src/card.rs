//! The card data model consumed by the rendering pipeline.

use crate::theme::VisualTheme;
use serde::{Deserialize, Serialize};

/// The full set of person/document fields driving a render.
///
/// Produced by an external form (or, for the CLI, read from a JSON file) and
/// treated as immutable input: the layout engine never mutates it. All string
/// fields are display-safe as-is; empty optional fields always have a defined
/// fallback render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardRecord {
    pub full_name: String,
    pub category: Category,
    pub masp: String,
    pub registration: String,
    pub cpf: String,
    pub identity: String,
    pub blood_type: String,
    /// Pre-formatted DD/MM/YYYY; the pipeline performs no date parsing.
    pub birth_date: String,
    /// Pre-formatted DD/MM/YYYY; the pipeline performs no date parsing.
    pub expiry_date: String,
    /// Opaque control code, display-only.
    pub code: String,
    pub status: Status,
    pub visual_theme: VisualTheme,
    /// Data URI or remote HTTPS URL; empty means no photo.
    pub photo_url: String,
    /// Data URI or remote HTTPS URL; empty means no brand logo.
    pub brand_logo_url: String,
    /// Data URI or remote HTTPS URL; empty means no secondary logo.
    pub secondary_logo_url: String,
}

/// Holder category; affects the front badge text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Titular,
    Dependente,
    Aposentado,
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "DEPENDENTE" => Category::Dependente,
            "APOSENTADO" => Category::Aposentado,
            _ => Category::Titular,
        }
    }
}

impl Category {
    /// The uppercase badge text shown on the front face.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Titular => "TITULAR",
            Category::Dependente => "DEPENDENTE",
            Category::Aposentado => "APOSENTADO",
        }
    }
}

/// Registration status; display-only, colors the back-side badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Status {
    Ativo,
    Inativo,
    #[default]
    Inexistente,
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "ATIVO" => Status::Ativo,
            "INATIVO" => Status::Inativo,
            _ => Status::Inexistente,
        }
    }
}

impl Status {
    /// The uppercase text shown in the status badge and row.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ativo => "ATIVO",
            Status::Inativo => "INATIVO",
            Status::Inexistente => "INEXISTENTE",
        }
    }

    /// Whether the badge uses the active (green) styling.
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Ativo)
    }
}

/// Which card face to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSide {
    Front,
    Back,
}

impl CardSide {
    /// Deterministic filename suffix for standalone image exports.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            CardSide::Front => "_FRENTE",
            CardSide::Back => "_VERSO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_minimal_json() {
        let card: CardRecord = serde_json::from_str(r#"{"fullName": "JOÃO DA SILVA"}"#).unwrap();
        assert_eq!(card.full_name, "JOÃO DA SILVA");
        assert_eq!(card.masp, "");
        assert_eq!(card.category, Category::Titular);
        assert_eq!(card.status, Status::Inexistente);
        assert_eq!(card.visual_theme, VisualTheme::Clean);
    }

    #[test]
    fn test_record_camel_case_fields() {
        let card: CardRecord = serde_json::from_str(
            r#"{
                "fullName": "MARIA",
                "bloodType": "O+",
                "visualTheme": "rubro",
                "status": "ATIVO",
                "category": "DEPENDENTE",
                "photoUrl": "data:image/png;base64,AAAA"
            }"#,
        )
        .unwrap();
        assert_eq!(card.blood_type, "O+");
        assert_eq!(card.visual_theme, VisualTheme::Rubro);
        assert_eq!(card.status, Status::Ativo);
        assert_eq!(card.category, Category::Dependente);
        assert_eq!(card.photo_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let card: CardRecord = serde_json::from_str(
            r#"{"status": "whatever", "category": "nope", "visualTheme": "sparkle"}"#,
        )
        .unwrap();
        assert_eq!(card.status, Status::Inexistente);
        assert_eq!(card.category, Category::Titular);
        assert_eq!(card.visual_theme, VisualTheme::Clean);
    }

    #[test]
    fn test_side_file_suffix() {
        assert_eq!(CardSide::Front.file_suffix(), "_FRENTE");
        assert_eq!(CardSide::Back.file_suffix(), "_VERSO");
    }
}
