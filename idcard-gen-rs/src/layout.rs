//! The card layout engine: paints one card face onto a raster surface.
//!
//! Drawing happens as an explicit, ordered step sequence per side
//! ([`FRONT_STEPS`], [`BACK_STEPS`]). Later steps may legitimately sit on top
//! of earlier ones (the name box overlaps the footer band's shadow region),
//! so the sequence itself is part of the contract and is pinned by tests
//! rather than left to incidental call order.

use crate::card::{CardRecord, CardSide};
use crate::error::RenderError;
use crate::image_loading::ImageLoader;
use crate::theme::ThemeDescriptor;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use idcard_gen_raster::{
    Bitmap, Color, FontConfig, RasterError, ResolvedFontConfig, Surface, TextStyle,
};
use log::warn;

/// Card face width in pixels. The PDF geometry math derives from the same pair
/// of constants, so they are the single place the resolution is defined.
pub const CARD_WIDTH: u32 = 1080;
/// Card face height in pixels.
pub const CARD_HEIGHT: u32 = 1528;

/// Placeholder shown in back rows whose value is empty.
pub const EMPTY_VALUE_PLACEHOLDER: &str = "---";

/// Name shown on the front when the record has no full name.
const NAME_FALLBACK: &str = "IDENTIFICAÇÃO";

// Name font tiers: longer names step down so the text never overflows its box.
const NAME_FONT_LARGE_PX: f32 = 84.0;
const NAME_FONT_MIDDLE_PX: f32 = 68.0;
const NAME_FONT_SMALL_PX: f32 = 54.0;
const NAME_MIDDLE_THRESHOLD: usize = 22;
const NAME_SMALL_THRESHOLD: usize = 30;

/// Choose the name font size from the name's character count.
///
/// Deterministic: > 30 chars uses the smallest tier, > 22 the middle tier,
/// anything shorter the largest.
pub fn name_font_px(name: &str) -> f32 {
    let len = name.chars().count();
    if len > NAME_SMALL_THRESHOLD {
        NAME_FONT_SMALL_PX
    } else if len > NAME_MIDDLE_THRESHOLD {
        NAME_FONT_MIDDLE_PX
    } else {
        NAME_FONT_LARGE_PX
    }
}

/// The ordered drawing steps of the front face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontStep {
    Background,
    HeaderBand,
    FooterBand,
    BrandLogo,
    SecondaryLogo,
    Title,
    AccentBars,
    PhotoBox,
    CategoryBadge,
    NameBox,
}

/// Front draw order: background and bands first, logos behind the title,
/// photo and name on top.
pub const FRONT_STEPS: [FrontStep; 10] = [
    FrontStep::Background,
    FrontStep::HeaderBand,
    FrontStep::FooterBand,
    FrontStep::BrandLogo,
    FrontStep::SecondaryLogo,
    FrontStep::Title,
    FrontStep::AccentBars,
    FrontStep::PhotoBox,
    FrontStep::CategoryBadge,
    FrontStep::NameBox,
];

/// The ordered drawing steps of the back face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackStep {
    Background,
    AccentSidebar,
    SectionHeader,
    InfoRows,
    SecuritySeal,
    ValidationPanel,
    FooterText,
}

/// Back draw order.
pub const BACK_STEPS: [BackStep; 7] = [
    BackStep::Background,
    BackStep::AccentSidebar,
    BackStep::SectionHeader,
    BackStep::InfoRows,
    BackStep::SecuritySeal,
    BackStep::ValidationPanel,
    BackStep::FooterText,
];

/// One label/value cell of the back grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: &'static str,
    /// Display value; already `---` when the source field was empty.
    pub value: String,
    /// Highlighted rows get a tinted band and status coloring.
    pub highlight: bool,
}

impl InfoRow {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: display_value(value),
            highlight: false,
        }
    }

    fn highlighted(label: &'static str, value: &str) -> Self {
        Self {
            highlight: true,
            ..Self::new(label, value)
        }
    }
}

/// A slot of the back grid: a full-width row or two half-width cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSlot {
    Full(InfoRow),
    Pair(InfoRow, InfoRow),
}

/// Map an input field to its display value (`---` when empty).
pub fn display_value(value: &str) -> String {
    if value.is_empty() {
        EMPTY_VALUE_PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// The back grid model, in display order.
pub fn back_rows(card: &CardRecord, expedition_date: &str) -> Vec<RowSlot> {
    vec![
        RowSlot::Full(InfoRow::new("MASP", &card.masp)),
        RowSlot::Full(InfoRow::highlighted(
            "STATUS DO CADASTRO",
            card.status.label(),
        )),
        RowSlot::Full(InfoRow::new("MATRÍCULA", &card.registration)),
        RowSlot::Full(InfoRow::new("CPF", &card.cpf)),
        RowSlot::Full(InfoRow::new("IDENTIDADE", &card.identity)),
        RowSlot::Full(InfoRow::new("TIPO SANGUÍNEO", &card.blood_type)),
        RowSlot::Pair(
            InfoRow::new("DATA DE NASCIMENTO", &card.birth_date),
            InfoRow::new("VALIDADE", &card.expiry_date),
        ),
        RowSlot::Pair(
            InfoRow::new("CODIFICAÇÃO", &card.code),
            InfoRow::new("EXPEDIÇÃO", expedition_date),
        ),
    ]
}

/// The authenticity seal value: base64 of `MASP-CPF-expedition`, truncated to
/// 16 characters and uppercased.
///
/// This is a reversible encoding, not a signature; it carries no real
/// authenticity guarantee and is rendered purely as a visual seal.
pub fn security_hash(masp: &str, cpf: &str, expedition_date: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{masp}-{cpf}-{expedition_date}"));
    encoded.chars().take(16).collect::<String>().to_uppercase()
}

/// External collaborator that turns a payload into a scannable code image.
pub trait ScannableCodeRenderer: Send + Sync {
    fn render(&self, payload: &str, size_px: u32) -> Result<Bitmap, RenderError>;
}

/// Payload shape handed to the scannable-code collaborator. The source
/// variants disagree on this, so both shapes are preserved as configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CodePayload {
    /// JSON blob embedding the authenticity hash and holder data.
    #[default]
    AuthenticityJson,
    /// A plain validation URL.
    PlainUrl(String),
}

/// A finished raster for one card side.
///
/// Produced by [`CardLayoutEngine::render`], consumed exactly once by the
/// exporter, then dropped; every export re-renders so the output always
/// reflects the latest record.
pub struct RenderedCard {
    side: CardSide,
    surface: Surface,
}

impl RenderedCard {
    /// Which face this raster is.
    pub fn side(&self) -> CardSide {
        self.side
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Premultiplied RGBA pixel data.
    pub fn pixels(&self) -> &[u8] {
        self.surface.pixels()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        self.surface.to_png()
    }

    /// Encode as JPEG at the given quality.
    pub fn to_jpeg(&self, quality: u8) -> Result<Vec<u8>, RasterError> {
        self.surface.to_jpeg(quality)
    }
}

/// Renders card faces at the fixed card resolution.
///
/// The engine owns a resolved font database (so repeated renders skip the
/// system font scan) and the image loader. Each render call creates, draws,
/// and releases its own surface; no raster state outlives a call.
pub struct CardLayoutEngine {
    fonts: ResolvedFontConfig,
    loader: ImageLoader,
    /// Pinned expedition date; None means "today" at render time.
    expedition_date: Option<NaiveDate>,
    code_renderer: Option<Box<dyn ScannableCodeRenderer>>,
    code_payload: CodePayload,
}

impl CardLayoutEngine {
    /// Engine with default fonts (system scan) and default loader timeout.
    pub fn new() -> Self {
        Self::with_fonts(&FontConfig::default())
    }

    /// Engine with a custom font configuration.
    pub fn with_fonts(config: &FontConfig) -> Self {
        Self {
            fonts: config.resolve(),
            loader: ImageLoader::default(),
            expedition_date: None,
            code_renderer: None,
            code_payload: CodePayload::default(),
        }
    }

    /// Replace the image loader (e.g. to shorten the per-image timeout).
    pub fn set_loader(&mut self, loader: ImageLoader) {
        self.loader = loader;
    }

    /// Pin the expedition date instead of using today's.
    ///
    /// The expedition date is the single intentional time-dependent value of a
    /// render; pinning it makes back-side output fully deterministic.
    pub fn set_expedition_date(&mut self, date: NaiveDate) {
        self.expedition_date = Some(date);
    }

    /// Inject a scannable-code collaborator and the payload shape it receives.
    /// Without one, the validation panel renders a placeholder block.
    pub fn set_code_renderer(
        &mut self,
        renderer: Box<dyn ScannableCodeRenderer>,
        payload: CodePayload,
    ) {
        self.code_renderer = Some(renderer);
        self.code_payload = payload;
    }

    /// Render one card face.
    ///
    /// Never fails for missing or empty data fields; the only fatal condition
    /// is the raster surface itself not being creatable. Image loads are
    /// awaited sequentially in draw order, and each failure degrades to a
    /// placeholder.
    pub async fn render(
        &self,
        card: &CardRecord,
        side: CardSide,
    ) -> Result<RenderedCard, RenderError> {
        let mut surface = Surface::with_resolved(CARD_WIDTH, CARD_HEIGHT, &self.fonts)?;
        match side {
            CardSide::Front => self.render_front(card, &mut surface).await,
            CardSide::Back => self.render_back(card, &mut surface),
        }
        Ok(RenderedCard { side, surface })
    }

    fn expedition_date_string(&self) -> String {
        let date = self
            .expedition_date
            .unwrap_or_else(|| Local::now().date_naive());
        date.format("%d/%m/%Y").to_string()
    }

    fn scannable_payload(&self, card: &CardRecord, hash: &str, expedition: &str) -> String {
        match &self.code_payload {
            CodePayload::AuthenticityJson => {
                let name = if card.full_name.is_empty() {
                    "NÃO INFORMADO"
                } else {
                    card.full_name.as_str()
                };
                serde_json::json!({
                    "AUTENTICIDADE": hash,
                    "NOME": name,
                    "MASP": card.masp,
                    "STATUS": card.status.label(),
                    "EXPEDICAO": expedition,
                    "VALIDACAO": "POLÍCIA PENAL - ASSPRIJUF",
                })
                .to_string()
            }
            CodePayload::PlainUrl(url) => url.clone(),
        }
    }

    // --- Front face ---

    async fn render_front(&self, card: &CardRecord, surface: &mut Surface) {
        let theme = card.visual_theme.resolve();
        for step in FRONT_STEPS {
            match step {
                FrontStep::Background => {
                    surface.fill_diagonal_gradient(theme.background, theme.background_edge)
                }
                FrontStep::HeaderBand => draw_header_band(surface, &theme),
                FrontStep::FooterBand => draw_footer_band(surface, &theme),
                FrontStep::BrandLogo => self.draw_brand_logo(card, surface).await,
                FrontStep::SecondaryLogo => self.draw_secondary_logo(card, surface).await,
                FrontStep::Title => draw_title(surface, &theme),
                FrontStep::AccentBars => draw_accent_bars(surface),
                FrontStep::PhotoBox => self.draw_photo_box(card, surface, &theme).await,
                FrontStep::CategoryBadge => draw_category_badge(card, surface, &theme),
                FrontStep::NameBox => draw_name_box(card, surface, &theme),
            }
        }
    }

    async fn draw_brand_logo(&self, card: &CardRecord, surface: &mut Surface) {
        let r = BRAND_LOGO_REGION;
        if card.brand_logo_url.is_empty() {
            // Placeholder ring with the upload hint, as the form preview shows.
            let cx = r.x + r.w / 2.0;
            let cy = r.y + r.h / 2.0;
            surface.stroke_circle(cx, cy, r.w / 2.0 - 6.0, 10.0, rgba(148, 163, 184, 0.7));
            surface.fill_text(
                "INCLUA A MARCA",
                cx,
                cy + 10.0,
                &TextStyle::sans(28.0).black().center(),
                rgba(30, 41, 59, 0.35),
            );
            return;
        }
        match self.loader.load(&card.brand_logo_url).await {
            Ok(bitmap) => surface.draw_bitmap_contain(&bitmap, r.x, r.y, r.w, r.h),
            Err(err) => warn!("brand logo unavailable, leaving region blank: {err}"),
        }
    }

    async fn draw_secondary_logo(&self, card: &CardRecord, surface: &mut Surface) {
        let r = SECONDARY_LOGO_REGION;
        if card.secondary_logo_url.is_empty() {
            return;
        }
        match self.loader.load(&card.secondary_logo_url).await {
            Ok(bitmap) => surface.draw_bitmap_contain(&bitmap, r.x, r.y, r.w, r.h),
            Err(err) => warn!("secondary logo unavailable, leaving region blank: {err}"),
        }
    }

    async fn draw_photo_box(
        &self,
        card: &CardRecord,
        surface: &mut Surface,
        theme: &ThemeDescriptor,
    ) {
        let r = PHOTO_REGION;
        surface.fill_round_rect(r.x, r.y, r.w, r.h, 6.0, theme.photo_border);
        let inner = r.inset(PHOTO_BORDER_WIDTH);
        surface.fill_rect(inner.x, inner.y, inner.w, inner.h, rgb(203, 213, 225));

        if card.photo_url.is_empty() {
            draw_photo_placeholder(surface, inner);
            return;
        }
        match self.loader.load(&card.photo_url).await {
            Ok(bitmap) => surface.draw_bitmap_cover(&bitmap, inner.x, inner.y, inner.w, inner.h),
            Err(err) => {
                warn!("photo unavailable, using placeholder: {err}");
                draw_photo_placeholder(surface, inner);
            }
        }
    }

    // --- Back face ---

    fn render_back(&self, card: &CardRecord, surface: &mut Surface) {
        let theme = card.visual_theme.resolve();
        let expedition = self.expedition_date_string();
        let hash = security_hash(&card.masp, &card.cpf, &expedition);

        for step in BACK_STEPS {
            match step {
                BackStep::Background => surface.fill(rgb(255, 255, 255)),
                BackStep::AccentSidebar => {
                    surface.fill_rect(0.0, 0.0, SIDEBAR_WIDTH, CARD_HEIGHT as f32, theme.accent)
                }
                BackStep::SectionHeader => draw_section_header(card, surface),
                BackStep::InfoRows => draw_info_rows(card, surface, &expedition),
                BackStep::SecuritySeal => draw_security_seal(surface, &hash),
                BackStep::ValidationPanel => {
                    self.draw_validation_panel(card, surface, &hash, &expedition)
                }
                BackStep::FooterText => draw_back_footer(surface),
            }
        }
    }

    fn draw_validation_panel(
        &self,
        card: &CardRecord,
        surface: &mut Surface,
        hash: &str,
        expedition: &str,
    ) {
        let r = CODE_REGION;
        // Rounded frame around the code area
        surface.stroke_round_rect(
            r.x - 24.0,
            r.y - 24.0,
            r.w + 48.0,
            r.h + 48.0,
            40.0,
            12.0,
            rgb(243, 244, 246),
        );

        let mut drew_code = false;
        if let Some(renderer) = &self.code_renderer {
            let payload = self.scannable_payload(card, hash, expedition);
            match renderer.render(&payload, r.w as u32) {
                Ok(bitmap) => {
                    surface.draw_bitmap_contain(&bitmap, r.x, r.y, r.w, r.h);
                    drew_code = true;
                }
                Err(err) => warn!("scannable code unavailable, using placeholder: {err}"),
            }
        }
        if !drew_code {
            surface.fill_rect(r.x, r.y, r.w, r.h, rgb(15, 23, 42));
        }

        let cx = CARD_WIDTH as f32 / 2.0;
        surface.fill_text(
            "VALIDAÇÃO DIGITAL",
            cx,
            r.y + r.h + 76.0,
            &TextStyle::sans(30.0).black().center().spaced(6.0),
            rgb(31, 41, 55),
        );
        surface.fill_text(
            "ESCANEIE PARA CONFERIR A INTEGRIDADE E AUTENTICIDADE DOS DADOS",
            cx,
            r.y + r.h + 110.0,
            &TextStyle::sans(20.0).bold().center(),
            rgb(156, 163, 175),
        );
    }
}

impl Default for CardLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

// --- Fixed front geometry (pixels at 1080x1528) ---

#[derive(Debug, Clone, Copy)]
struct Region {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Region {
    const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    fn inset(self, d: f32) -> Self {
        Self {
            x: self.x + d,
            y: self.y + d,
            w: self.w - 2.0 * d,
            h: self.h - 2.0 * d,
        }
    }
}

const HEADER_HEIGHT: f32 = 96.0;
const FOOTER_HEIGHT: f32 = 176.0;
const BRAND_LOGO_REGION: Region = Region::new(420.0, 116.0, 240.0, 240.0);
const SECONDARY_LOGO_REGION: Region = Region::new(928.0, 116.0, 120.0, 120.0);
const TITLE_BASELINE: f32 = 470.0;
const ACCENT_BAR_Y: f32 = 510.0;
const PHOTO_REGION: Region = Region::new(325.0, 560.0, 430.0, 560.0);
const PHOTO_BORDER_WIDTH: f32 = 12.0;
const CATEGORY_BASELINE: f32 = 1152.0;
const NAME_BOX: Region = Region::new(90.0, 1176.0, 900.0, 148.0);

// --- Fixed back geometry ---

const SIDEBAR_WIDTH: f32 = 32.0;
const ROW_AREA_X: f32 = 80.0;
const ROW_AREA_WIDTH: f32 = 920.0;
const ROW_FIRST_Y: f32 = 210.0;
const ROW_HEIGHT: f32 = 96.0;
const CODE_REGION: Region = Region::new(400.0, 1072.0, 280.0, 280.0);

fn draw_header_band(surface: &mut Surface, theme: &ThemeDescriptor) {
    let w = CARD_WIDTH as f32;
    surface.fill_rect(0.0, 0.0, w, HEADER_HEIGHT, theme.header);
    surface.fill_rect(0.0, HEADER_HEIGHT - 8.0, w, 8.0, rgba(0, 0, 0, 0.1));
    surface.fill_round_rect(
        (w - 360.0) / 2.0,
        42.0,
        360.0,
        10.0,
        5.0,
        rgba(255, 255, 255, 0.2),
    );
}

fn draw_footer_band(surface: &mut Surface, theme: &ThemeDescriptor) {
    let w = CARD_WIDTH as f32;
    let top = CARD_HEIGHT as f32 - FOOTER_HEIGHT;
    surface.fill_rect(0.0, top, w, FOOTER_HEIGHT, theme.footer);
    surface.fill_rect(0.0, top, w, 12.0, rgba(0, 0, 0, 0.2));

    let cx = w / 2.0;
    surface.fill_text(
        "ASSPRIJUF",
        cx,
        top + 76.0,
        &TextStyle::sans(46.0).black().center().spaced(24.0),
        rgb(255, 255, 255),
    );
    surface.fill_round_rect(cx - 132.0, top + 92.0, 264.0, 4.0, 2.0, rgba(255, 255, 255, 0.2));
    surface.fill_text(
        "SECRETARIA DE ESTADO DE JUSTIÇA E SEGURANÇA PÚBLICA",
        cx,
        top + 138.0,
        &TextStyle::sans(22.0).bold().center(),
        rgba(255, 255, 255, 0.7),
    );
}

fn draw_title(surface: &mut Surface, theme: &ThemeDescriptor) {
    surface.fill_text(
        "POLÍCIA PENAL",
        CARD_WIDTH as f32 / 2.0,
        TITLE_BASELINE,
        &TextStyle::sans(104.0).black().center(),
        theme.text_main,
    );
}

fn draw_accent_bars(surface: &mut Surface) {
    let cx = CARD_WIDTH as f32 / 2.0;
    let red = rgb(220, 38, 38);
    surface.fill_round_rect(cx - 224.0, ACCENT_BAR_Y, 190.0, 8.0, 4.0, red);
    surface.fill_round_rect(cx + 34.0, ACCENT_BAR_Y, 190.0, 8.0, 4.0, red);
    let dot_y = ACCENT_BAR_Y + 4.0;
    surface.fill_circle(cx, dot_y, 12.0, rgb(30, 41, 59));
    surface.stroke_circle(cx, dot_y, 12.0, 4.0, rgb(255, 255, 255));
}

fn draw_photo_placeholder(surface: &mut Surface, inner: Region) {
    let cx = inner.x + inner.w / 2.0;
    let ink = rgba(30, 41, 59, 0.3);
    // Head and torso glyph
    surface.fill_circle(cx, inner.y + inner.h * 0.30, 62.0, ink);
    surface.fill_round_rect(cx - 105.0, inner.y + inner.h * 0.42, 210.0, 120.0, 58.0, ink);

    let caption = TextStyle::sans(26.0).black().center().spaced(2.0);
    surface.fill_text(
        "INCLUA FOTO POLICIAL",
        cx,
        inner.y + inner.h * 0.72,
        &caption,
        ink,
    );
    surface.fill_text(
        "OU DEPENDENTE",
        cx,
        inner.y + inner.h * 0.72 + 36.0,
        &caption,
        ink,
    );
}

fn draw_category_badge(card: &CardRecord, surface: &mut Surface, theme: &ThemeDescriptor) {
    surface.fill_text(
        card.category.label(),
        CARD_WIDTH as f32 / 2.0,
        CATEGORY_BASELINE,
        &TextStyle::sans(34.0).black().center().spaced(8.0),
        with_alpha(theme.text_main, 0.6),
    );
}

fn draw_name_box(card: &CardRecord, surface: &mut Surface, theme: &ThemeDescriptor) {
    let display_name = if card.full_name.is_empty() {
        NAME_FALLBACK.to_string()
    } else {
        card.full_name.to_uppercase()
    };

    let b = NAME_BOX;
    surface.fill_round_rect(b.x, b.y, b.w, b.h, 28.0, theme.name_box);

    let px = name_font_px(&display_name);
    let baseline = b.y + b.h / 2.0 + px * 0.35;
    surface.fill_text(
        &display_name,
        CARD_WIDTH as f32 / 2.0,
        baseline,
        &TextStyle::sans(px).black().center(),
        theme.text_name,
    );

    // Accent underline below the box
    surface.fill_round_rect(
        b.x,
        b.y + b.h + 16.0,
        b.w,
        8.0,
        4.0,
        rgba(220, 38, 38, 0.8),
    );
}

fn draw_section_header(card: &CardRecord, surface: &mut Surface) {
    surface.fill_rect(ROW_AREA_X, 96.0, 8.0, 56.0, rgb(220, 38, 38));
    surface.fill_text(
        "DADOS FUNCIONAIS",
        ROW_AREA_X + 24.0,
        140.0,
        &TextStyle::sans(44.0).black().spaced(4.0),
        rgb(31, 41, 55),
    );

    // Status pill, sized to its text
    let status_color = if card.status.is_active() {
        rgb(22, 163, 74)
    } else {
        rgb(220, 38, 38)
    };
    let style = TextStyle::sans(30.0).black();
    let text_w = surface.measure_text(card.status.label(), &style);
    let pill_w = text_w + 48.0;
    let pill_x = ROW_AREA_X + ROW_AREA_WIDTH - pill_w;
    surface.stroke_round_rect(pill_x, 100.0, pill_w, 56.0, 28.0, 4.0, status_color);
    surface.fill_text(
        card.status.label(),
        pill_x + pill_w / 2.0,
        138.0,
        &style.center(),
        status_color,
    );
}

fn draw_info_rows(card: &CardRecord, surface: &mut Surface, expedition: &str) {
    let mut y = ROW_FIRST_Y;
    for slot in back_rows(card, expedition) {
        match slot {
            RowSlot::Full(row) => {
                draw_row(surface, ROW_AREA_X, y, ROW_AREA_WIDTH, &row);
            }
            RowSlot::Pair(left, right) => {
                let half = (ROW_AREA_WIDTH - 40.0) / 2.0;
                draw_row(surface, ROW_AREA_X, y, half, &left);
                draw_row(surface, ROW_AREA_X + half + 40.0, y, half, &right);
            }
        }
        y += ROW_HEIGHT;
    }
}

fn draw_row(surface: &mut Surface, x: f32, y: f32, w: f32, row: &InfoRow) {
    if row.highlight {
        surface.fill_rect(x, y, w, ROW_HEIGHT - 8.0, rgba(248, 250, 252, 0.5));
    }
    surface.fill_text(
        row.label,
        x,
        y + 30.0,
        &TextStyle::sans(22.0).bold().spaced(2.0),
        rgb(156, 163, 175),
    );
    let value_color = if row.highlight {
        if row.value == "ATIVO" {
            rgb(22, 163, 74)
        } else {
            rgb(220, 38, 38)
        }
    } else {
        rgb(31, 41, 55)
    };
    surface.fill_text(
        &row.value,
        x,
        y + 76.0,
        &TextStyle::sans(36.0).bold(),
        value_color,
    );
    surface.fill_rect(x, y + ROW_HEIGHT - 8.0, w, 2.0, rgb(243, 244, 246));
}

fn draw_security_seal(surface: &mut Surface, hash: &str) {
    let right = ROW_AREA_X + ROW_AREA_WIDTH;
    surface.fill_text(
        "SELO DE AUTENTICIDADE DIGITAL",
        right,
        1008.0,
        &TextStyle::sans(20.0).bold().right(),
        rgb(156, 163, 175),
    );
    surface.fill_text(
        hash,
        right,
        1044.0,
        &TextStyle::mono(30.0).black().right(),
        rgba(31, 41, 55, 0.4),
    );
}

fn draw_back_footer(surface: &mut Surface) {
    let cx = CARD_WIDTH as f32 / 2.0;
    surface.fill_text(
        "ESTA CARTEIRA É PESSOAL E INTRANSFERÍVEL. O PORTE É OBRIGATÓRIO EM SERVIÇO.",
        cx,
        1478.0,
        &TextStyle::sans(20.0).center(),
        rgb(156, 163, 175),
    );
    surface.fill_text(
        "ASSPRIJUF - JUIZ DE FORA",
        cx,
        1510.0,
        &TextStyle::sans(22.0).bold().center().spaced(2.0),
        rgb(107, 114, 128),
    );
}

// --- Color helpers ---

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Color {
    Color::from_rgba8(r, g, b, (alpha * 255.0).round() as u8)
}

fn with_alpha(mut color: Color, alpha: f32) -> Color {
    color.set_alpha(alpha);
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Status;
    use rstest::rstest;

    #[rstest]
    #[case(String::new(), NAME_FONT_LARGE_PX)]
    #[case("JOÃO DA SILVA".to_string(), NAME_FONT_LARGE_PX)]
    #[case("A".repeat(22), NAME_FONT_LARGE_PX)]
    #[case("A".repeat(23), NAME_FONT_MIDDLE_PX)]
    #[case("A".repeat(30), NAME_FONT_MIDDLE_PX)]
    #[case("A".repeat(31), NAME_FONT_SMALL_PX)]
    #[case("A".repeat(80), NAME_FONT_SMALL_PX)]
    fn test_name_font_tiers(#[case] name: String, #[case] expected: f32) {
        assert_eq!(name_font_px(&name), expected);
    }

    #[test]
    fn test_name_tier_counts_chars_not_bytes() {
        // 22 characters, more than 22 bytes
        let name = "Ã".repeat(22);
        assert_eq!(name_font_px(&name), NAME_FONT_LARGE_PX);
    }

    #[test]
    fn test_display_value_placeholder() {
        assert_eq!(display_value(""), "---");
        assert_eq!(display_value("123.456-7"), "123.456-7");
    }

    #[test]
    fn test_back_rows_empty_fields_show_placeholder() {
        let card = CardRecord::default();
        let rows = back_rows(&card, "01/01/2025");

        let mut cells: Vec<&InfoRow> = Vec::new();
        for slot in &rows {
            match slot {
                RowSlot::Full(row) => cells.push(row),
                RowSlot::Pair(l, r) => {
                    cells.push(l);
                    cells.push(r);
                }
            }
        }

        for cell in &cells {
            match cell.label {
                "STATUS DO CADASTRO" => assert_eq!(cell.value, "INEXISTENTE"),
                "EXPEDIÇÃO" => assert_eq!(cell.value, "01/01/2025"),
                _ => assert_eq!(cell.value, "---", "label {}", cell.label),
            }
        }
    }

    #[test]
    fn test_back_rows_carry_values_verbatim() {
        let card = CardRecord {
            masp: "123.456-7".to_string(),
            status: Status::Ativo,
            blood_type: "O+".to_string(),
            ..CardRecord::default()
        };
        let rows = back_rows(&card, "01/01/2025");

        match &rows[0] {
            RowSlot::Full(row) => {
                assert_eq!(row.label, "MASP");
                assert_eq!(row.value, "123.456-7");
            }
            other => panic!("unexpected first slot: {:?}", other),
        }
        match &rows[1] {
            RowSlot::Full(row) => {
                assert!(row.highlight);
                assert_eq!(row.value, "ATIVO");
            }
            other => panic!("unexpected second slot: {:?}", other),
        }
    }

    #[test]
    fn test_front_step_order() {
        assert_eq!(
            FRONT_STEPS,
            [
                FrontStep::Background,
                FrontStep::HeaderBand,
                FrontStep::FooterBand,
                FrontStep::BrandLogo,
                FrontStep::SecondaryLogo,
                FrontStep::Title,
                FrontStep::AccentBars,
                FrontStep::PhotoBox,
                FrontStep::CategoryBadge,
                FrontStep::NameBox,
            ]
        );
    }

    #[test]
    fn test_back_step_order() {
        assert_eq!(
            BACK_STEPS,
            [
                BackStep::Background,
                BackStep::AccentSidebar,
                BackStep::SectionHeader,
                BackStep::InfoRows,
                BackStep::SecuritySeal,
                BackStep::ValidationPanel,
                BackStep::FooterText,
            ]
        );
    }

    #[test]
    fn test_security_hash_format() {
        let hash = security_hash("123.456-7", "000.000.000-00", "05/08/2026");
        assert_eq!(hash.chars().count(), 16);
        assert_eq!(hash, hash.to_uppercase());
        // Deterministic for fixed inputs
        assert_eq!(hash, security_hash("123.456-7", "000.000.000-00", "05/08/2026"));
        // Sensitive to its inputs
        assert_ne!(hash, security_hash("123.456-8", "000.000.000-00", "05/08/2026"));
    }

    #[test]
    fn test_scannable_payload_shapes() {
        let mut engine = CardLayoutEngine::with_fonts(&FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        });
        let card = CardRecord {
            masp: "123".to_string(),
            ..CardRecord::default()
        };

        let json = engine.scannable_payload(&card, "HASH", "01/01/2025");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["AUTENTICIDADE"], "HASH");
        assert_eq!(value["NOME"], "NÃO INFORMADO");
        assert_eq!(value["MASP"], "123");

        engine.code_payload = CodePayload::PlainUrl("https://example.com/v/1".to_string());
        assert_eq!(
            engine.scannable_payload(&card, "HASH", "01/01/2025"),
            "https://example.com/v/1"
        );
    }
}
