use crate::error::TextBoxError;
use crate::pagesize::PageSize;
use crate::style::FontKind;
use crate::units::Pt;
use owned_ttf_parser::{AsFaceRef, OwnedFace};

/// The rendered dimensions of a piece of text under the current font state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextSize {
    pub width: Pt,
    pub height: Pt,
}

/// Measurement capability the layout engine requires of its host.
///
/// The provider owns the host's shared font registers: the current font
/// kind, font size, and line height factor. The layout engine mutates these
/// registers while walking the token stream, so it brackets every pass with
/// [`save_state`](MetricsProvider::save_state) /
/// [`restore_state`](MetricsProvider::restore_state) to keep style
/// mutations from leaking into unrelated rendering.
pub trait MetricsProvider {
    /// Measure the rendered width and height of `text` under the current
    /// font kind and size.
    fn measure(&self, text: &str) -> TextSize;

    fn font_kind(&self) -> FontKind;
    fn set_font_kind(&mut self, kind: FontKind);

    fn font_size(&self) -> Pt;
    fn set_font_size(&mut self, size: Pt);

    fn line_height_factor(&self) -> f32;
    fn set_line_height_factor(&mut self, factor: f32);

    /// The page dimensions used when resolving box geometry defaults.
    fn page_size(&self) -> PageSize;

    /// Push the current font registers onto the graphics-state stack.
    fn save_state(&mut self);
    /// Pop the graphics-state stack, restoring the saved font registers.
    /// Note: the line height factor is not part of the saved state.
    fn restore_state(&mut self);
}

#[derive(Debug, Copy, Clone)]
struct FontRegisters {
    kind: FontKind,
    size: Pt,
}

/// Approximate metrics using fixed ratios instead of real font data.
///
/// The average advance width of Latin glyphs in a proportional font is
/// roughly 0.6× the font size, and the glyph height is taken as the font
/// size itself. Deterministic and font-free, which makes it suitable for
/// tests and for hosts that have no face loaded yet.
pub struct ApproximateMetrics {
    page: PageSize,
    kind: FontKind,
    size: Pt,
    line_height_factor: f32,
    saved: Vec<FontRegisters>,
}

const CHAR_WIDTH_RATIO: f32 = 0.6;

impl ApproximateMetrics {
    pub fn new(page: PageSize, font_size: Pt) -> ApproximateMetrics {
        ApproximateMetrics {
            page,
            kind: FontKind::Normal,
            size: font_size,
            line_height_factor: 1.15,
            saved: Vec::new(),
        }
    }
}

impl MetricsProvider for ApproximateMetrics {
    fn measure(&self, text: &str) -> TextSize {
        TextSize {
            width: self.size * (text.chars().count() as f32 * CHAR_WIDTH_RATIO),
            height: self.size,
        }
    }

    fn font_kind(&self) -> FontKind {
        self.kind
    }

    fn set_font_kind(&mut self, kind: FontKind) {
        self.kind = kind;
    }

    fn font_size(&self) -> Pt {
        self.size
    }

    fn set_font_size(&mut self, size: Pt) {
        self.size = size;
    }

    fn line_height_factor(&self) -> f32 {
        self.line_height_factor
    }

    fn set_line_height_factor(&mut self, factor: f32) {
        self.line_height_factor = factor;
    }

    fn page_size(&self) -> PageSize {
        self.page
    }

    fn save_state(&mut self) {
        self.saved.push(FontRegisters {
            kind: self.kind,
            size: self.size,
        });
    }

    fn restore_state(&mut self) {
        if let Some(registers) = self.saved.pop() {
            self.kind = registers.kind;
            self.size = registers.size;
        }
    }
}

/// Metrics backed by real TTF/OTF faces, one per font kind. Kinds without a
/// loaded face fall back to the normal face, so a single regular font is
/// enough to get started.
pub struct FaceMetrics {
    normal: OwnedFace,
    bold: Option<OwnedFace>,
    italic: Option<OwnedFace>,
    bold_italic: Option<OwnedFace>,
    page: PageSize,
    kind: FontKind,
    size: Pt,
    line_height_factor: f32,
    saved: Vec<FontRegisters>,
}

impl FaceMetrics {
    /// Parse the regular face from raw font bytes, returning an error if
    /// the font could not be parsed
    pub fn new(font_data: Vec<u8>, page: PageSize, font_size: Pt) -> Result<FaceMetrics, TextBoxError> {
        let normal = OwnedFace::from_vec(font_data, 0)?;
        Ok(FaceMetrics {
            normal,
            bold: None,
            italic: None,
            bold_italic: None,
            page,
            kind: FontKind::Normal,
            size: font_size,
            line_height_factor: 1.15,
            saved: Vec::new(),
        })
    }

    pub fn with_bold(mut self, font_data: Vec<u8>) -> Result<FaceMetrics, TextBoxError> {
        self.bold = Some(OwnedFace::from_vec(font_data, 0)?);
        Ok(self)
    }

    pub fn with_italic(mut self, font_data: Vec<u8>) -> Result<FaceMetrics, TextBoxError> {
        self.italic = Some(OwnedFace::from_vec(font_data, 0)?);
        Ok(self)
    }

    pub fn with_bold_italic(mut self, font_data: Vec<u8>) -> Result<FaceMetrics, TextBoxError> {
        self.bold_italic = Some(OwnedFace::from_vec(font_data, 0)?);
        Ok(self)
    }

    fn face(&self) -> &OwnedFace {
        let variant = match self.kind {
            FontKind::Normal => None,
            FontKind::Bold => self.bold.as_ref(),
            FontKind::Italic => self.italic.as_ref(),
            FontKind::BoldItalic => self.bold_italic.as_ref(),
        };
        variant.unwrap_or(&self.normal)
    }
}

impl MetricsProvider for FaceMetrics {
    fn measure(&self, text: &str) -> TextSize {
        let face = self.face().as_face_ref();
        let scaling = self.size / face.units_per_em() as f32;
        let width: Pt = text
            .chars()
            .filter_map(|ch| {
                face.glyph_index(ch)
                    .or_else(|| face.glyph_index('\u{FFFD}'))
                    .or_else(|| face.glyph_index('?'))
            })
            .map(|gid| scaling * face.glyph_hor_advance(gid).unwrap_or_default() as f32)
            .sum();
        let height = scaling * (face.ascender() - face.descender()) as f32;
        TextSize { width, height }
    }

    fn font_kind(&self) -> FontKind {
        self.kind
    }

    fn set_font_kind(&mut self, kind: FontKind) {
        self.kind = kind;
    }

    fn font_size(&self) -> Pt {
        self.size
    }

    fn set_font_size(&mut self, size: Pt) {
        self.size = size;
    }

    fn line_height_factor(&self) -> f32 {
        self.line_height_factor
    }

    fn set_line_height_factor(&mut self, factor: f32) {
        self.line_height_factor = factor;
    }

    fn page_size(&self) -> PageSize {
        self.page
    }

    fn save_state(&mut self) {
        self.saved.push(FontRegisters {
            kind: self.kind,
            size: self.size,
        });
    }

    fn restore_state(&mut self) {
        if let Some(registers) = self.saved.pop() {
            self.kind = registers.kind;
            self.size = registers.size;
        }
    }
}
