use crate::units::Pt;

/// The font variant a host should select when drawing or measuring text.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum FontKind {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// A single boolean style attribute toggled by inline markup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StyleAttribute {
    Bold,
    Italic,
    Underline,
}

/// Heading level opened by `#` or `##` markup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
}

/// A partial style applied over the default style when a heading opens.
/// Unset fields keep the default style's value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeadingStyle {
    pub font_size: Option<Pt>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    /// Line height factor override; when unset the metrics provider's
    /// current factor is used.
    pub line_height: Option<f32>,
    /// Extra vertical space added below each explicitly broken line while
    /// this style is active.
    pub margin_bottom: Option<Pt>,
}

/// Heading styles recognized by the tokenizer's `#`/`##` markup.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StyleSheet {
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
}

impl StyleSheet {
    pub fn heading(&self, level: HeadingLevel) -> &HeadingStyle {
        match level {
            HeadingLevel::H1 => &self.h1,
            HeadingLevel::H2 => &self.h2,
        }
    }
}

/// The full style in effect at one point of the token stream. Exactly one
/// state is current at any time during layout; structural tokens mutate it,
/// and every positioned span records a snapshot of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleState {
    pub font_size: Pt,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub line_height: Option<f32>,
    pub margin_bottom: Option<Pt>,
}

impl StyleState {
    /// The default style: the host's font size at layout start, all
    /// attributes off, no overrides.
    pub fn with_font_size(font_size: Pt) -> StyleState {
        StyleState {
            font_size,
            bold: false,
            italic: false,
            underline: false,
            line_height: None,
            margin_bottom: None,
        }
    }

    /// The font kind implied by the current bold/italic attributes.
    pub fn font_kind(&self) -> FontKind {
        match (self.bold, self.italic) {
            (false, false) => FontKind::Normal,
            (true, false) => FontKind::Bold,
            (false, true) => FontKind::Italic,
            (true, true) => FontKind::BoldItalic,
        }
    }

    /// Flip one attribute on or off, leaving the rest of the state alone.
    pub fn set(&mut self, attribute: StyleAttribute, on: bool) {
        match attribute {
            StyleAttribute::Bold => self.bold = on,
            StyleAttribute::Italic => self.italic = on,
            StyleAttribute::Underline => self.underline = on,
        }
    }

    /// The result of opening a heading: the patch merged over this state.
    pub fn patched(&self, patch: &HeadingStyle) -> StyleState {
        StyleState {
            font_size: patch.font_size.unwrap_or(self.font_size),
            bold: patch.bold.unwrap_or(self.bold),
            italic: patch.italic.unwrap_or(self.italic),
            underline: patch.underline.unwrap_or(self.underline),
            line_height: patch.line_height.or(self.line_height),
            margin_bottom: patch.margin_bottom.or(self.margin_bottom),
        }
    }
}
