//! The line-breaking, justification and pagination engine.
//!
//! [`layout_text`] tokenizes markup and walks the token stream once,
//! tracking the cursor, the active style, the current line and page, and
//! the overflow policy simultaneously. The output is a resolved stream of
//! positioned spans and structural markers plus a [`LayoutSummary`]; no
//! drawing happens here. Replay the result onto a host surface with
//! [`draw`](crate::render::draw).

use crate::geometry::BoxGeometry;
use crate::justify::justify_line;
use crate::margins::Margins;
use crate::metrics::MetricsProvider;
use crate::style::{StyleSheet, StyleState};
use crate::token::{tokenize, Token, TokenizerMode};
use crate::units::Pt;
use log::debug;

/// Horizontal alignment of each laid out line.
///
/// The `Justify*` variants stretch lines closed by an overflow to the full
/// box width; lines closed by an explicit break degrade to `Left`, `Right`
/// and `Center` respectively.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
    JustifyRight,
    JustifyCenter,
}

impl TextAlign {
    /// The alignment used for a line closed by a forced break.
    pub(crate) fn degraded(self) -> TextAlign {
        match self {
            TextAlign::Justify => TextAlign::Left,
            TextAlign::JustifyRight => TextAlign::Right,
            TextAlign::JustifyCenter => TextAlign::Center,
            other => other,
        }
    }
}

/// Which part of the glyph box the y coordinate of a drawn span refers to.
/// Passed through to the host's text primitive untouched.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
    Bottom,
    Alphabetic,
    Hanging,
}

/// Options controlling one layout pass. All fields have usable defaults;
/// unset geometry fields are resolved against the page size (see
/// [`BoxGeometry::resolve`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxOptions {
    /// Initial y position of the first line. Defaults to the top margin.
    pub start_y: Option<Pt>,
    /// Page margins; unset sides participate in geometry defaulting.
    pub margin: Margins,
    /// Width of the text box. Defaults to the page width minus margins.
    pub width: Option<Pt>,
    /// Baseline passed through to the host when drawing.
    pub baseline: Baseline,
    /// Limit on the number of lines per page.
    pub num_lines: Option<usize>,
    /// Maximum height. Defaults to the page height minus margins.
    pub max_height: Option<Pt>,
    /// Append an ellipsis to the last placed run when text is truncated.
    pub ellipsis: bool,
    /// When `false`, lines only break at explicit line breaks; overflowing
    /// content is dropped until the next one. Defaults to `true`.
    pub line_break: bool,
    /// Whether content may continue onto new pages. Defaults to `true`.
    pub page_break: bool,
    pub text_align: TextAlign,
    /// Styles applied by `#`/`##` heading markup.
    pub styles: StyleSheet,
    pub tokenizer: TokenizerMode,
}

impl Default for TextBoxOptions {
    fn default() -> TextBoxOptions {
        TextBoxOptions {
            start_y: None,
            margin: Margins::default(),
            width: None,
            baseline: Baseline::default(),
            num_lines: None,
            max_height: None,
            ellipsis: false,
            line_break: true,
            page_break: true,
            text_align: TextAlign::default(),
            styles: StyleSheet::default(),
            tokenizer: TokenizerMode::default(),
        }
    }
}

/// The content of a positioned span.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanKind {
    Word(String),
    Space,
}

/// A placeable token augmented with its box-relative position, measured
/// size, and a snapshot of the style active when it was placed.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedSpan {
    pub kind: SpanKind,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
    pub style: StyleState,
}

/// One element of the resolved output stream, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    /// A word or space with geometry.
    Span(PositionedSpan),
    /// A structural token preserved for the renderer to replay.
    Marker(Token),
    /// Content continues on a new page from here on.
    PageBreak,
}

/// Totals computed once layout completes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutSummary {
    /// Number of pages the content spans.
    pub pages: usize,
    /// The y position one line height below the last placed line.
    pub final_y: Pt,
    /// Height consumed on the last page: relative to the starting y when
    /// everything fit on one page, relative to the top margin otherwise.
    pub final_height: Pt,
}

/// The resolved output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxLayout {
    pub items: Vec<LayoutItem>,
    pub summary: LayoutSummary,
    /// The baseline option captured for the draw phase.
    pub baseline: Baseline,
}

/// Tokenizes `text` and lays the token stream out; see [`layout_tokens`].
pub fn layout_text(
    text: &str,
    options: &TextBoxOptions,
    metrics: &mut dyn MetricsProvider,
) -> TextBoxLayout {
    let tokens = tokenize(text, options.tokenizer);
    layout_tokens(&tokens, options, metrics)
}

/// Lays out a token stream within the box described by `options`, calling
/// the metrics provider to measure every placeable token under the style
/// active at that point.
///
/// The provider's font registers are saved on entry and restored before
/// returning, on every exit path, so no style mutation leaks into the
/// host's unrelated rendering. The line height factor is forced to 1 for
/// the duration of the pass and restored separately, since it is not part
/// of the provider's saved graphics state.
///
/// This never fails: malformed markup degrades gracefully, and running out
/// of vertical room with page breaks forbidden is a normal termination
/// that yields the partial resolved stream laid out so far.
pub fn layout_tokens(
    tokens: &[Token],
    options: &TextBoxOptions,
    metrics: &mut dyn MetricsProvider,
) -> TextBoxLayout {
    let geom = BoxGeometry::resolve(options, metrics.page_size());

    let previous_factor = metrics.line_height_factor();
    metrics.save_state();
    metrics.set_line_height_factor(1.0);

    let default_style = StyleState::with_font_size(metrics.font_size());

    let mut pass = LayoutPass {
        geom,
        options,
        metrics: &mut *metrics,
        default_style,
        style: default_style,
        line_height: Pt(0.0),
        items: Vec::new(),
        x: geom.left,
        y: geom.start_y,
        lines: 1,
        pages: 1,
        line_start: 0,
        skip_to_next_line: false,
    };
    pass.apply_style();
    pass.line_height = pass.current_line_height();
    pass.run(tokens);

    let summary = LayoutSummary {
        pages: pass.pages,
        final_y: pass.y + pass.line_height,
        final_height: if pass.pages == 1 {
            pass.y - geom.start_y + pass.line_height
        } else {
            pass.y - geom.top + pass.line_height
        },
    };
    debug!(
        "layout complete: {} page(s), final y {}",
        summary.pages, summary.final_y
    );
    let items = pass.items;

    metrics.restore_state();
    metrics.set_line_height_factor(previous_factor);

    TextBoxLayout {
        items,
        summary,
        baseline: options.baseline,
    }
}

/// All state carried across the token stream during one layout pass.
struct LayoutPass<'a> {
    geom: BoxGeometry,
    options: &'a TextBoxOptions,
    metrics: &'a mut dyn MetricsProvider,
    default_style: StyleState,
    style: StyleState,
    line_height: Pt,
    items: Vec<LayoutItem>,
    x: Pt,
    y: Pt,
    lines: usize,
    pages: usize,
    /// Index into `items` where the current unjustified line begins.
    line_start: usize,
    /// Set when a line was closed by overflow with soft wrapping disabled;
    /// placeable tokens are dropped until the next explicit line break.
    skip_to_next_line: bool,
}

impl LayoutPass<'_> {
    fn run(&mut self, tokens: &[Token]) {
        // no vertical room for even one line at the starting position:
        // continue on a fresh page
        if self.y + self.line_height > self.geom.max_y {
            debug!("no room for a first line at y {}, starting a new page", self.y);
            self.items.push(LayoutItem::PageBreak);
            self.pages += 1;
            self.y = self.geom.top;
        }

        'tokens: for token in tokens {
            match token {
                Token::LineBreak => {
                    self.skip_to_next_line = false;
                    self.x = self.geom.left;
                    self.y += self.style.margin_bottom.unwrap_or(Pt(0.0)) + self.line_height;
                    self.lines += 1;
                    self.close_line(true);
                    self.items.push(LayoutItem::Marker(Token::LineBreak));
                    self.line_start = self.items.len();
                    if !self.check_page() {
                        break 'tokens;
                    }
                }
                Token::Heading(level) => {
                    self.style = self
                        .default_style
                        .patched(self.options.styles.heading(*level));
                    self.apply_style();
                    self.line_height = self.current_line_height();
                    self.items.push(LayoutItem::Marker(token.clone()));
                }
                Token::ParagraphReset => {
                    self.style = self.default_style;
                    self.apply_style();
                    self.line_height = self.current_line_height();
                    self.items.push(LayoutItem::Marker(Token::ParagraphReset));
                }
                Token::Style { attribute, on } => {
                    self.style.set(*attribute, *on);
                    self.apply_style();
                    self.items.push(LayoutItem::Marker(token.clone()));
                }
                Token::Space => {
                    if !self.place(SpanKind::Space) {
                        break 'tokens;
                    }
                }
                Token::Text(content) => {
                    if !self.place(SpanKind::Word(content.clone())) {
                        break 'tokens;
                    }
                }
            }
        }

        self.close_line(true);
    }

    /// Measure and place one word or space at the cursor, wrapping or
    /// truncating first if it would overflow the right edge. Returns
    /// `false` when layout must terminate entirely.
    fn place(&mut self, kind: SpanKind) -> bool {
        if self.skip_to_next_line {
            return true;
        }

        let size = {
            let text = match &kind {
                SpanKind::Word(text) => text.as_str(),
                SpanKind::Space => " ",
            };
            self.metrics.measure(text)
        };

        if self.x + size.width > self.geom.max_x {
            self.close_line(false);
            self.line_start = self.items.len();

            if self.options.line_break {
                self.x = self.geom.left;
                self.y += self.line_height;
                self.lines += 1;
                if !self.check_page() {
                    return false;
                }
            } else {
                if self.options.ellipsis {
                    self.add_ellipsis();
                }
                self.skip_to_next_line = true;
                return true;
            }
        }

        self.items.push(LayoutItem::Span(PositionedSpan {
            kind,
            x: self.x,
            y: self.y,
            width: size.width,
            height: size.height,
            style: self.style,
        }));
        self.x += size.width;
        true
    }

    /// Justify the items of the line that just closed, in place.
    fn close_line(&mut self, forced_break: bool) {
        justify_line(
            &mut self.items[self.line_start..],
            self.geom.left,
            self.geom.width,
            self.options.text_align,
            forced_break,
        );
    }

    /// After a line closes: break to a new page when there is no room for
    /// the next line or the line limit is exceeded. Returns `false` when
    /// page breaks are forbidden and layout must terminate.
    fn check_page(&mut self) -> bool {
        let out_of_lines = self
            .options
            .num_lines
            .is_some_and(|limit| self.lines > limit);
        if self.y + self.line_height > self.geom.max_y || out_of_lines {
            if self.options.page_break {
                debug!("breaking to page {} at y {}", self.pages + 1, self.y);
                self.items.push(LayoutItem::PageBreak);
                self.pages += 1;
                self.x = self.geom.left;
                self.y = self.geom.top;
                self.lines = 1;
            } else {
                if self.options.ellipsis {
                    self.add_ellipsis();
                }
                return false;
            }
        }
        true
    }

    /// Replace the tail of the last placed word run with an ellipsis,
    /// stripping trailing punctuation and spaces first, and re-measure it.
    fn add_ellipsis(&mut self) {
        let target = self.items.iter().rposition(|item| {
            matches!(
                item,
                LayoutItem::Span(PositionedSpan {
                    kind: SpanKind::Word(_),
                    ..
                })
            )
        });
        let Some(index) = target else {
            return;
        };

        let new_text = {
            let LayoutItem::Span(span) = &self.items[index] else {
                unreachable!()
            };
            let SpanKind::Word(text) = &span.kind else {
                unreachable!()
            };
            let mut text = text.trim_end_matches(['.', ',', ';', ' ']).to_string();
            text.push_str("...");
            text
        };
        let width = self.metrics.measure(&new_text).width;

        if let LayoutItem::Span(span) = &mut self.items[index] {
            span.kind = SpanKind::Word(new_text);
            span.width = width;
        }
    }

    fn apply_style(&mut self) {
        self.metrics.set_font_kind(self.style.font_kind());
        self.metrics.set_font_size(self.style.font_size);
    }

    /// The height of lines closed from this point forward: a sample
    /// measurement under the current font registers, scaled by the style's
    /// line height factor (or the provider's when the style has none).
    fn current_line_height(&self) -> Pt {
        let factor = self
            .style
            .line_height
            .unwrap_or_else(|| self.metrics.line_height_factor());
        self.metrics.measure("test").height * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproximateMetrics;
    use crate::pagesize::LETTER;
    use crate::style::{FontKind, HeadingStyle};

    // 10pt font under ApproximateMetrics: 6pt per character, 10pt glyph
    // height, 10pt line height once the engine forces the factor to 1
    const PAGE: (Pt, Pt) = (Pt(200.0), Pt(100.0));

    fn metrics() -> ApproximateMetrics {
        ApproximateMetrics::new(PAGE, Pt(10.0))
    }

    fn words(layout: &TextBoxLayout) -> Vec<&str> {
        layout
            .items
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Span(PositionedSpan {
                    kind: SpanKind::Word(text),
                    ..
                }) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn spans(layout: &TextBoxLayout) -> Vec<&PositionedSpan> {
        layout
            .items
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Span(span) => Some(span),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn greedy_placement_wraps_at_the_right_edge() {
        let options = TextBoxOptions {
            width: Some(Pt(30.0)),
            ..TextBoxOptions::default()
        };
        let layout = layout_text("aaaa bb", &options, &mut metrics());

        let spans = spans(&layout);
        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].x, spans[0].y), (Pt(0.0), Pt(0.0)));
        assert_eq!(spans[0].width, Pt(24.0));
        // the trailing space exactly reaches the edge and stays on line one
        assert_eq!((spans[1].x, spans[1].y), (Pt(24.0), Pt(0.0)));
        // "bb" no longer fits and opens line two
        assert_eq!((spans[2].x, spans[2].y), (Pt(0.0), Pt(10.0)));
        assert_eq!(layout.summary.pages, 1);
    }

    #[test]
    fn single_line_box_paginates_before_the_second_line() {
        let options = TextBoxOptions {
            max_height: Some(Pt(10.0)),
            ..TextBoxOptions::default()
        };
        let layout = layout_text("a\nb", &options, &mut metrics());

        assert_eq!(layout.summary.pages, 2);
        assert!(matches!(layout.items[0], LayoutItem::Span(_)));
        assert!(matches!(layout.items[1], LayoutItem::Marker(Token::LineBreak)));
        // the page break lands immediately before the second line's span
        assert!(matches!(layout.items[2], LayoutItem::PageBreak));
        let LayoutItem::Span(second) = &layout.items[3] else {
            panic!("expected the second line's span");
        };
        assert_eq!((second.x, second.y), (Pt(0.0), Pt(0.0)));
    }

    #[test]
    fn no_room_for_a_first_line_starts_on_a_new_page() {
        let options = TextBoxOptions {
            start_y: Some(Pt(95.0)),
            margin: Margins::all(Pt(0.0)),
            ..TextBoxOptions::default()
        };
        let layout = layout_text("a", &options, &mut metrics());

        assert!(matches!(layout.items[0], LayoutItem::PageBreak));
        assert_eq!(layout.summary.pages, 2);
        let LayoutItem::Span(span) = &layout.items[1] else {
            panic!("expected a span after the page break");
        };
        assert_eq!(span.y, Pt(0.0));
    }

    #[test]
    fn forbidden_page_breaks_terminate_layout() {
        let options = TextBoxOptions {
            max_height: Some(Pt(10.0)),
            page_break: false,
            ..TextBoxOptions::default()
        };
        let layout = layout_text("a\nb", &options, &mut metrics());

        assert_eq!(layout.summary.pages, 1);
        assert_eq!(words(&layout), vec!["a"]);
    }

    #[test]
    fn truncation_with_ellipsis_strips_trailing_punctuation() {
        let options = TextBoxOptions {
            width: Some(Pt(30.0)),
            line_break: false,
            ellipsis: true,
            ..TextBoxOptions::default()
        };
        let layout = layout_text("one, two", &options, &mut metrics());

        // the second word is never placed; the preceding run gains the
        // ellipsis with its trailing comma stripped
        assert_eq!(words(&layout), vec!["one..."]);
        let spans = spans(&layout);
        assert_eq!(spans[0].width, Pt(36.0));
    }

    #[test]
    fn dropped_tokens_resume_after_an_explicit_break() {
        let options = TextBoxOptions {
            width: Some(Pt(30.0)),
            line_break: false,
            ..TextBoxOptions::default()
        };
        let layout = layout_text("aaaa bbbb cc\ndd", &options, &mut metrics());

        assert_eq!(words(&layout), vec!["aaaa", "dd"]);
    }

    #[test]
    fn line_limit_forces_a_page_break() {
        let options = TextBoxOptions {
            num_lines: Some(1),
            ..TextBoxOptions::default()
        };
        let layout = layout_text("a\nb", &options, &mut metrics());

        assert_eq!(layout.summary.pages, 2);
        assert!(layout
            .items
            .iter()
            .any(|item| matches!(item, LayoutItem::PageBreak)));
    }

    #[test]
    fn layout_is_idempotent() {
        let options = TextBoxOptions {
            width: Some(Pt(60.0)),
            text_align: TextAlign::Justify,
            ..TextBoxOptions::default()
        };
        let first = layout_text("some words to wrap around", &options, &mut metrics());
        let second = layout_text("some words to wrap around", &options, &mut metrics());
        assert_eq!(first, second);
    }

    #[test]
    fn placeable_order_is_preserved() {
        let layout = layout_text(
            "alpha beta gamma delta",
            &TextBoxOptions::default(),
            &mut metrics(),
        );
        assert_eq!(words(&layout), vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[test]
    fn forced_break_lays_out_like_left_alignment() {
        let justified = TextBoxOptions {
            text_align: TextAlign::Justify,
            ..TextBoxOptions::default()
        };
        let left = TextBoxOptions {
            text_align: TextAlign::Left,
            ..TextBoxOptions::default()
        };
        let a = layout_text("ab cd\n", &justified, &mut metrics());
        let b = layout_text("ab cd\n", &left, &mut metrics());
        assert_eq!(a.items, b.items);
    }

    #[test]
    fn heading_style_applies_until_the_break() {
        let options = TextBoxOptions {
            styles: StyleSheet {
                h1: HeadingStyle {
                    font_size: Some(Pt(20.0)),
                    bold: Some(true),
                    margin_bottom: Some(Pt(4.0)),
                    ..HeadingStyle::default()
                },
                ..StyleSheet::default()
            },
            ..TextBoxOptions::default()
        };
        let layout = layout_text("# T\nb", &options, &mut metrics());

        let spans = spans(&layout);
        assert_eq!(spans[0].style.font_size, Pt(20.0));
        assert!(spans[0].style.bold);
        assert_eq!(spans[0].height, Pt(20.0));
        // the break advances by margin_bottom + the heading line height,
        // and the body line reverts to the default style
        assert_eq!(spans[1].y, Pt(24.0));
        assert_eq!(spans[1].style.font_size, Pt(10.0));
        assert!(!spans[1].style.bold);
        assert_eq!(spans[1].height, Pt(10.0));
    }

    #[test]
    fn underline_snapshot_covers_only_the_marked_run() {
        let layout = layout_text("_u_ v", &TextBoxOptions::default(), &mut metrics());
        let spans = spans(&layout);
        assert!(spans[0].style.underline);
        assert!(!spans[1].style.underline);
        assert!(!spans[2].style.underline);
    }

    #[test]
    fn provider_registers_survive_the_pass() {
        let mut provider = metrics();
        provider.set_font_kind(FontKind::Bold);
        provider.set_font_size(Pt(14.0));
        let factor = provider.line_height_factor();

        let options = TextBoxOptions {
            styles: StyleSheet {
                h1: HeadingStyle {
                    font_size: Some(Pt(30.0)),
                    ..HeadingStyle::default()
                },
                ..StyleSheet::default()
            },
            max_height: Some(Pt(10.0)),
            page_break: false,
            ..TextBoxOptions::default()
        };
        // terminates early, which must still restore the registers
        let _ = layout_text("# big\nmore\nlines", &options, &mut provider);

        assert_eq!(provider.font_kind(), FontKind::Bold);
        assert_eq!(provider.font_size(), Pt(14.0));
        assert_eq!(provider.line_height_factor(), factor);
    }

    #[test]
    fn summary_tracks_final_position() {
        let layout = layout_text("a", &TextBoxOptions::default(), &mut metrics());
        assert_eq!(layout.summary.pages, 1);
        assert_eq!(layout.summary.final_y, Pt(10.0));
        assert_eq!(layout.summary.final_height, Pt(10.0));
    }

    #[test]
    fn long_text_paginates_within_bounds() {
        let mut provider = ApproximateMetrics::new(LETTER, Pt(12.0));
        let options = TextBoxOptions {
            margin: Margins::all(Pt(72.0)),
            ..TextBoxOptions::default()
        };
        let text = lipsum::lipsum(600);
        let layout = layout_text(&text, &options, &mut provider);

        assert!(layout.summary.pages > 1);
        let max_x = Pt(8.5 * 72.0 - 72.0);
        for span in spans(&layout) {
            assert!(span.x >= Pt(72.0));
            assert!(span.x + span.width <= max_x + Pt(0.001));
        }
    }
}
