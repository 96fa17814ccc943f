use crate::error::TextBoxError;
use crate::layout::{Baseline, LayoutItem, SpanKind, TextBoxLayout};
use crate::style::FontKind;
use crate::units::Pt;

/// Underlines sit this far below the span's y, as a multiple of the span
/// height.
const UNDERLINE_OFFSET_FACTOR: f32 = 1.18;
/// Underline stroke width as a multiple of the active font size.
const UNDERLINE_STROKE_FACTOR: f32 = 0.03;

/// The drawing primitives a host must expose for a computed layout to be
/// replayed onto it. Implementations perform no layout of their own; every
/// coordinate they receive was computed during the layout pass.
pub trait RenderSurface {
    /// Start a new page; subsequent draws target it.
    fn add_page(&mut self) -> Result<(), TextBoxError>;
    /// Select the font variant and size for subsequent text.
    fn set_font(&mut self, kind: FontKind, size: Pt) -> Result<(), TextBoxError>;
    /// Draw `text` with its `baseline` reference point at (x, y).
    fn draw_text(&mut self, text: &str, x: Pt, y: Pt, baseline: Baseline)
        -> Result<(), TextBoxError>;
    /// Draw a horizontal rule from (x, y) to (x2, y).
    fn draw_rule(&mut self, x: Pt, y: Pt, x2: Pt, stroke_width: Pt) -> Result<(), TextBoxError>;
    /// Push the surface's graphics state.
    fn save_state(&mut self);
    /// Pop the surface's graphics state.
    fn restore_state(&mut self);
}

/// Replays a computed layout onto a host surface in stream order: page
/// break markers request new pages, each positioned span selects its
/// snapshotted font and is drawn at its recorded coordinates, and
/// underlined spans (words and spaces alike) get a rule spanning their
/// width. The surface's graphics state is saved around the replay and
/// restored even when a primitive fails.
pub fn draw(layout: &TextBoxLayout, surface: &mut dyn RenderSurface) -> Result<(), TextBoxError> {
    surface.save_state();
    let result = replay(layout, surface);
    surface.restore_state();
    result
}

fn replay(layout: &TextBoxLayout, surface: &mut dyn RenderSurface) -> Result<(), TextBoxError> {
    let mut current_font: Option<(FontKind, Pt)> = None;

    for item in layout.items.iter() {
        match item {
            LayoutItem::PageBreak => surface.add_page()?,
            // structural markers carry no drawing of their own; the style
            // they announced is already snapshotted on each span
            LayoutItem::Marker(_) => {}
            LayoutItem::Span(span) => {
                let font = (span.style.font_kind(), span.style.font_size);
                if current_font != Some(font) {
                    surface.set_font(font.0, font.1)?;
                    current_font = Some(font);
                }

                if let SpanKind::Word(text) = &span.kind {
                    surface.draw_text(text, span.x, span.y, layout.baseline)?;
                }

                if span.style.underline {
                    let y = span.y + span.height * UNDERLINE_OFFSET_FACTOR;
                    surface.draw_rule(
                        span.x,
                        y,
                        span.x + span.width,
                        span.style.font_size * UNDERLINE_STROKE_FACTOR,
                    )?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_text, TextBoxOptions};
    use crate::metrics::ApproximateMetrics;
    use crate::units::Pt;

    #[derive(Debug, PartialEq)]
    enum Call {
        Page,
        Font(FontKind, Pt),
        Text(String, Pt, Pt),
        Rule(Pt, Pt, Pt, Pt),
        Save,
        Restore,
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl RenderSurface for RecordingSurface {
        fn add_page(&mut self) -> Result<(), TextBoxError> {
            self.calls.push(Call::Page);
            Ok(())
        }

        fn set_font(&mut self, kind: FontKind, size: Pt) -> Result<(), TextBoxError> {
            self.calls.push(Call::Font(kind, size));
            Ok(())
        }

        fn draw_text(
            &mut self,
            text: &str,
            x: Pt,
            y: Pt,
            _baseline: Baseline,
        ) -> Result<(), TextBoxError> {
            self.calls.push(Call::Text(text.to_string(), x, y));
            Ok(())
        }

        fn draw_rule(&mut self, x: Pt, y: Pt, x2: Pt, stroke: Pt) -> Result<(), TextBoxError> {
            self.calls.push(Call::Rule(x, y, x2, stroke));
            Ok(())
        }

        fn save_state(&mut self) {
            self.calls.push(Call::Save);
        }

        fn restore_state(&mut self) {
            self.calls.push(Call::Restore);
        }
    }

    fn metrics() -> ApproximateMetrics {
        ApproximateMetrics::new((Pt(200.0), Pt(100.0)), Pt(10.0))
    }

    #[test]
    fn replay_draws_words_at_computed_positions() {
        let layout = layout_text("ab cd", &TextBoxOptions::default(), &mut metrics());
        let mut surface = RecordingSurface::default();
        draw(&layout, &mut surface).unwrap();

        assert_eq!(
            surface.calls,
            vec![
                Call::Save,
                Call::Font(FontKind::Normal, Pt(10.0)),
                Call::Text("ab".to_string(), Pt(0.0), Pt(0.0)),
                Call::Text("cd".to_string(), Pt(18.0), Pt(0.0)),
                Call::Restore,
            ]
        );
    }

    #[test]
    fn underlined_spans_get_rules_spaces_included() {
        let layout = layout_text("_a b_", &TextBoxOptions::default(), &mut metrics());
        let mut surface = RecordingSurface::default();
        draw(&layout, &mut surface).unwrap();

        let rules: Vec<&Call> = surface
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Rule(..)))
            .collect();
        // one rule each for "a", the space, and "b"
        assert_eq!(rules.len(), 3);
        let Call::Rule(x, y, x2, stroke) = rules[0] else {
            unreachable!()
        };
        assert_eq!(*x, Pt(0.0));
        assert_eq!(*x2, Pt(6.0));
        assert!((y.0 - 11.8).abs() < 1e-3);
        assert!((stroke.0 - 0.3).abs() < 1e-3);
    }

    #[test]
    fn page_breaks_request_new_pages() {
        let options = TextBoxOptions {
            max_height: Some(Pt(10.0)),
            ..TextBoxOptions::default()
        };
        let layout = layout_text("a\nb", &options, &mut metrics());
        let mut surface = RecordingSurface::default();
        draw(&layout, &mut surface).unwrap();

        assert_eq!(
            surface
                .calls
                .iter()
                .filter(|call| matches!(call, Call::Page))
                .count(),
            1
        );
    }

    #[test]
    fn bold_runs_switch_the_font_once() {
        let layout = layout_text("**b** n", &TextBoxOptions::default(), &mut metrics());
        let mut surface = RecordingSurface::default();
        draw(&layout, &mut surface).unwrap();

        let fonts: Vec<&Call> = surface
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Font(..)))
            .collect();
        assert_eq!(
            fonts,
            vec![
                &Call::Font(FontKind::Bold, Pt(10.0)),
                &Call::Font(FontKind::Normal, Pt(10.0)),
            ]
        );
    }
}
