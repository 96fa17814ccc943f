use crate::layout::{LayoutItem, TextAlign};
use crate::units::Pt;

/// Adjusts the x offsets of one line's placed spans in place so the line
/// honours the requested alignment.
///
/// `forced_break` marks a line ended by an explicit line break rather than
/// an overflow. A forced break is an intentionally short line, so the
/// justify variants degrade to their plain counterparts instead of
/// stretching it: `justify` falls back to `left`, `justify-right` to
/// `right`, and `justify-center` to `center`.
///
/// No-op when the line holds no placed spans or already spans the full
/// width.
pub fn justify_line(
    items: &mut [LayoutItem],
    left_edge: Pt,
    width: Pt,
    align: TextAlign,
    forced_break: bool,
) {
    let mut text_width = Pt(0.0);
    let mut count = 0usize;
    let mut last: Option<usize> = None;

    for (i, item) in items.iter().enumerate() {
        if let LayoutItem::Span(span) = item {
            text_width += span.width;
            count += 1;
            last = Some(i);
        }
    }

    let Some(last) = last else {
        return;
    };

    let line_width = {
        let LayoutItem::Span(span) = &items[last] else {
            unreachable!()
        };
        span.x + span.width - left_edge
    };

    if line_width >= width {
        return;
    }

    let align = if forced_break { align.degraded() } else { align };

    match align {
        TextAlign::Left => {}
        TextAlign::Right => {
            let shift = width - line_width;
            for item in items.iter_mut() {
                if let LayoutItem::Span(span) = item {
                    span.x += shift;
                }
            }
        }
        TextAlign::Center => {
            let shift = (width - line_width) / 2.0;
            for item in items.iter_mut() {
                if let LayoutItem::Span(span) = item {
                    span.x += shift;
                }
            }
        }
        TextAlign::Justify | TextAlign::JustifyRight | TextAlign::JustifyCenter => {
            // historical quirk kept for output compatibility: the gap is
            // divided among count - 2 slots, not the count - 1 gaps a line
            // of count spans actually has
            let gap = (width - text_width) / (count as f32 - 2.0);
            let mut x = left_edge;
            for item in items.iter_mut() {
                if let LayoutItem::Span(span) = item {
                    span.x = x;
                    x += span.width + gap;
                }
            }
        }
    }
}
