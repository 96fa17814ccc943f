use crate::layout::TextBoxOptions;
use crate::pagesize::PageSize;
use crate::units::Pt;

/// The resolved bounds of a text box, derived once from the options and the
/// page size before layout begins and immutable for the rest of the pass.
///
/// Coordinates are box-relative document units with y growing downward.
/// Degenerate inputs (a zero width, a maximum height smaller than one line)
/// are passed through rather than clamped or rejected; the layout that
/// falls out of the arithmetic is the caller's responsibility.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxGeometry {
    /// Left edge of the writing area.
    pub left: Pt,
    /// Top margin; where the cursor restarts on every page after the first.
    pub top: Pt,
    /// Width of the writing area.
    pub width: Pt,
    /// Maximum height of the writing area.
    pub max_height: Pt,
    /// Right edge: `left + width`.
    pub max_x: Pt,
    /// Bottom edge: `top + max_height`.
    pub max_y: Pt,
    /// Where the first line of the first page begins.
    pub start_y: Pt,
}

impl BoxGeometry {
    /// Resolve the box geometry from layout options and the host's page
    /// size, filling every unset option from the page dimensions:
    ///
    /// - `start_y` defaults to the top margin (or 0);
    /// - `width` defaults to the page width minus horizontal margins;
    /// - `max_height` defaults to the page height minus vertical margins;
    /// - an unset top margin is back-filled from `start_y`;
    /// - an unset left margin is derived from the right margin and width
    ///   when a right margin is given, and is 0 otherwise.
    pub fn resolve(options: &TextBoxOptions, page: PageSize) -> BoxGeometry {
        let (page_width, page_height) = page;
        let margin = &options.margin;

        let start_y = options
            .start_y
            .unwrap_or_else(|| margin.top.unwrap_or(Pt(0.0)));
        let width = options.width.unwrap_or_else(|| {
            page_width - margin.left.unwrap_or(Pt(0.0)) - margin.right.unwrap_or(Pt(0.0))
        });
        let max_height = options.max_height.unwrap_or_else(|| {
            page_height - margin.top.unwrap_or(Pt(0.0)) - margin.bottom.unwrap_or(Pt(0.0))
        });

        let top = margin.top.unwrap_or(start_y);
        let left = margin.left.unwrap_or_else(|| match margin.right {
            Some(right) => page_width - right - width,
            None => Pt(0.0),
        });

        BoxGeometry {
            left,
            top,
            width,
            max_height,
            max_x: left + width,
            max_y: top + max_height,
            start_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::margins::Margins;

    const PAGE: PageSize = (Pt(200.0), Pt(100.0));

    #[test]
    fn uniform_margin_defaults() {
        let options = TextBoxOptions {
            margin: Margins::all(Pt(10.0)),
            ..TextBoxOptions::default()
        };
        let geom = BoxGeometry::resolve(&options, PAGE);
        assert_eq!(geom.left, Pt(10.0));
        assert_eq!(geom.top, Pt(10.0));
        assert_eq!(geom.width, Pt(180.0));
        assert_eq!(geom.max_height, Pt(80.0));
        assert_eq!(geom.max_x, Pt(190.0));
        assert_eq!(geom.max_y, Pt(90.0));
        assert_eq!(geom.start_y, Pt(10.0));
    }

    #[test]
    fn start_y_back_fills_unset_top_margin() {
        let options = TextBoxOptions {
            start_y: Some(Pt(40.0)),
            ..TextBoxOptions::default()
        };
        let geom = BoxGeometry::resolve(&options, PAGE);
        assert_eq!(geom.top, Pt(40.0));
        assert_eq!(geom.start_y, Pt(40.0));
        assert_eq!(geom.left, Pt(0.0));
        assert_eq!(geom.width, Pt(200.0));
    }

    #[test]
    fn left_margin_derived_from_right_and_width() {
        let options = TextBoxOptions {
            width: Some(Pt(50.0)),
            margin: Margins {
                right: Some(Pt(20.0)),
                ..Margins::default()
            },
            ..TextBoxOptions::default()
        };
        let geom = BoxGeometry::resolve(&options, PAGE);
        assert_eq!(geom.left, Pt(130.0));
        assert_eq!(geom.max_x, Pt(180.0));
    }

    #[test]
    fn explicit_max_height_overrides_page_height() {
        let options = TextBoxOptions {
            max_height: Some(Pt(25.0)),
            ..TextBoxOptions::default()
        };
        let geom = BoxGeometry::resolve(&options, PAGE);
        assert_eq!(geom.max_height, Pt(25.0));
        assert_eq!(geom.max_y, Pt(25.0));
    }
}
