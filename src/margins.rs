use crate::units::Pt;

/// Margins are used when resolving the text box geometry. Sides left unset
/// participate in the geometry defaulting rules (see
/// [`BoxGeometry::resolve`](crate::BoxGeometry::resolve)) rather than simply
/// counting as zero: an unset top margin is back-filled from the starting y
/// position, and an unset left margin can be derived from the right margin
/// and box width.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Option<Pt>,
    pub right: Option<Pt>,
    pub bottom: Option<Pt>,
    pub left: Option<Pt>,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
            left: Some(left),
        }
    }

    /// Create margins where all values are equal
    pub fn all(value: Pt) -> Margins {
        Margins {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: Some(vertical),
            right: Some(horizontal),
            bottom: Some(vertical),
            left: Some(horizontal),
        }
    }

    /// Create margins where every side is left unset, deferring entirely to
    /// the geometry defaulting rules
    pub fn empty() -> Margins {
        Margins::default()
    }
}

impl From<Pt> for Margins {
    fn from(value: Pt) -> Margins {
        Margins::all(value)
    }
}

impl From<f32> for Margins {
    fn from(value: f32) -> Margins {
        Margins::all(Pt(value))
    }
}
