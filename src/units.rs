use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};

/// A measurement in points, the base unit of the document coordinate space.
/// One point is 1/72 of an inch.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Display,
    From,
    Into,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// The ratio of two point values, used for scaling calculations.
impl std::ops::Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        assert_eq!(Pt(1.0) + Pt(2.0), Pt(3.0));
        assert_eq!(Pt(6.0) - Pt(2.0), Pt(4.0));
        assert_eq!(Pt(3.0) * 2.0, Pt(6.0));
        assert_eq!(Pt(6.0) / 2.0, Pt(3.0));
        assert_eq!(Pt(6.0) / Pt(3.0), 2.0);
    }

    #[test]
    fn sums() {
        let total: Pt = [Pt(1.0), Pt(2.0), Pt(3.0)].into_iter().sum();
        assert_eq!(total, Pt(6.0));
    }
}
