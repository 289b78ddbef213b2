use malachite::Rational;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::num::Float;

// Points are sorted by `x` and then by `y`, which is the order the sweep-line
// visits them in.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> std::fmt::Debug for Point<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl<F: Float> Point<F> {
    pub fn new(x: F, y: F) -> Self {
        Point { x, y }
    }

    pub fn to_exact(&self) -> Point<Rational> {
        Point {
            x: self.x.to_exact(),
            y: self.y.to_exact(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Float> From<(F, F)> for Point<F> {
    fn from((x, y): (F, F)) -> Self {
        Self { x, y }
    }
}

impl TryFrom<(f64, f64)> for Point<NotNan<f64>> {
    type Error = ordered_float::FloatIsNan;

    fn try_from((x, y): (f64, f64)) -> Result<Self, Self::Error> {
        Ok(Self {
            x: x.try_into()?,
            y: y.try_into()?,
        })
    }
}

impl<F: Float> std::ops::Sub for &Point<F> {
    type Output = Vector<F>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.x.clone() - &rhs.x,
            y: self.y.clone() - &rhs.y,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vector<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vector<F> {
    pub fn cross(self, other: Vector<F>) -> F {
        self.x * other.y - self.y * other.x
    }
}

/// Tests whether `p2` is to the left of, on, or to the right of the directed
/// line from `p0` to `p1`.
///
/// Returns the cross product `(p1 - p0) x (p2 - p0)`: positive if `p2` is to
/// the left, zero if the three points are collinear, and negative if it's to
/// the right. For float types the value is rounded; use [`Float::orient2d`] if
/// you only care about the sign.
pub fn is_left<F: Float>(p0: &Point<F>, p1: &Point<F>, p2: &Point<F>) -> F {
    (p1 - p0).cross(p2 - p0)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    impl<F: Reasonable + Float> Reasonable for Point<F>
    where
        F::Strategy: 'static,
    {
        type Strategy = BoxedStrategy<Point<F>>;

        fn reasonable() -> Self::Strategy {
            (F::reasonable(), F::reasonable())
                .prop_map(|(x, y)| Point::new(x, y))
                .boxed()
        }
    }

    fn p(x: f64, y: f64) -> Point<NotNan<f64>> {
        (x, y).try_into().unwrap()
    }

    #[test]
    fn lexicographic_order() {
        assert!(p(1.0, 1.0) < p(3.0, 3.0));
        assert!(p(3.0, 3.0) > p(1.0, 1.0));
        assert!(p(1.0, 5.0) < p(2.0, 0.0));
        assert!(p(1.0, 0.0) < p(1.0, 5.0));
        assert_eq!(p(1.0, 1.0).cmp(&p(1.0, 1.0)), Ordering::Equal);
    }

    #[test]
    fn left_of_line() {
        let (p0, p1) = (p(1.0, 1.0), p(3.0, 3.0));

        assert!(is_left(&p0, &p1, &p(1.0, 3.0)).into_inner() > 0.0);
        assert!(is_left(&p0, &p1, &p(3.0, 1.0)).into_inner() < 0.0);
        assert_eq!(is_left(&p0, &p1, &p(2.0, 2.0)).into_inner(), 0.0);

        assert_eq!(Float::orient2d(&p0, &p1, &p(1.0, 3.0)), Ordering::Greater);
        assert_eq!(Float::orient2d(&p0, &p1, &p(3.0, 1.0)), Ordering::Less);
        assert_eq!(Float::orient2d(&p0, &p1, &p(2.0, 2.0)), Ordering::Equal);
    }

    #[test]
    fn nearly_collinear() {
        // The third point is a hair to the left of the diagonal.
        let p0 = p(0.5, 0.5);
        let p1 = p(12.0, 12.0);
        let p2 = p(24.0, 24.0 + 24.0 * f64::EPSILON);

        let exact = is_left(&p0.to_exact(), &p1.to_exact(), &p2.to_exact());
        assert!(exact > 0);
        assert_eq!(Float::orient2d(&p0, &p1, &p2), Ordering::Greater);
    }

    #[test]
    fn not_a_number() {
        assert!(Point::<NotNan<f64>>::try_from((f64::NAN, 0.0)).is_err());
        assert!(!p(f64::INFINITY, 0.0).is_finite());
    }

    proptest! {
        #[test]
        fn orientation_is_exact_f64(
            p0 in Point::<NotNan<f64>>::reasonable(),
            p1 in Point::<NotNan<f64>>::reasonable(),
            p2 in Point::<NotNan<f64>>::reasonable(),
        ) {
            let exact = is_left(&p0.to_exact(), &p1.to_exact(), &p2.to_exact());
            prop_assert_eq!(Float::orient2d(&p0, &p1, &p2), exact.cmp(&Rational::from(0)));
        }

        #[test]
        fn orientation_is_exact_f32(
            p0 in Point::<NotNan<f32>>::reasonable(),
            p1 in Point::<NotNan<f32>>::reasonable(),
            p2 in Point::<NotNan<f32>>::reasonable(),
        ) {
            let exact = is_left(&p0.to_exact(), &p1.to_exact(), &p2.to_exact());
            prop_assert_eq!(Float::orient2d(&p0, &p1, &p2), exact.cmp(&Rational::from(0)));
        }

        #[test]
        fn orientation_flips_with_direction(
            p0 in Point::<Rational>::reasonable(),
            p1 in Point::<Rational>::reasonable(),
            p2 in Point::<Rational>::reasonable(),
        ) {
            prop_assert_eq!(
                Float::orient2d(&p0, &p1, &p2),
                Float::orient2d(&p1, &p0, &p2).reverse()
            );
        }
    }
}
