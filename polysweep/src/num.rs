//! A thin abstraction over the different numerical types we support.

use std::cmp::Ordering;
use std::hash::Hash;

use malachite::Rational;
use ordered_float::NotNan;

use crate::geom::{is_left, Point};

/// A trait for abstracting over the properties we need from numerical types.
///
/// This is implemented for `NotNan<f64>`, `NotNan<f32>`, and `malachite::Rational`.
pub trait Float:
    Sized
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::Mul<Self, Output = Self>
    + std::ops::Neg<Output = Self>
    + for<'a> std::ops::Add<&'a Self, Output = Self>
    + for<'a> std::ops::Sub<&'a Self, Output = Self>
    + for<'a> std::ops::Mul<&'a Self, Output = Self>
    + Clone
    + std::fmt::Debug
    + Ord
    + Eq
    + Hash
    + 'static
{
    fn from_f32(x: f32) -> Self;

    /// Converts to an exact rational. Panics on infinities.
    fn to_exact(&self) -> Rational;

    /// NaNs are ruled out by the type, but the float types can still be infinite.
    fn is_finite(&self) -> bool;

    /// The sign of [`is_left`]`(p0, p1, p2)`, computed exactly.
    ///
    /// The default implementation just evaluates the cross product, which is
    /// exact for exact types. Float types override it.
    fn orient2d(p0: &Point<Self>, p1: &Point<Self>, p2: &Point<Self>) -> Ordering {
        is_left(p0, p1, p2).cmp(&Self::from_f32(0.0))
    }
}

fn coord(x: f64, y: f64) -> robust::Coord<f64> {
    robust::Coord { x, y }
}

// `robust` is exact unless its intermediate products overflow, which can
// happen for finite coordinates near `f64::MAX`. Then it returns an infinity
// or NaN, and we redo the computation in rationals.
fn robust_orient2d<F: Float>(
    p0: &Point<F>,
    p1: &Point<F>,
    p2: &Point<F>,
    c: impl Fn(&Point<F>) -> robust::Coord<f64>,
) -> Ordering {
    let det = robust::orient2d(c(p0), c(p1), c(p2));
    if det.is_finite() {
        det.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    } else {
        Rational::orient2d(&p0.to_exact(), &p1.to_exact(), &p2.to_exact())
    }
}

impl Float for Rational {
    fn from_f32(x: f32) -> Self {
        Rational::try_from(x).unwrap()
    }

    fn to_exact(&self) -> Rational {
        self.clone()
    }

    fn is_finite(&self) -> bool {
        true
    }
}

impl Float for NotNan<f32> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(x).unwrap()
    }

    fn to_exact(&self) -> Rational {
        self.into_inner().try_into().unwrap()
    }

    fn is_finite(&self) -> bool {
        self.into_inner().is_finite()
    }

    fn orient2d(p0: &Point<Self>, p1: &Point<Self>, p2: &Point<Self>) -> Ordering {
        // f32 -> f64 is lossless, so the f64 predicate is still exact.
        robust_orient2d(p0, p1, p2, |p| {
            coord(f64::from(p.x.into_inner()), f64::from(p.y.into_inner()))
        })
    }
}

impl Float for NotNan<f64> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(f64::from(x)).unwrap()
    }

    fn to_exact(&self) -> Rational {
        self.into_inner().try_into().unwrap()
    }

    fn is_finite(&self) -> bool {
        self.into_inner().is_finite()
    }

    fn orient2d(p0: &Point<Self>, p1: &Point<Self>, p2: &Point<Self>) -> Ordering {
        robust_orient2d(p0, p1, p2, |p| coord(p.x.into_inner(), p.y.into_inner()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    // A local stand-in for `Arbitrary` that only generates moderately-sized
    // values, so that products of coordinates stay well inside f64's range.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl Reasonable for NotNan<f32> {
        type Strategy = BoxedStrategy<NotNan<f32>>;

        fn reasonable() -> Self::Strategy {
            (-1e6f32..1e6).prop_map(|x| NotNan::new(x).unwrap()).boxed()
        }
    }

    impl Reasonable for NotNan<f64> {
        type Strategy = BoxedStrategy<NotNan<f64>>;

        fn reasonable() -> Self::Strategy {
            (-1e6..1e6).prop_map(|x| NotNan::new(x).unwrap()).boxed()
        }
    }

    impl Reasonable for Rational {
        type Strategy = BoxedStrategy<Rational>;

        // Fractions that floats can't represent, like 1/3.
        fn reasonable() -> Self::Strategy {
            (-1_000_000i64..1_000_000, 1u32..1000)
                .prop_map(|(n, d)| Rational::from(n) / Rational::from(d))
                .boxed()
        }
    }

    #[test]
    fn finiteness() {
        assert!(NotNan::new(1.0f64).unwrap().is_finite());
        assert!(!NotNan::new(f64::INFINITY).unwrap().is_finite());
        assert!(!NotNan::new(f32::NEG_INFINITY).unwrap().is_finite());
        assert!(Rational::from(3).is_finite());
    }

    #[test]
    fn orientation_near_overflow() {
        let p = |x: f64, y: f64| Point::new(NotNan::new(x).unwrap(), NotNan::new(y).unwrap());
        let (lo, hi) = (-1e308, 1e308);
        // The differences overflow f64, but the signs are still exact.
        assert_eq!(
            Float::orient2d(&p(lo, lo), &p(hi, lo), &p(hi, hi)),
            Ordering::Greater
        );
        assert_eq!(
            Float::orient2d(&p(lo, lo), &p(hi, hi), &p(hi, lo)),
            Ordering::Less
        );
        assert_eq!(
            Float::orient2d(&p(lo, lo), &p(0.0, 0.0), &p(hi, hi)),
            Ordering::Equal
        );
        assert_eq!(
            Float::orient2d(&p(f64::MAX, 0.0), &p(0.0, f64::MAX), &p(-f64::MAX, 0.0)),
            Ordering::Greater
        );

        let q = |x: f32, y: f32| Point::new(NotNan::new(x).unwrap(), NotNan::new(y).unwrap());
        assert_eq!(
            Float::orient2d(&q(-f32::MAX, 0.0), &q(f32::MAX, 0.0), &q(0.0, 1.0)),
            Ordering::Greater
        );
    }
}
