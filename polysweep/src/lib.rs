#![doc = include_str!("../README.md")]

pub mod avl;
pub mod event_queue;
mod geom;
mod num;
mod polygon;
pub mod segment_order;
pub mod status;
pub mod sweep;

pub use geom::{is_left, Point};
pub use num::Float;
pub use polygon::{Polygon, SegIdx, VertexIdx};
pub use sweep::{find_crossing, is_simple, Sweep, SweepState};

use ordered_float::NotNan;

/// The input points were faulty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// A polygon needs at least three vertices.
    #[error("a polygon needs at least 3 vertices, but this one has {0}")]
    TooFewVertices(usize),
    /// The vertex with this index had a coordinate that was not a number.
    #[error("vertex {0} is not a number")]
    NaN(usize),
    /// The vertex with this index had an infinite coordinate.
    #[error("vertex {0} is infinite")]
    Infinity(usize),
}

/// Checks whether a closed polygon is simple, meaning that none of its edges
/// cross (apart from consecutive edges meeting at their shared vertex).
///
/// The last point is implicitly joined back to the first one.
///
/// ```
/// let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// assert_eq!(polysweep::is_simple_polygon(&square), Ok(true));
///
/// let bowtie = [(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)];
/// assert_eq!(polysweep::is_simple_polygon(&bowtie), Ok(false));
/// ```
pub fn is_simple_polygon(points: &[(f64, f64)]) -> Result<bool, Error> {
    let points = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            Ok(Point::new(
                NotNan::new(x).map_err(|_| Error::NaN(i))?,
                NotNan::new(y).map_err(|_| Error::NaN(i))?,
            ))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Polygon::new(points)?.is_simple())
}
