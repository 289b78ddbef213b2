use serde::{Deserialize, Serialize};

use crate::{geom::Point, num::Float, Error};

/// An index into a polygon's vertices.
///
/// Segments remember which vertex they start at, because two segments
/// starting at the same vertex get ordered differently from two segments that
/// merely start at the same coordinates.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct VertexIdx(pub usize);

impl std::fmt::Debug for VertexIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v_{}", self.0)
    }
}

/// An index into a polygon's edges.
///
/// Edge `i` joins vertex `i` to vertex `i + 1` (wrapping around at the end).
/// While it's crossed by the sweep-line, the edge is represented by a segment
/// with the same index: throughout this library, we compare segments by
/// identity, so two segments are the same iff they have the same `SegIdx`.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct SegIdx(pub usize);

impl std::fmt::Debug for SegIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

/// A closed polygon: the last vertex is joined back to the first.
///
/// Construction checks the preconditions of the simplicity test: at least three
/// vertices, all of them finite. Nothing else is checked; repeated vertices and
/// collinear edges are allowed through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Point<F>>",
    into = "Vec<Point<F>>",
    bound(serialize = "F: Serialize", deserialize = "F: Deserialize<'de>")
)]
pub struct Polygon<F: Float> {
    vertices: Vec<Point<F>>,
}

fn cyclic_pairs<T>(xs: &[T]) -> impl Iterator<Item = (&T, &T)> {
    xs.windows(2)
        .map(|pair| (&pair[0], &pair[1]))
        .chain(xs.last().zip(xs.first()))
}

impl<F: Float> Polygon<F> {
    pub fn new<P: Into<Point<F>>>(ps: impl IntoIterator<Item = P>) -> Result<Self, Error> {
        let vertices: Vec<Point<F>> = ps.into_iter().map(|p| p.into()).collect();
        if vertices.len() < 3 {
            return Err(Error::TooFewVertices(vertices.len()));
        }
        if let Some(idx) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(Error::Infinity(idx));
        }
        Ok(Polygon { vertices })
    }

    /// The number of vertices, which is also the number of edges.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false, since [`Polygon::new`] rejects fewer than three vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Point<F>] {
        &self.vertices
    }

    pub fn vertex(&self, idx: VertexIdx) -> &Point<F> {
        &self.vertices[idx.0]
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = SegIdx> {
        (0..self.vertices.len()).map(SegIdx)
    }

    /// The two endpoints of an edge, in contour order.
    pub fn edge(&self, idx: SegIdx) -> (VertexIdx, VertexIdx) {
        (VertexIdx(idx.0), VertexIdx((idx.0 + 1) % self.vertices.len()))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Point<F>, &Point<F>)> {
        cyclic_pairs(&self.vertices)
    }

    /// Do these two edges follow one another around the polygon?
    ///
    /// Consecutive edges always share an endpoint, so their meeting there
    /// doesn't count as a crossing.
    pub fn consecutive(&self, a: SegIdx, b: SegIdx) -> bool {
        let n = self.vertices.len();
        (a.0 + 1) % n == b.0 || (b.0 + 1) % n == a.0
    }

    /// Returns true if no two edges of this polygon cross.
    ///
    /// See [`crate::sweep::find_crossing`] for details.
    pub fn is_simple(&self) -> bool {
        crate::sweep::is_simple(self)
    }
}

impl<F: Float> TryFrom<Vec<Point<F>>> for Polygon<F> {
    type Error = Error;

    fn try_from(vertices: Vec<Point<F>>) -> Result<Self, Error> {
        Polygon::new(vertices)
    }
}

impl<F: Float> From<Polygon<F>> for Vec<Point<F>> {
    fn from(poly: Polygon<F>) -> Self {
        poly.vertices
    }
}
