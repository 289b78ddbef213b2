//! Segments on the sweep-line, and the order we keep them in.

use std::cmp::Ordering;

use crate::{
    geom::Point,
    num::Float,
    polygon::{Polygon, SegIdx, VertexIdx},
};

/// A polygon edge, oriented from left to right.
///
/// This is what the sweep-line's status structure stores: one of these is
/// created when the sweep reaches the edge's left endpoint and dropped when it
/// passes the right endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SweepSegment<F: Float> {
    pub edge: SegIdx,
    pub left: Point<F>,
    pub right: Point<F>,
    /// The vertex that `left` came from.
    pub left_vertex: VertexIdx,
}

impl<F: Float> std::fmt::Debug for SweepSegment<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {:?} -> {:?}", self.edge, self.left, self.right)
    }
}

impl<F: Float> SweepSegment<F> {
    /// Builds the sweep segment for one of the polygon's edges.
    ///
    /// The left endpoint is the lexicographically smaller one. If the two
    /// endpoints coincide, the edge's second vertex counts as the left one.
    pub fn new(poly: &Polygon<F>, edge: SegIdx) -> Self {
        let (a, b) = poly.edge(edge);
        let (left_vertex, right_vertex) = if poly.vertex(a) < poly.vertex(b) {
            (a, b)
        } else {
            (b, a)
        };
        SweepSegment {
            edge,
            left: poly.vertex(left_vertex).clone(),
            right: poly.vertex(right_vertex).clone(),
            left_vertex,
        }
    }

    /// Is this segment below `other`?
    ///
    /// Two segments leaving the same vertex are ordered by the heights of their
    /// right endpoints. Otherwise, `self` is below `other` if `other`'s left
    /// endpoint is strictly to the left of (that is, above) `self`'s line.
    ///
    /// This only makes sense for segments that are both on the sweep-line; even
    /// then, it isn't a total order when segments cross or touch.
    pub fn below(&self, other: &Self) -> bool {
        if self.left_vertex == other.left_vertex {
            self.right.y < other.right.y
        } else {
            F::orient2d(&self.left, &self.right, &other.left) == Ordering::Greater
        }
    }

    /// The comparator for the sweep-line's status structure.
    ///
    /// A segment is only equal to itself. Otherwise `key` is `Less` if it's
    /// below `item` and `Greater` if it isn't.
    pub fn compare(key: &Self, item: &Self) -> Ordering {
        if key.edge == item.edge {
            Ordering::Equal
        } else if key.below(item) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Does `other` reach across the line through this segment?
    ///
    /// That is, are `other`'s endpoints *not* both strictly on the same side of
    /// our line? Touching the line counts as reaching across.
    pub fn straddled_by(&self, other: &Self) -> bool {
        let a = F::orient2d(&self.left, &self.right, &other.left);
        let b = F::orient2d(&self.left, &self.right, &other.right);
        a != b || a == Ordering::Equal
    }

    /// Can these two segments cross?
    ///
    /// Two segments cross if each one straddles the other's line. This includes
    /// touching and overlapping, but callers are expected to exclude pairs of
    /// consecutive polygon edges, which always touch.
    pub fn crosses(&self, other: &Self) -> bool {
        self.straddled_by(other) && other.straddled_by(self)
    }
}
