//! The sweep-line's status: the segments it currently crosses, in order.

use std::cmp::Ordering;

use crate::{
    avl::{AvlTree, NodeId, Violation},
    num::Float,
    polygon::{Polygon, SegIdx},
    segment_order::SweepSegment,
};

type Comparator<F> = fn(&SweepSegment<F>, &SweepSegment<F>) -> Ordering;

/// A segment's neighbors on the sweep-line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub above: Option<SegIdx>,
    pub below: Option<SegIdx>,
}

/// A problem found by [`SweepStatus::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusViolation {
    Tree(Violation),
    /// The stored neighbors of a segment don't match the tree.
    Neighbors {
        seg: SegIdx,
        stored: Neighbors,
        actual: Neighbors,
    },
}

/// The segments crossing the sweep-line.
///
/// They're kept in a balanced tree ordered by [`SweepSegment::compare`]. We
/// also remember, for every segment on the sweep-line, which segments are
/// directly above and below it. These links are updated whenever a segment
/// is added or removed, so finding a segment's neighbors doesn't need a trip
/// through the tree.
#[derive(Clone, Debug)]
pub struct SweepStatus<'a, F: Float> {
    poly: &'a Polygon<F>,
    tree: AvlTree<SweepSegment<F>, Comparator<F>>,
    // Indexed by `SegIdx`. Segments that aren't on the sweep-line have no
    // neighbors.
    neighbors: Vec<Neighbors>,
}

impl<'a, F: Float> SweepStatus<'a, F> {
    pub fn new(poly: &'a Polygon<F>) -> Self {
        SweepStatus {
            poly,
            tree: AvlTree::new(SweepSegment::<F>::compare as Comparator<F>),
            neighbors: vec![Neighbors::default(); poly.len()],
        }
    }

    /// The number of segments on the sweep-line.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Puts a polygon edge on the sweep-line.
    ///
    /// The new segment's neighbors are the segments immediately before and
    /// after it in the tree, and it becomes their neighbor in turn.
    pub fn add(&mut self, edge: SegIdx) -> SegIdx {
        let id = self
            .tree
            .insert(SweepSegment::new(self.poly, edge))
            .expect("segment is already on the sweep-line");
        let above = self.tree.successor(id).map(|n| self.tree.item(n).edge);
        let below = self.tree.predecessor(id).map(|n| self.tree.item(n).edge);

        self.neighbors[edge.0] = Neighbors { above, below };
        if let Some(above) = above {
            self.neighbors[above.0].below = Some(edge);
        }
        if let Some(below) = below {
            self.neighbors[below.0].above = Some(edge);
        }
        edge
    }

    /// Takes a segment off the sweep-line, connecting its old neighbors to
    /// each other.
    pub fn remove(&mut self, seg: SegIdx) -> SweepSegment<F> {
        let Neighbors { above, below } = std::mem::take(&mut self.neighbors[seg.0]);
        if let Some(above) = above {
            self.neighbors[above.0].below = below;
        }
        if let Some(below) = below {
            self.neighbors[below.0].above = above;
        }

        self.tree
            .remove_exact(&SweepSegment::new(self.poly, seg))
            .expect("segment isn't on the sweep-line")
    }

    pub fn neighbors(&self, seg: SegIdx) -> Neighbors {
        self.neighbors[seg.0]
    }

    /// Finds the tree node holding a segment.
    pub fn find(&self, seg: SegIdx) -> Option<NodeId> {
        self.tree.find_exact(&SweepSegment::new(self.poly, seg))
    }

    /// Do these two segments cross?
    ///
    /// Missing segments don't cross anything, and neither do consecutive edges
    /// of the polygon (whose shared endpoint isn't a crossing).
    pub fn intersects(&self, a: Option<SegIdx>, b: Option<SegIdx>) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };
        if self.poly.consecutive(a, b) {
            return false;
        }
        SweepSegment::new(self.poly, a).crosses(&SweepSegment::new(self.poly, b))
    }

    /// The segments on the sweep-line, from bottom to top.
    pub fn segments(&self) -> impl Iterator<Item = &SweepSegment<F>> + '_ {
        self.tree.iter()
    }

    /// Checks the tree's balance, and that every segment's stored neighbors
    /// are its neighbors in the tree.
    ///
    /// The order of the segments isn't checked: comparing two segments only
    /// means something near the sweep-line's current position, and segments
    /// that meet at a vertex might not compare consistently at all.
    pub fn check(&self) -> Result<(), Vec<StatusViolation>> {
        let mut violations: Vec<_> = match self.tree.check() {
            Ok(()) => Vec::new(),
            Err(vs) => vs
                .into_iter()
                .filter(|v| !matches!(v, Violation::OutOfOrder { .. }))
                .map(StatusViolation::Tree)
                .collect(),
        };

        let mut actual = vec![Neighbors::default(); self.neighbors.len()];
        let order: Vec<SegIdx> = self.segments().map(|s| s.edge).collect();
        for (i, seg) in order.iter().enumerate() {
            actual[seg.0] = Neighbors {
                above: order.get(i + 1).copied(),
                below: i.checked_sub(1).map(|j| order[j]),
            };
        }
        for (i, (stored, actual)) in self.neighbors.iter().zip(actual).enumerate() {
            if *stored != actual {
                violations.push(StatusViolation::Neighbors {
                    seg: SegIdx(i),
                    stored: *stored,
                    actual,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use ordered_float::NotNan;

    use super::*;
    use crate::geom::Point;

    fn poly(points: &[(f64, f64)]) -> Polygon<NotNan<f64>> {
        Polygon::new(points.iter().map(|&p| Point::try_from(p).unwrap())).unwrap()
    }

    fn order<F: Float>(status: &SweepStatus<'_, F>) -> Vec<SegIdx> {
        status.segments().map(|s| s.edge).collect()
    }

    #[test]
    fn square() {
        let square = poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut status = SweepStatus::new(&square);

        let s0 = status.add(SegIdx(0));
        let s3 = status.add(SegIdx(3));
        status.check().unwrap();
        assert_eq!(order(&status), vec![s0, s3]);
        assert_eq!(
            status.neighbors(s0),
            Neighbors {
                above: Some(s3),
                below: None
            }
        );
        // Edges 0 and 3 are consecutive.
        assert!(!status.intersects(Some(s0), Some(s3)));

        let s2 = status.add(SegIdx(2));
        status.check().unwrap();
        assert_eq!(order(&status), vec![s0, s3, s2]);
        assert_eq!(status.neighbors(s3), Neighbors { above: Some(s2), below: Some(s0) });

        let removed = status.remove(s3);
        assert_eq!(removed.edge, s3);
        status.check().unwrap();
        assert_eq!(order(&status), vec![s0, s2]);
        assert_eq!(status.neighbors(s3), Neighbors::default());
        assert_eq!(status.neighbors(s0).above, Some(s2));
        assert_eq!(status.neighbors(s2).below, Some(s0));
        assert!(!status.intersects(Some(s2), Some(s0)));
        assert_eq!(status.find(s3), None);
        assert!(status.find(s2).is_some());
    }

    #[test]
    fn bowtie() {
        let bowtie = poly(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let mut status = SweepStatus::new(&bowtie);

        let s0 = status.add(SegIdx(0));
        let s3 = status.add(SegIdx(3));
        let s2 = status.add(SegIdx(2));
        assert_eq!(order(&status), vec![s0, s3, s2]);

        // Once edge 3 is gone, edges 0 and 2 are neighbors, and they cross.
        let Neighbors { above, below } = status.neighbors(s3);
        assert!(status.intersects(above, below));
        assert!(status.intersects(Some(s2), Some(s0)));
        assert!(!status.intersects(None, Some(s0)));
        assert!(!status.intersects(Some(s2), None));
    }
}
