//! The sweep-line algorithm for checking whether a polygon is simple.
//!
//! This is the Shamos-Hoey algorithm: we sweep a vertical line from left to
//! right across the polygon, keeping track of the edges it crosses in
//! vertical order. If two edges cross, then at some point before the crossing
//! they must be neighbors on the sweep-line, so we only need to test neighbors
//! for crossings. Neighbors change only when an edge enters or leaves the
//! sweep-line, so there are only `O(n)` pairs to test.
//!
//! We stop at the first crossing we see. That's also the only time the
//! sweep-line is allowed to be out of order, so we never need to handle
//! segments swapping places.

use crate::{
    event_queue::{EventKind, EventQueue},
    num::Float,
    polygon::{Polygon, SegIdx},
    status::{Neighbors, SweepStatus},
};

/// Where a [`Sweep`] is up to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepState {
    /// There are more events to process.
    Running,
    /// We processed every event without finding a crossing.
    Simple,
    /// We found a pair of non-consecutive edges that cross.
    NotSimple { first: SegIdx, second: SegIdx },
}

/// A sweep-line pass over a polygon.
///
/// The sweep can be run to completion with [`Sweep::run`], or advanced one
/// event at a time with [`Sweep::step`].
#[derive(Clone, Debug)]
pub struct Sweep<'a, F: Float> {
    queue: EventQueue<'a, F>,
    status: SweepStatus<'a, F>,
    state: SweepState,
}

impl<'a, F: Float> Sweep<'a, F> {
    pub fn new(poly: &'a Polygon<F>) -> Self {
        Sweep {
            queue: EventQueue::new(poly),
            status: SweepStatus::new(poly),
            state: SweepState::Running,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// The segments currently on the sweep-line.
    pub fn status(&self) -> &SweepStatus<'a, F> {
        &self.status
    }

    fn found(&mut self, first: SegIdx, second: SegIdx) {
        tracing::debug!(?first, ?second, "found a crossing");
        self.state = SweepState::NotSimple { first, second };
    }

    /// Processes the next event, and returns the state after processing it.
    ///
    /// Once the sweep has finished, this does nothing.
    pub fn step(&mut self) -> SweepState {
        if self.state != SweepState::Running {
            return self.state;
        }

        let Some(idx) = self.queue.next() else {
            tracing::debug!("no crossings");
            self.state = SweepState::Simple;
            return self.state;
        };

        let ev = self.queue.event(idx).clone();
        tracing::trace!(
            ?idx,
            edge = ?ev.edge,
            kind = ?ev.kind,
            point = ?self.queue.point(idx),
            active = self.status.len(),
            "processing event"
        );

        match ev.kind {
            EventKind::Left => {
                let seg = self.status.add(ev.edge);
                self.queue.attach(idx, seg);

                let Neighbors { above, below } = self.status.neighbors(seg);
                if self.status.intersects(Some(seg), above) {
                    self.found(seg, above.expect("only present segments intersect"));
                } else if self.status.intersects(Some(seg), below) {
                    self.found(seg, below.expect("only present segments intersect"));
                }
            }
            EventKind::Right => {
                let seg = self
                    .queue
                    .segment(ev.other_end)
                    .expect("right event before its left event");

                // This segment is about to leave, and its neighbors will
                // become neighbors of each other.
                let Neighbors { above, below } = self.status.neighbors(seg);
                if self.status.intersects(above, below) {
                    self.found(
                        above.expect("only present segments intersect"),
                        below.expect("only present segments intersect"),
                    );
                } else {
                    self.status.remove(seg);
                }
            }
        }
        self.state
    }

    /// Processes all remaining events, stopping at the first crossing.
    pub fn run(&mut self) -> SweepState {
        while self.step() == SweepState::Running {}
        self.state
    }
}

/// Finds two edges of the polygon that cross, if there are any.
///
/// Consecutive edges share an endpoint, but that doesn't count. Edges that
/// touch or overlap in any other way do count, but note that a vertex that
/// the polygon visits twice is two different vertices as far as we're
/// concerned, and so (depending on the rest of the polygon) it might not be
/// detected.
///
/// If there are several crossings, which one gets returned is unspecified.
pub fn find_crossing<F: Float>(poly: &Polygon<F>) -> Option<(SegIdx, SegIdx)> {
    match Sweep::new(poly).run() {
        SweepState::NotSimple { first, second } => Some((first, second)),
        _ => None,
    }
}

/// Returns true if no two non-consecutive edges of the polygon meet.
pub fn is_simple<F: Float>(poly: &Polygon<F>) -> bool {
    find_crossing(poly).is_none()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use ordered_float::NotNan;

    use super::*;
    use crate::geom::Point;

    fn poly(points: &[(f64, f64)]) -> Polygon<NotNan<f64>> {
        Polygon::new(points.iter().map(|&p| Point::try_from(p).unwrap())).unwrap()
    }

    #[test]
    fn square() {
        let square = poly(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut sweep = Sweep::new(&square);

        // Eight events, and then one more step to notice there are no more.
        for _ in 0..8 {
            assert_eq!(sweep.step(), SweepState::Running);
            sweep.status().check().unwrap();
        }
        assert!(sweep.status().is_empty());
        assert_eq!(sweep.step(), SweepState::Simple);
        assert_eq!(sweep.step(), SweepState::Simple);
    }

    #[test]
    fn bowtie() {
        let bowtie = poly(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let mut sweep = Sweep::new(&bowtie);

        // The crossing is noticed when edge 3 leaves, making edges 2 and 0
        // neighbors.
        assert_matches!(
            sweep.run(),
            SweepState::NotSimple {
                first: SegIdx(2),
                second: SegIdx(0)
            }
        );
        // The sweep stopped with three segments still on the sweep-line.
        assert_eq!(sweep.status().len(), 3);
        assert_eq!(sweep.step(), sweep.state());
    }

    #[test]
    fn crossing_on_entry() {
        let p = poly(&[
            (2.0, 2.0),
            (2.0, 3.0),
            (3.0, 1.0),
            (4.0, 3.0),
            (4.0, 2.0),
            (2.00001, 2.00001),
        ]);
        assert_eq!(find_crossing(&p), Some((SegIdx(4), SegIdx(1))));
    }

    #[test]
    fn simple() {
        assert!(is_simple(&poly(&[(0.0, 0.0), (2.0, 0.0), (1.0, 2.0)])));
        assert!(is_simple(&poly(&[
            (0.0, 0.0),
            (3.0, 1.0),
            (6.0, 0.0),
            (6.0, 4.0),
            (3.0, 2.0),
            (0.0, 4.0)
        ])));
    }
}
