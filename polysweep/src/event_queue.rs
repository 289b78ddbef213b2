//! The sweep-line's events: every polygon vertex, once for each edge it ends.

use crate::{
    geom::Point,
    num::Float,
    polygon::{Polygon, SegIdx, VertexIdx},
};

/// Whether an event starts or ends its edge's time on the sweep-line.
///
/// At a single point, all the `Left` events sort before all the `Right` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Left,
    Right,
}

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct EventIdx(pub usize);

impl std::fmt::Debug for EventIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ev_{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub edge: SegIdx,
    pub vertex: VertexIdx,
    pub kind: EventKind,
    /// The event at the other end of the same edge.
    pub other_end: EventIdx,
    /// The segment that was added to the sweep-line when processing this
    /// (left) event.
    pub segment: Option<SegIdx>,
}

/// All the events of a polygon, in sweep-line order.
///
/// The events are created and sorted up front; nothing gets added while the
/// sweep runs. Iterating yields each event index once, and can't be restarted.
#[derive(Clone, Debug)]
pub struct EventQueue<'a, F: Float> {
    poly: &'a Polygon<F>,
    events: Vec<Event>,
    order: Vec<EventIdx>,
    next: usize,
}

impl<'a, F: Float> EventQueue<'a, F> {
    pub fn new(poly: &'a Polygon<F>) -> Self {
        let mut events = Vec::with_capacity(2 * poly.len());
        for edge in poly.edge_indices() {
            let (a, b) = poly.edge(edge);
            let (a_kind, b_kind) = if poly.vertex(a) < poly.vertex(b) {
                (EventKind::Left, EventKind::Right)
            } else {
                (EventKind::Right, EventKind::Left)
            };
            let (a_idx, b_idx) = (EventIdx(events.len()), EventIdx(events.len() + 1));
            events.push(Event {
                edge,
                vertex: a,
                kind: a_kind,
                other_end: b_idx,
                segment: None,
            });
            events.push(Event {
                edge,
                vertex: b,
                kind: b_kind,
                other_end: a_idx,
                segment: None,
            });
        }

        let mut order: Vec<_> = (0..events.len()).map(EventIdx).collect();
        // This is a stable sort, so events that are tied keep the order they
        // were created in.
        order.sort_by(|&i, &j| {
            let (ei, ej) = (&events[i.0], &events[j.0]);
            poly.vertex(ei.vertex)
                .cmp(poly.vertex(ej.vertex))
                .then(ei.kind.cmp(&ej.kind))
        });

        EventQueue {
            poly,
            events,
            order,
            next: 0,
        }
    }

    /// The total number of events, including the ones already visited.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event(&self, idx: EventIdx) -> &Event {
        &self.events[idx.0]
    }

    pub fn point(&self, idx: EventIdx) -> &Point<F> {
        self.poly.vertex(self.events[idx.0].vertex)
    }

    /// Records the segment that was created for a left event.
    pub fn attach(&mut self, idx: EventIdx, seg: SegIdx) {
        let ev = &mut self.events[idx.0];
        debug_assert_eq!(ev.kind, EventKind::Left);
        debug_assert!(ev.segment.is_none(), "{idx:?} already has a segment");
        ev.segment = Some(seg);
    }

    /// The segment that was created for a left event, if it's been processed.
    pub fn segment(&self, idx: EventIdx) -> Option<SegIdx> {
        self.events[idx.0].segment
    }
}

impl<F: Float> Iterator for EventQueue<'_, F> {
    type Item = EventIdx;

    fn next(&mut self) -> Option<EventIdx> {
        let idx = *self.order.get(self.next)?;
        self.next += 1;
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<F: Float> ExactSizeIterator for EventQueue<'_, F> {}
