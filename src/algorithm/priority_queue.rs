// This file is part of segment-sweep.
//
// segment-sweep is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public
// License as published by the Free Software Foundation,
// either version 3 of the License, or (at your option)
// any later version.
//
// segment-sweep is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty
// of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General
// Public License along with segment-sweep. If not, see
// <https://www.gnu.org/licenses/>.

use super::event::Event;
use crate::{
    compare::compare_points,
    geometry::{Point, Scalar, Segment},
    rbtree::{RedBlackTree, TreeError},
};

/// The priority queue for events used in the algorithm.
///
/// Events are keyed by their point and ordered first by the X
/// coordinate and then the Y coordinate. Points closer than the
/// tolerance share one event.
#[derive(Debug)]
pub(super) struct PriorityQueue<Num> {
    tree: RedBlackTree<Point<Num>, Event<Num>, Num>,
    epsilon: Num,
}

impl<Num: Scalar> PriorityQueue<Num> {
    /// Create an empty queue.
    pub(super) fn new(epsilon: Num) -> Self {
        Self {
            tree: RedBlackTree::new(compare_points),
            epsilon,
        }
    }

    /// Create a queue holding the endpoints of every segment.
    ///
    /// The segments must already be oriented so that `init` comes first.
    pub(super) fn from_segments(segments: &[Segment<Num>], epsilon: Num) -> Self {
        let mut queue = Self::new(epsilon);

        for (id, segment) in segments.iter().enumerate() {
            queue.get_or_insert(segment.init()).add_start(id);
            queue.get_or_insert(segment.to()).add_end(id);
        }

        queue
    }

    /// Get the event at the given point, creating it if needed.
    pub(super) fn get_or_insert(&mut self, point: Point<Num>) -> &mut Event<Num> {
        self.tree
            .get_or_insert_with(&self.epsilon, point, || Event::new(point))
    }

    /// Is there an event at the given point?
    pub(super) fn contains(&self, point: Point<Num>) -> bool {
        self.tree.contains(&self.epsilon, &point)
    }

    /// Pop the next event from this priority queue.
    pub(super) fn pop(&mut self) -> Result<Event<Num>, TreeError> {
        self.tree.pop_min().map(|(_, event)| event)
    }

    /// Get the number of events in this queue.
    pub(super) fn len(&self) -> usize {
        self.tree.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment<f64> {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn events_pop_in_sweep_order() {
        let segments = [
            seg(0.0, 0.0, 4.0, 4.0),
            seg(0.0, 4.0, 4.0, 0.0),
            seg(2.0, -1.0, 2.0, 1.0),
        ];
        let mut queue = PriorityQueue::from_segments(&segments, 1e-4);
        assert_eq!(queue.len(), 6);

        let mut points = Vec::new();
        while !queue.is_empty() {
            points.push(queue.pop().unwrap().point());
        }

        assert_eq!(
            points,
            [(0.0, 0.0), (0.0, 4.0), (2.0, -1.0), (2.0, 1.0), (4.0, 0.0), (4.0, 4.0)]
                .iter()
                .map(|&(x, y)| Point::new(x, y))
                .collect::<Vec<_>>()
        );
        assert_eq!(queue.pop().unwrap_err(), TreeError::EmptyTree);
    }

    #[test]
    fn shared_endpoints_merge() {
        let segments = [seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 2.0, 0.0)];
        let mut queue = PriorityQueue::from_segments(&segments, 1e-4);
        assert_eq!(queue.len(), 3);

        // within the tolerance of an existing point
        assert!(queue.contains(Point::new(1.00005, 0.99999)));
        let event = queue.get_or_insert(Point::new(1.00005, 0.99999));
        assert_eq!(event.point(), Point::new(1.0, 1.0));
        assert_eq!(event.starts(), &[1]);
        assert_eq!(event.ends(), &[0]);
        assert_eq!(queue.len(), 3);

        assert!(!queue.contains(Point::new(1.5, 1.0)));
        queue.get_or_insert(Point::new(1.5, 1.0));
        assert_eq!(queue.len(), 4);
    }
}
