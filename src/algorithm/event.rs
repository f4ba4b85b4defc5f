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

use super::sweep_line::{compare_status, StatusKey, SweepPosition};
use crate::{
    geometry::{Point, Scalar, Segment},
    rbtree::RedBlackTree,
    SegmentId,
};
use alloc::vec::Vec;
use core::fmt;

/// Everything that happens at one point of the plane.
pub(crate) struct Event<Num> {
    point: Point<Num>,
    /// Segments whose first endpoint is here.
    starts: Vec<SegmentId>,
    /// Segments whose last endpoint is here.
    ends: Vec<SegmentId>,
    /// Segments known to cross this point, ordered bottom to top as they
    /// are right before it.
    through: RedBlackTree<StatusKey<Num>, (), SweepPosition<Num>>,
}

impl<Num: Scalar> Event<Num> {
    pub(crate) fn new(point: Point<Num>) -> Self {
        Self {
            point,
            starts: Vec::new(),
            ends: Vec::new(),
            through: RedBlackTree::new(compare_status),
        }
    }

    pub(crate) fn point(&self) -> Point<Num> {
        self.point
    }

    pub(crate) fn starts(&self) -> &[SegmentId] {
        &self.starts
    }

    pub(crate) fn ends(&self) -> &[SegmentId] {
        &self.ends
    }

    pub(crate) fn add_start(&mut self, id: SegmentId) {
        self.starts.push(id);
    }

    pub(crate) fn add_end(&mut self, id: SegmentId) {
        self.ends.push(id);
    }

    /// Record that a segment crosses this point.
    pub(crate) fn add_through(&mut self, epsilon: Num, id: SegmentId, segment: Segment<Num>) {
        let position = SweepPosition::new(self.point, epsilon);
        self.through
            .insert(&position, StatusKey::reversed(id, segment), ());
    }

    /// The segments crossing this point, bottom to top.
    pub(crate) fn through(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.through
            .iter()
            .filter_map(|(key, ())| key.active())
            .map(|(id, _)| id)
    }

    /// Is this event about more than one segment?
    pub(crate) fn is_shared(&self) -> bool {
        self.starts.len() + self.ends.len() + self.through.len() > 1
    }
}

impl<Num: fmt::Debug> fmt::Debug for Event<Num> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("point", &self.point)
            .field("starts", &self.starts)
            .field("ends", &self.ends)
            .field("through", &self.through)
            .finish()
    }
}
