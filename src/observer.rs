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

//! Hooks for watching a sweep while it runs.

use crate::{
    geometry::{Point, Segment},
    SegmentId,
};

/// Receives notifications while the sweep makes progress.
///
/// Every method has an empty default, so implementors only override the
/// ones they care about. Observers only watch: nothing they do changes
/// which intersections are found, with the exception of
/// [`is_cancelled`](SweepObserver::is_cancelled), which stops the run.
pub trait SweepObserver<Num> {
    /// A segment entered the sweep status.
    fn on_segment_activated(&mut self, _id: SegmentId, _segment: &Segment<Num>) {}

    /// A segment left the sweep status for good.
    fn on_segment_deactivated(&mut self, _id: SegmentId, _segment: &Segment<Num>) {}

    /// An event was fully handled. `segments` lists every segment that
    /// touches the event point, sorted by id.
    fn on_event_processed(&mut self, _point: Point<Num>, _segments: &[SegmentId]) {}

    /// Two neighbouring segments were tested for an intersection.
    fn on_candidate_compared(&mut self, _a: SegmentId, _b: SegmentId) {}

    /// Polled before each event; returning `true` aborts the run.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// The observer that ignores everything.
impl<Num> SweepObserver<Num> for () {}

impl<Num, O: SweepObserver<Num> + ?Sized> SweepObserver<Num> for &mut O {
    fn on_segment_activated(&mut self, id: SegmentId, segment: &Segment<Num>) {
        (**self).on_segment_activated(id, segment)
    }

    fn on_segment_deactivated(&mut self, id: SegmentId, segment: &Segment<Num>) {
        (**self).on_segment_deactivated(id, segment)
    }

    fn on_event_processed(&mut self, point: Point<Num>, segments: &[SegmentId]) {
        (**self).on_event_processed(point, segments)
    }

    fn on_candidate_compared(&mut self, a: SegmentId, b: SegmentId) {
        (**self).on_candidate_compared(a, b)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}
