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

mod event;
mod priority_queue;
mod sweep_line;

#[cfg(test)]
mod tests;

use crate::{
    compare::compare_points,
    geometry::{Point, Scalar, Segment, SegmentIntersection},
    Error, HashSet, InvalidReason, Overlap, SegmentId, SweepConfig, SweepObserver,
};
use alloc::vec::Vec;
use core::cmp::Ordering;
use event::Event;
use priority_queue::PriorityQueue;
use sweep_line::{Active, SweepLine, SweepPosition};

/// The internal algorithm used to compute intersections.
#[derive(Debug)]
pub(crate) struct Algorithm<Num: Scalar, Obs> {
    /// The input segments, oriented along the sweep.
    segments: Vec<Segment<Num>>,
    /// Which segments have already been retired.
    ended: Vec<bool>,
    /// The priority queue of events.
    event_queue: PriorityQueue<Num>,
    /// The segments currently crossed by the sweep line.
    sweep_line: SweepLine<Num>,
    epsilon: Num,
    observer: Obs,
    /// Collinear overlaps found so far.
    overlaps: Vec<Overlap<Num>>,
    /// Pairs already recorded in `overlaps`, smaller id first.
    overlapping: HashSet<(SegmentId, SegmentId)>,
}

/// A processed event: the point and every segment touching it.
#[derive(Debug)]
pub(crate) struct Processed<Num> {
    pub(crate) point: Point<Num>,
    pub(crate) segments: Vec<SegmentId>,
}

impl<Num: Scalar, Obs> Algorithm<Num, Obs> {
    /// Get the length of the queue of events.
    pub(crate) fn queue_len(&self) -> usize {
        self.event_queue.len()
    }

    /// The collinear overlaps found so far.
    pub(crate) fn overlaps(&self) -> &[Overlap<Num>] {
        &self.overlaps
    }

    pub(crate) fn into_overlaps(self) -> Vec<Overlap<Num>> {
        self.overlaps
    }
}

impl<Num: Scalar, Obs: SweepObserver<Num>> Algorithm<Num, Obs> {
    /// Create a new algorithm.
    pub(crate) fn new(
        segments: impl IntoIterator<Item = Segment<Num>>,
        config: SweepConfig<Num>,
        observer: Obs,
    ) -> Result<Self, Error> {
        if !config.is_valid() {
            tracing::error!("Refusing to sweep with tolerance {:?}", config.epsilon);
            return Err(Error::InvalidTolerance);
        }
        let epsilon = config.epsilon;

        // validate the segments and orient them along the sweep
        let segments = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| validate(index, segment, epsilon))
            .collect::<Result<Vec<_>, _>>()?;

        // begin a queue consisting of the endpoints of every segment
        let event_queue = PriorityQueue::from_segments(&segments, epsilon);

        tracing::debug!(
            "Collected {} segments into {} events",
            segments.len(),
            event_queue.len()
        );

        Ok(Self {
            ended: alloc::vec![false; segments.len()],
            segments,
            event_queue,
            sweep_line: SweepLine::new(),
            epsilon,
            observer,
            overlaps: Vec::new(),
            overlapping: HashSet::default(),
        })
    }

    /// Process the next event in the algorithm.
    pub(crate) fn next_event(&mut self) -> Result<Option<Processed<Num>>, Error> {
        if self.event_queue.is_empty() {
            return Ok(None);
        }

        if self.observer.is_cancelled() {
            tracing::debug!(
                "Sweep cancelled with {} events pending",
                self.event_queue.len()
            );
            return Err(Error::Cancelled);
        }

        // pop an event from the event queue
        let mut event = self.event_queue.pop()?;
        let position = SweepPosition::new(event.point(), self.epsilon);

        tracing::trace!("Encountered event: {:?}", &event);

        self.handle_ends(&mut event)?;
        let crossing = self.take_crossing(&event, &position)?;
        let started = self.handle_starts(&event, &position);

        // segments passing through the point now take their order from
        // where they are heading
        for &id in &crossing {
            self.sweep_line.insert(&position, id, self.segments[id]);
        }

        self.check_new_neighbours(&mut event, &position, &started, &crossing);

        let segments = involved(&event, &crossing);
        tracing::trace!(
            "Sweep line after {:?}: {:?}",
            event.point(),
            self.sweep_line.iter().map(|(id, _)| id).collect::<Vec<_>>()
        );
        self.observer.on_event_processed(event.point(), &segments);

        Ok(Some(Processed {
            point: event.point(),
            segments,
        }))
    }

    /// Retire every segment ending at this event.
    fn handle_ends(&mut self, event: &mut Event<Num>) -> Result<(), Error> {
        let position = SweepPosition::new(event.point(), self.epsilon);
        let mut meeting = Vec::new();

        for &id in event.ends() {
            self.ended[id] = true;

            if !self.sweep_line.contains(id) {
                // it starts at this very event as well, after merging
                tracing::trace!("Segment {} never became active", id);
                continue;
            }

            let (below, above) = self.sweep_line.neighbours(id);
            let segment = self.sweep_line.remove(id)?;
            self.observer.on_segment_deactivated(id, &segment);

            tracing::trace!(
                "Removed segment {} from the sweep line, {} remain active",
                id,
                self.sweep_line.len()
            );

            // the neighbours of the removed segment are now adjacent
            if let (Some(below), Some(above)) = (below, above) {
                if self.check(&position, below, above) {
                    meeting.extend([below, above]);
                }
            }
        }

        // they cross at this very point without passing close enough to
        // it to be picked up as crossing segments
        for (id, segment) in meeting {
            event.add_through(self.epsilon, id, segment);
        }

        Ok(())
    }

    /// Pull out every active segment passing through the event point.
    fn take_crossing(
        &mut self,
        event: &Event<Num>,
        position: &SweepPosition<Num>,
    ) -> Result<Vec<SegmentId>, Error> {
        let mut crossing = self
            .sweep_line
            .passing(position)
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>();

        for id in event.through() {
            if self.sweep_line.contains(id) && !crossing.contains(&id) {
                crossing.push(id);
            }
        }

        for &id in &crossing {
            self.sweep_line.remove(id)?;
        }

        if !crossing.is_empty() {
            tracing::trace!("Segments {:?} pass through {:?}", &crossing, position.point);
        }

        Ok(crossing)
    }

    /// Activate every segment starting at this event.
    fn handle_starts(&mut self, event: &Event<Num>, position: &SweepPosition<Num>) -> Vec<SegmentId> {
        let mut started = Vec::with_capacity(event.starts().len());

        for &id in event.starts() {
            if self.ended[id] {
                continue;
            }

            let segment = self.segments[id];
            self.sweep_line.insert(position, id, segment);
            self.observer.on_segment_activated(id, &segment);
            started.push(id);

            tracing::trace!("Added segment {} to the sweep line", id);
        }

        started
    }

    /// Test the segments that just moved in the sweep line against their
    /// new neighbours.
    fn check_new_neighbours(
        &mut self,
        event: &mut Event<Num>,
        position: &SweepPosition<Num>,
        started: &[SegmentId],
        crossing: &[SegmentId],
    ) {
        let moved = |id: SegmentId| started.contains(&id) || crossing.contains(&id);

        for &id in started.iter().chain(crossing) {
            let is_start = started.contains(&id);
            let (below, above) = self.sweep_line.neighbours(id);
            let segment = self.segments[id];

            // a moved neighbour above checks us as its neighbour below
            let above = above.filter(|(other, _)| !moved(*other));

            for (other, other_segment) in below.into_iter().chain(above) {
                let meets_here = self.check(position, (id, segment), (other, other_segment));

                // a neighbour meeting us here passes through this point,
                // which is how a segment starting on another one is seen
                if meets_here && !other_segment.init().approx_eq(&position.point, self.epsilon) {
                    event.add_through(self.epsilon, other, other_segment);
                }
            }

            if is_start {
                self.find_overlaps(position, id);
            }
        }
    }

    /// Record every collinear overlap between a newly started segment and
    /// the segments passing through its start.
    fn find_overlaps(&mut self, position: &SweepPosition<Num>, id: SegmentId) {
        let segment = self.segments[id];

        for (other, other_segment) in self.sweep_line.passing(position) {
            if other == id {
                continue;
            }

            if let SegmentIntersection::Overlap(start, end) = segment.intersection(&other_segment) {
                if !start.approx_eq(&end, self.epsilon) {
                    self.record_overlap(id, other, start, end);
                }
            }
        }
    }

    /// Test two segments for an intersection, and schedule an event for it
    /// if it lies further along the sweep.
    ///
    /// Returns whether the segments meet at the current event point.
    fn check(&mut self, position: &SweepPosition<Num>, a: Active<Num>, b: Active<Num>) -> bool {
        let (a_id, a_segment) = a;
        let (b_id, b_segment) = b;
        self.observer.on_candidate_compared(a_id, b_id);

        let point = match a_segment.intersection(&b_segment) {
            SegmentIntersection::Disjoint => return false,
            SegmentIntersection::Point(point) => point,
            SegmentIntersection::Overlap(start, end) => {
                if !start.approx_eq(&end, self.epsilon) {
                    self.record_overlap(a_id, b_id, start, end);
                    return false;
                }
                start
            }
        };

        match compare_points(&self.epsilon, &point, &position.point) {
            Ordering::Greater => {
                self.schedule(point, a, b);
                false
            }
            Ordering::Equal => true,
            // a steep segment can cross its neighbour within the tolerance
            // band of the sweep point, but further down; the event queue
            // ranks that crossing behind us although the sweep has not
            // passed it yet
            Ordering::Less
                if point.x > position.point.x
                    && self
                        .sweep_line
                        .swap_pending(&SweepPosition::new(point, self.epsilon), a_id, b_id) =>
            {
                self.schedule(point, a, b);
                false
            }
            // already behind the sweep line
            Ordering::Less => false,
        }
    }

    /// Add an event for the crossing of two segments.
    fn schedule(&mut self, point: Point<Num>, a: Active<Num>, b: Active<Num>) {
        let ((a_id, a_segment), (b_id, b_segment)) = (a, b);

        if self.event_queue.contains(point) {
            tracing::trace!("Merging intersection of {} and {} at {:?}", a_id, b_id, point);
        } else {
            tracing::trace!("Scheduling intersection of {} and {} at {:?}", a_id, b_id, point);
        }

        let event = self.event_queue.get_or_insert(point);
        event.add_through(self.epsilon, a_id, a_segment);
        event.add_through(self.epsilon, b_id, b_segment);
    }

    fn record_overlap(&mut self, a: SegmentId, b: SegmentId, start: Point<Num>, end: Point<Num>) {
        let pair = if a < b { (a, b) } else { (b, a) };

        if self.overlapping.insert(pair) {
            tracing::trace!("Segments {} and {} overlap from {:?} to {:?}", pair.0, pair.1, start, end);
            self.overlaps.push(Overlap {
                segments: [pair.0, pair.1],
                start,
                end,
            });
        }
    }
}

/// Check a segment before it enters the sweep, orienting it along the
/// sweep order.
fn validate<Num: Scalar>(
    index: usize,
    segment: Segment<Num>,
    epsilon: Num,
) -> Result<Segment<Num>, Error> {
    let reason = if !segment.init().is_finite() || !segment.to().is_finite() {
        Some(InvalidReason::NonFinite)
    } else if segment.init().approx_eq(&segment.to(), epsilon) {
        Some(InvalidReason::ZeroLength)
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::warn!("Rejecting segment {}: {}", index, reason);
            Err(Error::InvalidSegment { index, reason })
        }
        None => Ok(segment.oriented(epsilon)),
    }
}

/// Every segment touching an event, sorted by id.
fn involved<Num: Scalar>(event: &Event<Num>, crossing: &[SegmentId]) -> Vec<SegmentId> {
    if !event.is_shared() && crossing.is_empty() {
        return event
            .starts()
            .iter()
            .chain(event.ends())
            .copied()
            .chain(event.through())
            .collect();
    }

    let mut seen = HashSet::default();
    let mut segments = event
        .starts()
        .iter()
        .chain(event.ends())
        .chain(crossing)
        .copied()
        .chain(event.through())
        .filter(|id| seen.insert(*id))
        .collect::<Vec<_>>();

    segments.sort_unstable();
    segments
}
