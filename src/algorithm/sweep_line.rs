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

//! The sweep status: every segment the sweep line currently crosses,
//! ordered from bottom to top.

use crate::{
    compare::total,
    geometry::{Point, Scalar, Segment},
    rbtree::{Handle, RedBlackTree, TreeError},
    utils::approx_neq,
    HashMap, SegmentId,
};
use alloc::vec::Vec;
use core::{
    cmp::Ordering::{self, Equal, Greater, Less},
    ops::Bound,
};

/// An active segment together with its id.
pub(crate) type Active<Num> = (SegmentId, Segment<Num>);

/// Where the sweep line currently is.
///
/// This is the context every status comparison is made in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepPosition<Num> {
    pub(crate) point: Point<Num>,
    pub(crate) epsilon: Num,
}

impl<Num> SweepPosition<Num> {
    pub(crate) fn new(point: Point<Num>, epsilon: Num) -> Self {
        Self { point, epsilon }
    }
}

/// A key of the sweep status.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StatusKey<Num> {
    /// An active segment.
    ///
    /// Segments meeting at the sweep point are ordered by where they are
    /// heading. With `reversed` set they are ordered by where they come
    /// from instead, which is their order just before the sweep point.
    Segment {
        id: SegmentId,
        segment: Segment<Num>,
        reversed: bool,
    },
    /// Sorts right below the segments that pass through the sweep point.
    Below,
    /// Sorts right above the segments that pass through the sweep point.
    Above,
}

impl<Num> StatusKey<Num> {
    pub(crate) fn forward(id: SegmentId, segment: Segment<Num>) -> Self {
        StatusKey::Segment {
            id,
            segment,
            reversed: false,
        }
    }

    pub(crate) fn reversed(id: SegmentId, segment: Segment<Num>) -> Self {
        StatusKey::Segment {
            id,
            segment,
            reversed: true,
        }
    }

    /// The segment behind this key, if it is not a position probe.
    pub(crate) fn active(&self) -> Option<Active<Num>>
    where
        Num: Copy,
    {
        match self {
            StatusKey::Segment { id, segment, .. } => Some((*id, *segment)),
            StatusKey::Below | StatusKey::Above => None,
        }
    }
}

/// The height at which a segment meets the vertical line through the
/// sweep point.
///
/// A (nearly) vertical segment meets that line along an interval; we
/// take the point of the interval closest to the sweep point.
fn height<Num: Scalar>(segment: &Segment<Num>, position: &SweepPosition<Num>) -> Num {
    let (dx, _) = segment.direction();

    if dx.abs() < position.epsilon {
        let (low, high) = (segment.init().y, segment.to().y);
        let (low, high) = if low < high { (low, high) } else { (high, low) };
        position.point.y.max(low).min(high)
    } else {
        segment.y_at(position.point.x)
    }
}

/// Compare two status keys at the given sweep position.
///
/// Segments are ordered by the height at which they cross the sweep
/// line. Heights closer than the tolerance mean both segments meet at
/// the sweep point; those are ordered by direction (as seen by the
/// probe), and finally by id.
pub(crate) fn compare_status<Num: Scalar>(
    position: &SweepPosition<Num>,
    probe: &StatusKey<Num>,
    stored: &StatusKey<Num>,
) -> Ordering {
    let SweepPosition { point, epsilon } = *position;

    match (probe, stored) {
        (
            StatusKey::Segment {
                id,
                segment,
                reversed,
            },
            StatusKey::Segment {
                id: other_id,
                segment: other,
                ..
            },
        ) => {
            if id == other_id {
                return Equal;
            }

            compare_segments(position, segment, other, *reversed).then(id.cmp(other_id))
        }
        (StatusKey::Below, StatusKey::Segment { segment, .. }) => {
            if height(segment, position) < point.y - epsilon {
                Greater
            } else {
                Less
            }
        }
        (StatusKey::Above, StatusKey::Segment { segment, .. }) => {
            if height(segment, position) > point.y + epsilon {
                Less
            } else {
                Greater
            }
        }
        (StatusKey::Segment { segment, .. }, StatusKey::Below) => {
            if height(segment, position) < point.y - epsilon {
                Less
            } else {
                Greater
            }
        }
        (StatusKey::Segment { segment, .. }, StatusKey::Above) => {
            if height(segment, position) > point.y + epsilon {
                Greater
            } else {
                Less
            }
        }
        (StatusKey::Below, StatusKey::Below) | (StatusKey::Above, StatusKey::Above) => Equal,
        (StatusKey::Below, StatusKey::Above) => Less,
        (StatusKey::Above, StatusKey::Below) => Greater,
    }
}

fn compare_segments<Num: Scalar>(
    position: &SweepPosition<Num>,
    segment: &Segment<Num>,
    other: &Segment<Num>,
    reversed: bool,
) -> Ordering {
    let ours = height(segment, position);
    let theirs = height(other, position);

    if approx_neq(ours, theirs, position.epsilon) {
        return total(ours, theirs);
    }

    // both meet at the sweep point; whoever turns counter-clockwise of
    // the other ends up above it afterwards
    let (ax, ay) = segment.direction();
    let (bx, by) = other.direction();
    let turn = total(bx * ay - by * ax, Num::zero());

    if reversed {
        turn.reverse()
    } else {
        turn
    }
}

/// The ordered set of active segments.
#[derive(Debug)]
pub(crate) struct SweepLine<Num> {
    tree: RedBlackTree<StatusKey<Num>, (), SweepPosition<Num>>,
    /// Where each active segment lives in the tree.
    handles: HashMap<SegmentId, Handle>,
}

impl<Num: Scalar> SweepLine<Num> {
    pub(crate) fn new() -> Self {
        Self {
            tree: RedBlackTree::new(compare_status),
            handles: HashMap::default(),
        }
    }

    /// The number of active segments.
    pub(crate) fn len(&self) -> usize {
        self.tree.len()
    }

    /// Is the segment currently active?
    pub(crate) fn contains(&self, id: SegmentId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Insert a segment, ordered as it is right after the sweep point.
    pub(crate) fn insert(&mut self, position: &SweepPosition<Num>, id: SegmentId, segment: Segment<Num>) {
        let (handle, _) = self
            .tree
            .insert_full(position, StatusKey::forward(id, segment), ());
        self.handles.insert(id, handle);
    }

    /// Remove a segment, returning it.
    pub(crate) fn remove(&mut self, id: SegmentId) -> Result<Segment<Num>, TreeError> {
        let handle = self.handles.remove(&id).ok_or(TreeError::NotFound)?;
        let (key, ()) = self.tree.remove_at(handle)?;
        key.active()
            .map(|(_, segment)| segment)
            .ok_or(TreeError::NotFound)
    }

    /// The active segments right below and right above the given one.
    pub(crate) fn neighbours(&self, id: SegmentId) -> (Option<Active<Num>>, Option<Active<Num>>) {
        let Some(&handle) = self.handles.get(&id) else {
            return (None, None);
        };

        let below = self.tree.prev_at(handle).and_then(|h| self.active_at(h));
        let above = self.tree.next_at(handle).and_then(|h| self.active_at(h));
        (below, above)
    }

    /// The active segments passing through the sweep point, bottom to top.
    pub(crate) fn passing(&self, position: &SweepPosition<Num>) -> Vec<Active<Num>> {
        self.tree
            .range(
                position,
                Bound::Excluded(&StatusKey::Below),
                Bound::Excluded(&StatusKey::Above),
                false,
            )
            .filter_map(|(key, ())| key.active())
            .collect()
    }

    /// Do two neighbouring active segments still have to trade places
    /// once the sweep reaches `position`?
    ///
    /// Segments that are not next to each other never do.
    pub(crate) fn swap_pending(&self, position: &SweepPosition<Num>, a: SegmentId, b: SegmentId) -> bool {
        let (Some(&a), Some(&b)) = (self.handles.get(&a), self.handles.get(&b)) else {
            return false;
        };

        let (lower, upper) = if self.tree.next_at(a) == Some(b) {
            (a, b)
        } else if self.tree.next_at(b) == Some(a) {
            (b, a)
        } else {
            return false;
        };

        // stored keys all carry the forward orientation
        match (self.tree.get_at(lower), self.tree.get_at(upper)) {
            (Some((lower, ())), Some((upper, ()))) => compare_status(position, lower, upper) == Greater,
            _ => false,
        }
    }

    /// Every active segment, bottom to top.
    pub(crate) fn iter(&self) -> impl Iterator<Item = Active<Num>> + '_ {
        self.tree.iter().filter_map(|(key, ())| key.active())
    }

    fn active_at(&self, handle: Handle) -> Option<Active<Num>> {
        self.tree.get_at(handle).and_then(|(key, ())| key.active())
    }
}
