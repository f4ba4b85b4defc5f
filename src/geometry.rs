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

//! The geometric primitives the sweep is built from: points, segments
//! and the orientation predicates between them.

use crate::compare;
use core::{cmp, fmt};
use num_traits::Float;

/// A floating-point coordinate type the sweep can run on.
pub trait Scalar: Float + fmt::Debug {
    /// The default tolerance used to merge nearly coincident points.
    const DEFAULT_EPSILON: Self;
}

impl Scalar for f32 {
    const DEFAULT_EPSILON: f32 = 1e-4;
}

impl Scalar for f64 {
    const DEFAULT_EPSILON: f64 = 1e-4;
}

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<Num> {
    pub x: Num,
    pub y: Num,
}

impl<Num> Point<Num> {
    /// Create a new point.
    pub const fn new(x: Num, y: Num) -> Self {
        Self { x, y }
    }
}

impl<Num: Scalar> Point<Num> {
    /// Are both coordinates within `epsilon` of the other point's?
    pub fn approx_eq(&self, other: &Self, epsilon: Num) -> bool {
        compare::compare_points(&epsilon, self, other) == cmp::Ordering::Equal
    }

    /// Are both coordinates finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<Num: fmt::Display> fmt::Display for Point<Num> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a point lies relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Left,
    Right,
    Collinear,
}

/// The cross product of `a - o` and `b - o`.
///
/// Positive when `o -> a -> b` turns counter-clockwise.
pub fn cross<Num: Scalar>(o: Point<Num>, a: Point<Num>, b: Point<Num>) -> Num {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Which side of the directed line `a -> b` the point `c` is on.
pub fn orientation<Num: Scalar>(a: Point<Num>, b: Point<Num>, c: Point<Num>) -> Orientation {
    let area = cross(a, b, c);

    if area > Num::zero() {
        Orientation::Left
    } else if area < Num::zero() {
        Orientation::Right
    } else {
        Orientation::Collinear
    }
}

/// The squared euclidean distance between two points.
pub fn squared_distance<Num: Scalar>(p: Point<Num>, q: Point<Num>) -> Num {
    let dx = p.x - q.x;
    let dy = p.y - q.y;
    dx * dx + dy * dy
}

/// A line segment running from `init` to `to`.
///
/// Segments are stored so that `init` comes first in sweep order, i.e.
/// it has the smaller X coordinate, or the smaller Y coordinate if the
/// segment is vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<Num> {
    init: Point<Num>,
    to: Point<Num>,
}

/// Why two segments do not meet in a single computable point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degenerate {
    /// The segments lie on distinct parallel lines.
    Parallel,
    /// The segments lie on the same line.
    Collinear,
}

/// How two segments intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<Num> {
    /// The segments do not touch.
    Disjoint,
    /// The segments meet in exactly one point.
    Point(Point<Num>),
    /// The segments are collinear and share the interval between the two points.
    Overlap(Point<Num>, Point<Num>),
}

impl<Num: Scalar> Segment<Num> {
    /// Create a segment between two points, in either order.
    pub fn new(a: Point<Num>, b: Point<Num>) -> Self {
        let (init, to) = compare::order_points(a, b);
        Self { init, to }
    }

    /// The endpoint that comes first in sweep order.
    pub fn init(&self) -> Point<Num> {
        self.init
    }

    /// The endpoint that comes last in sweep order.
    pub fn to(&self) -> Point<Num> {
        self.to
    }

    /// Is this segment exactly vertical?
    pub fn is_vertical(&self) -> bool {
        self.init.x == self.to.x
    }

    /// Re-order the endpoints under the tolerant point order.
    ///
    /// Only nearly vertical segments can change here.
    pub(crate) fn oriented(self, epsilon: Num) -> Self {
        match compare::compare_points(&epsilon, &self.init, &self.to) {
            cmp::Ordering::Greater => Self {
                init: self.to,
                to: self.init,
            },
            _ => self,
        }
    }

    /// The direction vector of this segment.
    pub(crate) fn direction(&self) -> (Num, Num) {
        (self.to.x - self.init.x, self.to.y - self.init.y)
    }

    /// The Y coordinate of the supporting line at the given X.
    ///
    /// The segment must not be vertical.
    pub(crate) fn y_at(&self, x: Num) -> Num {
        let (dx, dy) = self.direction();
        self.init.y + (x - self.init.x) * dy / dx
    }

    /// Does the bounding box of this segment contain the point?
    fn spans(&self, p: Point<Num>) -> bool {
        let (min_x, max_x) = minmax(self.init.x, self.to.x);
        let (min_y, max_y) = minmax(self.init.y, self.to.y);

        min_x <= p.x && p.x <= max_x && min_y <= p.y && p.y <= max_y
    }

    /// Do the two segments share at least one point?
    ///
    /// Touching endpoints and collinear overlaps count as intersections.
    pub fn intersects(&self, other: &Self) -> bool {
        let d1 = orientation(other.init, other.to, self.init);
        let d2 = orientation(other.init, other.to, self.to);
        let d3 = orientation(self.init, self.to, other.init);
        let d4 = orientation(self.init, self.to, other.to);

        if opposite(d1, d2) && opposite(d3, d4) {
            return true;
        }

        (d1 == Orientation::Collinear && other.spans(self.init))
            || (d2 == Orientation::Collinear && other.spans(self.to))
            || (d3 == Orientation::Collinear && self.spans(other.init))
            || (d4 == Orientation::Collinear && self.spans(other.to))
    }

    /// Compute the point where the supporting lines of two segments cross.
    ///
    /// A vertical segment fixes the X coordinate and the Y coordinate is
    /// taken from the other line; otherwise both slopes are solved for.
    /// Lines with equal slopes are reported as [`Degenerate`] before any
    /// division happens.
    pub fn intersection_point(&self, other: &Self) -> Result<Point<Num>, Degenerate> {
        let Point { x: x1, y: y1 } = self.init;
        let Point { x: x3, y: y3 } = other.init;

        match (self.is_vertical(), other.is_vertical()) {
            (true, true) => Err(if x1 == x3 {
                Degenerate::Collinear
            } else {
                Degenerate::Parallel
            }),
            (true, false) => {
                let x = x1;
                Ok(Point::new(x, other.slope() * (x - x3) + y3))
            }
            (false, true) => {
                let x = x3;
                Ok(Point::new(x, self.slope() * (x - x1) + y1))
            }
            (false, false) => {
                let m1 = self.slope();
                let m2 = other.slope();

                if m1 == m2 {
                    return Err(
                        match orientation(self.init, self.to, other.init) {
                            Orientation::Collinear => Degenerate::Collinear,
                            _ => Degenerate::Parallel,
                        },
                    );
                }

                let x = (m1 * x1 - m2 * x3 - y1 + y3) / (m1 - m2);
                let y = m1 * x + (y1 - m1 * x1);
                Ok(Point::new(x, y))
            }
        }
    }

    /// Classify how this segment meets another one.
    pub fn intersection(&self, other: &Self) -> SegmentIntersection<Num> {
        if !self.intersects(other) {
            return SegmentIntersection::Disjoint;
        }

        match self.intersection_point(other) {
            Ok(point) => SegmentIntersection::Point(point),
            Err(Degenerate::Parallel) => SegmentIntersection::Disjoint,
            Err(Degenerate::Collinear) => {
                let (_, start) = compare::order_points(self.init, other.init);
                let (end, _) = compare::order_points(self.to, other.to);

                if start == end {
                    SegmentIntersection::Point(start)
                } else {
                    SegmentIntersection::Overlap(start, end)
                }
            }
        }
    }

    fn slope(&self) -> Num {
        let (dx, dy) = self.direction();
        dy / dx
    }
}

fn opposite(a: Orientation, b: Orientation) -> bool {
    matches!(
        (a, b),
        (Orientation::Left, Orientation::Right) | (Orientation::Right, Orientation::Left)
    )
}

fn minmax<Num: Scalar>(a: Num, b: Num) -> (Num, Num) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
