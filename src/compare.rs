// BSL 1.0 License

//! Rust makes comparing objects (especially floats) hard
//! sometimes, so this module contains the orderings the
//! sweep relies on.

use crate::{
    geometry::{Point, Scalar},
    utils::approx_eq,
};
use core::cmp;

pub(crate) const EXPECTED_NOT_NAN: &str = "Expected non-NaN values";

/// Compare two values that are known not to be `NaN`.
pub(crate) fn total<Num: Scalar>(a: Num, b: Num) -> cmp::Ordering {
    a.partial_cmp(&b).expect(EXPECTED_NOT_NAN)
}

/// Order two points by X and then Y, treating coordinates within
/// `epsilon` of eachother as equal.
///
/// This is the comparator of the event queue, which is why the
/// tolerance comes first.
pub(crate) fn compare_points<Num: Scalar>(
    epsilon: &Num,
    p1: &Point<Num>,
    p2: &Point<Num>,
) -> cmp::Ordering {
    if approx_eq(p1.x, p2.x, *epsilon) {
        if approx_eq(p1.y, p2.y, *epsilon) {
            cmp::Ordering::Equal
        } else {
            total(p1.y, p2.y)
        }
    } else {
        total(p1.x, p2.x)
    }
}

/// Order a point by X and then Y.
pub(crate) fn order_points<Num: Scalar>(
    p1: Point<Num>,
    p2: Point<Num>,
) -> (Point<Num>, Point<Num>) {
    if p1.x < p2.x || (p1.x == p2.x && p1.y < p2.y) {
        (p1, p2)
    } else {
        (p2, p1)
    }
}
