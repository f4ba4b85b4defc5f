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

use fastrand::Rng;
use segment_sweep::{
    bentley_ottmann, Intersection, Point, Segment, SegmentId, SegmentIntersection,
};
use std::{collections::BTreeSet, iter};

/// How far a reported point may be from the exact one.
const SLACK: f64 = 1e-3;

#[test]
fn random_segments() {
    for seed in 0..8 {
        let rng = Rng::with_seed(seed);
        let segments = iter::repeat_with(|| make_random_segment(&rng))
            .take(50)
            .collect::<Vec<_>>();

        check_against_brute_force(&segments);
    }
}

#[test]
fn random_short_segments() {
    let rng = Rng::with_seed(0xfeed);
    let segments = iter::repeat_with(|| {
        let x = gen_f64(&rng, -50.0, 50.0);
        let y = gen_f64(&rng, -50.0, 50.0);
        Segment::new(
            Point::new(x, y),
            Point::new(x + gen_f64(&rng, -8.0, 8.0), y + gen_f64(&rng, -8.0, 8.0)),
        )
    })
    .take(300)
    .collect::<Vec<_>>();

    check_against_brute_force(&segments);
}

#[test]
fn random_steep_segments() {
    for seed in 0..6 {
        let rng = Rng::with_seed(0x57ee9 + seed);
        let mut segments = iter::repeat_with(|| make_random_segment(&rng))
            .take(30)
            .collect::<Vec<_>>();

        // steep runs that cross others close to where they start
        segments.extend(
            iter::repeat_with(|| {
                let start = Point::new(gen_f64(&rng, -100.0, 100.0), gen_f64(&rng, -100.0, 100.0));
                let dx = gen_f64(&rng, 0.001, 0.05) * if rng.bool() { 1.0 } else { -1.0 };
                let dy = gen_f64(&rng, 20.0, 150.0) * if rng.bool() { 1.0 } else { -1.0 };
                Segment::new(start, Point::new(start.x + dx, start.y + dy))
            })
            .take(15),
        );

        check_against_brute_force(&segments);
    }
}

#[test]
fn input_order_does_not_matter() {
    let rng = Rng::with_seed(42);
    let segments = iter::repeat_with(|| make_random_segment(&rng))
        .take(40)
        .collect::<Vec<_>>();

    // a permutation of the input, remembering where each segment came from
    let mut order = (0..segments.len()).collect::<Vec<_>>();
    rng.shuffle(&mut order);
    let shuffled = order.iter().map(|&i| segments[i]).collect::<Vec<_>>();

    let original = pairs(&bentley_ottmann(segments.clone()).unwrap(), |id| id);
    let permuted = pairs(&bentley_ottmann(shuffled).unwrap(), |id| order[id]);

    assert_eq!(original, permuted);
}

#[test]
fn sweeping_twice_gives_the_same_result() {
    let rng = Rng::with_seed(7);
    let segments = iter::repeat_with(|| make_random_segment(&rng))
        .take(40)
        .collect::<Vec<_>>();

    let first = bentley_ottmann(segments.clone()).unwrap();
    let second = bentley_ottmann(segments).unwrap();
    assert_eq!(first, second);
}

fn check_against_brute_force(segments: &[Segment<f64>]) {
    let found = bentley_ottmann(segments.iter().copied()).unwrap();

    // every reported point lies on every segment reported with it
    for intersection in &found {
        assert!(intersection.segments.len() >= 2);
        assert!(intersection.segments.windows(2).all(|w| w[0] < w[1]));

        for &id in &intersection.segments {
            let distance = distance_to_segment(intersection.point, &segments[id]);
            assert!(
                distance < SLACK,
                "segment {} is {} away from reported point {}",
                id,
                distance,
                intersection.point
            );
        }
    }

    // every crossing found by brute force is reported
    for (i, j, point) in brute_force(segments) {
        let reported = found.iter().any(|intersection| {
            intersection.segments.contains(&i)
                && intersection.segments.contains(&j)
                && (intersection.point.x - point.x).abs() < SLACK
                && (intersection.point.y - point.y).abs() < SLACK
        });

        assert!(
            reported,
            "intersection of {} and {} at {} was not reported",
            i, j, point
        );
    }
}

fn brute_force(segments: &[Segment<f64>]) -> Vec<(SegmentId, SegmentId, Point<f64>)> {
    let mut intersections = vec![];

    for (i, a) in segments.iter().enumerate() {
        for (j, b) in segments.iter().enumerate().skip(i + 1) {
            if let SegmentIntersection::Point(point) = a.intersection(b) {
                intersections.push((i, j, point));
            }
        }
    }

    intersections
}

fn pairs(
    found: &[Intersection<f64>],
    original_id: impl Fn(SegmentId) -> SegmentId,
) -> BTreeSet<(SegmentId, SegmentId)> {
    let mut pairs = BTreeSet::new();

    for intersection in found {
        for (n, &a) in intersection.segments.iter().enumerate() {
            for &b in &intersection.segments[n + 1..] {
                let (a, b) = (original_id(a), original_id(b));
                pairs.insert((a.min(b), a.max(b)));
            }
        }
    }

    pairs
}

fn distance_to_segment(p: Point<f64>, segment: &Segment<f64>) -> f64 {
    let (a, b) = (segment.init(), segment.to());
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

fn make_random_segment(rng: &Rng) -> Segment<f64> {
    let start = Point::new(gen_f64(rng, -100.0, 100.0), gen_f64(rng, -100.0, 100.0));
    let mut end = start;

    while (end.x - start.x).abs() < 1.0 && (end.y - start.y).abs() < 1.0 {
        end = Point::new(gen_f64(rng, -100.0, 100.0), gen_f64(rng, -100.0, 100.0));
    }

    Segment::new(start, end)
}

fn gen_f64(rng: &Rng, min: f64, max: f64) -> f64 {
    min + rng.f64() * (max - min)
}
