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

//! Unit tests for functionality in the main module.

#![cfg(test)]

use super::*;
use alloc::{vec, vec::Vec};

fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment<f64> {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

fn run<Obs: SweepObserver<f64>>(
    segments: Vec<Segment<f64>>,
    observer: Obs,
) -> Result<(Vec<(Point<f64>, Vec<SegmentId>)>, Vec<Overlap<f64>>), Error> {
    let mut algorithm = Algorithm::new(segments, SweepConfig::default(), observer)?;
    let mut found = vec![];

    while let Some(event) = algorithm.next_event()? {
        if event.segments.len() > 1 {
            found.push((event.point, event.segments));
        }
    }

    Ok((found, algorithm.into_overlaps()))
}

fn intersections(segments: Vec<Segment<f64>>) -> Vec<(Point<f64>, Vec<SegmentId>)> {
    run(segments, ()).unwrap().0
}

fn assert_near(actual: Point<f64>, x: f64, y: f64) {
    assert!(
        (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
        "expected ({}, {}), got {}",
        x,
        y,
        actual
    );
}

#[test]
fn test_single_crossing() {
    let found = intersections(vec![seg(0.0, 0.0, 4.0, 4.0), seg(0.0, 4.0, 4.0, 0.0)]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 2.0, 2.0);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_concurrent_segments() {
    let found = intersections(vec![
        seg(-1.0, -1.0, 1.0, 1.0),
        seg(-1.0, 1.0, 1.0, -1.0),
        seg(-2.0, 0.0, 2.0, 0.0),
    ]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 0.0, 0.0);
    assert_eq!(found[0].1, vec![0, 1, 2]);
}

#[test]
fn test_parallel_segments() {
    let found = intersections(vec![seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 1.0, 1.0, 1.0)]);
    assert!(found.is_empty());
}

#[test]
fn test_vertical_crossing() {
    let found = intersections(vec![seg(0.0, 0.0, 4.0, 0.0), seg(2.0, -1.0, 2.0, 1.0)]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 2.0, 0.0);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_empty_and_single() {
    assert!(intersections(vec![]).is_empty());
    assert!(intersections(vec![seg(0.0, 0.0, 1.0, 1.0)]).is_empty());
}

#[test]
fn test_shared_endpoint() {
    let found = intersections(vec![seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 2.0, 0.0)]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 1.0, 1.0);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_segment_starting_on_another() {
    let found = intersections(vec![seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 0.0, 2.0, 3.0)]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 2.0, 0.0);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_intersection_found_after_removal() {
    // the short segment keeps the long ones apart until it ends
    let found = intersections(vec![
        seg(0.0, 0.0, 10.0, 10.0),
        seg(0.0, 10.0, 10.0, 0.0),
        seg(-1.0, 5.0, 3.0, 5.0),
    ]);

    assert_eq!(found.len(), 1);
    assert_near(found[0].0, 5.0, 5.0);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_crossing_just_after_steep_start() {
    // the steep segment meets the other one less than a tolerance to the
    // right of its start, but well below it
    let segments = vec![
        seg(6.196930572239202, 4.755621154485656, 7.383017794221218, 2.9440901234092998),
        seg(6.552377073267217, 4.252256492276838, 6.559416290768423, 1.4371652991707968),
    ];
    let expected = match segments[0].intersection(&segments[1]) {
        SegmentIntersection::Point(point) => point,
        other => panic!("expected a crossing, got {:?}", other),
    };

    let found = intersections(segments);
    assert_eq!(found.len(), 1);
    assert_near(found[0].0, expected.x, expected.y);
    assert_eq!(found[0].1, vec![0, 1]);
}

#[test]
fn test_steep_fan() {
    // every steep segment starts just above the shallow one and crosses it
    // inside the tolerance band of its own start
    let mut segments = vec![seg(0.0, 0.0, 10.0, -1.0)];
    for n in 1..6 {
        let x = n as f64;
        segments.push(seg(x, -0.1 * x + 0.02, x + 0.01, -0.1 * x - 4.0));
    }

    let found = intersections(segments);
    assert_eq!(found.len(), 5);
    for (n, (_, ids)) in found.iter().enumerate() {
        assert_eq!(*ids, vec![0, n + 1]);
    }
}

#[test]
fn test_grid() {
    let mut segments = vec![];
    for i in 0..5 {
        segments.push(seg(-1.0, i as f64, 5.0, i as f64));
    }
    for j in 0..5 {
        segments.push(seg(j as f64, -1.0, j as f64, 5.0));
    }

    let found = intersections(segments);
    assert_eq!(found.len(), 25);

    for (n, (point, ids)) in found.iter().enumerate() {
        let (column, row) = (n / 5, n % 5);
        assert_near(*point, column as f64, row as f64);
        assert_eq!(*ids, vec![row, 5 + column]);
    }
}

#[test]
fn test_collinear_overlap() {
    let (found, overlaps) = run(vec![seg(0.0, 0.0, 4.0, 0.0), seg(2.0, 0.0, 6.0, 0.0)], ()).unwrap();

    // both ends of the shared interval are reported as points
    assert_eq!(found.len(), 2);
    assert_near(found[0].0, 2.0, 0.0);
    assert_near(found[1].0, 4.0, 0.0);

    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].segments, [0, 1]);
    assert_near(overlaps[0].start, 2.0, 0.0);
    assert_near(overlaps[0].end, 4.0, 0.0);
}

#[test]
fn test_rejects_invalid_segments() {
    let err = run(vec![seg(0.0, 0.0, 1.0, 1.0), seg(1.0, 1.0, 1.0, 1.00001)], ()).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidSegment {
            index: 1,
            reason: InvalidReason::ZeroLength
        }
    );

    let err = run(vec![seg(0.0, f64::NAN, 1.0, 1.0)], ()).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidSegment {
            index: 0,
            reason: InvalidReason::NonFinite
        }
    );

    let err = Algorithm::new(vec![seg(0.0, 0.0, 1.0, 1.0)], SweepConfig::default().with_epsilon(0.0), ())
        .unwrap_err();
    assert_eq!(err, Error::InvalidTolerance);
}

#[derive(Default)]
struct Recorder {
    activated: Vec<SegmentId>,
    deactivated: Vec<SegmentId>,
    events: usize,
    compared: usize,
    cancel_after: Option<usize>,
}

impl SweepObserver<f64> for Recorder {
    fn on_segment_activated(&mut self, id: SegmentId, _: &Segment<f64>) {
        self.activated.push(id);
    }

    fn on_segment_deactivated(&mut self, id: SegmentId, _: &Segment<f64>) {
        self.deactivated.push(id);
    }

    fn on_event_processed(&mut self, _: Point<f64>, segments: &[SegmentId]) {
        assert!(!segments.is_empty());
        self.events += 1;
    }

    fn on_candidate_compared(&mut self, a: SegmentId, b: SegmentId) {
        assert_ne!(a, b);
        self.compared += 1;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after.map_or(false, |limit| self.events >= limit)
    }
}

fn star() -> Vec<Segment<f64>> {
    vec![
        seg(0.0, 0.0, 4.0, 4.0),
        seg(0.0, 4.0, 4.0, 0.0),
        seg(2.0, -1.0, 2.0, 5.0),
        seg(-1.0, 1.0, 5.0, 1.0),
    ]
}

#[test]
fn test_observer_sees_every_segment() {
    let mut recorder = Recorder::default();
    let (found, _) = run(star(), &mut recorder).unwrap();

    recorder.activated.sort_unstable();
    recorder.deactivated.sort_unstable();
    assert_eq!(recorder.activated, vec![0, 1, 2, 3]);
    assert_eq!(recorder.deactivated, vec![0, 1, 2, 3]);
    assert!(recorder.events >= found.len());
    assert!(recorder.compared > 0);

    // watching does not change the outcome
    assert_eq!(found, run(star(), ()).unwrap().0);
}

#[test]
fn test_cancellation() {
    let recorder = Recorder {
        cancel_after: Some(2),
        ..Recorder::default()
    };

    assert_eq!(run(star(), recorder).unwrap_err(), Error::Cancelled);
}
