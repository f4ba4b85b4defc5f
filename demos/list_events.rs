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

use segment_sweep::{Point, Segment, SegmentId, Sweep, SweepConfig, SweepObserver};

/// Logs everything the sweep does.
struct Logger;

impl SweepObserver<f64> for Logger {
    fn on_segment_activated(&mut self, id: SegmentId, segment: &Segment<f64>) {
        tracing::info!("segment {} enters at {}", id, segment.init());
    }

    fn on_segment_deactivated(&mut self, id: SegmentId, segment: &Segment<f64>) {
        tracing::info!("segment {} leaves at {}", id, segment.to());
    }

    fn on_event_processed(&mut self, point: Point<f64>, segments: &[SegmentId]) {
        tracing::info!("processed {} touching {:?}", point, segments);
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let segments = vec![
        Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 4.0)),
        Segment::new(Point::new(0.0, 4.0), Point::new(4.0, 0.0)),
        Segment::new(Point::new(2.0, -1.0), Point::new(2.0, 5.0)),
        Segment::new(Point::new(-1.0, 1.0), Point::new(5.0, 1.0)),
        Segment::new(Point::new(3.0, 1.0), Point::new(6.0, 1.0)),
    ];

    let sweep = match Sweep::new(segments, SweepConfig::default(), Logger) {
        Ok(sweep) => sweep,
        Err(err) => {
            eprintln!("cannot sweep: {}", err);
            return;
        }
    };

    match sweep.into_report() {
        Ok(report) => println!("{:#?}", report),
        Err(err) => eprintln!("sweep failed: {}", err),
    }
}
