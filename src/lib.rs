//                Copyright John Nunley, 2022
// Distributed under the Boost Software License, Version 1.0.
//        (See accompanying file LICENSE or copy at
//          https://www.boost.org/LICENSE_1_0.txt)

//! A pure-Rust implementation of the [Bentley-Ottmann algorithm] for finding intersections between
//! line segments.
//!
//! The sweep runs on two ordered maps built from a red-black tree whose ordering function gets the
//! current sweep position as an explicit argument (see [`rbtree`]). Intersections are reported
//! once per point, together with every segment touching that point.
//!
//! ```
//! use segment_sweep::{bentley_ottmann, Point, Segment};
//!
//! let segments = [
//!     Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 4.0)),
//!     Segment::new(Point::new(0.0, 4.0), Point::new(4.0, 0.0)),
//! ];
//!
//! let intersections = bentley_ottmann(segments).unwrap();
//! assert_eq!(intersections.len(), 1);
//! assert_eq!(intersections[0].point, Point::new(2.0, 2.0));
//! assert_eq!(intersections[0].segments, [0, 1]);
//! ```
//!
//! [Bentley-Ottmann algorithm]: https://en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm

#![no_std]
#![forbid(unsafe_code, rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod algorithm;
mod compare;
mod config;
pub mod geometry;
mod observer;
pub mod rbtree;
mod utils;

pub use config::SweepConfig;
pub use geometry::{Degenerate, Point, Scalar, Segment, SegmentIntersection};
pub use observer::SweepObserver;

use ahash::RandomState;
use algorithm::Algorithm;
use alloc::vec::Vec;
use core::{fmt, iter::FusedIterator};
use rbtree::TreeError;

/// The position of a segment in the input sequence.
pub type SegmentId = usize;

/// A point where two or more segments meet.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<Num> {
    /// Where the segments meet.
    pub point: Point<Num>,
    /// Every segment touching the point, sorted by id. Always holds at
    /// least two ids.
    pub segments: Vec<SegmentId>,
}

/// Two collinear segments sharing more than a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap<Num> {
    /// The two segments, smaller id first.
    pub segments: [SegmentId; 2],
    /// The first point of the shared interval in sweep order.
    pub start: Point<Num>,
    /// The last point of the shared interval in sweep order.
    pub end: Point<Num>,
}

/// The complete outcome of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<Num> {
    /// Intersection points in sweep order.
    pub intersections: Vec<Intersection<Num>>,
    /// Collinear overlaps, in the order they were found.
    pub overlaps: Vec<Overlap<Num>>,
}

/// Why an input segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// Both endpoints are the same point, up to the tolerance.
    ZeroLength,
    /// A coordinate is infinite or NaN.
    NonFinite,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::ZeroLength => write!(f, "segment has zero length"),
            InvalidReason::NonFinite => write!(f, "segment has a non-finite coordinate"),
        }
    }
}

/// An error that stopped a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// An input segment cannot be swept.
    InvalidSegment {
        /// Position of the segment in the input.
        index: usize,
        /// What is wrong with it.
        reason: InvalidReason,
    },
    /// The configured tolerance is not a positive finite number.
    InvalidTolerance,
    /// The event queue or the sweep status lost track of an entry.
    ///
    /// This is a bug in the sweep, not a problem with the input.
    Structure(TreeError),
    /// The observer asked the sweep to stop.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSegment { index, reason } => {
                write!(f, "invalid segment at index {}: {}", index, reason)
            }
            Error::InvalidTolerance => write!(f, "tolerance must be positive and finite"),
            Error::Structure(err) => write!(f, "sweep structure is inconsistent: {}", err),
            Error::Cancelled => write!(f, "sweep was cancelled"),
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Error::Structure(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for TreeError {}

/// Find every intersection among the segments.
///
/// Intersections come back in sweep order, one per point.
pub fn bentley_ottmann<Num: Scalar>(
    segments: impl IntoIterator<Item = Segment<Num>>,
) -> Result<Vec<Intersection<Num>>, Error> {
    bentley_ottmann_report(segments, SweepConfig::default(), ()).map(|report| report.intersections)
}

/// Run a complete sweep with the given configuration and observer.
pub fn bentley_ottmann_report<Num: Scalar, Obs: SweepObserver<Num>>(
    segments: impl IntoIterator<Item = Segment<Num>>,
    config: SweepConfig<Num>,
    observer: Obs,
) -> Result<Report<Num>, Error> {
    Sweep::new(segments, config, observer)?.into_report()
}

/// An iterator over the intersections, produced one event at a time.
///
/// Once an error has been yielded the iterator is exhausted.
pub struct Sweep<Num: Scalar, Obs = ()> {
    algorithm: Algorithm<Num, Obs>,
    failed: bool,
}

impl<Num: Scalar, Obs: SweepObserver<Num>> Sweep<Num, Obs> {
    /// Prepare a sweep over the segments.
    ///
    /// Every segment is validated up front, so no event is processed when
    /// any of them is rejected.
    pub fn new(
        segments: impl IntoIterator<Item = Segment<Num>>,
        config: SweepConfig<Num>,
        observer: Obs,
    ) -> Result<Self, Error> {
        Ok(Self {
            algorithm: Algorithm::new(segments, config, observer)?,
            failed: false,
        })
    }

    /// The collinear overlaps found so far.
    pub fn overlaps(&self) -> &[Overlap<Num>] {
        self.algorithm.overlaps()
    }

    /// The number of events waiting to be processed.
    pub fn pending_events(&self) -> usize {
        self.algorithm.queue_len()
    }

    /// Run the sweep to completion.
    pub fn into_report(mut self) -> Result<Report<Num>, Error> {
        let intersections = self.by_ref().collect::<Result<Vec<_>, _>>()?;
        let overlaps = self.algorithm.into_overlaps();

        tracing::debug!(
            "Sweep found {} intersections and {} overlaps",
            intersections.len(),
            overlaps.len()
        );

        Ok(Report {
            intersections,
            overlaps,
        })
    }
}

impl<Num: Scalar, Obs: SweepObserver<Num>> Iterator for Sweep<Num, Obs> {
    type Item = Result<Intersection<Num>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.algorithm.next_event() {
                Ok(None) => return None,
                Ok(Some(event)) if event.segments.len() > 1 => {
                    return Some(Ok(Intersection {
                        point: event.point,
                        segments: event.segments,
                    }));
                }
                Ok(Some(_)) => continue,
                Err(err) => {
                    if let Error::Structure(_) = err {
                        tracing::error!("Aborting sweep: {}", err);
                    }
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, None)
        }
    }
}

// once the event queue is exhausted or an error was yielded, no other
// item is produced
impl<Num: Scalar, Obs: SweepObserver<Num>> FusedIterator for Sweep<Num, Obs> {}

impl<Num: Scalar, Obs> fmt::Debug for Sweep<Num, Obs> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sweep")
            .field("pending_events", &self.algorithm.queue_len())
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

type HashSet<K> = hashbrown::HashSet<K, RandomState>;
type HashMap<K, V> = hashbrown::HashMap<K, V, RandomState>;
