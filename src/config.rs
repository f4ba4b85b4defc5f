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

//! Knobs for a single run of the sweep.

use crate::geometry::Scalar;

/// Configuration for a sweep.
///
/// The tolerance is fixed for the whole run. Points closer than
/// `epsilon` in both coordinates are treated as the same event point,
/// and segments passing closer than `epsilon` to an event point are
/// treated as passing through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig<Num> {
    /// The comparison tolerance.
    pub epsilon: Num,
}

impl<Num: Scalar> Default for SweepConfig<Num> {
    fn default() -> Self {
        Self {
            epsilon: Num::DEFAULT_EPSILON,
        }
    }
}

impl<Num: Scalar> SweepConfig<Num> {
    /// Use a different comparison tolerance.
    pub fn with_epsilon(self, epsilon: Num) -> Self {
        Self { epsilon, ..self }
    }

    /// Is the tolerance usable, i.e. finite and strictly positive?
    pub(crate) fn is_valid(&self) -> bool {
        self.epsilon.is_finite() && self.epsilon > Num::zero()
    }
}
