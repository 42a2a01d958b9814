// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Grid Quantization
//!
//! Interactive edits produce continuous domain values; before they are
//! written back they are snapped to the nearest multiple of a grid step.
//! Quantization is applied to domain values (meters, milliseconds), never to
//! screen deltas, so the grid does not move when the viewport zooms.
//!
//! Ties round toward positive infinity: `quantize(25, 50) == 50` and
//! `quantize(-25, 50) == 0`.

use crate::{
    space::{PierLength, PierPosition},
    time::{TimeDelta, TimePoint},
};
use std::fmt::Display;

/// Rounds `value` to the nearest multiple of `step`.
///
/// `step` must be positive and finite.
///
/// # Examples
///
/// ```
/// use quay_plan_core::grid::snap;
///
/// assert_eq!(snap(37.0, 50.0), 50.0);
/// assert_eq!(snap(24.9, 50.0), 0.0);
/// assert_eq!(snap(snap(137.0, 50.0), 50.0), snap(137.0, 50.0));
/// ```
#[inline]
pub fn snap(value: f64, step: f64) -> f64 {
    debug_assert!(step > 0.0 && step.is_finite(), "snap: step must be positive");
    (value / step + 0.5).floor() * step
}

/// Integer counterpart of [`snap`] that never leaves the integer domain.
///
/// Computes `floor((2v + s) / 2s) * s`, which is `round(v / s) * s` with ties
/// toward positive infinity, for any positive step `s`. Near the ends of the
/// `i64` range the nearest representable multiple is returned instead.
///
/// # Examples
///
/// ```
/// use quay_plan_core::grid::snap_int;
///
/// assert_eq!(snap_int(7, 4), 8);
/// assert_eq!(snap_int(5, 4), 4);
/// assert_eq!(snap_int(-6, 4), -4);
/// ```
#[inline]
pub fn snap_int(value: i64, step: i64) -> i64 {
    debug_assert!(step > 0, "snap_int: step must be positive");
    let v = value as i128;
    let s = step as i128;
    let mut r = (2 * v + s).div_euclid(2 * s) * s;
    if r > i64::MAX as i128 {
        r -= s;
    } else if r < i64::MIN as i128 {
        r += s;
    }
    i64::try_from(r).unwrap_or(if r < 0 { i64::MIN } else { i64::MAX })
}

/// Values that can be snapped to a grid of their own step type.
pub trait Quantize: Sized {
    type Step: Copy;

    fn quantize(self, step: Self::Step) -> Self;
}

impl Quantize for f64 {
    type Step = f64;

    #[inline]
    fn quantize(self, step: f64) -> Self {
        snap(self, step)
    }
}

impl Quantize for PierPosition {
    type Step = PierLength;

    #[inline]
    fn quantize(self, step: PierLength) -> Self {
        PierPosition::new(snap(self.value(), step.value()))
    }
}

impl Quantize for TimePoint {
    type Step = TimeDelta;

    #[inline]
    fn quantize(self, step: TimeDelta) -> Self {
        TimePoint::new(snap_int(self.value(), step.value()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    NonPositivePositionStep(PierLength),
    NonPositiveTimeStep(TimeDelta),
}

impl Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::NonPositivePositionStep(s) => {
                write!(f, "Position grid step must be positive and finite, got {}", s)
            }
            GridError::NonPositiveTimeStep(s) => {
                write!(f, "Time grid step must be positive, got {}", s)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// The pair of grid steps used when committing an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    position_step: PierLength,
    time_step: TimeDelta,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            position_step: PierLength::new(50.0),
            time_step: TimeDelta::from_hours(6),
        }
    }
}

impl Grid {
    pub fn new(position_step: PierLength, time_step: TimeDelta) -> Result<Self, GridError> {
        if !position_step.is_finite() || !position_step.is_positive() {
            return Err(GridError::NonPositivePositionStep(position_step));
        }
        if !time_step.is_positive() {
            return Err(GridError::NonPositiveTimeStep(time_step));
        }
        Ok(Self {
            position_step,
            time_step,
        })
    }

    #[inline]
    pub fn position_step(&self) -> PierLength {
        self.position_step
    }

    #[inline]
    pub fn time_step(&self) -> TimeDelta {
        self.time_step
    }

    #[inline]
    pub fn snap_position(&self, pos: PierPosition) -> PierPosition {
        pos.quantize(self.position_step)
    }

    #[inline]
    pub fn snap_time(&self, t: TimePoint) -> TimePoint {
        t.quantize(self.time_step)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Grid {{ position_step: {}, time_step: {}h }}",
            self.position_step,
            self.time_step.as_hours_f64()
        )
    }
}
