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

//! # Coordinate Transforms
//!
//! The engine never renders anything, but it receives gestures in screen
//! pixels and must turn them into pier meters and instants. The host supplies
//! one [`CoordinateTransform`] per axis; the engine only requires that each is
//! monotonic and that `to_domain` inverts `to_screen` over the active
//! viewport.

use crate::{space::PierPosition, time::TimePoint};
use std::fmt::Display;

/// Reversible mapping between a domain value and a screen coordinate.
pub trait CoordinateTransform<D> {
    fn to_screen(&self, value: D) -> f64;
    fn to_domain(&self, pixel: f64) -> D;
}

impl<D, X> CoordinateTransform<D> for &X
where
    X: CoordinateTransform<D> + ?Sized,
{
    #[inline]
    fn to_screen(&self, value: D) -> f64 {
        (**self).to_screen(value)
    }

    #[inline]
    fn to_domain(&self, pixel: f64) -> D {
        (**self).to_domain(pixel)
    }
}

/// Domain types a [`LinearScale`] can interpolate.
pub trait ScaleDomain: Copy {
    fn to_scalar(self) -> f64;
    fn from_scalar(v: f64) -> Self;
}

impl ScaleDomain for f64 {
    #[inline]
    fn to_scalar(self) -> f64 {
        self
    }

    #[inline]
    fn from_scalar(v: f64) -> Self {
        v
    }
}

impl ScaleDomain for PierPosition {
    #[inline]
    fn to_scalar(self) -> f64 {
        self.value()
    }

    #[inline]
    fn from_scalar(v: f64) -> Self {
        PierPosition::new(v)
    }
}

impl ScaleDomain for TimePoint {
    #[inline]
    fn to_scalar(self) -> f64 {
        self.value() as f64
    }

    /// Rounds to the nearest millisecond.
    #[inline]
    fn from_scalar(v: f64) -> Self {
        TimePoint::new(v.round() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    DegenerateDomain,
    DegenerateRange,
    NonFinite,
}

impl Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::DegenerateDomain => write!(f, "Scale domain bounds must differ"),
            ScaleError::DegenerateRange => write!(f, "Scale range bounds must differ"),
            ScaleError::NonFinite => write!(f, "Scale bounds must be finite"),
        }
    }
}

impl std::error::Error for ScaleError {}

/// Affine map from a domain interval onto a pixel interval.
///
/// Either interval may be given in descending order; a time axis drawn with
/// later instants toward the top of the screen uses a descending range.
///
/// # Examples
///
/// ```
/// use quay_plan_core::space::PierPosition;
/// use quay_plan_core::transform::{CoordinateTransform, LinearScale};
///
/// let x = LinearScale::new(
///     (PierPosition::new(0.0), PierPosition::new(1000.0)),
///     (0.0, 500.0),
/// )
/// .unwrap();
/// assert_eq!(x.to_screen(PierPosition::new(200.0)), 100.0);
/// assert_eq!(x.to_domain(100.0), PierPosition::new(200.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale<D> {
    domain: (D, D),
    range: (f64, f64),
}

impl<D: ScaleDomain> LinearScale<D> {
    pub fn new(domain: (D, D), range: (f64, f64)) -> Result<Self, ScaleError> {
        let (d0, d1) = (domain.0.to_scalar(), domain.1.to_scalar());
        let (r0, r1) = range;
        if !(d0.is_finite() && d1.is_finite() && r0.is_finite() && r1.is_finite()) {
            return Err(ScaleError::NonFinite);
        }
        if d0 == d1 {
            return Err(ScaleError::DegenerateDomain);
        }
        if r0 == r1 {
            return Err(ScaleError::DegenerateRange);
        }
        Ok(Self { domain, range })
    }

    #[inline]
    pub fn domain(&self) -> (D, D) {
        self.domain
    }

    #[inline]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Pixels per domain unit; negative for an inverted axis.
    #[inline]
    pub fn pixels_per_unit(&self) -> f64 {
        let (d0, d1) = (self.domain.0.to_scalar(), self.domain.1.to_scalar());
        (self.range.1 - self.range.0) / (d1 - d0)
    }

    /// Returns the scale seen after applying the screen-space zoom
    /// `p' = k * p + translate` to this one, with the pixel range unchanged.
    pub fn zoomed(&self, k: f64, translate: f64) -> Result<Self, ScaleError> {
        if !(k.is_finite() && translate.is_finite()) {
            return Err(ScaleError::NonFinite);
        }
        if k == 0.0 {
            return Err(ScaleError::DegenerateDomain);
        }
        let (r0, r1) = self.range;
        let d0 = self.to_domain((r0 - translate) / k);
        let d1 = self.to_domain((r1 - translate) / k);
        Self::new((d0, d1), self.range)
    }
}

impl<D: ScaleDomain> CoordinateTransform<D> for LinearScale<D> {
    #[inline]
    fn to_screen(&self, value: D) -> f64 {
        let d0 = self.domain.0.to_scalar();
        self.range.0 + (value.to_scalar() - d0) * self.pixels_per_unit()
    }

    #[inline]
    fn to_domain(&self, pixel: f64) -> D {
        let d0 = self.domain.0.to_scalar();
        D::from_scalar(d0 + (pixel - self.range.0) / self.pixels_per_unit())
    }
}

/// The two axis transforms active for one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport<P, T> {
    position: P,
    time: T,
}

impl<P, T> Viewport<P, T>
where
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    pub fn new(position: P, time: T) -> Self {
        Self { position, time }
    }

    #[inline]
    pub fn position(&self) -> &P {
        &self.position
    }

    #[inline]
    pub fn time(&self) -> &T {
        &self.time
    }

    #[inline]
    pub fn x_of(&self, pos: PierPosition) -> f64 {
        self.position.to_screen(pos)
    }

    #[inline]
    pub fn y_of(&self, t: TimePoint) -> f64 {
        self.time.to_screen(t)
    }

    #[inline]
    pub fn position_at(&self, x: f64) -> PierPosition {
        self.position.to_domain(x)
    }

    #[inline]
    pub fn time_at(&self, y: f64) -> TimePoint {
        self.time.to_domain(y)
    }
}

pub type LinearViewport = Viewport<LinearScale<PierPosition>, LinearScale<TimePoint>>;
