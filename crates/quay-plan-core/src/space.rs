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

//! Positions and lengths along the pier axis, in meters.

use crate::primitives::Interval;
use num_traits::Zero;
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

/// A position along the pier, measured in meters from the pier origin.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct PierPosition(f64);

pub type SpaceInterval = Interval<PierPosition>;

impl Display for PierPosition {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl From<f64> for PierPosition {
    #[inline]
    fn from(v: f64) -> Self {
        PierPosition(v)
    }
}

impl PierPosition {
    #[inline]
    pub const fn new(v: f64) -> Self {
        PierPosition(v)
    }

    #[inline]
    pub const fn zero() -> Self {
        PierPosition(0.0)
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Moves `len` meters in the direction given by `heading`.
    #[inline]
    pub fn toward(self, heading: Heading, len: PierLength) -> Self {
        PierPosition(self.0 + heading.signum() * len.value())
    }

    /// Clamps the position into `[lo, hi]`.
    #[inline]
    pub fn clamp(self, lo: PierPosition, hi: PierPosition) -> Self {
        assert!(lo <= hi, "lo must be <= hi");
        PierPosition(self.0.clamp(lo.0, hi.0))
    }
}

impl Add<PierLength> for PierPosition {
    type Output = PierPosition;

    #[inline]
    fn add(self, rhs: PierLength) -> Self::Output {
        PierPosition(self.0 + rhs.0)
    }
}

impl Sub<PierLength> for PierPosition {
    type Output = PierPosition;

    #[inline]
    fn sub(self, rhs: PierLength) -> Self::Output {
        PierPosition(self.0 - rhs.0)
    }
}

/// Distance between two positions, always non-negative.
impl Sub<PierPosition> for PierPosition {
    type Output = PierLength;

    #[inline]
    fn sub(self, rhs: PierPosition) -> Self::Output {
        PierLength((self.0 - rhs.0).abs())
    }
}

impl AddAssign<PierLength> for PierPosition {
    #[inline]
    fn add_assign(&mut self, rhs: PierLength) {
        self.0 += rhs.0;
    }
}

impl SubAssign<PierLength> for PierPosition {
    #[inline]
    fn sub_assign(&mut self, rhs: PierLength) {
        self.0 -= rhs.0;
    }
}

/// A length along the pier in meters, such as a hull length or a clearance.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
pub struct PierLength(f64);

impl Display for PierLength {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}m", self.0)
    }
}

impl From<f64> for PierLength {
    #[inline]
    fn from(v: f64) -> Self {
        PierLength(v)
    }
}

impl PierLength {
    #[inline]
    pub const fn new(v: f64) -> Self {
        PierLength(v)
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        PierLength(0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        PierLength(self.0.abs())
    }
}

impl Zero for PierLength {
    #[inline]
    fn zero() -> Self {
        PierLength(0.0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Add for PierLength {
    type Output = PierLength;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        PierLength(self.0 + rhs.0)
    }
}

impl Sub for PierLength {
    type Output = PierLength;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        PierLength(self.0 - rhs.0)
    }
}

impl Neg for PierLength {
    type Output = PierLength;

    #[inline]
    fn neg(self) -> Self::Output {
        PierLength(-self.0)
    }
}

impl Mul<f64> for PierLength {
    type Output = PierLength;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        PierLength(self.0 * rhs)
    }
}

impl AddAssign for PierLength {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for PierLength {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for PierLength {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a PierLength> for PierLength {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc + *x)
    }
}

impl Interval<PierPosition> {
    #[inline]
    pub fn extent(&self) -> PierLength {
        self.end() - self.start()
    }
}

/// Orientation of a vessel's bow along the pier axis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Heading {
    /// Bow points toward increasing pier positions (`dir = +1`).
    #[default]
    Positive,
    /// Bow points toward the pier origin (`dir = -1`).
    Negative,
}

impl Heading {
    #[inline]
    pub const fn signum(self) -> f64 {
        match self {
            Heading::Positive => 1.0,
            Heading::Negative => -1.0,
        }
    }

    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Heading::Positive => Heading::Negative,
            Heading::Negative => Heading::Positive,
        }
    }

    #[inline]
    pub const fn as_dir(self) -> i8 {
        match self {
            Heading::Positive => 1,
            Heading::Negative => -1,
        }
    }
}

impl Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heading::Positive => write!(f, "+1"),
            Heading::Negative => write!(f, "-1"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidHeadingError(i64);

impl InvalidHeadingError {
    #[inline]
    pub fn new(dir: i64) -> Self {
        Self(dir)
    }

    #[inline]
    pub fn dir(&self) -> i64 {
        self.0
    }
}

impl Display for InvalidHeadingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid docking direction {}, expected +1 or -1", self.0)
    }
}

impl std::error::Error for InvalidHeadingError {}

impl TryFrom<i64> for Heading {
    type Error = InvalidHeadingError;

    fn try_from(dir: i64) -> Result<Self, Self::Error> {
        match dir {
            1 => Ok(Heading::Positive),
            -1 => Ok(Heading::Negative),
            other => Err(InvalidHeadingError::new(other)),
        }
    }
}

impl From<Heading> for i64 {
    fn from(heading: Heading) -> Self {
        heading.as_dir() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        assert_eq!(format!("{}", PierPosition::new(12.5)), "12.5m");
        assert_eq!(format!("{}", PierLength::new(100.0)), "100m");
    }

    #[test]
    fn test_position_difference_is_absolute() {
        let a = PierPosition::new(150.0);
        let b = PierPosition::new(100.0);
        assert_eq!(a - b, PierLength::new(50.0));
        assert_eq!(b - a, PierLength::new(50.0));
    }

    #[test]
    fn test_toward_follows_heading() {
        let stern = PierPosition::new(300.0);
        let len = PierLength::new(120.0);
        assert_eq!(stern.toward(Heading::Positive, len), PierPosition::new(420.0));
        assert_eq!(stern.toward(Heading::Negative, len), PierPosition::new(180.0));
    }

    #[test]
    fn test_clamp() {
        let lo = PierPosition::zero();
        let hi = PierPosition::new(1000.0);
        assert_eq!(PierPosition::new(-3.0).clamp(lo, hi), lo);
        assert_eq!(PierPosition::new(1200.0).clamp(lo, hi), hi);
        assert_eq!(PierPosition::new(450.0).clamp(lo, hi), PierPosition::new(450.0));
    }

    #[test]
    fn test_space_interval_extent() {
        let i = SpaceInterval::new(PierPosition::new(200.0), PierPosition::new(80.0));
        assert_eq!(i.start(), PierPosition::new(80.0));
        assert_eq!(i.extent(), PierLength::new(120.0));
    }

    #[test]
    fn test_length_sum() {
        let total: PierLength = [PierLength::new(1.5), PierLength::new(2.5)].iter().sum();
        assert_eq!(total, PierLength::new(4.0));
    }

    #[test]
    fn test_heading_round_trips_through_dir() {
        assert_eq!(Heading::try_from(1).unwrap(), Heading::Positive);
        assert_eq!(Heading::try_from(-1).unwrap(), Heading::Negative);
        assert_eq!(i64::from(Heading::Negative), -1);
        assert_eq!(Heading::Positive.reversed(), Heading::Negative);
    }

    #[test]
    fn test_heading_rejects_zero() {
        let err = Heading::try_from(0).unwrap_err();
        assert_eq!(err.dir(), 0);
    }
}
