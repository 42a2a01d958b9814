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

//! # Instants and Durations
//!
//! Schedules are expressed on an integer millisecond timeline anchored at the
//! Unix epoch. `TimePoint` is an instant on that timeline and `TimeDelta` a
//! signed duration between two instants. Keeping both as integers makes grid
//! quantization exact; conversion to calendar time happens only at the wire
//! boundary through [`chrono`].

use crate::primitives::Interval;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use std::{
    fmt::Display,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimePoint(i64);

pub type TimeInterval = Interval<TimePoint>;

impl Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.0)
    }
}

impl From<i64> for TimePoint {
    #[inline]
    fn from(v: i64) -> Self {
        TimePoint(v)
    }
}

impl From<DateTime<Utc>> for TimePoint {
    #[inline]
    fn from(dt: DateTime<Utc>) -> Self {
        TimePoint(dt.timestamp_millis())
    }
}

impl TimePoint {
    /// Creates an instant from milliseconds since the Unix epoch.
    #[inline]
    pub const fn new(millis: i64) -> Self {
        TimePoint(millis)
    }

    #[inline]
    pub const fn zero() -> Self {
        TimePoint(0)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Converts to a calendar instant, or `None` if the value lies outside the
    /// range `chrono` can represent.
    #[inline]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    #[inline]
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add(delta.0).map(TimePoint)
    }

    #[inline]
    pub fn checked_sub(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_sub(delta.0).map(TimePoint)
    }

    #[inline]
    pub fn saturating_add(self, delta: TimeDelta) -> Self {
        TimePoint(self.0.saturating_add(delta.0))
    }

    #[inline]
    pub fn saturating_sub(self, delta: TimeDelta) -> Self {
        TimePoint(self.0.saturating_sub(delta.0))
    }

    /// Interval starting at `self` and lasting `len`, if it does not overflow.
    #[inline]
    pub fn span_of(self, len: TimeDelta) -> Option<TimeInterval> {
        self.checked_add(len)
            .map(|end| TimeInterval::new(self, end))
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeDelta(i64);

impl TimeDelta {
    #[inline]
    pub const fn new(millis: i64) -> Self {
        TimeDelta(millis)
    }

    #[inline]
    pub const fn from_minutes(minutes: i64) -> Self {
        TimeDelta(minutes * MILLIS_PER_MINUTE)
    }

    #[inline]
    pub const fn from_hours(hours: i64) -> Self {
        TimeDelta(hours * MILLIS_PER_HOUR)
    }

    #[inline]
    pub const fn zero() -> Self {
        TimeDelta(0)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_hours_f64(self) -> f64 {
        self.0 as f64 / MILLIS_PER_HOUR as f64
    }

    #[inline]
    pub fn abs(self) -> Self {
        TimeDelta(self.0.abs())
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn checked_add(self, rhs: TimeDelta) -> Option<Self> {
        self.0.checked_add(rhs.0).map(TimeDelta)
    }

    #[inline]
    pub fn checked_sub(self, rhs: TimeDelta) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(TimeDelta)
    }

    #[inline]
    pub fn checked_mul(self, rhs: i64) -> Option<Self> {
        self.0.checked_mul(rhs).map(TimeDelta)
    }
}

impl Display for TimeDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeDelta({})", self.0)
    }
}

impl From<i64> for TimeDelta {
    #[inline]
    fn from(v: i64) -> Self {
        TimeDelta(v)
    }
}

impl Add<TimeDelta> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn add(self, rhs: TimeDelta) -> Self::Output {
        TimePoint(
            self.0
                .checked_add(rhs.0)
                .expect("overflow in TimePoint + TimeDelta"),
        )
    }
}

impl Sub<TimeDelta> for TimePoint {
    type Output = TimePoint;

    #[inline]
    fn sub(self, rhs: TimeDelta) -> Self::Output {
        TimePoint(
            self.0
                .checked_sub(rhs.0)
                .expect("underflow in TimePoint - TimeDelta"),
        )
    }
}

impl Sub<TimePoint> for TimePoint {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: TimePoint) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(rhs.0)
                .expect("overflow in TimePoint - TimePoint"),
        )
    }
}

impl AddAssign<TimeDelta> for TimePoint {
    #[inline]
    fn add_assign(&mut self, rhs: TimeDelta) {
        *self = *self + rhs;
    }
}

impl SubAssign<TimeDelta> for TimePoint {
    #[inline]
    fn sub_assign(&mut self, rhs: TimeDelta) {
        *self = *self - rhs;
    }
}

impl Add for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        TimeDelta(
            self.0
                .checked_add(rhs.0)
                .expect("overflow in TimeDelta + TimeDelta"),
        )
    }
}

impl Sub for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        TimeDelta(
            self.0
                .checked_sub(rhs.0)
                .expect("overflow in TimeDelta - TimeDelta"),
        )
    }
}

impl Neg for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn neg(self) -> Self::Output {
        TimeDelta(-self.0)
    }
}

impl Zero for TimeDelta {
    #[inline]
    fn zero() -> Self {
        TimeDelta(0)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Interval<TimePoint> {
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end() - self.start()
    }
}
