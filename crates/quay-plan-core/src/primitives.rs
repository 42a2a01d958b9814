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

//! # Core Primitives
//!
//! Closed intervals over ordered values. Both the pier axis and the time axis
//! of a stay are modeled as closed intervals `[start, end]`: a vessel that
//! departs at the instant another one berths still occupies the berth at that
//! instant, and two hulls touching at a single meter mark still touch.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// A closed interval `[start, end]`.
///
/// The interval always satisfies `start <= end`; the constructor swaps its
/// arguments when they are given in descending order.
///
/// # Examples
///
/// ```
/// use quay_plan_core::primitives::Interval;
/// let interval = Interval::new(1, 5);
/// assert_eq!(interval.start(), 1);
/// assert_eq!(interval.end(), 5);
/// assert!(interval.contains(1));
/// assert!(interval.contains(5));
/// assert!(!interval.contains(6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start: T,
    end: T,
}

impl<T> Interval<T> {
    /// Creates a new closed interval from two bounds in any order.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are not comparable (NaN).
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let interval = Interval::new(5, 3);
    /// assert_eq!(interval.start(), 3);
    /// assert_eq!(interval.end(), 5);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self
    where
        T: PartialOrd + Copy,
    {
        let ord = a
            .partial_cmp(&b)
            .expect("Interval::new: non-comparable bounds (NaN?)");
        let (start, end) = match ord {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T
    where
        T: Copy,
    {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T
    where
        T: Copy,
    {
        self.end
    }

    /// Returns `true` if the interval is a single point.
    #[inline]
    pub fn is_degenerate(&self) -> bool
    where
        T: PartialEq,
    {
        self.start == self.end
    }

    /// Checks whether `x` lies within the interval, both bounds included.
    #[inline]
    pub fn contains(&self, x: T) -> bool
    where
        T: PartialOrd,
    {
        x >= self.start && x <= self.end
    }

    /// Checks whether `other` lies entirely within this interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert!(a.contains_interval(&Interval::new(2, 4)));
    /// assert!(a.contains_interval(&a));
    /// assert!(!a.contains_interval(&Interval::new(0, 6)));
    /// ```
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        other.start >= self.start && other.end <= self.end
    }

    /// Checks whether the two closed intervals share at least one point.
    ///
    /// This is the overlap test used by the conflict rule: intervals that
    /// merely touch at an endpoint overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let a = Interval::new(0, 10);
    /// assert!(a.overlaps(&Interval::new(5, 15)));
    /// assert!(a.overlaps(&Interval::new(10, 20))); // touching counts
    /// assert!(!a.overlaps(&Interval::new(11, 20)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool
    where
        T: PartialOrd,
    {
        self.start <= other.end && self.end >= other.start
    }

    /// Checks whether the interiors of the two intervals intersect, i.e. the
    /// overlap has positive measure.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let a = Interval::new(0, 10);
    /// assert!(a.intersects(&Interval::new(5, 15)));
    /// assert!(!a.intersects(&Interval::new(10, 20)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool
    where
        T: PartialOrd + Copy,
    {
        let start = if self.start > other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end < other.end {
            self.end
        } else {
            other.end
        };
        start < end
    }

    /// Returns the common part of both intervals, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let a = Interval::new(1, 5);
    /// assert_eq!(a.intersection(&Interval::new(3, 7)), Some(Interval::new(3, 5)));
    /// assert_eq!(a.intersection(&Interval::new(5, 8)), Some(Interval::new(5, 5)));
    /// assert_eq!(a.intersection(&Interval::new(6, 8)), None);
    /// ```
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self>
    where
        T: PartialOrd + Copy,
    {
        let start = if self.start > other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end < other.end {
            self.end
        } else {
            other.end
        };
        (start <= end).then_some(Self { start, end })
    }

    /// Shifts both bounds by `d`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let interval = Interval::new(1, 5).translate(2);
    /// assert_eq!(interval, Interval::new(3, 7));
    /// ```
    #[inline]
    pub fn translate<D>(&self, d: D) -> Self
    where
        D: Copy,
        T: Copy + PartialOrd + Add<D, Output = T>,
    {
        Self::new(self.start + d, self.end + d)
    }

    /// Widens the interval by `before` below its start and `after` above its end.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// let interval = Interval::new(10, 20).extend(3, 5);
    /// assert_eq!(interval, Interval::new(7, 25));
    /// ```
    #[inline]
    pub fn extend<D>(&self, before: D, after: D) -> Self
    where
        D: Copy,
        T: Copy + PartialOrd + Add<D, Output = T> + Sub<D, Output = T>,
    {
        Self::new(self.start - before, self.end + after)
    }

    /// Length of the interval as measured in the difference type of `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    ///
    /// assert_eq!(Interval::new(2, 5).measure(), 3);
    /// ```
    #[inline]
    pub fn measure<D>(&self) -> D
    where
        T: Copy + Sub<Output = D>,
    {
        self.end - self.start
    }
}

impl<T: Default> Default for Interval<T> {
    #[inline]
    fn default() -> Self {
        Self {
            start: T::default(),
            end: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Interval<T> {
    /// Formats the interval as `[start, end]`.
    ///
    /// ```
    /// use quay_plan_core::primitives::Interval;
    /// assert_eq!(format!("{}", Interval::new(1, 5)), "[1, 5]");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

impl<T: Copy + PartialOrd> From<std::ops::RangeInclusive<T>> for Interval<T> {
    #[inline]
    fn from(range: std::ops::RangeInclusive<T>) -> Self {
        Interval::new(*range.start(), *range.end())
    }
}
