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

use crate::id::StayId;
use quay_plan_core::{
    space::{InvalidHeadingError, PierLength, PierPosition, SpaceInterval},
    time::{TimeInterval, TimePoint},
};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonPositiveDimensionError {
    field: &'static str,
    value: PierLength,
}

impl NonPositiveDimensionError {
    #[inline]
    pub fn new(field: &'static str, value: PierLength) -> Self {
        Self { field, value }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn value(&self) -> PierLength {
        self.value
    }
}

impl Display for NonPositiveDimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel {} must be positive and finite, got {}",
            self.field, self.value
        )
    }
}

impl std::error::Error for NonPositiveDimensionError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeClearanceError {
    field: &'static str,
    value: PierLength,
}

impl NegativeClearanceError {
    #[inline]
    pub fn new(field: &'static str, value: PierLength) -> Self {
        Self { field, value }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn value(&self) -> PierLength {
        self.value
    }
}

impl Display for NegativeClearanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Docking clearance {} must be non-negative and finite, got {}",
            self.field, self.value
        )
    }
}

impl std::error::Error for NegativeClearanceError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonFinitePositionError(PierPosition);

impl NonFinitePositionError {
    #[inline]
    pub fn new(pos: PierPosition) -> Self {
        Self(pos)
    }

    #[inline]
    pub fn pos(&self) -> PierPosition {
        self.0
    }
}

impl Display for NonFinitePositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Docking position must be finite, got {}", self.0)
    }
}

impl std::error::Error for NonFinitePositionError {}

/// Which pair of schedule fields an [`InvertedWindowError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Estimated,
    Actual,
}

impl Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowKind::Estimated => write!(f, "etb/etd"),
            WindowKind::Actual => write!(f, "atb/atd"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvertedWindowError {
    kind: WindowKind,
    berthing: TimePoint,
    departure: TimePoint,
}

impl InvertedWindowError {
    #[inline]
    pub fn new(kind: WindowKind, berthing: TimePoint, departure: TimePoint) -> Self {
        Self {
            kind,
            berthing,
            departure,
        }
    }

    #[inline]
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    #[inline]
    pub fn berthing(&self) -> TimePoint {
        self.berthing
    }

    #[inline]
    pub fn departure(&self) -> TimePoint {
        self.departure
    }
}

impl Display for InvertedWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Schedule {} must depart after berthing: {} is not after {}",
            self.kind, self.departure, self.berthing
        )
    }
}

impl std::error::Error for InvertedWindowError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StayBuildError {
    NonPositiveDimension(NonPositiveDimensionError),
    NegativeClearance(NegativeClearanceError),
    NonFinitePosition(NonFinitePositionError),
    InvalidHeading(InvalidHeadingError),
    InvertedWindow(InvertedWindowError),
}

impl Display for StayBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StayBuildError::NonPositiveDimension(e) => write!(f, "{}", e),
            StayBuildError::NegativeClearance(e) => write!(f, "{}", e),
            StayBuildError::NonFinitePosition(e) => write!(f, "{}", e),
            StayBuildError::InvalidHeading(e) => write!(f, "{}", e),
            StayBuildError::InvertedWindow(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StayBuildError {}

impl From<NonPositiveDimensionError> for StayBuildError {
    fn from(err: NonPositiveDimensionError) -> Self {
        StayBuildError::NonPositiveDimension(err)
    }
}

impl From<NegativeClearanceError> for StayBuildError {
    fn from(err: NegativeClearanceError) -> Self {
        StayBuildError::NegativeClearance(err)
    }
}

impl From<NonFinitePositionError> for StayBuildError {
    fn from(err: NonFinitePositionError) -> Self {
        StayBuildError::NonFinitePosition(err)
    }
}

impl From<InvalidHeadingError> for StayBuildError {
    fn from(err: InvalidHeadingError) -> Self {
        StayBuildError::InvalidHeading(err)
    }
}

impl From<InvertedWindowError> for StayBuildError {
    fn from(err: InvertedWindowError) -> Self {
        StayBuildError::InvertedWindow(err)
    }
}

/// Two live stays whose footprints intersect in both time and space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayOverlapError {
    a: StayId,
    b: StayId,
    time_a: TimeInterval,
    time_b: TimeInterval,
    space_a: SpaceInterval,
    space_b: SpaceInterval,
}

impl StayOverlapError {
    #[inline]
    pub fn new(
        a: StayId,
        b: StayId,
        time_a: TimeInterval,
        time_b: TimeInterval,
        space_a: SpaceInterval,
        space_b: SpaceInterval,
    ) -> Self {
        Self {
            a,
            b,
            time_a,
            time_b,
            space_a,
            space_b,
        }
    }

    #[inline]
    pub fn a(&self) -> StayId {
        self.a
    }

    #[inline]
    pub fn b(&self) -> StayId {
        self.b
    }

    #[inline]
    pub fn time_a(&self) -> TimeInterval {
        self.time_a
    }

    #[inline]
    pub fn time_b(&self) -> TimeInterval {
        self.time_b
    }

    #[inline]
    pub fn space_a(&self) -> SpaceInterval {
        self.space_a
    }

    #[inline]
    pub fn space_b(&self) -> SpaceInterval {
        self.space_b
    }

    /// Both ids, smaller first.
    #[inline]
    pub fn ids(&self) -> (StayId, StayId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

impl Display for StayOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hard overlap between {} and {}: time {} vs {}, space {} vs {}",
            self.a, self.b, self.time_a, self.time_b, self.space_a, self.space_b
        )
    }
}

impl std::error::Error for StayOverlapError {}
