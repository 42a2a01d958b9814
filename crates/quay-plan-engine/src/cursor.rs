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

//! The "current instant" the planner classifies stays against.

use crate::config::PastReference;
use chrono::Utc;
use quay_plan_core::time::TimePoint;
use quay_plan_model::stay::Stay;

/// Source of wall-clock time.
pub trait Clock {
    fn now(&self) -> TimePoint;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> TimePoint {
        TimePoint::from(Utc::now())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub TimePoint);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> TimePoint {
        self.0
    }
}

/// Classification of a stay relative to the cursor. The three flags need not
/// partition: with a wall-clock past reference a stay can be both current and
/// past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tense {
    pub past: bool,
    pub current: bool,
    pub future: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    instant: TimePoint,
    past_reference: PastReference,
}

impl Cursor {
    #[inline]
    pub fn new(instant: TimePoint, past_reference: PastReference) -> Self {
        Self {
            instant,
            past_reference,
        }
    }

    #[inline]
    pub fn instant(&self) -> TimePoint {
        self.instant
    }

    #[inline]
    pub fn past_reference(&self) -> PastReference {
        self.past_reference
    }

    #[inline]
    pub fn set(&mut self, instant: TimePoint) {
        self.instant = instant;
    }

    pub fn classify(&self, stay: &Stay, clock: &dyn Clock) -> Tense {
        let reference = match self.past_reference {
            PastReference::Cursor => self.instant,
            PastReference::WallClock => clock.now(),
        };
        Tense {
            past: stay.is_past_at(reference),
            current: stay.is_current_at(self.instant),
            future: stay.is_future_at(self.instant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_plan_core::space::{Heading, PierLength, PierPosition};
    use quay_plan_model::{
        id::{StayId, VesselId},
        stay::{Docking, Schedule, Vessel},
    };

    fn stay(etb: i64, etd: i64) -> Stay {
        Stay::new(
            StayId::new(1),
            Vessel::new(VesselId::new(1), "A", PierLength::new(100.0), PierLength::new(20.0))
                .unwrap(),
            Docking::new(
                Heading::Positive,
                PierPosition::zero(),
                PierLength::zero(),
                PierLength::zero(),
            )
            .unwrap(),
            Schedule::estimated(TimePoint::new(etb), TimePoint::new(etd)).unwrap(),
        )
    }

    #[test]
    fn test_classify_against_cursor() {
        let clock = FixedClock(TimePoint::new(0));
        let s = stay(100, 200);
        let at = |t| Cursor::new(TimePoint::new(t), PastReference::Cursor).classify(&s, &clock);
        assert_eq!(
            at(50),
            Tense {
                past: false,
                current: false,
                future: true
            }
        );
        assert!(at(100).current);
        assert!(at(200).current);
        assert!(!at(200).past);
        assert!(at(250).past && !at(250).current);
    }

    #[test]
    fn test_classify_against_wall_clock() {
        let s = stay(100, 200);
        let cursor = Cursor::new(TimePoint::new(150), PastReference::WallClock);
        let tense = cursor.classify(&s, &FixedClock(TimePoint::new(1_000)));
        assert!(tense.current);
        assert!(tense.past);
        assert!(!tense.future);
    }
}
