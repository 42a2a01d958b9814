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

//! # Stays
//!
//! A [`Stay`] is one vessel occupying one stretch of the pier for one time
//! window. Its three parts are validated on construction so every `Stay`
//! held by the engine satisfies `lpp > 0`, `beam > 0`, non-negative
//! clearances, a finite position and `etd > etb`.

use crate::{
    err::{
        InvertedWindowError, NegativeClearanceError, NonFinitePositionError,
        NonPositiveDimensionError, StayBuildError, WindowKind,
    },
    id::{StayId, VesselId},
};
use quay_plan_core::{
    space::{Heading, PierLength, PierPosition, SpaceInterval},
    time::{TimeInterval, TimePoint},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct Vessel {
    id: VesselId,
    name: String,
    lpp: PierLength,
    beam: PierLength,
}

impl Vessel {
    pub fn new(
        id: VesselId,
        name: impl Into<String>,
        lpp: PierLength,
        beam: PierLength,
    ) -> Result<Self, StayBuildError> {
        if !lpp.is_finite() || !lpp.is_positive() {
            return Err(NonPositiveDimensionError::new("lpp", lpp).into());
        }
        if !beam.is_finite() || !beam.is_positive() {
            return Err(NonPositiveDimensionError::new("beam", beam).into());
        }
        Ok(Self {
            id,
            name: name.into(),
            lpp,
            beam,
        })
    }

    #[inline]
    pub fn id(&self) -> VesselId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length between perpendiculars, the hull length used for the footprint.
    #[inline]
    pub fn lpp(&self) -> PierLength {
        self.lpp
    }

    #[inline]
    pub fn beam(&self) -> PierLength {
        self.beam
    }
}

/// Where and in which orientation a vessel lies along the pier.
///
/// `pos` is the stern. `aft` is kept free ahead of the bow and `rear` behind
/// the stern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Docking {
    heading: Heading,
    pos: PierPosition,
    aft: PierLength,
    rear: PierLength,
}

impl Docking {
    pub fn new(
        heading: Heading,
        pos: PierPosition,
        aft: PierLength,
        rear: PierLength,
    ) -> Result<Self, StayBuildError> {
        if !pos.is_finite() {
            return Err(NonFinitePositionError::new(pos).into());
        }
        if !aft.is_finite() || aft.is_negative() {
            return Err(NegativeClearanceError::new("aft", aft).into());
        }
        if !rear.is_finite() || rear.is_negative() {
            return Err(NegativeClearanceError::new("rear", rear).into());
        }
        Ok(Self {
            heading,
            pos,
            aft,
            rear,
        })
    }

    #[inline]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    #[inline]
    pub fn pos(&self) -> PierPosition {
        self.pos
    }

    #[inline]
    pub fn aft(&self) -> PierLength {
        self.aft
    }

    #[inline]
    pub fn rear(&self) -> PierLength {
        self.rear
    }

    /// The same docking moved so the stern lies at `pos`.
    pub fn with_pos(self, pos: PierPosition) -> Result<Self, StayBuildError> {
        Self::new(self.heading, pos, self.aft, self.rear)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    etb: TimePoint,
    etd: TimePoint,
    atb: Option<TimePoint>,
    atd: Option<TimePoint>,
}

impl Schedule {
    pub fn new(
        etb: TimePoint,
        etd: TimePoint,
        atb: Option<TimePoint>,
        atd: Option<TimePoint>,
    ) -> Result<Self, StayBuildError> {
        if etd <= etb {
            return Err(InvertedWindowError::new(WindowKind::Estimated, etb, etd).into());
        }
        if let (Some(b), Some(d)) = (atb, atd)
            && d <= b
        {
            return Err(InvertedWindowError::new(WindowKind::Actual, b, d).into());
        }
        Ok(Self { etb, etd, atb, atd })
    }

    /// A schedule with estimated times only.
    #[inline]
    pub fn estimated(etb: TimePoint, etd: TimePoint) -> Result<Self, StayBuildError> {
        Self::new(etb, etd, None, None)
    }

    #[inline]
    pub fn etb(&self) -> TimePoint {
        self.etb
    }

    #[inline]
    pub fn etd(&self) -> TimePoint {
        self.etd
    }

    #[inline]
    pub fn atb(&self) -> Option<TimePoint> {
        self.atb
    }

    #[inline]
    pub fn atd(&self) -> Option<TimePoint> {
        self.atd
    }

    /// The same schedule with a new estimated window, actuals kept.
    pub fn with_window(self, etb: TimePoint, etd: TimePoint) -> Result<Self, StayBuildError> {
        Self::new(etb, etd, self.atb, self.atd)
    }

    #[inline]
    pub fn window(&self) -> TimeInterval {
        TimeInterval::new(self.etb, self.etd)
    }
}

/// Lifecycle marker persisted with a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StayStatus {
    #[default]
    Unset,
    New,
    Changed,
    Deleted,
}

impl StayStatus {
    /// Status after the record is edited: a new record stays new and a
    /// deleted one stays deleted.
    #[inline]
    pub fn on_change(self) -> Self {
        match self {
            StayStatus::Unset | StayStatus::Changed => StayStatus::Changed,
            StayStatus::New => StayStatus::New,
            StayStatus::Deleted => StayStatus::Deleted,
        }
    }

    #[inline]
    pub fn on_remove(self) -> Self {
        StayStatus::Deleted
    }

    #[inline]
    pub fn is_deleted(self) -> bool {
        matches!(self, StayStatus::Deleted)
    }

    #[inline]
    pub fn is_unset(self) -> bool {
        matches!(self, StayStatus::Unset)
    }
}

impl Display for StayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StayStatus::Unset => "unset",
            StayStatus::New => "new",
            StayStatus::Changed => "changed",
            StayStatus::Deleted => "deleted",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stay {
    id: StayId,
    vessel: Vessel,
    docking: Docking,
    schedule: Schedule,
    status: StayStatus,
}

impl Stay {
    #[inline]
    pub fn new(id: StayId, vessel: Vessel, docking: Docking, schedule: Schedule) -> Self {
        Self {
            id,
            vessel,
            docking,
            schedule,
            status: StayStatus::Unset,
        }
    }

    #[inline]
    pub fn with_status(mut self, status: StayStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn id(&self) -> StayId {
        self.id
    }

    #[inline]
    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    #[inline]
    pub fn docking(&self) -> &Docking {
        &self.docking
    }

    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[inline]
    pub fn status(&self) -> StayStatus {
        self.status
    }

    #[inline]
    pub fn set_docking(&mut self, docking: Docking) {
        self.docking = docking;
    }

    #[inline]
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
    }

    #[inline]
    pub fn set_status(&mut self, status: StayStatus) {
        self.status = status;
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }

    /// Bow position: `pos + dir * lpp`.
    #[inline]
    pub fn bow(&self) -> PierPosition {
        self.docking
            .pos()
            .toward(self.docking.heading(), self.vessel.lpp())
    }

    /// The hull's extent along the pier, clearances excluded.
    #[inline]
    pub fn space_interval(&self) -> SpaceInterval {
        SpaceInterval::new(self.docking.pos(), self.bow())
    }

    #[inline]
    pub fn time_interval(&self) -> TimeInterval {
        self.schedule.window()
    }

    /// `etb <= t <= etd`.
    #[inline]
    pub fn is_current_at(&self, t: TimePoint) -> bool {
        self.time_interval().contains(t)
    }

    /// `etd < reference`.
    #[inline]
    pub fn is_past_at(&self, reference: TimePoint) -> bool {
        self.schedule.etd() < reference
    }

    /// `etb > t`.
    #[inline]
    pub fn is_future_at(&self, t: TimePoint) -> bool {
        self.schedule.etb() > t
    }
}

impl Display for Stay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stay({}, {} at {} dir {}, {})",
            self.id.value(),
            self.vessel.name(),
            self.docking.pos(),
            self.docking.heading(),
            self.time_interval()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vessel(lpp: f64) -> Vessel {
        Vessel::new(VesselId::new(1), "Aurora", PierLength::new(lpp), PierLength::new(20.0))
            .unwrap()
    }

    fn stay(heading: Heading, pos: f64, lpp: f64) -> Stay {
        let docking = Docking::new(
            heading,
            PierPosition::new(pos),
            PierLength::zero(),
            PierLength::zero(),
        )
        .unwrap();
        let schedule = Schedule::estimated(TimePoint::new(100), TimePoint::new(200)).unwrap();
        Stay::new(StayId::new(1), vessel(lpp), docking, schedule)
    }

    #[test]
    fn test_vessel_rejects_non_positive_dimensions() {
        let err = Vessel::new(VesselId::new(1), "x", PierLength::zero(), PierLength::new(1.0))
            .unwrap_err();
        assert!(matches!(err, StayBuildError::NonPositiveDimension(e) if e.field() == "lpp"));
        let err = Vessel::new(
            VesselId::new(1),
            "x",
            PierLength::new(10.0),
            PierLength::new(f64::NAN),
        )
        .unwrap_err();
        assert!(matches!(err, StayBuildError::NonPositiveDimension(e) if e.field() == "beam"));
    }

    #[test]
    fn test_docking_rejects_negative_clearance() {
        let err = Docking::new(
            Heading::Positive,
            PierPosition::zero(),
            PierLength::new(-1.0),
            PierLength::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, StayBuildError::NegativeClearance(e) if e.field() == "aft"));
    }

    #[test]
    fn test_docking_rejects_non_finite_position() {
        let err = Docking::new(
            Heading::Positive,
            PierPosition::new(f64::INFINITY),
            PierLength::zero(),
            PierLength::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, StayBuildError::NonFinitePosition(_)));
    }

    #[test]
    fn test_schedule_requires_departure_after_berthing() {
        assert!(Schedule::estimated(TimePoint::new(5), TimePoint::new(5)).is_err());
        assert!(Schedule::estimated(TimePoint::new(6), TimePoint::new(5)).is_err());
        let err = Schedule::new(
            TimePoint::new(0),
            TimePoint::new(10),
            Some(TimePoint::new(4)),
            Some(TimePoint::new(3)),
        )
        .unwrap_err();
        assert!(
            matches!(err, StayBuildError::InvertedWindow(e) if e.kind() == WindowKind::Actual)
        );
    }

    #[test]
    fn test_schedule_accepts_single_actual() {
        let s = Schedule::new(
            TimePoint::new(0),
            TimePoint::new(10),
            Some(TimePoint::new(4)),
            None,
        )
        .unwrap();
        assert_eq!(s.atb(), Some(TimePoint::new(4)));
        assert_eq!(s.atd(), None);
    }

    #[test]
    fn test_space_interval_follows_heading() {
        let fwd = stay(Heading::Positive, 300.0, 120.0);
        assert_eq!(fwd.space_interval().start(), PierPosition::new(300.0));
        assert_eq!(fwd.space_interval().end(), PierPosition::new(420.0));

        let back = stay(Heading::Negative, 300.0, 120.0);
        assert_eq!(back.space_interval().start(), PierPosition::new(180.0));
        assert_eq!(back.space_interval().end(), PierPosition::new(300.0));
    }

    #[test]
    fn test_tense_predicates() {
        let s = stay(Heading::Positive, 0.0, 100.0);
        assert!(s.is_current_at(TimePoint::new(100)));
        assert!(s.is_current_at(TimePoint::new(200)));
        assert!(!s.is_current_at(TimePoint::new(201)));
        assert!(s.is_past_at(TimePoint::new(201)));
        assert!(!s.is_past_at(TimePoint::new(200)));
        assert!(s.is_future_at(TimePoint::new(99)));
        assert!(!s.is_future_at(TimePoint::new(100)));
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(StayStatus::Unset.on_change(), StayStatus::Changed);
        assert_eq!(StayStatus::Changed.on_change(), StayStatus::Changed);
        assert_eq!(StayStatus::New.on_change(), StayStatus::New);
        assert_eq!(StayStatus::Deleted.on_change(), StayStatus::Deleted);
        for s in [
            StayStatus::Unset,
            StayStatus::New,
            StayStatus::Changed,
            StayStatus::Deleted,
        ] {
            assert_eq!(s.on_remove(), StayStatus::Deleted);
        }
    }

    #[test]
    fn test_with_pos_keeps_clearances() {
        let d = Docking::new(
            Heading::Negative,
            PierPosition::new(10.0),
            PierLength::new(5.0),
            PierLength::new(3.0),
        )
        .unwrap();
        let moved = d.with_pos(PierPosition::new(60.0)).unwrap();
        assert_eq!(moved.pos(), PierPosition::new(60.0));
        assert_eq!(moved.aft(), PierLength::new(5.0));
        assert_eq!(moved.heading(), Heading::Negative);
    }
}
