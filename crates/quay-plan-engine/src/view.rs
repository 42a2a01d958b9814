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

//! # Projections
//!
//! Each buffered stay is shown twice: as a temporal box spanning its berthing
//! window, and, while it is current at the cursor, as a ship icon on a fixed
//! band. [`ViewState`] owns both projections of every stay, keyed by
//! [`StayId`], so finding a twin is a map lookup.

use crate::{
    buffer::{ScheduleBuffer, StageHandle},
    config::EditRules,
    cursor::{Clock, Cursor, Tense},
};
use quay_plan_core::{
    space::PierPosition,
    time::TimePoint,
    transform::{CoordinateTransform, Viewport},
};
use quay_plan_model::{id::StayId, stay::Stay};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    str::FromStr,
};

const STAY_PREFIX: &str = "stay-";
const SHIP_PREFIX: &str = "ship-";

/// Host-facing name of one projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectionKey {
    /// The temporal box, `stay-{id}`.
    Stay(StayId),
    /// The ship icon, `ship-{id}`.
    Ship(StayId),
}

impl ProjectionKey {
    #[inline]
    pub fn stay_id(&self) -> StayId {
        match self {
            ProjectionKey::Stay(id) | ProjectionKey::Ship(id) => *id,
        }
    }

    /// The other projection of the same stay.
    #[inline]
    pub fn twin(&self) -> Self {
        match self {
            ProjectionKey::Stay(id) => ProjectionKey::Ship(*id),
            ProjectionKey::Ship(id) => ProjectionKey::Stay(*id),
        }
    }

    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, ProjectionKey::Stay(_))
    }
}

impl Display for ProjectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionKey::Stay(id) => write!(f, "{}{}", STAY_PREFIX, id.value()),
            ProjectionKey::Ship(id) => write!(f, "{}{}", SHIP_PREFIX, id.value()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProjectionKeyError(String);

impl ParseProjectionKeyError {
    #[inline]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl Display for ParseProjectionKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid projection key {:?}, expected stay-<id> or ship-<id>",
            self.0
        )
    }
}

impl std::error::Error for ParseProjectionKeyError {}

impl FromStr for ProjectionKey {
    type Err = ParseProjectionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseProjectionKeyError(s.to_string());
        let (ctor, digits): (fn(StayId) -> ProjectionKey, &str) =
            if let Some(rest) = s.strip_prefix(STAY_PREFIX) {
                (ProjectionKey::Stay, rest)
            } else if let Some(rest) = s.strip_prefix(SHIP_PREFIX) {
                (ProjectionKey::Ship, rest)
            } else {
                return Err(err());
            };
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return Err(err());
        }
        let id: u64 = digits.parse().map_err(|_| err())?;
        Ok(ctor(StayId::new(id)))
    }
}

/// Display state shared by both projections of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProjectionFlags {
    /// Edited since the last load; the stay is marked changed on commit.
    pub touched: bool,
    /// Advisory result of the last overlap check.
    pub overlap: bool,
    pub selected: bool,
    /// Soft-deleted; the host hides the stay.
    pub deleted: bool,
}

/// Pixel geometry of a stay's temporal box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalBox {
    /// Stern coordinate on the position axis.
    pub x: f64,
    pub bow_x: f64,
    pub berthing_px: f64,
    pub departure_px: f64,
    pub tense: Tense,
}

/// Pixel geometry of a docked ship icon. Its vertical coordinate is the
/// configured band and never follows the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipIcon {
    pub x: f64,
    pub bow_x: f64,
    pub band_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projections {
    pub handle: StageHandle,
    pub stay_box: TemporalBox,
    pub ship: Option<ShipIcon>,
    pub flags: ProjectionFlags,
}

impl Projections {
    /// Position-axis coordinate of the projection named by `key`.
    pub fn x_of(&self, key: ProjectionKey) -> Option<f64> {
        match key {
            ProjectionKey::Stay(_) => Some(self.stay_box.x),
            ProjectionKey::Ship(_) => self.ship.map(|s| s.x),
        }
    }

    /// Whether the ship icon and the box stand at the same pier coordinate.
    /// Always true when the stay is not docked.
    pub fn twins_agree(&self) -> bool {
        self.ship.is_none_or(|s| s.x == self.stay_box.x)
    }
}

/// Everything needed to turn a buffered stay into pixels.
pub struct Layout<'a, P, T> {
    pub viewport: &'a Viewport<P, T>,
    pub rules: &'a EditRules,
    pub cursor: &'a Cursor,
    pub clock: &'a dyn Clock,
}

impl<P, T> Layout<'_, P, T>
where
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    pub fn place(&self, handle: StageHandle, stay: &Stay, flags: ProjectionFlags) -> Projections {
        let vp = self.viewport;
        let x = vp.x_of(stay.docking().pos());
        let bow_x = vp.x_of(stay.bow());
        let tense = self.cursor.classify(stay, self.clock);
        let flags = ProjectionFlags {
            deleted: stay.is_deleted(),
            ..flags
        };
        let ship = (tense.current && !flags.deleted).then_some(ShipIcon {
            x,
            bow_x,
            band_px: self.rules.ship_band_px,
        });
        Projections {
            handle,
            stay_box: TemporalBox {
                x,
                bow_x,
                berthing_px: vp.y_of(stay.schedule().etb()),
                departure_px: vp.y_of(stay.schedule().etd()),
                tense,
            },
            ship,
            flags,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    entries: BTreeMap<StayId, Projections>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays out every buffered stay with fresh flags.
    pub fn rebuild<P, T>(&mut self, buffer: &ScheduleBuffer, layout: &Layout<'_, P, T>)
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        self.entries.clear();
        self.relayout(buffer, layout);
    }

    /// Recomputes pixel geometry and tense from the buffer, keeping flags.
    /// Entries whose stay left the buffer are dropped.
    pub fn relayout<P, T>(&mut self, buffer: &ScheduleBuffer, layout: &Layout<'_, P, T>)
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        let mut next = BTreeMap::new();
        for (handle, stay) in buffer.iter() {
            let flags = self
                .entries
                .get(&stay.id())
                .map(|p| p.flags)
                .unwrap_or_default();
            next.insert(stay.id(), layout.place(handle, stay, flags));
        }
        self.entries = next;
    }

    /// Re-lays out one stay, keeping its flags.
    pub fn relayout_one<P, T>(&mut self, handle: StageHandle, stay: &Stay, layout: &Layout<'_, P, T>)
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        let flags = self
            .entries
            .get(&stay.id())
            .map(|p| p.flags)
            .unwrap_or_default();
        self.entries
            .insert(stay.id(), layout.place(handle, stay, flags));
    }

    #[inline]
    pub fn get(&self, id: StayId) -> Option<&Projections> {
        self.entries.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: StayId) -> Option<&mut Projections> {
        self.entries.get_mut(&id)
    }

    /// Whether the projection named by `key` is currently shown.
    pub fn contains(&self, key: ProjectionKey) -> bool {
        self.entries
            .get(&key.stay_id())
            .is_some_and(|p| p.x_of(key).is_some())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StayId, &Projections)> {
        self.entries.iter().map(|(id, p)| (*id, p))
    }

    /// Keys of every ship icon currently docked.
    pub fn ships(&self) -> impl Iterator<Item = ProjectionKey> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| p.ship.is_some())
            .map(|(id, _)| ProjectionKey::Ship(*id))
    }

    pub fn selected(&self) -> impl Iterator<Item = StayId> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| p.flags.selected)
            .map(|(id, _)| *id)
    }

    pub fn touched(&self) -> impl Iterator<Item = StayId> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| p.flags.touched)
            .map(|(id, _)| *id)
    }

    pub fn overlapping(&self) -> impl Iterator<Item = StayId> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| p.flags.overlap)
            .map(|(id, _)| *id)
    }

    /// Flips the selection of a projection and its twin. Returns the new
    /// state, or `None` if the key names nothing shown.
    pub fn toggle_selected(&mut self, key: ProjectionKey) -> Option<bool> {
        if !self.contains(key) {
            return None;
        }
        let p = self.entries.get_mut(&key.stay_id())?;
        p.flags.selected = !p.flags.selected;
        Some(p.flags.selected)
    }

    pub fn clear_selection(&mut self) {
        for p in self.entries.values_mut() {
            p.flags.selected = false;
        }
    }

    pub fn set_overlap(&mut self, id: StayId, overlap: bool) {
        if let Some(p) = self.entries.get_mut(&id) {
            p.flags.overlap = overlap;
        }
    }

    /// Sets the overlap flag of exactly the stays in `ids`.
    pub fn mark_overlaps(&mut self, ids: &BTreeSet<StayId>) {
        for (id, p) in self.entries.iter_mut() {
            p.flags.overlap = ids.contains(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PastReference, cursor::FixedClock};
    use quay_plan_core::{
        space::{Heading, PierLength},
        time::TimeDelta,
        transform::{LinearScale, LinearViewport},
    };
    use quay_plan_model::{
        id::VesselId,
        stay::{Docking, Schedule, Vessel},
    };

    fn viewport() -> LinearViewport {
        Viewport::new(
            LinearScale::new(
                (PierPosition::new(0.0), PierPosition::new(1000.0)),
                (0.0, 1000.0),
            )
            .unwrap(),
            LinearScale::new(
                (TimePoint::new(0), TimePoint::new(TimeDelta::from_hours(100).value())),
                (1000.0, 0.0),
            )
            .unwrap(),
        )
    }

    fn stay(id: u64, pos: f64, etb_h: i64, etd_h: i64) -> Stay {
        Stay::new(
            StayId::new(id),
            Vessel::new(
                VesselId::new(id),
                "V",
                PierLength::new(100.0),
                PierLength::new(20.0),
            )
            .unwrap(),
            Docking::new(
                Heading::Positive,
                PierPosition::new(pos),
                PierLength::zero(),
                PierLength::zero(),
            )
            .unwrap(),
            Schedule::estimated(
                TimePoint::new(TimeDelta::from_hours(etb_h).value()),
                TimePoint::new(TimeDelta::from_hours(etd_h).value()),
            )
            .unwrap(),
        )
    }

    fn build(buffer: &ScheduleBuffer, cursor_h: i64) -> ViewState {
        let vp = viewport();
        let rules = EditRules {
            ship_band_px: 1100.0,
            ..EditRules::default()
        };
        let cursor = Cursor::new(
            TimePoint::new(TimeDelta::from_hours(cursor_h).value()),
            PastReference::Cursor,
        );
        let clock = FixedClock(TimePoint::zero());
        let layout = Layout {
            viewport: &vp,
            rules: &rules,
            cursor: &cursor,
            clock: &clock,
        };
        let mut view = ViewState::new();
        view.rebuild(buffer, &layout);
        view
    }

    #[test]
    fn test_key_display_and_parse() {
        let key = ProjectionKey::Stay(StayId::new(42));
        assert_eq!(key.to_string(), "stay-42");
        assert_eq!(key.twin().to_string(), "ship-42");
        assert_eq!("ship-42".parse::<ProjectionKey>(), Ok(key.twin()));
        assert_eq!(key.twin().twin(), key);
        assert!("boat-1".parse::<ProjectionKey>().is_err());
        assert!("stay-".parse::<ProjectionKey>().is_err());
        assert!("stay--3".parse::<ProjectionKey>().is_err());
    }

    #[test]
    fn test_key_parse_accepts_only_canonical_ids() {
        assert!("stay-+3".parse::<ProjectionKey>().is_err());
        assert!("ship- 3".parse::<ProjectionKey>().is_err());
        assert!("stay-03".parse::<ProjectionKey>().is_err());
        assert!("stay-99999999999999999999".parse::<ProjectionKey>().is_err());
        assert_eq!(
            "stay-0".parse::<ProjectionKey>(),
            Ok(ProjectionKey::Stay(StayId::new(0)))
        );
        for key in ["stay-7", "ship-120"] {
            assert_eq!(key.parse::<ProjectionKey>().unwrap().to_string(), key);
        }
    }

    #[test]
    fn test_place_geometry() {
        let buffer = ScheduleBuffer::new(vec![stay(1, 200.0, 10, 20)]);
        let view = build(&buffer, 15);
        let p = view.get(StayId::new(1)).unwrap();
        assert_eq!(p.stay_box.x, 200.0);
        assert_eq!(p.stay_box.bow_x, 300.0);
        assert!((p.stay_box.berthing_px - 900.0).abs() < 1e-9);
        assert!((p.stay_box.departure_px - 800.0).abs() < 1e-9);
        let ship = p.ship.unwrap();
        assert_eq!(ship.band_px, 1100.0);
        assert!(p.twins_agree());
    }

    #[test]
    fn test_only_current_stays_are_docked() {
        let buffer = ScheduleBuffer::new(vec![
            stay(1, 0.0, 10, 20),
            stay(2, 300.0, 30, 40),
            stay(3, 600.0, 0, 5),
        ]);
        let view = build(&buffer, 20);
        let ships: Vec<_> = view.ships().collect();
        assert_eq!(ships, vec![ProjectionKey::Ship(StayId::new(1))]);
        assert!(view.contains(ProjectionKey::Stay(StayId::new(2))));
        assert!(!view.contains(ProjectionKey::Ship(StayId::new(2))));
        let tense = view.get(StayId::new(3)).unwrap().stay_box.tense;
        assert!(tense.past && !tense.current && !tense.future);
    }

    #[test]
    fn test_relayout_keeps_flags() {
        let buffer = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 20)]);
        let mut view = build(&buffer, 15);
        assert_eq!(view.toggle_selected(ProjectionKey::Ship(StayId::new(1))), Some(true));
        view.set_overlap(StayId::new(1), true);

        let vp = viewport();
        let rules = EditRules::default();
        let cursor = Cursor::new(TimePoint::zero(), PastReference::Cursor);
        let clock = FixedClock(TimePoint::zero());
        let layout = Layout {
            viewport: &vp,
            rules: &rules,
            cursor: &cursor,
            clock: &clock,
        };
        view.relayout(&buffer, &layout);
        let p = view.get(StayId::new(1)).unwrap();
        assert!(p.flags.selected && p.flags.overlap);
        assert!(p.ship.is_none());
    }

    #[test]
    fn test_toggle_unknown_key_is_noop() {
        let buffer = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 20)]);
        let mut view = build(&buffer, 50);
        assert_eq!(view.toggle_selected(ProjectionKey::Ship(StayId::new(1))), None);
        assert_eq!(view.toggle_selected(ProjectionKey::Stay(StayId::new(9))), None);
        assert_eq!(view.selected().count(), 0);
        assert_eq!(view.toggle_selected(ProjectionKey::Stay(StayId::new(1))), Some(true));
        view.clear_selection();
        assert_eq!(view.selected().count(), 0);
    }
}
