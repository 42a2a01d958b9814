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

//! # Berth Planner
//!
//! Ties the engine together. A [`BerthPlanner`] loads the baseline from its
//! store into the registry, stages it into a [`ScheduleBuffer`], keeps the
//! [`ViewState`] laid out against the active viewport and cursor, runs one
//! [`EditSession`] at a time, and commits the buffer back through the store
//! once it is conflict free.

use crate::{
    buffer::ScheduleBuffer,
    config::{EditRules, PlannerConfig},
    cursor::{Clock, Cursor, SystemClock},
    err::{BufferError, CommitError, ConfigError, LoadError, PositionOutOfRangeError, SessionError},
    io::{StaySink, StaySource},
    registry::BerthRegistry,
    session::{Edge, EditSession, Gesture, SessionState},
    twin::{DriveOutcome, TwinSync},
    view::{Layout, ProjectionKey, ViewState},
};
use quay_plan_core::{
    space::PierPosition,
    time::TimePoint,
    transform::{CoordinateTransform, LinearScale, Viewport},
};
use quay_plan_model::{
    id::StayId,
    stay::{Docking, Schedule, Stay, Vessel},
};
use tracing::{debug, info, instrument, warn};

pub struct BerthPlanner<S, P = LinearScale<PierPosition>, T = LinearScale<TimePoint>> {
    config: PlannerConfig,
    rules: EditRules,
    store: S,
    registry: BerthRegistry,
    buffer: ScheduleBuffer,
    view: ViewState,
    viewport: Viewport<P, T>,
    cursor: Cursor,
    clock: Box<dyn Clock + Send + Sync>,
    session: Option<EditSession>,
}

impl<S, P, T> BerthPlanner<S, P, T>
where
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    /// Creates an empty planner. Nothing is shown until [`Self::load`].
    pub fn new(
        config: PlannerConfig,
        store: S,
        viewport: Viewport<P, T>,
        cursor: TimePoint,
    ) -> Result<Self, ConfigError> {
        let rules = config.rules()?;
        Ok(Self {
            registry: BerthRegistry::new(rules.pier_length),
            buffer: ScheduleBuffer::default(),
            view: ViewState::new(),
            cursor: Cursor::new(cursor, config.past_reference),
            clock: Box::new(SystemClock),
            session: None,
            config,
            rules,
            store,
            viewport,
        })
    }

    /// Replaces the wall clock used for the `wall_clock` past reference.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self.relayout();
        self
    }

    fn sync(&mut self) -> TwinSync<'_, P, T> {
        TwinSync {
            view: &mut self.view,
            buffer: &mut self.buffer,
            layout: Layout {
                viewport: &self.viewport,
                rules: &self.rules,
                cursor: &self.cursor,
                clock: &*self.clock,
            },
        }
    }

    fn abandon(&mut self, reason: &'static str) {
        if let Some(session) = self.session.take() {
            warn!(key = %session.key(), reason, "Abandoning active gesture");
        }
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn rules(&self) -> &EditRules {
        &self.rules
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[inline]
    pub fn registry(&self) -> &BerthRegistry {
        &self.registry
    }

    #[inline]
    pub fn buffer(&self) -> &ScheduleBuffer {
        &self.buffer
    }

    #[inline]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport<P, T> {
        &self.viewport
    }

    #[inline]
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The buffered version of a stay.
    #[inline]
    pub fn stay(&self, id: StayId) -> Option<&Stay> {
        self.buffer.by_id(id)
    }

    #[inline]
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    #[inline]
    pub fn session_state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, EditSession::state)
    }

    /// Lays out every projection again, keeping flags.
    pub fn relayout(&mut self) {
        let sync = self.sync();
        sync.view.relayout(sync.buffer, &sync.layout);
    }

    /// Installs the transforms after a zoom or pan.
    pub fn set_viewport(&mut self, viewport: Viewport<P, T>) {
        self.abandon("viewport changed");
        self.viewport = viewport;
        self.relayout();
    }

    /// Moves the cursor and re-derives which stays are docked. The selection
    /// is cleared.
    pub fn set_cursor(&mut self, instant: TimePoint) {
        self.abandon("cursor moved");
        self.cursor.set(instant);
        self.view.clear_selection();
        self.relayout();
        debug!(cursor = %instant, docked = self.view.ships().count(), "Cursor moved");
    }

    /// Discards every staged edit.
    pub fn reset(&mut self) {
        self.abandon("buffer reset");
        self.buffer.reset();
        let sync = self.sync();
        sync.view.rebuild(sync.buffer, &sync.layout);
        self.recheck();
        info!(stays = self.buffer.len(), "Buffer reset to baseline");
    }

    /// Flags every live stay involved in a conflict. Returns how many are.
    pub fn recheck(&mut self) -> usize {
        let ids = self.rules.detector.conflicting_ids(self.buffer.live());
        self.view.mark_overlaps(&ids);
        ids.len()
    }

    fn begin(&mut self, key: ProjectionKey, gesture: Gesture) -> Result<(), SessionError> {
        if let Some(previous) = self.session.take() {
            warn!(previous = %previous.key(), next = %key, "Gesture started while another was active, abandoning the first");
        }
        let session = EditSession::begin(&self.sync(), key, gesture)?;
        debug!(key = %key, state = %session.state(), "Gesture started");
        self.session = Some(session);
        Ok(())
    }

    /// Starts dragging a temporal box or a ship icon.
    pub fn begin_move(&mut self, key: ProjectionKey) -> Result<(), SessionError> {
        self.begin(key, Gesture::Move)
    }

    /// Starts stretching one edge of a temporal box.
    pub fn begin_resize(&mut self, key: ProjectionKey, edge: Edge) -> Result<(), SessionError> {
        self.begin(key, Gesture::Resize(edge))
    }

    /// Feeds a raw pointer delta to the active gesture. Returns the advisory
    /// overlap state, or `None` when a resize step was rejected.
    pub fn update(&mut self, dx: f64, dy: f64) -> Result<Option<bool>, SessionError> {
        let mut session = self.session.take().ok_or(SessionError::NoActiveSession)?;
        let feedback = session.update(&mut self.sync(), dx, dy);
        self.session = Some(session);
        Ok(feedback)
    }

    /// Ends the active gesture and rechecks every live stay.
    pub fn finish(&mut self) -> Result<Option<DriveOutcome>, SessionError> {
        let session = self.session.take().ok_or(SessionError::NoActiveSession)?;
        let key = session.key();
        let outcome = session.finish(&mut self.sync());
        let conflicts = self.recheck();
        debug!(key = %key, conflicts, "Gesture finished");
        Ok(outcome)
    }

    /// Drops the active gesture without writing anything back. The
    /// projections keep their unquantized pixels until the next layout.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                debug!(key = %session.key(), "Gesture cancelled");
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn toggle_selected(&mut self, key: ProjectionKey) -> Option<bool> {
        self.view.toggle_selected(key)
    }

    #[inline]
    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
    }

    /// Soft-deletes every selected stay. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        self.abandon("selection deleted");
        let selected: Vec<StayId> = self.view.selected().collect();
        let mut removed = 0;
        for id in selected {
            let Some(handle) = self.view.get(id).map(|p| p.handle) else {
                continue;
            };
            if !self.buffer.remove(handle) {
                continue;
            }
            if let Some(p) = self.view.get_mut(id) {
                p.flags.touched = true;
                p.flags.selected = false;
            }
            removed += 1;
        }
        self.relayout();
        self.recheck();
        info!(removed, "Deleted selected stays");
        removed
    }

    /// Stages a new stay under the next free id.
    pub fn create_stay(
        &mut self,
        vessel: Vessel,
        docking: Docking,
        schedule: Schedule,
    ) -> Result<StayId, BufferError> {
        let id = self.buffer.next_stay_id();
        let pos = docking.pos();
        let pier = PierPosition::zero() + self.rules.pier_length;
        if pos < PierPosition::zero() || pos > pier {
            return Err(PositionOutOfRangeError::new(id, pos, self.rules.pier_length).into());
        }
        let handle = self.buffer.create(Stay::new(id, vessel, docking, schedule))?;
        let sync = self.sync();
        if let Some(stay) = sync.buffer.get(handle) {
            sync.view.relayout_one(handle, stay, &sync.layout);
        }
        if let Some(p) = self.view.get_mut(id) {
            p.flags.touched = true;
        }
        self.recheck();
        debug!(stay = %id, "Stay created");
        Ok(id)
    }
}

impl<S, P, T> BerthPlanner<S, P, T>
where
    S: StaySource,
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    /// Replaces registry, buffer and view with the source's current plan.
    /// On error all three are left as they were.
    #[instrument(level = "debug", skip_all, err(Display))]
    pub fn load(&mut self) -> Result<usize, LoadError> {
        let stays = self.store.load()?;
        self.registry.load(stays)?;
        self.abandon("plan reloaded");
        self.buffer.rebase(self.registry.snapshot());
        let sync = self.sync();
        sync.view.rebuild(sync.buffer, &sync.layout);
        let conflicts = self.recheck();
        info!(stays = self.registry.len(), conflicts, "Plan loaded");
        Ok(self.registry.len())
    }
}

impl<S, P, T> BerthPlanner<S, P, T>
where
    S: StaySource + StaySink,
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    /// Persists the buffer if no two of its entries conflict, then reloads.
    ///
    /// A conflict leaves the buffer as it was. A persistence failure keeps
    /// the pending edits and skips the reload.
    #[instrument(level = "debug", skip_all, err(Display))]
    pub fn commit(&mut self) -> Result<(), CommitError> {
        self.abandon("commit");
        self.buffer.check_feasible(&self.rules.detector)?;

        let touched: Vec<StayId> = self.view.touched().collect();
        for id in touched {
            if let Some(handle) = self.buffer.handle_of(id)
                && let Some(stay) = self.buffer.get(handle).filter(|s| !s.is_deleted()).cloned()
            {
                self.buffer.change(handle, stay);
            }
        }

        self.buffer.commit(&mut self.store, &self.rules.detector)?;
        self.load().map_err(CommitError::Reload)?;
        info!(stays = self.registry.len(), "Plan committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PastReference, cursor::FixedClock, io::MemoryStore};
    use quay_plan_core::{
        space::{Heading, PierLength},
        time::TimeDelta,
        transform::LinearViewport,
    };
    use quay_plan_model::{id::VesselId, stay::StayStatus, wire::StayRecord};

    // 2024-05-01T00:00:00Z
    const T0: i64 = 1_714_521_600_000;

    fn at(hour: i64) -> TimePoint {
        TimePoint::new(T0 + TimeDelta::from_hours(hour).value())
    }

    fn stay(id: u64, pos: f64, lpp: f64, etb_h: i64, etd_h: i64) -> Stay {
        Stay::new(
            StayId::new(id),
            vessel(id, lpp),
            docking(pos),
            Schedule::estimated(at(etb_h), at(etd_h)).unwrap(),
        )
    }

    fn vessel(id: u64, lpp: f64) -> Vessel {
        Vessel::new(
            VesselId::new(id),
            format!("V{id}"),
            PierLength::new(lpp),
            PierLength::new(lpp * 0.15),
        )
        .unwrap()
    }

    fn docking(pos: f64) -> Docking {
        Docking::new(
            Heading::Positive,
            PierPosition::new(pos),
            PierLength::zero(),
            PierLength::zero(),
        )
        .unwrap()
    }

    // 1 px per meter; 10 px per hour with later times toward the top.
    fn viewport() -> LinearViewport {
        Viewport::new(
            LinearScale::new(
                (PierPosition::new(0.0), PierPosition::new(1000.0)),
                (0.0, 1000.0),
            )
            .unwrap(),
            LinearScale::new((at(0), at(100)), (1000.0, 0.0)).unwrap(),
        )
    }

    fn config() -> PlannerConfig {
        PlannerConfig {
            time_step_minutes: 60,
            ship_band_px: 1100.0,
            ..PlannerConfig::default()
        }
    }

    fn planner(stays: &[Stay]) -> BerthPlanner<MemoryStore> {
        let store = MemoryStore::from_stays(stays).unwrap();
        let mut planner = BerthPlanner::new(config(), store, viewport(), at(12)).unwrap();
        planner.load().unwrap();
        planner
    }

    fn ship(id: u64) -> ProjectionKey {
        ProjectionKey::Ship(StayId::new(id))
    }

    fn stay_box(id: u64) -> ProjectionKey {
        ProjectionKey::Stay(StayId::new(id))
    }

    fn assert_windows_valid(planner: &BerthPlanner<MemoryStore>) {
        for s in planner.buffer().stays() {
            assert!(s.schedule().etd() > s.schedule().etb(), "{s}");
        }
    }

    #[test]
    fn test_side_by_side_stays_commit() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 150.0, 100.0, 10, 14)]);
        assert_eq!(planner.view().overlapping().count(), 0);
        planner.commit().unwrap();
        assert_eq!(planner.store().persist_count(), 1);
        assert_eq!(planner.registry().len(), 2);
    }

    #[test]
    fn test_overlapping_stays_refuse_commit() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 50.0, 100.0, 11, 13)]);
        let overlapping: Vec<_> = planner.view().overlapping().collect();
        assert_eq!(overlapping, vec![StayId::new(1), StayId::new(2)]);

        let before = planner.buffer().stays().to_vec();
        let err = planner.commit().unwrap_err();
        assert!(matches!(err, CommitError::Infeasible(_)));
        assert!(err.to_string().starts_with("Error: Hard Overlap Detected"));
        assert_eq!(planner.buffer().stays(), before.as_slice());
        assert_eq!(planner.store().persist_count(), 0);
    }

    #[test]
    fn test_ship_drag_snaps_to_grid_and_commits() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner.begin_move(ship(1)).unwrap();
        assert_eq!(planner.session_state(), SessionState::Dragging);
        planner.update(20.0, 0.0).unwrap();
        planner.update(17.0, 3.0).unwrap();
        let out = planner.finish().unwrap().unwrap();
        assert!(out.touched);
        assert_eq!(planner.session_state(), SessionState::Idle);

        let s = planner.stay(StayId::new(1)).unwrap();
        assert_eq!(s.docking().pos(), PierPosition::new(50.0));
        assert_eq!(s.schedule().etb(), at(10));
        let p = planner.view().get(StayId::new(1)).unwrap();
        assert_eq!(p.stay_box.x, 50.0);
        assert!(p.twins_agree());

        planner.commit().unwrap();
        let persisted: &[StayRecord] = planner.store().last_persisted();
        assert_eq!(persisted[0].status, Some(StayStatus::Changed));
        assert_eq!(persisted[0].docking.pos, 50.0);
        let reloaded = planner.registry().get(StayId::new(1)).unwrap();
        assert_eq!(reloaded.docking().pos(), PierPosition::new(50.0));
        assert_eq!(reloaded.status(), StayStatus::Unset);
        assert_eq!(planner.view().touched().count(), 0);
    }

    #[test]
    fn test_inverting_resize_keeps_window() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner
            .begin_resize(stay_box(1), Edge::Departure)
            .unwrap();
        assert_eq!(planner.session_state(), SessionState::Resizing);
        // 6 h below the departure edge lands before berthing.
        assert_eq!(planner.update(0.0, 60.0).unwrap(), None);
        let out = planner.finish().unwrap().unwrap();
        assert!(!out.touched);
        let s = planner.stay(StayId::new(1)).unwrap();
        assert_eq!(s.schedule().etb(), at(10));
        assert_eq!(s.schedule().etd(), at(14));
        assert_windows_valid(&planner);
    }

    #[test]
    fn test_resize_then_extend() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner.begin_resize(stay_box(1), Edge::Departure).unwrap();
        assert_eq!(planner.update(0.0, 60.0).unwrap(), None);
        // Accumulated offset is now -20 px, two hours past the old departure.
        assert_eq!(planner.update(0.0, -80.0).unwrap(), Some(false));
        planner.finish().unwrap();
        assert_eq!(planner.stay(StayId::new(1)).unwrap().schedule().etd(), at(16));
    }

    #[test]
    fn test_resize_aligns_position_to_grid() {
        let mut planner = planner(&[stay(1, 30.0, 100.0, 10, 14)]);
        planner.begin_resize(stay_box(1), Edge::Departure).unwrap();
        planner.update(0.0, -20.0).unwrap();
        planner.finish().unwrap().unwrap();
        let s = planner.stay(StayId::new(1)).unwrap();
        assert_eq!(s.docking().pos(), PierPosition::new(50.0));
        assert_eq!(s.schedule().etd(), at(16));
    }

    #[test]
    fn test_gesture_errors() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 300.0, 100.0, 30, 40)]);
        assert_eq!(planner.update(1.0, 0.0), Err(SessionError::NoActiveSession));
        assert_eq!(planner.finish(), Err(SessionError::NoActiveSession));
        assert_eq!(
            planner.begin_resize(ship(1), Edge::Departure),
            Err(SessionError::ResizeNeedsTemporalBox(ship(1)))
        );
        // Stay 2 is not current, so it has no ship icon.
        assert_eq!(
            planner.begin_move(ship(2)),
            Err(SessionError::UnknownProjection(ship(2)))
        );
        assert_eq!(
            planner.begin_move(stay_box(9)),
            Err(SessionError::UnknownProjection(stay_box(9)))
        );
        assert!(!planner.cancel());
    }

    #[test]
    fn test_second_gesture_abandons_first() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 300.0, 100.0, 10, 14)]);
        planner.begin_move(ship(1)).unwrap();
        planner.update(100.0, 0.0).unwrap();
        planner.begin_move(ship(2)).unwrap();
        planner.update(100.0, 0.0).unwrap();
        planner.finish().unwrap();
        assert_eq!(
            planner.stay(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::zero()
        );
        assert_eq!(
            planner.stay(StayId::new(2)).unwrap().docking().pos(),
            PierPosition::new(400.0)
        );
    }

    #[test]
    fn test_cancel_writes_nothing() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner.begin_move(stay_box(1)).unwrap();
        planner.update(230.0, -40.0).unwrap();
        assert!(planner.cancel());
        assert_eq!(planner.session_state(), SessionState::Idle);
        assert_eq!(
            planner.stay(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::zero()
        );
        planner.relayout();
        assert_eq!(planner.view().get(StayId::new(1)).unwrap().stay_box.x, 0.0);
    }

    #[test]
    fn test_windows_stay_valid_after_gestures() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 500.0, 80.0, 0, 30)]);
        let gestures = [
            (stay_box(1), Gesture::Resize(Edge::Berthing), 0.0, -39.0),
            (stay_box(1), Gesture::Resize(Edge::Departure), 0.0, 500.0),
            (stay_box(2), Gesture::Move, 30.0, 77.0),
            (stay_box(2), Gesture::Resize(Edge::Departure), 0.0, 245.0),
        ];
        for (key, gesture, dx, dy) in gestures {
            match gesture {
                Gesture::Move => planner.begin_move(key).unwrap(),
                Gesture::Resize(edge) => planner.begin_resize(key, edge).unwrap(),
            }
            planner.update(dx, dy).unwrap();
            planner.finish().unwrap();
            assert_windows_valid(&planner);
        }
    }

    #[test]
    fn test_drag_into_neighbor_is_flagged_and_blocks_commit() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 300.0, 100.0, 10, 14)]);
        planner.begin_move(ship(1)).unwrap();
        assert_eq!(planner.update(240.0, 0.0).unwrap(), Some(true));
        let out = planner.finish().unwrap().unwrap();
        assert!(out.overlap);
        let overlapping: Vec<_> = planner.view().overlapping().collect();
        assert_eq!(overlapping, vec![StayId::new(1), StayId::new(2)]);
        assert!(matches!(planner.commit(), Err(CommitError::Infeasible(_))));

        planner.reset();
        assert_eq!(planner.view().overlapping().count(), 0);
        assert_eq!(
            planner.stay(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::zero()
        );
        planner.commit().unwrap();
    }

    #[test]
    fn test_set_cursor_rebuilds_ships() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 300.0, 100.0, 30, 40)]);
        assert_eq!(planner.view().ships().collect::<Vec<_>>(), vec![ship(1)]);
        planner.set_cursor(at(35));
        assert_eq!(planner.view().ships().collect::<Vec<_>>(), vec![ship(2)]);
        let tense = planner.view().get(StayId::new(1)).unwrap().stay_box.tense;
        assert!(tense.past);
    }

    #[test]
    fn test_cursor_move_clears_selection() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 300.0, 100.0, 30, 40)]);
        assert_eq!(planner.toggle_selected(stay_box(2)), Some(true));
        planner.set_cursor(at(35));
        assert_eq!(planner.view().selected().count(), 0);
        assert_eq!(planner.delete_selected(), 0);
        assert_eq!(
            planner.stay(StayId::new(2)).unwrap().status(),
            StayStatus::Unset
        );
    }

    #[test]
    fn test_wall_clock_past_reference() {
        let cfg = PlannerConfig {
            past_reference: PastReference::WallClock,
            ..config()
        };
        let store = MemoryStore::from_stays(&[stay(1, 0.0, 100.0, 10, 14)]).unwrap();
        let mut planner = BerthPlanner::new(cfg, store, viewport(), at(12))
            .unwrap()
            .with_clock(FixedClock(at(20)));
        planner.load().unwrap();
        let tense = planner.view().get(StayId::new(1)).unwrap().stay_box.tense;
        assert!(tense.current && tense.past);
    }

    #[test]
    fn test_delete_selected_soft_deletes() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 500.0, 100.0, 11, 13)]);
        assert_eq!(planner.toggle_selected(ship(2)), Some(true));
        assert_eq!(planner.delete_selected(), 1);
        let p = planner.view().get(StayId::new(2)).unwrap();
        assert!(p.flags.deleted && p.flags.touched && !p.flags.selected);
        assert!(p.ship.is_none());
        assert_eq!(
            planner.stay(StayId::new(2)).unwrap().status(),
            StayStatus::Deleted
        );

        planner.commit().unwrap();
        assert_eq!(
            planner.store().last_persisted()[1].status,
            Some(StayStatus::Deleted)
        );
        assert_eq!(planner.registry().len(), 1);
        assert!(planner.stay(StayId::new(2)).is_none());
    }

    #[test]
    fn test_deleting_one_of_a_conflicting_pair_still_refuses_commit() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14), stay(2, 50.0, 100.0, 11, 13)]);
        assert!(matches!(planner.commit(), Err(CommitError::Infeasible(_))));

        planner.toggle_selected(ship(2));
        assert_eq!(planner.delete_selected(), 1);
        // Advisory flags only consider live stays.
        assert_eq!(planner.view().overlapping().count(), 0);

        assert!(matches!(planner.commit(), Err(CommitError::Infeasible(_))));
        assert_eq!(planner.store().persist_count(), 0);
        assert_eq!(
            planner.stay(StayId::new(2)).unwrap().status(),
            StayStatus::Deleted
        );
    }

    #[test]
    fn test_create_stay() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        let id = planner
            .create_stay(
                vessel(9, 120.0),
                docking(400.0),
                Schedule::estimated(at(11), at(15)).unwrap(),
            )
            .unwrap();
        assert_eq!(id, StayId::new(2));
        assert!(planner.view().contains(ship(2)));
        assert_eq!(planner.stay(id).unwrap().status(), StayStatus::New);

        let err = planner
            .create_stay(
                vessel(9, 120.0),
                docking(1400.0),
                Schedule::estimated(at(11), at(15)).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, BufferError::PositionOutOfRange(_)));

        planner.commit().unwrap();
        assert_eq!(
            planner.store().last_persisted()[1].status,
            Some(StayStatus::New)
        );
        assert_eq!(planner.registry().len(), 2);
    }

    #[test]
    fn test_persist_failure_keeps_edits() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner.begin_move(ship(1)).unwrap();
        planner.update(100.0, 0.0).unwrap();
        planner.finish().unwrap();

        planner.store_mut().reject_next_persist("service unavailable");
        assert!(matches!(planner.commit(), Err(CommitError::Persist(_))));
        assert_eq!(
            planner.stay(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::new(100.0)
        );
        assert_eq!(
            planner.registry().get(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::zero()
        );
        // Commit preparation already ran; the retry sends the same status.
        assert_eq!(
            planner.stay(StayId::new(1)).unwrap().status(),
            StayStatus::Changed
        );
        planner.commit().unwrap();
        assert_eq!(
            planner.store().last_persisted()[0].status,
            Some(StayStatus::Changed)
        );
        assert_eq!(
            planner.registry().get(StayId::new(1)).unwrap().docking().pos(),
            PierPosition::new(100.0)
        );
    }

    #[test]
    fn test_reload_failure_is_reported() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner
            .store_mut()
            .set_unavailable(Some("reload refused".to_string()));
        assert!(matches!(planner.commit(), Err(CommitError::Reload(_))));
        assert_eq!(planner.store().persist_count(), 1);
        assert_eq!(planner.registry().len(), 1);
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut planner = planner(&[stay(1, 0.0, 100.0, 10, 14)]);
        planner.begin_move(ship(1)).unwrap();
        planner
            .store_mut()
            .set_unavailable(Some("offline".to_string()));
        assert!(matches!(planner.load(), Err(LoadError::Unavailable(_))));
        assert_eq!(planner.session_state(), SessionState::Dragging);
        assert_eq!(planner.registry().len(), 1);
    }

    #[test]
    fn test_out_of_range_stay_rejected_on_load() {
        let store = MemoryStore::from_stays(&[stay(1, 1200.0, 100.0, 10, 14)]).unwrap();
        let mut planner = BerthPlanner::new(config(), store, viewport(), at(12)).unwrap();
        assert!(matches!(planner.load(), Err(LoadError::Registry(_))));
        assert!(planner.view().is_empty());
    }

    #[test]
    fn test_zoom_relayouts_projections() {
        let mut planner = planner(&[stay(1, 200.0, 100.0, 10, 14)]);
        let vp = planner.viewport();
        let zoomed = Viewport::new(vp.position().zoomed(2.0, 0.0).unwrap(), *vp.time());
        planner.set_viewport(zoomed);
        let p = planner.view().get(StayId::new(1)).unwrap();
        assert!((p.stay_box.x - 400.0).abs() < 1e-9);
        assert!(p.twins_agree());
    }
}
