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

//! # Schedule Buffer
//!
//! Working copy of the registry that edits are staged into. Entries are
//! addressed by [`StageHandle`]s rather than by reference; a handle is a slot
//! index plus the buffer generation it was issued in, and [`ScheduleBuffer::reset`]
//! starts a new generation so older handles resolve to nothing.

use crate::{
    err::{BufferError, CommitError},
    io::StaySink,
};
use quay_plan_model::{
    conflict::ConflictDetector,
    err::StayOverlapError,
    id::StayId,
    stay::{Stay, StayStatus},
    wire,
};
use std::{collections::HashMap, fmt::Display};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageHandle {
    slot: u32,
    generation: u32,
}

impl StageHandle {
    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl Display for StageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StageHandle({}@{})", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleBuffer {
    baseline: Vec<Stay>,
    entries: Vec<Stay>,
    index: HashMap<StayId, usize>,
    generation: u32,
}

impl ScheduleBuffer {
    pub fn new(baseline: Vec<Stay>) -> Self {
        let mut buffer = Self {
            baseline,
            ..Self::default()
        };
        buffer.restage();
        buffer
    }

    fn restage(&mut self) {
        self.entries = self.baseline.clone();
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id(), i))
            .collect();
    }

    /// Discards every staged edit and starts a new handle generation.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.restage();
        debug!(generation = self.generation, "Schedule buffer reset");
    }

    /// Installs a new baseline and stages a fresh copy of it.
    pub fn rebase(&mut self, baseline: Vec<Stay>) {
        self.baseline = baseline;
        self.reset();
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[inline]
    pub fn baseline(&self) -> &[Stay] {
        &self.baseline
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn slot_of(&self, handle: StageHandle) -> Option<usize> {
        let slot = handle.slot as usize;
        (handle.generation == self.generation && slot < self.entries.len()).then_some(slot)
    }

    #[inline]
    fn handle_at(&self, slot: usize) -> StageHandle {
        StageHandle {
            slot: slot as u32,
            generation: self.generation,
        }
    }

    #[inline]
    pub fn get(&self, handle: StageHandle) -> Option<&Stay> {
        self.slot_of(handle).map(|i| &self.entries[i])
    }

    #[inline]
    pub fn handle_of(&self, id: StayId) -> Option<StageHandle> {
        self.index.get(&id).map(|&i| self.handle_at(i))
    }

    #[inline]
    pub fn by_id(&self, id: StayId) -> Option<&Stay> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageHandle, &Stay)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, s)| (self.handle_at(i), s))
    }

    /// Entries that still occupy the quay.
    pub fn live(&self) -> impl Iterator<Item = &Stay> {
        self.entries.iter().filter(|s| !s.is_deleted())
    }

    #[inline]
    pub fn stays(&self) -> &[Stay] {
        &self.entries
    }

    /// One past the largest staged or baseline id.
    pub fn next_stay_id(&self) -> StayId {
        let max = self
            .entries
            .iter()
            .chain(self.baseline.iter())
            .map(|s| s.id().value())
            .max();
        StayId::new(max.map_or(1, |m| m + 1))
    }

    /// Stages a new stay with status `new`.
    pub fn create(&mut self, mut stay: Stay) -> Result<StageHandle, BufferError> {
        if self.index.contains_key(&stay.id()) {
            return Err(BufferError::DuplicateStayId(stay.id()));
        }
        stay.set_status(StayStatus::New);
        let slot = self.entries.len();
        self.index.insert(stay.id(), slot);
        self.entries.push(stay);
        Ok(self.handle_at(slot))
    }

    /// Replaces a staged entry and records it as changed. Returns `false` for
    /// a stale handle or when `stay` carries a different id.
    pub fn change(&mut self, handle: StageHandle, mut stay: Stay) -> bool {
        let Some(slot) = self.slot_of(handle) else {
            return false;
        };
        let entry = &mut self.entries[slot];
        if entry.id() != stay.id() {
            return false;
        }
        stay.set_status(entry.status().on_change());
        *entry = stay;
        true
    }

    /// Soft-deletes a staged entry. Returns `false` for a stale handle.
    pub fn remove(&mut self, handle: StageHandle) -> bool {
        let Some(slot) = self.slot_of(handle) else {
            return false;
        };
        let entry = &mut self.entries[slot];
        entry.set_status(entry.status().on_remove());
        true
    }

    /// Applies `f` to a staged entry without touching its status. The entry's
    /// id cannot be changed through `f`.
    pub fn edit<F>(&mut self, handle: StageHandle, f: F) -> bool
    where
        F: FnOnce(&mut Stay),
    {
        let Some(slot) = self.slot_of(handle) else {
            return false;
        };
        f(&mut self.entries[slot]);
        true
    }

    /// Checks every staged entry pairwise, soft-deleted ones included.
    #[inline]
    pub fn check_feasible(&self, detector: &ConflictDetector) -> Result<(), StayOverlapError> {
        detector.check_feasible(self.entries.iter())
    }

    /// Persists the whole buffer if no two entries conflict, leaving it
    /// untouched otherwise.
    #[instrument(level = "debug", skip_all, fields(entries = self.entries.len()), err(Display))]
    pub fn commit<S>(&self, sink: &mut S, detector: &ConflictDetector) -> Result<(), CommitError>
    where
        S: StaySink + ?Sized,
    {
        self.check_feasible(detector)?;
        let records = wire::encode_records(&self.entries)?;
        sink.persist(&records)?;
        info!(records = records.len(), "Schedule buffer persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use quay_plan_core::{
        space::{Heading, PierLength, PierPosition},
        time::{TimeDelta, TimePoint},
    };
    use quay_plan_model::{
        id::VesselId,
        stay::{Docking, Schedule, Vessel},
    };

    const T0: i64 = 1_714_521_600_000;

    fn at(hour: i64) -> TimePoint {
        TimePoint::new(T0 + TimeDelta::from_hours(hour).value())
    }

    fn stay(id: u64, pos: f64, etb: i64, etd: i64) -> Stay {
        Stay::new(
            StayId::new(id),
            Vessel::new(
                VesselId::new(id),
                format!("V{id}"),
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
            Schedule::estimated(at(etb), at(etd)).unwrap(),
        )
    }

    #[test]
    fn test_reset_discards_edits_and_stales_handles() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14)]);
        let h = buf.handle_of(StayId::new(1)).unwrap();
        assert!(buf.remove(h));
        assert!(buf.get(h).unwrap().is_deleted());

        buf.reset();
        assert!(buf.get(h).is_none());
        assert!(!buf.remove(h));
        let fresh = buf.handle_of(StayId::new(1)).unwrap();
        assert_ne!(fresh, h);
        assert_eq!(buf.get(fresh).unwrap().status(), StayStatus::Unset);
    }

    #[test]
    fn test_create_marks_new_and_rejects_duplicates() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14)]);
        let h = buf.create(stay(2, 300.0, 10, 14)).unwrap();
        assert_eq!(buf.get(h).unwrap().status(), StayStatus::New);
        assert_eq!(
            buf.create(stay(1, 600.0, 10, 14)),
            Err(BufferError::DuplicateStayId(StayId::new(1)))
        );
        assert_eq!(buf.next_stay_id(), StayId::new(3));
    }

    #[test]
    fn test_change_status_transitions() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14)]);
        let h = buf.handle_of(StayId::new(1)).unwrap();
        assert!(buf.change(h, stay(1, 50.0, 10, 14)));
        assert_eq!(buf.get(h).unwrap().status(), StayStatus::Changed);
        assert_eq!(buf.get(h).unwrap().docking().pos(), PierPosition::new(50.0));

        let n = buf.create(stay(2, 300.0, 10, 14)).unwrap();
        assert!(buf.change(n, stay(2, 350.0, 10, 14)));
        assert_eq!(buf.get(n).unwrap().status(), StayStatus::New);

        assert!(buf.remove(n));
        assert!(buf.change(n, stay(2, 400.0, 10, 14)));
        assert_eq!(buf.get(n).unwrap().status(), StayStatus::Deleted);
    }

    #[test]
    fn test_change_rejects_foreign_id() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14)]);
        let h = buf.handle_of(StayId::new(1)).unwrap();
        assert!(!buf.change(h, stay(7, 0.0, 10, 14)));
        assert_eq!(buf.get(h).unwrap().status(), StayStatus::Unset);
    }

    #[test]
    fn test_commit_feasible_plan() {
        let buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14), stay(2, 150.0, 10, 14)]);
        let mut sink = MemoryStore::new();
        buf.commit(&mut sink, &ConflictDetector::default()).unwrap();
        assert_eq!(sink.persist_count(), 1);
        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn test_commit_refuses_overlap_and_keeps_buffer() {
        let buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14), stay(2, 50.0, 11, 13)]);
        let before = buf.stays().to_vec();
        let mut sink = MemoryStore::new();
        let err = buf.commit(&mut sink, &ConflictDetector::default()).unwrap_err();
        match err {
            CommitError::Infeasible(e) => {
                assert_eq!(e.ids(), (StayId::new(1), StayId::new(2)))
            }
            other => panic!("unexpected {other}"),
        }
        assert_eq!(sink.persist_count(), 0);
        assert_eq!(buf.stays(), before.as_slice());
    }

    #[test]
    fn test_deleted_entries_still_gate_commit() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14), stay(2, 50.0, 11, 13)]);
        let h = buf.handle_of(StayId::new(2)).unwrap();
        buf.remove(h);
        assert_eq!(buf.live().count(), 1);
        let mut sink = MemoryStore::new();
        let err = buf.commit(&mut sink, &ConflictDetector::default()).unwrap_err();
        assert!(matches!(err, CommitError::Infeasible(_)));
        assert_eq!(sink.persist_count(), 0);
    }

    #[test]
    fn test_deleted_entries_are_persisted() {
        let mut buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14), stay(2, 500.0, 11, 13)]);
        let h = buf.handle_of(StayId::new(2)).unwrap();
        buf.remove(h);
        let mut sink = MemoryStore::new();
        buf.commit(&mut sink, &ConflictDetector::default()).unwrap();
        assert_eq!(sink.last_persisted().len(), 2);
        assert_eq!(
            sink.last_persisted()[1].status,
            Some(StayStatus::Deleted)
        );
    }

    #[test]
    fn test_empty_and_single_buffers_commit() {
        let mut sink = MemoryStore::new();
        let det = ConflictDetector::default();
        assert!(ScheduleBuffer::new(Vec::new()).commit(&mut sink, &det).is_ok());
        assert!(
            ScheduleBuffer::new(vec![stay(1, 0.0, 0, 1)])
                .commit(&mut sink, &det)
                .is_ok()
        );
        assert_eq!(sink.persist_count(), 2);
    }

    #[test]
    fn test_persist_failure_is_surfaced() {
        let buf = ScheduleBuffer::new(vec![stay(1, 0.0, 10, 14)]);
        let mut sink = MemoryStore::new();
        sink.reject_next_persist("503");
        assert!(matches!(
            buf.commit(&mut sink, &ConflictDetector::default()),
            Err(CommitError::Persist(_))
        ));
    }
}
