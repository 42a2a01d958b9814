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

//! # Conflict Detection
//!
//! Two stays conflict iff their time windows and their pier footprints both
//! overlap as closed intervals. The same predicate serves the advisory check
//! run on every drag tick and the exhaustive gate run before a commit.

use crate::{err::StayOverlapError, id::StayId, stay::Stay};
use quay_plan_core::{space::SpaceInterval, time::TimeInterval};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether docking clearances count toward a stay's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearancePolicy {
    /// Widen the hull by `rear` behind the stern and `aft` ahead of the bow.
    #[default]
    Inflate,
    /// Use the bare hull interval.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConflictDetector {
    policy: ClearancePolicy,
}

#[derive(Clone, Copy)]
struct Rect {
    id: StayId,
    t: TimeInterval,
    s: SpaceInterval,
}

impl ConflictDetector {
    #[inline]
    pub fn new(policy: ClearancePolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> ClearancePolicy {
        self.policy
    }

    /// The stretch of pier `stay` blocks under this detector's policy.
    pub fn footprint(&self, stay: &Stay) -> SpaceInterval {
        match self.policy {
            ClearancePolicy::Ignore => stay.space_interval(),
            ClearancePolicy::Inflate => {
                let docking = stay.docking();
                let heading = docking.heading();
                let behind = docking.pos().toward(heading.reversed(), docking.rear());
                let ahead = stay.bow().toward(heading, docking.aft());
                SpaceInterval::new(behind, ahead)
            }
        }
    }

    #[inline]
    pub fn conflicts(&self, a: &Stay, b: &Stay) -> bool {
        a.time_interval().overlaps(&b.time_interval())
            && self.footprint(a).overlaps(&self.footprint(b))
    }

    /// Whether any member of `population` other than `target` itself
    /// conflicts with `target`.
    pub fn overlaps_any<'a, I>(&self, target: &Stay, population: I) -> bool
    where
        I: IntoIterator<Item = &'a Stay>,
    {
        population
            .into_iter()
            .any(|other| other.id() != target.id() && self.conflicts(target, other))
    }

    fn sorted_rects<'a, I>(&self, population: I) -> Vec<Rect>
    where
        I: IntoIterator<Item = &'a Stay>,
    {
        let mut rects: Vec<Rect> = population
            .into_iter()
            .map(|s| Rect {
                id: s.id(),
                t: s.time_interval(),
                s: self.footprint(s),
            })
            .collect();
        rects.sort_by_key(|r| (r.t.start(), r.id));
        rects
    }

    /// Exhaustive feasibility check, reporting the first conflicting pair
    /// found by a sweep over berthing times.
    pub fn check_feasible<'a, I>(&self, population: I) -> Result<(), StayOverlapError>
    where
        I: IntoIterator<Item = &'a Stay>,
    {
        let mut active: Vec<Rect> = Vec::new();
        for cur in self.sorted_rects(population) {
            active.retain(|x| x.t.end() >= cur.t.start());
            for other in &active {
                if other.t.overlaps(&cur.t) && other.s.overlaps(&cur.s) {
                    return Err(StayOverlapError::new(
                        other.id, cur.id, other.t, cur.t, other.s, cur.s,
                    ));
                }
            }
            active.push(cur);
        }
        Ok(())
    }

    /// Every stay involved in at least one conflict.
    pub fn conflicting_ids<'a, I>(&self, population: I) -> BTreeSet<StayId>
    where
        I: IntoIterator<Item = &'a Stay>,
    {
        let mut out = BTreeSet::new();
        let mut active: Vec<Rect> = Vec::new();
        for cur in self.sorted_rects(population) {
            active.retain(|x| x.t.end() >= cur.t.start());
            for other in &active {
                if other.t.overlaps(&cur.t) && other.s.overlaps(&cur.s) {
                    out.insert(other.id);
                    out.insert(cur.id);
                }
            }
            active.push(cur);
        }
        out
    }
}
