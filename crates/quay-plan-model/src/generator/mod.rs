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

//! Seeded synthetic stays.
//!
//! Vessels arrive as a Poisson process, dwell for a normally distributed
//! number of hours and are placed first-fit on grid-aligned berths, delaying
//! berthing by whole time steps when the pier is full. Every generated plan is
//! feasible under [`ClearancePolicy::Inflate`].

mod config;
mod err;

pub use config::{StayGenConfig, StayGenConfigBuilder};
pub use err::{PierTooShortError, StayGenConfigBuildError};

use crate::{
    conflict::{ClearancePolicy, ConflictDetector},
    id::{StayId, VesselId},
    stay::{Docking, Schedule, Stay, Vessel},
};
use quay_plan_core::{
    space::{Heading, PierLength, PierPosition},
    time::{TimeDelta, TimePoint},
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Exp, Normal, Uniform};

const VESSEL_NAMES: [&str; 12] = [
    "Aurora", "Borealis", "Cassiopeia", "Dorado", "Eridanus", "Fornax", "Gemini", "Hydra",
    "Indus", "Lyra", "Orion", "Vela",
];

pub struct StayGenerator {
    config: StayGenConfig,
    rng: SmallRng,
    lpp_distribution: Uniform<f64>,
    gap_distribution: Exp<f64>,
    dwell_distribution: Normal<f64>,
    detector: ConflictDetector,
    next_id: u64,
}

impl From<StayGenConfig> for StayGenerator {
    fn from(config: StayGenConfig) -> Self {
        Self::new(config)
    }
}

impl StayGenerator {
    pub fn new(config: StayGenConfig) -> Self {
        let seed = config.seed();
        Self {
            lpp_distribution: Uniform::new_inclusive(
                config.min_lpp.value(),
                config.max_lpp.value(),
            )
            .expect("valid [min_lpp, max_lpp]"),
            gap_distribution: Exp::new(1.0 / config.mean_interarrival.value() as f64)
                .expect("positive mean inter-arrival"),
            dwell_distribution: Normal::new(
                config.dwell_mean.value() as f64,
                config.dwell_sigma.value() as f64,
            )
            .expect("finite dwell parameters"),
            detector: ConflictDetector::new(ClearancePolicy::Inflate),
            rng: SmallRng::seed_from_u64(seed),
            config,
            next_id: 1,
        }
    }

    #[inline]
    pub fn config(&self) -> &StayGenConfig {
        &self.config
    }

    #[inline]
    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    fn sample_gap(&mut self) -> TimeDelta {
        TimeDelta::new(self.gap_distribution.sample(&mut self.rng).round() as i64)
    }

    /// A dwell of at least one time step, rounded to the time grid.
    fn sample_dwell(&mut self) -> TimeDelta {
        let step = self.config.grid.time_step();
        let raw = self.dwell_distribution.sample(&mut self.rng).round() as i64;
        let snapped = quay_plan_core::grid::snap_int(raw, step.value());
        TimeDelta::new(snapped.max(step.value()))
    }

    #[inline]
    fn sample_heading(&mut self) -> Heading {
        if self.rng.random() {
            Heading::Positive
        } else {
            Heading::Negative
        }
    }

    /// Grid-aligned stern positions that keep the inflated footprint on the
    /// pier.
    fn stern_candidates(&self, lpp: PierLength, heading: Heading) -> Vec<PierPosition> {
        let clearance = self.config.clearance;
        let pier = self.config.pier_length.value();
        let (lo, hi) = match heading {
            Heading::Positive => (clearance.value(), pier - lpp.value() - clearance.value()),
            Heading::Negative => (lpp.value() + clearance.value(), pier - clearance.value()),
        };
        let step = self.config.grid.position_step().value();
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        let out: Vec<PierPosition> = (first..=last)
            .map(|k| PierPosition::new(k as f64 * step))
            .collect();
        if out.is_empty() {
            vec![PierPosition::new(lo)]
        } else {
            out
        }
    }

    fn build_stay(
        &self,
        id: u64,
        vessel: &Vessel,
        heading: Heading,
        pos: PierPosition,
        etb: TimePoint,
        dwell: TimeDelta,
    ) -> Stay {
        let clearance = self.config.clearance;
        let docking = Docking::new(heading, pos, clearance, clearance)
            .expect("generated docking must be valid");
        let schedule = Schedule::estimated(etb, etb + dwell).expect("dwell is positive");
        Stay::new(StayId::new(id), vessel.clone(), docking, schedule)
    }

    /// First-fit placement. Returns `None` when no berth frees up within the
    /// configured number of delay steps.
    fn place(
        &mut self,
        id: u64,
        vessel: &Vessel,
        etb: TimePoint,
        dwell: TimeDelta,
        placed: &[Stay],
    ) -> Option<Stay> {
        let heading = self.sample_heading();
        let mut candidates = self.stern_candidates(vessel.lpp(), heading);
        let offset = self.rng.random_range(0..candidates.len());
        candidates.rotate_left(offset);

        let step = self.config.grid.time_step();
        for delay in 0..=self.config.max_delay_steps as i64 {
            let start = etb.checked_add(step.checked_mul(delay)?)?;
            for &pos in &candidates {
                let stay = self.build_stay(id, vessel, heading, pos, start, dwell);
                if !self.detector.overlaps_any(&stay, placed) {
                    return Some(stay);
                }
            }
        }
        None
    }

    pub fn generate(&mut self) -> Vec<Stay> {
        let grid = self.config.grid;
        let mut placed: Vec<Stay> = Vec::with_capacity(self.config.count);
        let mut clock = self.config.horizon_start;

        for _ in 0..self.config.count {
            clock = clock.saturating_add(self.sample_gap());
            let etb = grid.snap_time(clock);
            let lpp = PierLength::new(self.lpp_distribution.sample(&mut self.rng).round());
            let dwell = self.sample_dwell();

            let id = self.fresh_id();
            let name = VESSEL_NAMES[(id as usize - 1) % VESSEL_NAMES.len()];
            let vessel = Vessel::new(
                VesselId::new(id),
                format!("{} {}", name, id),
                lpp,
                lpp * self.config.beam_ratio,
            )
            .expect("generated vessel must be valid");

            if let Some(stay) = self.place(id, &vessel, etb, dwell, &placed) {
                placed.push(stay);
            }
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_plan_core::grid::Grid;

    fn config(seed: u64, count: usize) -> StayGenConfig {
        StayGenConfigBuilder::new()
            .pier_length(PierLength::new(1000.0))
            .lpp_range(PierLength::new(80.0), PierLength::new(300.0))
            .count(count)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_counts_and_ids() {
        let mut generator = StayGenerator::new(config(42, 30));
        let stays = generator.generate();
        assert!(!stays.is_empty());
        assert!(stays.len() <= 30);
        let mut ids: Vec<_> = stays.iter().map(|s| s.id()).collect();
        ids.dedup();
        assert_eq!(ids.len(), stays.len());
    }

    #[test]
    fn test_generated_plan_is_feasible() {
        for seed in [1, 7, 99, 2024] {
            let mut generator = StayGenerator::new(config(seed, 60));
            let stays = generator.generate();
            let det = ConflictDetector::new(ClearancePolicy::Inflate);
            assert!(det.check_feasible(&stays).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn test_generated_stays_are_grid_aligned_and_on_pier() {
        let cfg = config(5, 40);
        let grid = Grid::default();
        let mut generator = StayGenerator::new(cfg.clone());
        for s in generator.generate() {
            let step = grid.time_step().value();
            assert_eq!(s.schedule().etb().value() % step, 0);
            assert_eq!(s.schedule().etd().value() % step, 0);
            assert!(s.schedule().etd() > s.schedule().etb());
            assert_eq!(grid.snap_position(s.docking().pos()), s.docking().pos());
            let hull = s.space_interval();
            assert!(hull.start() >= PierPosition::zero());
            assert!(hull.end() <= PierPosition::new(cfg.pier_length().value()));
            assert!(s.vessel().lpp() >= cfg.min_lpp() && s.vessel().lpp() <= cfg.max_lpp());
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let a = StayGenerator::new(config(11, 20)).generate();
        let b = StayGenerator::new(config(11, 20)).generate();
        assert_eq!(a, b);
    }
}
