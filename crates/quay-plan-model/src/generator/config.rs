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

use std::fmt::Display;

use quay_plan_core::{
    grid::Grid,
    space::PierLength,
    time::{TimeDelta, TimePoint},
};
use rand::Rng;

use super::err::{PierTooShortError, StayGenConfigBuildError};

/// 2024-05-01T00:00:00Z.
const DEFAULT_HORIZON_START: TimePoint = TimePoint::new(1_714_521_600_000);

/// Configuration for synthetic stay generation.
#[derive(Debug, Clone, PartialEq)]
pub struct StayGenConfig {
    pub(crate) pier_length: PierLength,
    pub(crate) min_lpp: PierLength,
    pub(crate) max_lpp: PierLength,
    pub(crate) beam_ratio: f64,
    pub(crate) count: usize,
    pub(crate) horizon_start: TimePoint,
    pub(crate) mean_interarrival: TimeDelta,
    pub(crate) dwell_mean: TimeDelta,
    pub(crate) dwell_sigma: TimeDelta,
    pub(crate) clearance: PierLength,
    pub(crate) grid: Grid,
    pub(crate) max_delay_steps: usize,
    pub(crate) seed: u64,
}

impl Default for StayGenConfig {
    fn default() -> Self {
        Self {
            pier_length: PierLength::new(1000.0),
            min_lpp: PierLength::new(80.0),
            max_lpp: PierLength::new(300.0),
            beam_ratio: 0.15,
            count: 24,
            horizon_start: DEFAULT_HORIZON_START,
            mean_interarrival: TimeDelta::from_hours(4),
            dwell_mean: TimeDelta::from_hours(18),
            dwell_sigma: TimeDelta::from_hours(6),
            clearance: PierLength::new(5.0),
            grid: Grid::default(),
            max_delay_steps: 32,
            seed: 42,
        }
    }
}

impl StayGenConfig {
    #[inline]
    pub fn pier_length(&self) -> PierLength {
        self.pier_length
    }
    #[inline]
    pub fn min_lpp(&self) -> PierLength {
        self.min_lpp
    }
    #[inline]
    pub fn max_lpp(&self) -> PierLength {
        self.max_lpp
    }
    #[inline]
    pub fn beam_ratio(&self) -> f64 {
        self.beam_ratio
    }
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }
    #[inline]
    pub fn horizon_start(&self) -> TimePoint {
        self.horizon_start
    }
    #[inline]
    pub fn mean_interarrival(&self) -> TimeDelta {
        self.mean_interarrival
    }
    #[inline]
    pub fn dwell_mean(&self) -> TimeDelta {
        self.dwell_mean
    }
    #[inline]
    pub fn dwell_sigma(&self) -> TimeDelta {
        self.dwell_sigma
    }
    #[inline]
    pub fn clearance(&self) -> PierLength {
        self.clearance
    }
    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }
    #[inline]
    pub fn max_delay_steps(&self) -> usize {
        self.max_delay_steps
    }
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Display for StayGenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StayGenConfig {{ \
             pier_length: {}, lpp: [{}, {}], beam_ratio: {:.3}, count: {}, \
             horizon_start: {}, mean_interarrival: {:.2}h, \
             dwell: {:.2}h +- {:.2}h, clearance: {}, grid: {}, \
             max_delay_steps: {}, seed: {} \
             }}",
            self.pier_length,
            self.min_lpp,
            self.max_lpp,
            self.beam_ratio,
            self.count,
            self.horizon_start,
            self.mean_interarrival.as_hours_f64(),
            self.dwell_mean.as_hours_f64(),
            self.dwell_sigma.as_hours_f64(),
            self.clearance,
            self.grid,
            self.max_delay_steps,
            self.seed
        )
    }
}

/// Builder for `StayGenConfig`.
pub struct StayGenConfigBuilder {
    // Required
    pier_length: Option<PierLength>,
    lpp_range: Option<(PierLength, PierLength)>,
    count: Option<usize>,

    // Optional with defaults
    beam_ratio: f64,
    horizon_start: TimePoint,
    mean_interarrival: TimeDelta,
    dwell_mean: TimeDelta,
    dwell_sigma: TimeDelta,
    clearance: PierLength,
    grid: Grid,
    max_delay_steps: usize,
    seed: u64,
}

impl Default for StayGenConfigBuilder {
    fn default() -> Self {
        let defaults = StayGenConfig::default();
        Self {
            pier_length: None,
            lpp_range: None,
            count: None,
            beam_ratio: defaults.beam_ratio,
            horizon_start: defaults.horizon_start,
            mean_interarrival: defaults.mean_interarrival,
            dwell_mean: defaults.dwell_mean,
            dwell_sigma: defaults.dwell_sigma,
            clearance: defaults.clearance,
            grid: defaults.grid,
            max_delay_steps: defaults.max_delay_steps,
            seed: rand::rng().random(),
        }
    }
}

impl StayGenConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pier_length(mut self, v: PierLength) -> Self {
        self.pier_length = Some(v);
        self
    }
    #[inline]
    pub fn lpp_range(mut self, min: PierLength, max: PierLength) -> Self {
        self.lpp_range = Some((min, max));
        self
    }
    #[inline]
    pub fn count(mut self, v: usize) -> Self {
        self.count = Some(v);
        self
    }
    #[inline]
    pub fn beam_ratio(mut self, v: f64) -> Self {
        self.beam_ratio = v;
        self
    }
    #[inline]
    pub fn horizon_start(mut self, v: TimePoint) -> Self {
        self.horizon_start = v;
        self
    }
    #[inline]
    pub fn mean_interarrival(mut self, v: TimeDelta) -> Self {
        self.mean_interarrival = v;
        self
    }
    #[inline]
    pub fn dwell(mut self, mean: TimeDelta, sigma: TimeDelta) -> Self {
        self.dwell_mean = mean;
        self.dwell_sigma = sigma;
        self
    }
    #[inline]
    pub fn clearance(mut self, v: PierLength) -> Self {
        self.clearance = v;
        self
    }
    #[inline]
    pub fn grid(mut self, v: Grid) -> Self {
        self.grid = v;
        self
    }
    #[inline]
    pub fn max_delay_steps(mut self, v: usize) -> Self {
        self.max_delay_steps = v;
        self
    }
    pub fn random_seed(mut self) -> Self {
        self.seed = rand::rng().random();
        self
    }
    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub fn build(self) -> Result<StayGenConfig, StayGenConfigBuildError> {
        use StayGenConfigBuildError::*;
        let pier_length = self.pier_length.ok_or(MissingPierLength)?;
        let (a, b) = self.lpp_range.ok_or(MissingLppRange)?;
        let count = self.count.ok_or(MissingCount)?;

        let valid_len = |l: PierLength| l.is_finite() && l.is_positive();
        if !valid_len(a) || !valid_len(b) || !pier_length.is_finite() {
            return Err(NonPositiveLpp);
        }
        let (min_lpp, max_lpp) = if a <= b { (a, b) } else { (b, a) };
        if !self.clearance.is_finite() || self.clearance.is_negative() {
            return Err(NegativeClearance);
        }
        if !(self.beam_ratio.is_finite() && self.beam_ratio > 0.0) {
            return Err(InvalidBeamRatio);
        }
        if !self.mean_interarrival.is_positive() {
            return Err(NonPositiveInterarrival);
        }
        if !self.dwell_mean.is_positive() || self.dwell_sigma.is_negative() {
            return Err(NonPositiveDwell);
        }
        let required = max_lpp + self.clearance * 2.0;
        if pier_length < required {
            return Err(PierTooShortError::new(pier_length, required).into());
        }

        Ok(StayGenConfig {
            pier_length,
            min_lpp,
            max_lpp,
            beam_ratio: self.beam_ratio,
            count,
            horizon_start: self.horizon_start,
            mean_interarrival: self.mean_interarrival,
            dwell_mean: self.dwell_mean,
            dwell_sigma: self.dwell_sigma,
            clearance: self.clearance,
            grid: self.grid,
            max_delay_steps: self.max_delay_steps,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StayGenConfigBuilder {
        StayGenConfigBuilder::new()
            .pier_length(PierLength::new(1000.0))
            .lpp_range(PierLength::new(80.0), PierLength::new(250.0))
            .count(10)
            .seed(1)
    }

    #[test]
    fn test_builder_requires_fields() {
        assert_eq!(
            StayGenConfigBuilder::new().build(),
            Err(StayGenConfigBuildError::MissingPierLength)
        );
        assert_eq!(
            StayGenConfigBuilder::new()
                .pier_length(PierLength::new(100.0))
                .build(),
            Err(StayGenConfigBuildError::MissingLppRange)
        );
    }

    #[test]
    fn test_builder_orders_lpp_range() {
        let cfg = base()
            .lpp_range(PierLength::new(200.0), PierLength::new(90.0))
            .build()
            .unwrap();
        assert_eq!(cfg.min_lpp(), PierLength::new(90.0));
        assert_eq!(cfg.max_lpp(), PierLength::new(200.0));
        assert_eq!(cfg.seed(), 1);
    }

    #[test]
    fn test_builder_rejects_short_pier() {
        let err = base()
            .pier_length(PierLength::new(200.0))
            .clearance(PierLength::new(10.0))
            .build()
            .unwrap_err();
        match err {
            StayGenConfigBuildError::PierTooShort(e) => {
                assert_eq!(e.required(), PierLength::new(270.0));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_builder_rejects_bad_rates() {
        assert_eq!(
            base().mean_interarrival(TimeDelta::zero()).build(),
            Err(StayGenConfigBuildError::NonPositiveInterarrival)
        );
        assert_eq!(
            base()
                .dwell(TimeDelta::from_hours(1), TimeDelta::new(-1))
                .build(),
            Err(StayGenConfigBuildError::NonPositiveDwell)
        );
        assert_eq!(
            base().beam_ratio(0.0).build(),
            Err(StayGenConfigBuildError::InvalidBeamRatio)
        );
    }
}
