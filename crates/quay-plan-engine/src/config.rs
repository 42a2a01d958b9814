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

use crate::err::ConfigError;
use quay_plan_core::{grid::Grid, space::PierLength, time::TimeDelta};
use quay_plan_model::conflict::{ClearancePolicy, ConflictDetector};
use serde::{Deserialize, Serialize};

/// What a stay's departure is compared against to decide whether it is past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PastReference {
    /// The planner's cursor instant.
    #[default]
    Cursor,
    /// The host's wall clock.
    WallClock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Pier length in meters; stern positions must lie in `[0, pier_length]`.
    pub pier_length: f64,
    /// Position grid step in meters.
    pub position_step: f64,
    /// Time grid step in minutes.
    pub time_step_minutes: i64,
    /// Fixed vertical pixel coordinate of the ship band.
    pub ship_band_px: f64,
    pub clearance: ClearancePolicy,
    pub past_reference: PastReference,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            pier_length: 1000.0,
            position_step: 50.0,
            time_step_minutes: 6 * 60,
            ship_band_px: 0.0,
            clearance: ClearancePolicy::Inflate,
            past_reference: PastReference::Cursor,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules().map(|_| ())
    }

    /// Resolves the configuration into the typed values gestures use.
    pub fn rules(&self) -> Result<EditRules, ConfigError> {
        if !(self.pier_length.is_finite() && self.pier_length > 0.0) {
            return Err(ConfigError::NonPositivePierLength(self.pier_length));
        }
        if !self.ship_band_px.is_finite() {
            return Err(ConfigError::NonFiniteShipBand(self.ship_band_px));
        }
        let time_step = TimeDelta::from_minutes(1)
            .checked_mul(self.time_step_minutes)
            .unwrap_or(TimeDelta::zero());
        let grid = Grid::new(PierLength::new(self.position_step), time_step)?;
        Ok(EditRules {
            grid,
            pier_length: PierLength::new(self.pier_length),
            detector: ConflictDetector::new(self.clearance),
            ship_band_px: self.ship_band_px,
        })
    }
}

/// Validated, typed form of [`PlannerConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditRules {
    pub grid: Grid,
    pub pier_length: PierLength,
    pub detector: ConflictDetector,
    pub ship_band_px: f64,
}

impl Default for EditRules {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            pier_length: PierLength::new(1000.0),
            detector: ConflictDetector::default(),
            ship_band_px: 0.0,
        }
    }
}
