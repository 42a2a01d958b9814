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

use quay_plan_core::{
    space::{PierLength, PierPosition},
    time::{TimeDelta, TimePoint},
    transform::{LinearScale, Viewport},
};
use quay_plan_engine::prelude::*;
use quay_plan_model::generator::{StayGenConfigBuilder, StayGenerator};
use serde::Serialize;
use std::{error::Error, fs::File, io::BufWriter};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

const REPORT_PATH: &str = "quay_plan_report.json";
const SCREEN_WIDTH_PX: f64 = 1200.0;
const SCREEN_HEIGHT_PX: f64 = 800.0;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct GestureReport {
    key: String,
    gesture: String,
    touched: bool,
    overlap: bool,
}

#[derive(Debug, Clone, Serialize)]
struct StaySummary {
    stay_id: u64,
    vessel: String,
    pos: f64,
    etb: String,
    etd: String,
    docked: bool,
}

#[derive(Debug, Clone, Serialize)]
struct SessionReport {
    config: PlannerConfig,
    loaded: usize,
    docked_at_cursor: usize,
    gestures: Vec<GestureReport>,
    conflicts_before_commit: usize,
    commit: String,
    persisted_records: usize,
    stays: Vec<StaySummary>,
}

fn load_config() -> Result<PlannerConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path)?;
            let config: PlannerConfig = serde_json::from_reader(file)?;
            info!(path = %path, "Loaded planner config");
            Ok(config)
        }
        None => Ok(PlannerConfig::default()),
    }
}

fn iso(t: TimePoint) -> String {
    t.to_datetime()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| t.value().to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();

    let config = load_config()?;
    let rules = config.rules()?;

    let gen_config = StayGenConfigBuilder::new()
        .pier_length(rules.pier_length)
        .lpp_range(PierLength::new(80.0), PierLength::new(300.0))
        .count(24)
        .grid(rules.grid)
        .seed(42)
        .build()?;
    let horizon_start = gen_config.horizon_start();
    let mut generator = StayGenerator::from(gen_config);
    let store = MemoryStore::from_generator(&mut generator)?;

    // The whole pier across the screen, eight days up the screen.
    let viewport = Viewport::new(
        LinearScale::new(
            (PierPosition::zero(), PierPosition::zero() + rules.pier_length),
            (0.0, SCREEN_WIDTH_PX),
        )?,
        LinearScale::new(
            (horizon_start, horizon_start + TimeDelta::from_hours(8 * 24)),
            (SCREEN_HEIGHT_PX, 0.0),
        )?,
    );
    let cursor = horizon_start + TimeDelta::from_hours(24);
    let mut planner = BerthPlanner::new(config.clone(), store, viewport, cursor)?;
    let loaded = planner.load()?;
    let docked_at_cursor = planner.view().ships().count();

    let mut gestures = Vec::new();
    let shift_px = planner.viewport().x_of(PierPosition::new(37.0))
        - planner.viewport().x_of(PierPosition::zero());
    let step_px = planner.viewport().y_of(horizon_start + rules.grid.time_step())
        - planner.viewport().y_of(horizon_start);

    let first_docked = planner.view().ships().next();
    if let Some(ship) = first_docked {
        planner.begin_move(ship)?;
        planner.update(shift_px, 0.0)?;
        if let Some(out) = planner.finish()? {
            gestures.push(GestureReport {
                key: ship.to_string(),
                gesture: "move".into(),
                touched: out.touched,
                overlap: out.overlap,
            });
        }

        let stay_box = ship.twin();
        planner.begin_resize(stay_box, Edge::Departure)?;
        planner.update(0.0, step_px)?;
        if let Some(out) = planner.finish()? {
            gestures.push(GestureReport {
                key: stay_box.to_string(),
                gesture: "resize-departure".into(),
                touched: out.touched,
                overlap: out.overlap,
            });
        }
    } else {
        warn!("No stay is docked at the cursor, skipping gestures");
    }

    let conflicts_before_commit = planner.recheck();
    let commit = match planner.commit() {
        Ok(()) => "committed".to_string(),
        Err(e) => {
            warn!(error = %e, "Commit refused");
            e.to_string()
        }
    };

    let stays = planner
        .buffer()
        .stays()
        .iter()
        .map(|s| StaySummary {
            stay_id: s.id().value(),
            vessel: s.vessel().name().to_string(),
            pos: s.docking().pos().value(),
            etb: iso(s.schedule().etb()),
            etd: iso(s.schedule().etd()),
            docked: planner.view().contains(ProjectionKey::Ship(s.id())),
        })
        .collect();

    let report = SessionReport {
        config,
        loaded,
        docked_at_cursor,
        gestures,
        conflicts_before_commit,
        commit,
        persisted_records: planner.store().last_persisted().len(),
        stays,
    };

    let file = File::create(REPORT_PATH)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)?;

    println!();
    println!("Loaded {} stays, {} docked at the cursor", loaded, docked_at_cursor);
    println!("Commit: {}", report.commit);
    println!("Wrote: {}", REPORT_PATH);
    Ok(())
}
