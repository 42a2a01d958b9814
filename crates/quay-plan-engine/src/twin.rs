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

//! # Twin Synchronization
//!
//! A gesture lands on one projection, the driver. [`TwinSync`] moves the
//! other one, the follower, to the same pier coordinate while the gesture
//! runs, and at the end writes the quantized result back to the buffer.

use crate::{
    buffer::{ScheduleBuffer, StageHandle},
    session::{Edge, Gesture},
    view::{Layout, ProjectionKey, ViewState},
};
use quay_plan_core::{
    space::PierPosition,
    time::TimePoint,
    transform::CoordinateTransform,
};
use quay_plan_model::{id::StayId, stay::Stay};
use tracing::{debug, trace};

/// Pixel and domain state of a stay as a gesture found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCapture {
    driver: ProjectionKey,
    handle: StageHandle,
    start_x: f64,
    start_bow_x: f64,
    start_berthing_px: f64,
    start_departure_px: f64,
    start_pos: PierPosition,
    start_etb: TimePoint,
    start_etd: TimePoint,
}

impl DriveCapture {
    #[inline]
    pub fn driver(&self) -> ProjectionKey {
        self.driver
    }

    #[inline]
    pub fn stay_id(&self) -> StayId {
        self.driver.stay_id()
    }

    #[inline]
    pub fn handle(&self) -> StageHandle {
        self.handle
    }

    #[inline]
    pub fn start_x(&self) -> f64 {
        self.start_x
    }

    #[inline]
    pub fn start_pos(&self) -> PierPosition {
        self.start_pos
    }

    #[inline]
    pub fn start_window(&self) -> (TimePoint, TimePoint) {
        (self.start_etb, self.start_etd)
    }

    /// Whether the gesture may move the stay in time.
    #[inline]
    fn drives_time(&self, gesture: Gesture) -> bool {
        self.driver.is_temporal() || matches!(gesture, Gesture::Resize(_))
    }
}

/// Result of a completed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveOutcome {
    pub stay_id: StayId,
    /// A quantized field differs from its quantized pre-gesture value.
    pub touched: bool,
    /// The written stay conflicts with a live sibling.
    pub overlap: bool,
}

pub struct TwinSync<'a, P, T> {
    pub view: &'a mut ViewState,
    pub buffer: &'a mut ScheduleBuffer,
    pub layout: Layout<'a, P, T>,
}

impl<P, T> TwinSync<'_, P, T>
where
    P: CoordinateTransform<PierPosition>,
    T: CoordinateTransform<TimePoint>,
{
    /// Captures the driver and its twin. `None` if `key` is not shown.
    pub fn on_drive_start(&self, key: ProjectionKey) -> Option<DriveCapture> {
        let p = self.view.get(key.stay_id())?;
        let start_x = p.x_of(key)?;
        let stay = self.buffer.get(p.handle)?;
        Some(DriveCapture {
            driver: key,
            handle: p.handle,
            start_x,
            start_bow_x: p.stay_box.bow_x + (start_x - p.stay_box.x),
            start_berthing_px: p.stay_box.berthing_px,
            start_departure_px: p.stay_box.departure_px,
            start_pos: stay.docking().pos(),
            start_etb: stay.schedule().etb(),
            start_etd: stay.schedule().etd(),
        })
    }

    /// Moves driver and follower by the accumulated pointer offset. A ship
    /// icon ignores `dy`. Returns the advisory overlap state.
    pub fn on_drive_update(&mut self, capture: &DriveCapture, dx: f64, dy: f64) -> bool {
        let id = capture.stay_id();
        let Some(p) = self.view.get_mut(id) else {
            return false;
        };
        let x = capture.start_x + dx;
        let bow_x = capture.start_bow_x + dx;
        p.stay_box.x = x;
        p.stay_box.bow_x = bow_x;
        if let Some(ship) = p.ship.as_mut() {
            ship.x = x;
            ship.bow_x = bow_x;
        }
        if capture.driver.is_temporal() {
            p.stay_box.berthing_px = capture.start_berthing_px + dy;
            p.stay_box.departure_px = capture.start_departure_px + dy;
        }
        trace!(stay = %id, x, "Drive update");
        self.live_check(capture, Gesture::Move)
    }

    /// Moves one edge of the temporal box. An offset that would leave the
    /// window empty or inverted is ignored and `None` is returned; otherwise
    /// the advisory overlap state.
    pub fn on_resize_update(&mut self, capture: &DriveCapture, edge: Edge, dy: f64) -> Option<bool> {
        let vp = self.layout.viewport;
        let (px, extent_ok) = match edge {
            Edge::Berthing => {
                let px = capture.start_berthing_px + dy;
                (px, capture.start_etd > vp.time_at(px))
            }
            Edge::Departure => {
                let px = capture.start_departure_px + dy;
                (px, vp.time_at(px) > capture.start_etb)
            }
        };
        if !extent_ok {
            trace!(stay = %capture.stay_id(), "Resize rejected, extent would not be positive");
            return None;
        }
        let p = self.view.get_mut(capture.stay_id())?;
        match edge {
            Edge::Berthing => p.stay_box.berthing_px = px,
            Edge::Departure => p.stay_box.departure_px = px,
        }
        Some(self.live_check(capture, Gesture::Resize(edge)))
    }

    fn live_check(&mut self, capture: &DriveCapture, gesture: Gesture) -> bool {
        let Some(stay) = self.tentative(capture, gesture) else {
            return false;
        };
        let overlap = self
            .layout
            .rules
            .detector
            .overlaps_any(&stay, self.buffer.live());
        self.view.set_overlap(stay.id(), overlap);
        overlap
    }

    /// The stay as the projections currently show it, unquantized.
    fn tentative(&self, capture: &DriveCapture, gesture: Gesture) -> Option<Stay> {
        let p = self.view.get(capture.stay_id())?;
        let stay = self.buffer.get(capture.handle)?;
        let vp = self.layout.viewport;
        let pos = match gesture {
            Gesture::Move => vp.position_at(p.stay_box.x),
            Gesture::Resize(_) => stay.docking().pos(),
        };
        let (etb, etd) = if capture.drives_time(gesture) {
            (
                vp.time_at(p.stay_box.berthing_px),
                vp.time_at(p.stay_box.departure_px),
            )
        } else {
            (stay.schedule().etb(), stay.schedule().etd())
        };
        placed(stay, pos, etb, etd)
    }

    /// Quantizes the gesture's result, writes it to the buffer and re-lays
    /// out both projections. `None` if the stay vanished from the buffer or
    /// the result cannot be represented; the projections are then restored
    /// from the buffer.
    pub fn on_drive_end(&mut self, capture: &DriveCapture, gesture: Gesture) -> Option<DriveOutcome> {
        let outcome = self.write_back(capture, gesture);
        if outcome.is_none()
            && let Some(stay) = self.buffer.get(capture.handle)
        {
            self.view.relayout_one(capture.handle, stay, &self.layout);
        }
        outcome
    }

    fn write_back(&mut self, capture: &DriveCapture, gesture: Gesture) -> Option<DriveOutcome> {
        let rules = self.layout.rules;
        let grid = rules.grid;
        let vp = self.layout.viewport;
        let p = *self.view.get(capture.stay_id())?;
        let stay = self.buffer.get(capture.handle)?;

        let raw_pos = match gesture {
            Gesture::Move => vp.position_at(p.stay_box.x),
            Gesture::Resize(_) => stay.docking().pos(),
        };
        let pos = grid.snap_position(raw_pos).clamp(
            PierPosition::zero(),
            PierPosition::zero() + rules.pier_length,
        );

        let times = capture.drives_time(gesture);
        let (etb, etd) = if times {
            let etb = grid.snap_time(vp.time_at(p.stay_box.berthing_px));
            let mut etd = grid.snap_time(vp.time_at(p.stay_box.departure_px));
            if etd <= etb {
                etd = etb.checked_add(grid.time_step())?;
            }
            (etb, etd)
        } else {
            (stay.schedule().etb(), stay.schedule().etd())
        };

        let next = placed(stay, pos, etb, etd)?;
        let touched = pos != grid.snap_position(capture.start_pos)
            || (times
                && (etb != grid.snap_time(capture.start_etb)
                    || etd != grid.snap_time(capture.start_etd)));

        let (docking, schedule) = (*next.docking(), *next.schedule());
        self.buffer.edit(capture.handle, |s| {
            s.set_docking(docking);
            s.set_schedule(schedule);
        });
        self.view.relayout_one(capture.handle, &next, &self.layout);

        let overlap = rules.detector.overlaps_any(&next, self.buffer.live());
        if let Some(p) = self.view.get_mut(next.id()) {
            p.flags.overlap = overlap;
            p.flags.touched |= touched;
        }
        debug!(stay = %next.id(), pos = %pos, touched, overlap, "Drive end");
        Some(DriveOutcome {
            stay_id: next.id(),
            touched,
            overlap,
        })
    }
}

fn placed(stay: &Stay, pos: PierPosition, etb: TimePoint, etd: TimePoint) -> Option<Stay> {
    let docking = stay.docking().with_pos(pos).ok()?;
    let schedule = stay.schedule().with_window(etb, etd).ok()?;
    let mut next = stay.clone();
    next.set_docking(docking);
    next.set_schedule(schedule);
    Some(next)
}
