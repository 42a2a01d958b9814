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

//! # Edit Sessions
//!
//! One gesture at a time: `Idle -> Dragging -> Idle` or
//! `Idle -> Resizing -> Idle`. An [`EditSession`] carries what the gesture
//! captured at its start and the pointer offset accumulated since; the
//! planner owns at most one.

use crate::{
    err::SessionError,
    twin::{DriveCapture, DriveOutcome, TwinSync},
    view::ProjectionKey,
};
use quay_plan_core::{space::PierPosition, time::TimePoint, transform::CoordinateTransform};
use std::fmt::Display;

/// Handle of the temporal box being stretched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The ETB edge.
    Berthing,
    /// The ETD edge.
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Move,
    Resize(Edge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Dragging,
    Resizing,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Dragging => write!(f, "dragging"),
            SessionState::Resizing => write!(f, "resizing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditSession {
    gesture: Gesture,
    capture: DriveCapture,
    dx: f64,
    dy: f64,
}

impl EditSession {
    /// Starts a gesture on `key`, capturing its projections as they are now.
    pub fn begin<P, T>(
        sync: &TwinSync<'_, P, T>,
        key: ProjectionKey,
        gesture: Gesture,
    ) -> Result<Self, SessionError>
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        if matches!(gesture, Gesture::Resize(_)) && !key.is_temporal() {
            return Err(SessionError::ResizeNeedsTemporalBox(key));
        }
        let capture = sync
            .on_drive_start(key)
            .ok_or(SessionError::UnknownProjection(key))?;
        Ok(Self {
            gesture,
            capture,
            dx: 0.0,
            dy: 0.0,
        })
    }

    #[inline]
    pub fn key(&self) -> ProjectionKey {
        self.capture.driver()
    }

    #[inline]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[inline]
    pub fn capture(&self) -> &DriveCapture {
        &self.capture
    }

    /// Pointer offset accumulated since the gesture started.
    #[inline]
    pub fn offset(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        match self.gesture {
            Gesture::Move => SessionState::Dragging,
            Gesture::Resize(_) => SessionState::Resizing,
        }
    }

    /// Adds a raw pointer delta and updates the projections. Returns the
    /// advisory overlap state, or `None` when a resize step was rejected and
    /// the last valid extent kept.
    pub fn update<P, T>(&mut self, sync: &mut TwinSync<'_, P, T>, dx: f64, dy: f64) -> Option<bool>
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        self.dx += dx;
        self.dy += dy;
        match self.gesture {
            Gesture::Move => Some(sync.on_drive_update(&self.capture, self.dx, self.dy)),
            Gesture::Resize(edge) => sync.on_resize_update(&self.capture, edge, self.dy),
        }
    }

    /// Ends the gesture, writing its quantized result back.
    pub fn finish<P, T>(self, sync: &mut TwinSync<'_, P, T>) -> Option<DriveOutcome>
    where
        P: CoordinateTransform<PierPosition>,
        T: CoordinateTransform<TimePoint>,
    {
        sync.on_drive_end(&self.capture, self.gesture)
    }
}
