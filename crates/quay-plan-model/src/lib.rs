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

//! # Quay Plan Model (`quay-plan-model`)
//!
//! The record types of the berth planner and the pure functions over them.
//!
//! - **`Stay`**: one vessel occupying one stretch of pier for one time
//!   window, composed of a [`stay::Vessel`], a [`stay::Docking`] and a
//!   [`stay::Schedule`], each validated on construction.
//! - **`ConflictDetector`**: the closed-interval overlap rule in time and
//!   space, with an optional clearance inflation, used both for live drag
//!   feedback and for the exhaustive commit gate.
//! - **Wire records**: the JSON shape stays are loaded from and persisted as.
//! - **`StayGenerator`**: seeded synthetic plans for demos and benchmarks.

pub mod conflict;
pub mod err;
pub mod generator;
pub mod id;
pub mod stay;
pub mod wire;

pub mod prelude {
    pub use crate::conflict::{ClearancePolicy, ConflictDetector};
    pub use crate::err::{StayBuildError, StayOverlapError};
    pub use crate::id::{StayId, VesselId};
    pub use crate::stay::{Docking, Schedule, Stay, StayStatus, Vessel};
}
