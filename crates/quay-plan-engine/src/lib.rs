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

//! # Quay Plan Engine (`quay-plan-engine`)
//!
//! The interactive consistency layer of the berth planner.
//!
//! - **`BerthRegistry`**: the plan as last loaded, validated against the pier.
//! - **`ScheduleBuffer`**: the working copy edits are staged into, addressed
//!   by generation-checked [`buffer::StageHandle`]s.
//! - **`ViewState`**: both projections of every stay, a temporal box and,
//!   while the stay is current, a ship icon.
//! - **`EditSession`** and **`TwinSync`**: one drag or resize gesture at a
//!   time, keeping the two projections on the same pier coordinate and
//!   writing the grid-snapped result back.
//! - **`BerthPlanner`**: owns all of the above and gates commits on the
//!   absence of hard overlaps.

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod err;
pub mod io;
pub mod planner;
pub mod registry;
pub mod session;
pub mod twin;
pub mod view;

pub mod prelude {
    pub use crate::buffer::{ScheduleBuffer, StageHandle};
    pub use crate::config::{EditRules, PastReference, PlannerConfig};
    pub use crate::cursor::{Clock, Cursor, FixedClock, SystemClock, Tense};
    pub use crate::err::{
        BufferError, CommitError, ConfigError, LoadError, PersistError, RegistryError,
        SessionError,
    };
    pub use crate::io::{JsonFileStore, MemoryStore, SplitStore, StaySink, StaySource};
    pub use crate::planner::BerthPlanner;
    pub use crate::registry::BerthRegistry;
    pub use crate::session::{Edge, EditSession, Gesture, SessionState};
    pub use crate::twin::DriveOutcome;
    pub use crate::view::{ProjectionFlags, ProjectionKey, Projections, ViewState};
}
