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

use crate::view::ProjectionKey;
use quay_plan_core::{
    grid::GridError,
    space::{PierLength, PierPosition},
};
use quay_plan_model::{err::StayOverlapError, id::StayId, wire::WireError};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositivePierLength(f64),
    Grid(GridError),
    NonFiniteShipBand(f64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositivePierLength(v) => {
                write!(f, "pier_length must be positive and finite, got {}", v)
            }
            ConfigError::Grid(e) => write!(f, "{}", e),
            ConfigError::NonFiniteShipBand(v) => {
                write!(f, "ship_band_px must be finite, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<GridError> for ConfigError {
    fn from(err: GridError) -> Self {
        ConfigError::Grid(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOutOfRangeError {
    id: StayId,
    pos: PierPosition,
    pier_length: PierLength,
}

impl PositionOutOfRangeError {
    #[inline]
    pub fn new(id: StayId, pos: PierPosition, pier_length: PierLength) -> Self {
        Self {
            id,
            pos,
            pier_length,
        }
    }

    #[inline]
    pub fn id(&self) -> StayId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> PierPosition {
        self.pos
    }

    #[inline]
    pub fn pier_length(&self) -> PierLength {
        self.pier_length
    }
}

impl Display for PositionOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stay {} is docked at {} outside the pier [0m, {}]",
            self.id, self.pos, self.pier_length
        )
    }
}

impl std::error::Error for PositionOutOfRangeError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegistryError {
    DuplicateStayId(StayId),
    PositionOutOfRange(PositionOutOfRangeError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateStayId(id) => write!(f, "Duplicate stay id {}", id),
            RegistryError::PositionOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<PositionOutOfRangeError> for RegistryError {
    fn from(err: PositionOutOfRangeError) -> Self {
        RegistryError::PositionOutOfRange(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferError {
    DuplicateStayId(StayId),
    PositionOutOfRange(PositionOutOfRangeError),
}

impl Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::DuplicateStayId(id) => {
                write!(f, "Stay id {} is already staged", id)
            }
            BufferError::PositionOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BufferError {}

impl From<PositionOutOfRangeError> for BufferError {
    fn from(err: PositionOutOfRangeError) -> Self {
        BufferError::PositionOutOfRange(err)
    }
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Wire(WireError),
    Registry(RegistryError),
    Unavailable(String),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Failed to read stays: {}", e),
            LoadError::Wire(e) => write!(f, "{}", e),
            LoadError::Registry(e) => write!(f, "Loaded stays rejected: {}", e),
            LoadError::Unavailable(reason) => write!(f, "Stay source unavailable: {}", reason),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Wire(e) => Some(e),
            LoadError::Registry(e) => Some(e),
            LoadError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<WireError> for LoadError {
    fn from(err: WireError) -> Self {
        LoadError::Wire(err)
    }
}

impl From<RegistryError> for LoadError {
    fn from(err: RegistryError) -> Self {
        LoadError::Registry(err)
    }
}

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Rejected(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "Failed to write stays: {}", e),
            PersistError::Json(e) => write!(f, "Failed to encode stays: {}", e),
            PersistError::Rejected(reason) => write!(f, "Persist rejected: {}", reason),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Json(e) => Some(e),
            PersistError::Rejected(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Json(err)
    }
}

#[derive(Debug)]
pub enum CommitError {
    /// Two buffer entries overlap; nothing was persisted.
    Infeasible(StayOverlapError),
    Encode(WireError),
    Persist(PersistError),
    /// The sink accepted the plan but the following reload failed.
    Reload(LoadError),
}

impl Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitError::Infeasible(e) => write!(f, "Error: Hard Overlap Detected: {}", e),
            CommitError::Encode(e) => write!(f, "{}", e),
            CommitError::Persist(e) => write!(f, "{}", e),
            CommitError::Reload(e) => write!(f, "Committed, but reload failed: {}", e),
        }
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommitError::Infeasible(e) => Some(e),
            CommitError::Encode(e) => Some(e),
            CommitError::Persist(e) => Some(e),
            CommitError::Reload(e) => Some(e),
        }
    }
}

impl From<StayOverlapError> for CommitError {
    fn from(err: StayOverlapError) -> Self {
        CommitError::Infeasible(err)
    }
}

impl From<WireError> for CommitError {
    fn from(err: WireError) -> Self {
        CommitError::Encode(err)
    }
}

impl From<PersistError> for CommitError {
    fn from(err: PersistError) -> Self {
        CommitError::Persist(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    NoActiveSession,
    UnknownProjection(ProjectionKey),
    ResizeNeedsTemporalBox(ProjectionKey),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoActiveSession => write!(f, "No gesture in progress"),
            SessionError::UnknownProjection(key) => write!(f, "Unknown projection {}", key),
            SessionError::ResizeNeedsTemporalBox(key) => {
                write!(f, "Only temporal boxes can be resized, got {}", key)
            }
        }
    }
}

impl std::error::Error for SessionError {}
