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

//! # Load and Persist Collaborators
//!
//! The planner reads its baseline from a [`StaySource`] and hands the whole
//! working buffer to a [`StaySink`] on commit. Both are synchronous; a host
//! whose transport is asynchronous drives them from its own runtime.

use crate::err::{LoadError, PersistError};
use quay_plan_model::{
    generator::StayGenerator,
    stay::{Stay, StayStatus},
    wire::{self, StayRecord, WireError},
};
use std::path::{Path, PathBuf};

pub trait StaySource {
    /// Yields the full ordered set of stays.
    fn load(&mut self) -> Result<Vec<Stay>, LoadError>;
}

pub trait StaySink {
    /// Accepts every buffered record, deleted ones included with their status.
    fn persist(&mut self, records: &[StayRecord]) -> Result<(), PersistError>;
}

/// What a store keeps after accepting a commit: deleted records are dropped
/// and the remaining ones lose their pending status.
fn accepted(records: &[StayRecord]) -> Vec<StayRecord> {
    records
        .iter()
        .filter(|r| r.status != Some(StayStatus::Deleted))
        .map(|r| StayRecord {
            status: None,
            ..r.clone()
        })
        .collect()
}

/// A source and a sink driven as one store.
#[derive(Debug, Clone, Default)]
pub struct SplitStore<Src, Snk> {
    pub source: Src,
    pub sink: Snk,
}

impl<Src, Snk> SplitStore<Src, Snk> {
    pub fn new(source: Src, sink: Snk) -> Self {
        Self { source, sink }
    }
}

impl<Src: StaySource, Snk> StaySource for SplitStore<Src, Snk> {
    #[inline]
    fn load(&mut self) -> Result<Vec<Stay>, LoadError> {
        self.source.load()
    }
}

impl<Src, Snk: StaySink> StaySink for SplitStore<Src, Snk> {
    #[inline]
    fn persist(&mut self, records: &[StayRecord]) -> Result<(), PersistError> {
        self.sink.persist(records)
    }
}

/// In-memory store holding wire records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<StayRecord>,
    persist_count: usize,
    last_persisted: Vec<StayRecord>,
    reject_next: Option<String>,
    unavailable: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StayRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn from_stays<'a, I>(stays: I) -> Result<Self, WireError>
    where
        I: IntoIterator<Item = &'a Stay>,
    {
        Ok(Self::from_records(wire::encode_records(stays)?))
    }

    /// Seeds the store with one generated plan.
    pub fn from_generator(generator: &mut StayGenerator) -> Result<Self, WireError> {
        let stays = generator.generate();
        Self::from_stays(&stays)
    }

    #[inline]
    pub fn records(&self) -> &[StayRecord] {
        &self.records
    }

    /// The records handed over by the most recent successful persist, before
    /// deleted entries were dropped.
    #[inline]
    pub fn last_persisted(&self) -> &[StayRecord] {
        &self.last_persisted
    }

    #[inline]
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }

    /// Makes the next persist fail with `reason`.
    pub fn reject_next_persist(&mut self, reason: impl Into<String>) {
        self.reject_next = Some(reason.into());
    }

    /// Makes every load fail until cleared with `None`.
    pub fn set_unavailable(&mut self, reason: Option<String>) {
        self.unavailable = reason;
    }
}

impl StaySource for MemoryStore {
    fn load(&mut self) -> Result<Vec<Stay>, LoadError> {
        if let Some(reason) = &self.unavailable {
            return Err(LoadError::Unavailable(reason.clone()));
        }
        Ok(wire::decode_records(self.records.clone())?)
    }
}

impl StaySink for MemoryStore {
    fn persist(&mut self, records: &[StayRecord]) -> Result<(), PersistError> {
        if let Some(reason) = self.reject_next.take() {
            return Err(PersistError::Rejected(reason));
        }
        self.last_persisted = records.to_vec();
        self.records = accepted(records);
        self.persist_count += 1;
        Ok(())
    }
}

/// Store backed by a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StaySource for JsonFileStore {
    fn load(&mut self) -> Result<Vec<Stay>, LoadError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(wire::parse_stays(&json)?)
    }
}

impl StaySink for JsonFileStore {
    fn persist(&mut self, records: &[StayRecord]) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(&accepted(records))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
